// ============================================================================
// Module : api
// ============================================================================
// Client du serveur d'analytics d'options
// ============================================================================

pub mod options_server;

pub use options_server::{OptionsApi, OptionsServerClient, OPTIONS_PATH};
