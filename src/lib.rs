// ============================================================================
// LazyOptions - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client du serveur d'analytics
pub mod models;    // Structures de la réponse
pub mod app;       // Presenter et machine à états
pub mod ui;        // Rendu HTML et zone de résultats
pub mod config;    // Configuration (variables d'environnement)
pub mod error;     // Taxonomie des erreurs

pub use app::{RequestPresenter, PresenterState, SubmitOutcome, SymbolInput};
pub use error::PresenterError;
