// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de la réponse du serveur d'analytics
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod option_quote;     // Une ligne de la chaîne d'options
pub mod expiration;       // Résumé par date d'expiration
pub mod options_response; // Réponse complète (prix + expirations ordonnées)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyoptions::models::option_quote::OptionQuote;
// On peut faire : use lazyoptions::models::OptionQuote;
pub use option_quote::OptionQuote;
pub use expiration::{ExpirationSummary, Outlook};
pub use options_response::{Expirations, OptionsResponse};
