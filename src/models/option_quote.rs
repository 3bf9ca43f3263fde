// ============================================================================
// Structure : OptionQuote
// ============================================================================
// Une ligne de la chaîne d'options renvoyée par le serveur
//
// CONCEPTS RUST :
// 1. #[serde(rename = "...")] : le serveur utilise des clés "humaines"
//    ("Open Interest", "Annualized Return") qui ne sont pas des identifiants
//    Rust valides, on les mappe vers du snake_case
// 2. serde_json::Number : garde le nombre JSON tel quel (pas de conversion)
// ============================================================================

use serde::Deserialize;
use serde_json::Number;

/// Option filtrée par le serveur (une ligne du tableau)
///
/// Vue en lecture seule : aucune méthode ne modifie une cotation.
/// Les champs inconnus (Symbol, Theta, Expiration...) sont ignorés.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionQuote {
    /// Prix d'exercice
    #[serde(rename = "Strike")]
    pub strike: f64,

    #[serde(rename = "Bid")]
    pub bid: f64,

    #[serde(rename = "Ask")]
    pub ask: f64,

    #[serde(rename = "Delta")]
    pub delta: f64,

    /// Volatilité implicite, en fraction (0.256 = 25.6%)
    #[serde(rename = "IV")]
    pub implied_volatility: f64,

    /// Volume du jour, affiché tel que reçu
    #[serde(rename = "Volume")]
    pub volume: Number,

    /// Open interest, affiché tel que reçu
    #[serde(rename = "Open Interest")]
    pub open_interest: Number,

    /// Rendement annualisé déjà formaté par le serveur (ex: "12.34%")
    #[serde(rename = "Annualized Return")]
    pub annualized_return: String,
}

// ============================================================================
// Tests unitaires
// ============================================================================
