// ============================================================================
// Structure : OptionsResponse
// ============================================================================
// Réponse complète de POST /get_options
//
// CONCEPT RUST : Visitor serde
// - Un HashMap perdrait l'ordre des expirations envoyé par le serveur
// - On implémente Deserialize à la main avec un Visitor qui lit la map
//   JSON entrée par entrée et remplit un Vec (ordre conservé)
// ============================================================================

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::ExpirationSummary;

/// Réponse du serveur d'analytics
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionsResponse {
    /// Dernier prix du sous-jacent
    pub current_price: f64,

    /// Expirations dans l'ordre du serveur
    pub expirations: Expirations,
}

/// Map ordonnée : date d'expiration -> résumé
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expirations(Vec<(String, ExpirationSummary)>);

impl Expirations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Ajoute une expiration
    ///
    /// Une clé déjà présente garde sa position, la nouvelle valeur remplace
    /// l'ancienne (comme un objet JSON lu par un navigateur).
    pub fn insert(&mut self, label: String, summary: ExpirationSummary) {
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = summary,
            None => self.0.push((label, summary)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&ExpirationSummary> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, summary)| summary)
    }

    /// Itère dans l'ordre du serveur
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExpirationSummary)> {
        self.0.iter().map(|(label, summary)| (label.as_str(), summary))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.0.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct ExpirationsVisitor;

impl<'de> Visitor<'de> for ExpirationsVisitor {
    type Value = Expirations;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of expiration date to summary")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut expirations = Expirations(Vec::with_capacity(access.size_hint().unwrap_or(0)));

        while let Some((label, summary)) = access.next_entry::<String, ExpirationSummary>()? {
            expirations.insert(label, summary);
        }

        Ok(expirations)
    }
}

impl<'de> Deserialize<'de> for Expirations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ExpirationsVisitor)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_json(outlook: &str) -> String {
        format!(
            r#"{{"options": [], "put_call_ratio": 1.0, "outlook": "{}", "max_pain": 20.0, "expected_move": 1.0}}"#,
            outlook
        )
    }

    #[test]
    fn test_expirations_keep_server_order() {
        // Ordre volontairement non trié
        let json = format!(
            r#"{{"current_price": 21.5, "expirations": {{"2024-11-22": {}, "2024-11-15": {}, "2025-01-17": {}}}}}"#,
            summary_json("Bullish"),
            summary_json("Bearish"),
            summary_json("Neutral"),
        );

        let response: OptionsResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(
            response.expirations.labels(),
            vec!["2024-11-22", "2024-11-15", "2025-01-17"]
        );
        assert_eq!(response.current_price, 21.5);
    }

    #[test]
    fn test_duplicate_expiration_keeps_first_position() {
        let json = format!(
            r#"{{"a": {}, "b": {}, "a": {}}}"#,
            summary_json("Bullish"),
            summary_json("Neutral"),
            summary_json("Bearish"),
        );

        let expirations: Expirations = serde_json::from_str(&json).unwrap();

        assert_eq!(expirations.labels(), vec!["a", "b"]);
        assert_eq!(expirations.get("a").unwrap().outlook.label(), "Bearish");
    }

    #[test]
    fn test_missing_current_price_is_rejected() {
        let result = serde_json::from_str::<OptionsResponse>(r#"{"expirations": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_expirations_must_be_an_object() {
        let result = serde_json::from_str::<OptionsResponse>(
            r#"{"current_price": 1.0, "expirations": []}"#,
        );
        assert!(result.is_err());
    }
}
