// ============================================================================
// Structure : ExpirationSummary
// ============================================================================
// Statistiques calculées par le serveur pour une date d'expiration
//
// CONCEPTS RUST :
// 1. Enum avec variant "fourre-tout" : Outlook::Other(String) garde les
//    valeurs inconnues au lieu d'échouer
// 2. #[serde(deserialize_with)] : le champ doit être PRÉSENT mais peut
//    valoir null (sans ça, serde accepte un Option absent)
// ============================================================================

use serde::{Deserialize, Deserializer};

use super::OptionQuote;

/// Tendance déduite du put/call ratio par le serveur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outlook {
    Bullish,
    Bearish,
    Neutral,
    /// "Unable to determine" : chaîne d'options vide côté serveur
    Undetermined,
    /// Valeur que l'on ne connaît pas, affichée telle quelle
    Other(String),
}

impl Outlook {
    /// Texte affiché à l'utilisateur
    pub fn label(&self) -> &str {
        match self {
            Outlook::Bullish => "Bullish",
            Outlook::Bearish => "Bearish",
            Outlook::Neutral => "Neutral",
            Outlook::Undetermined => "Unable to determine",
            Outlook::Other(s) => s,
        }
    }

    /// Nom de classe CSS : minuscules, espaces remplacés par '-'
    pub fn css_class(&self) -> String {
        self.label()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl From<String> for Outlook {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Bullish" => Outlook::Bullish,
            "Bearish" => Outlook::Bearish,
            "Neutral" => Outlook::Neutral,
            "Unable to determine" => Outlook::Undetermined,
            _ => Outlook::Other(s),
        }
    }
}

impl<'de> Deserialize<'de> for Outlook {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Outlook::from)
    }
}

/// Résumé d'une expiration + options retenues par le serveur
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpirationSummary {
    /// None quand le serveur renvoie null (chaîne vide)
    #[serde(deserialize_with = "nullable")]
    pub put_call_ratio: Option<f64>,

    pub outlook: Outlook,

    #[serde(deserialize_with = "nullable")]
    pub max_pain: Option<f64>,

    /// None si aucun straddle ATM n'existe
    #[serde(deserialize_with = "nullable")]
    pub expected_move: Option<f64>,

    /// Ordre = ordre du serveur
    pub options: Vec<OptionQuote>,
}

impl ExpirationSummary {
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlook_known_values() {
        assert_eq!(Outlook::from("Bullish".to_string()), Outlook::Bullish);
        assert_eq!(Outlook::from("Unable to determine".to_string()), Outlook::Undetermined);
        assert_eq!(Outlook::Undetermined.css_class(), "unable-to-determine");
        assert_eq!(Outlook::Bearish.css_class(), "bearish");
    }

    #[test]
    fn test_undetermined_matches_server_string() {
        let outlook: Outlook = serde_json::from_str(r#""Unable to determine""#).unwrap();
        assert_eq!(outlook, Outlook::Undetermined);
        assert_eq!(outlook.label(), "Unable to determine");

        // Une chaîne vide n'est pas "Unable to determine"
        let empty: Outlook = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(empty, Outlook::Other(String::new()));
    }

    #[test]
    fn test_outlook_unknown_value_is_kept() {
        let outlook = Outlook::from("Very Bullish".to_string());
        assert_eq!(outlook.label(), "Very Bullish");
        assert_eq!(outlook.css_class(), "very-bullish");
    }

    #[test]
    fn test_summary_accepts_nulls() {
        let json = r#"{
            "options": [],
            "put_call_ratio": null,
            "outlook": "Unable to determine",
            "max_pain": null,
            "expected_move": null
        }"#;

        let summary: ExpirationSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.put_call_ratio, None);
        assert_eq!(summary.outlook, Outlook::Undetermined);
        assert!(!summary.has_options());
    }

    #[test]
    fn test_summary_missing_field_is_rejected() {
        // "max_pain" absent (et non null)
        let json = r#"{
            "options": [],
            "put_call_ratio": 0.8,
            "outlook": "Bullish",
            "expected_move": 1.5
        }"#;

        let err = serde_json::from_str::<ExpirationSummary>(json).unwrap_err();
        assert!(err.to_string().contains("max_pain"));
    }
}
