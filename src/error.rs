// ============================================================================
// Erreurs de la librairie
// ============================================================================
// Taxonomie des échecs d'une soumission. Toutes sont terminales : pas de
// retry, le message est affiché puis loggé.
//
// CONCEPT RUST : thiserror
// - #[error("...")] génère l'implémentation de Display
// - Le texte affiché dans la zone de résultats est exactement Display
// ============================================================================

use thiserror::Error;

/// Échec d'une soumission de symbole
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresenterError {
    /// Statut HTTP non-2xx sans corps `{"error": ...}` exploitable
    #[error("Request failed with HTTP status {status}")]
    Transport { status: u16 },

    /// Statut non-2xx avec un message d'erreur du serveur
    #[error("{0}")]
    ServerReported(String),

    /// Réponse 2xx qui ne correspond pas au format attendu
    #[error("Unexpected response from server: {0}")]
    Render(String),

    /// La requête n'a jamais abouti (DNS, connexion refusée, timeout...)
    #[error("Network error: {0}")]
    Network(String),
}

impl PresenterError {
    /// Nom court de la catégorie, pour les logs
    pub fn kind(&self) -> &'static str {
        match self {
            PresenterError::Transport { .. } => "transport",
            PresenterError::ServerReported(_) => "server_reported",
            PresenterError::Render(_) => "render",
            PresenterError::Network(_) => "network",
        }
    }
}

pub type PresenterResult<T> = Result<T, PresenterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_displayed_verbatim() {
        let err = PresenterError::ServerReported("bad symbol".to_string());
        assert_eq!(err.to_string(), "bad symbol");
    }

    #[test]
    fn test_transport_error_mentions_status() {
        let err = PresenterError::Transport { status: 500 };
        assert!(err.to_string().contains("500"));
        assert_eq!(err.kind(), "transport");
    }
}
