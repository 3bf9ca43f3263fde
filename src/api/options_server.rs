// ============================================================================
// API Client : serveur d'analytics d'options
// ============================================================================
// Envoie un symbole à POST /get_options et récupère la chaîne d'options
// déjà analysée par le serveur
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Traits : OptionsApi permet d'injecter un faux serveur dans les tests
// 3. Serde : sérialisation de la requête, désérialisation de la réponse
// 4. Erreurs typées : chaque échec est classé dans PresenterError
// ============================================================================

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{PresenterError, PresenterResult};
use crate::models::OptionsResponse;

/// Chemin fixe de l'endpoint
pub const OPTIONS_PATH: &str = "/get_options";

// ============================================================================
// Structures JSON échangées avec le serveur
// ============================================================================

/// Corps de la requête : {"symbol": "AAPL"}
#[derive(Debug, Serialize)]
struct SymbolRequest<'a> {
    symbol: &'a str,
}

/// Corps d'erreur optionnel : {"error": "..."}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ============================================================================
// Trait OptionsApi
// ============================================================================
// CONCEPT RUST : #[async_trait]
// - Les futures retournées sont Send, ce qui permet tokio::spawn
// - Le presenter est générique sur ce trait (pas de réseau en test)
// ============================================================================

/// Source des analytics d'options
#[async_trait]
pub trait OptionsApi: Send + Sync {
    /// Récupère les analytics pour un symbole
    async fn fetch_options(&self, symbol: &str) -> PresenterResult<OptionsResponse>;
}

// ============================================================================
// Client HTTP
// ============================================================================

/// Client HTTP vers le serveur d'analytics
#[derive(Debug, Clone)]
pub struct OptionsServerClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OptionsServerClient {
    /// Crée un client pour `base_url` (ex: "http://127.0.0.1:5000")
    ///
    /// `timeout` : None = pas de limite (une requête bloquée reste en
    /// chargement indéfiniment)
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            endpoint: build_endpoint(base_url),
        })
    }

    /// URL complète de l'endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OptionsApi for OptionsServerClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_options(&self, symbol: &str) -> PresenterResult<OptionsResponse> {
        debug!("Sending HTTP request to options server");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SymbolRequest { symbol })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Request never reached the options server");
                PresenterError::Network(e.to_string())
            })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            PresenterError::Network(e.to_string())
        })?;

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &body);
            error!(status = %status, kind = err.kind(), error = %err, "Options server returned error status");
            return Err(err);
        }

        debug!(bytes = body.len(), "Parsing JSON response");
        let data = parse_options_body(&body)?;

        info!(
            current_price = data.current_price,
            expirations = data.expirations.len(),
            "Successfully fetched options analytics"
        );
        Ok(data)
    }
}

/// Construit l'URL de l'endpoint à partir de l'URL de base
///
/// Tolère un '/' final dans l'URL de base.
fn build_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), OPTIONS_PATH)
}

/// Classe une réponse non-2xx
///
/// Corps JSON avec "error" non vide -> ServerReported, sinon -> Transport(status)
fn classify_failure(status: u16, body: &str) -> PresenterError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) if !error.trim().is_empty() => PresenterError::ServerReported(error),
        Ok(_) => {
            warn!(status, "Error body carries a blank message");
            PresenterError::Transport { status }
        }
        Err(e) => {
            warn!(status, error = %e, "Error body is not a JSON {{\"error\": ...}} object");
            PresenterError::Transport { status }
        }
    }
}

/// Parse un corps 2xx, échec immédiat si la structure ne correspond pas
fn parse_options_body(body: &str) -> PresenterResult<OptionsResponse> {
    serde_json::from_str(body).map_err(|e| {
        error!(error = %e, "Malformed options response");
        PresenterError::Render(e.to_string())
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn sample_body() -> serde_json::Value {
        json!({
            "current_price": 123.4,
            "expirations": {
                "2024-11-15": {
                    "put_call_ratio": 0.85,
                    "outlook": "Bullish",
                    "max_pain": 120.0,
                    "expected_move": 4.2,
                    "options": [{
                        "Strike": 110.0, "Bid": 0.5, "Ask": 0.55, "Delta": -0.1234,
                        "IV": 0.256, "Volume": 300, "Open Interest": 800,
                        "Annualized Return": "12.34%"
                    }]
                }
            }
        })
    }

    #[test]
    fn test_build_endpoint() {
        assert_eq!(build_endpoint("http://localhost:5000"), "http://localhost:5000/get_options");
        assert_eq!(build_endpoint("http://localhost:5000/"), "http://localhost:5000/get_options");
    }

    #[test]
    fn test_classify_failure() {
        assert_eq!(
            classify_failure(400, r#"{"error":"bad symbol"}"#),
            PresenterError::ServerReported("bad symbol".to_string())
        );
        assert_eq!(
            classify_failure(500, "<html>Internal Server Error</html>"),
            PresenterError::Transport { status: 500 }
        );
        // JSON valide mais sans champ "error"
        assert_eq!(
            classify_failure(502, r#"{"message":"oops"}"#),
            PresenterError::Transport { status: 502 }
        );
    }

    #[test]
    fn test_blank_server_message_falls_back_to_status() {
        assert_eq!(
            classify_failure(400, r#"{"error":""}"#),
            PresenterError::Transport { status: 400 }
        );
        assert_eq!(
            classify_failure(503, r#"{"error":"   "}"#),
            PresenterError::Transport { status: 503 }
        );
    }

    #[tokio::test]
    async fn test_infinite_put_call_ratio_is_render_error() {
        // Le serveur Flask sérialise float('inf') en `Infinity`, qui n'est pas du JSON
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/get_options");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        r#"{"current_price": 20.0, "expirations": {"2024-11-15": {
                            "put_call_ratio": Infinity, "outlook": "Bearish",
                            "max_pain": 20.0, "expected_move": 1.0, "options": []}}}"#,
                    );
            })
            .await;

        let client = OptionsServerClient::new(&server.base_url(), None).unwrap();
        let err = client.fetch_options("AAPL").await.unwrap_err();

        assert!(matches!(err, PresenterError::Render(_)));
    }

    #[tokio::test]
    async fn test_posts_symbol_as_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/get_options")
                    .header("content-type", "application/json")
                    .json_body(json!({"symbol": "AAPL"}));
                then.status(200).json_body(sample_body());
            })
            .await;

        let client = OptionsServerClient::new(&server.base_url(), None).unwrap();
        let data = client.fetch_options("AAPL").await.unwrap();

        mock.assert_async().await;
        assert_eq!(data.current_price, 123.4);
        assert_eq!(data.expirations.labels(), vec!["2024-11-15"]);
    }

    #[tokio::test]
    async fn test_server_reported_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/get_options");
                then.status(400).json_body(json!({"error": "bad symbol"}));
            })
            .await;

        let client = OptionsServerClient::new(&server.base_url(), None).unwrap();
        let err = client.fetch_options("???").await.unwrap_err();

        assert_eq!(err, PresenterError::ServerReported("bad symbol".to_string()));
        assert_eq!(err.to_string(), "bad symbol");
    }

    #[tokio::test]
    async fn test_unparseable_error_body_reports_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/get_options");
                then.status(500).body("Internal Server Error");
            })
            .await;

        let client = OptionsServerClient::new(&server.base_url(), None).unwrap();
        let err = client.fetch_options("AAPL").await.unwrap_err();

        assert_eq!(err, PresenterError::Transport { status: 500 });
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_render_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/get_options");
                then.status(200).json_body(json!({"current_price": 10.0}));
            })
            .await;

        let client = OptionsServerClient::new(&server.base_url(), None).unwrap();
        let err = client.fetch_options("AAPL").await.unwrap_err();

        assert!(matches!(err, PresenterError::Render(_)));
        assert!(err.to_string().contains("expirations"));
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/get_options");
                then.status(200)
                    .json_body(sample_body())
                    .delay(Duration::from_secs(5));
            })
            .await;

        let client =
            OptionsServerClient::new(&server.base_url(), Some(Duration::from_millis(100))).unwrap();
        let err = client.fetch_options("AAPL").await.unwrap_err();

        assert!(matches!(err, PresenterError::Network(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) : connexion refusée sur une machine de test
        let client = OptionsServerClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client.fetch_options("AAPL").await.unwrap_err();

        assert!(matches!(err, PresenterError::Network(_)));
        assert!(err.to_string().starts_with("Network error"));
    }
}
