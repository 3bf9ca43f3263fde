// ============================================================================
// Structure : RequestPresenter
// ============================================================================
// Gère une soumission de symbole de bout en bout :
//   chargement -> appel serveur -> rendu HTML (ou message d'erreur)
//
// CONCEPTS RUST :
// 1. State Management : l'état de la zone de résultats est une enum
// 2. Injection de dépendances : OptionsApi (serveur), ResultsSink (zone
//    d'affichage), SymbolInput (champ texte)
// 3. Jeton de session : chaque soumission reçoit un numéro croissant, seule
//    la plus récente a le droit d'écrire dans la zone de résultats
//
// PATTERN : State Machine
//   Idle -> Loading -> { Rendered | ErrorDisplayed }
//   Chaque nouvelle soumission repasse immédiatement en Loading
// ============================================================================

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::OptionsApi;
use crate::error::PresenterError;
use crate::ui::html::{render_error, render_loading, render_options};
use crate::ui::sink::ResultsSink;

// ============================================================================
// Trait : SymbolInput
// ============================================================================

/// Fournisseur de la valeur du champ "symbole"
pub trait SymbolInput {
    fn value(&self) -> String;
}

impl SymbolInput for str {
    fn value(&self) -> String {
        self.to_string()
    }
}

impl SymbolInput for String {
    fn value(&self) -> String {
        self.clone()
    }
}

// ============================================================================
// Enum : PresenterState
// ============================================================================

/// État de la zone de résultats
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterState {
    /// Rien n'a encore été soumis
    Idle,

    /// Requête `request_id` en cours
    Loading { request_id: u64, symbol: String },

    /// Résultats affichés
    Rendered { request_id: u64, symbol: String },

    /// Message d'erreur affiché
    ErrorDisplayed {
        request_id: u64,
        symbol: String,
        error: PresenterError,
    },
}

impl PresenterState {
    pub fn is_loading(&self) -> bool {
        matches!(self, PresenterState::Loading { .. })
    }
}

/// Issue d'une soumission, vue par l'appelant
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Les résultats ont été affichés
    Rendered,

    /// L'erreur a été affichée
    ErrorDisplayed(PresenterError),

    /// Une soumission plus récente existe : réponse ignorée, rien n'est écrit
    Superseded,
}

/// Partie mutable, protégée par un seul Mutex pour que numéro de requête,
/// état et écriture dans la zone restent cohérents
#[derive(Debug)]
struct Session {
    latest_request_id: u64,
    state: PresenterState,
}

/// Presenter : relie le champ symbole, le serveur et la zone de résultats
pub struct RequestPresenter<A, S> {
    api: A,
    sink: S,
    session: Mutex<Session>,
}

impl<A, S> RequestPresenter<A, S>
where
    A: OptionsApi,
    S: ResultsSink,
{
    /// Crée un presenter à l'état Idle
    pub fn new(api: A, sink: S) -> Self {
        Self {
            api,
            sink,
            session: Mutex::new(Session {
                latest_request_id: 0,
                state: PresenterState::Idle,
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Copie de l'état actuel
    pub fn state(&self) -> PresenterState {
        self.lock().state.clone()
    }

    /// Numéro de la dernière soumission (0 = aucune)
    pub fn latest_request_id(&self) -> u64 {
        self.lock().latest_request_id
    }

    /// Soumission du formulaire : lit le champ puis appelle submit()
    ///
    /// Seuls les espaces autour de la valeur sont retirés, aucune autre
    /// validation (c'est le serveur qui rejette les symboles invalides).
    pub fn on_submit(&self, input: &dyn SymbolInput) -> impl Future<Output = SubmitOutcome> + '_ {
        let symbol = input.value().trim().to_string();
        self.submit(symbol)
    }

    /// Soumet un symbole
    ///
    /// CONCEPT RUST : fn qui retourne une Future (et non async fn)
    /// - begin() s'exécute tout de suite, à l'appel : l'indicateur de
    ///   chargement est affiché avant toute activité réseau
    /// - La requête ne part qu'au premier .await de la Future retournée
    pub fn submit(&self, symbol: String) -> impl Future<Output = SubmitOutcome> + '_ {
        let request_id = self.begin(&symbol);
        self.complete(request_id, symbol)
    }

    /// Comme submit(), mais la suite s'exécute dans une tâche tokio
    ///
    /// Le chargement est affiché avant le spawn ; plusieurs soumissions
    /// peuvent ainsi être en vol en même temps (la plus récente gagne).
    pub fn spawn_submit(self: &Arc<Self>, symbol: String) -> JoinHandle<SubmitOutcome>
    where
        A: 'static,
        S: 'static,
    {
        let request_id = self.begin(&symbol);
        let presenter = Arc::clone(self);
        tokio::spawn(async move { presenter.complete(request_id, symbol).await })
    }

    /// Attend la réponse puis affiche résultats ou erreur, sauf si une
    /// soumission plus récente a été faite entre-temps
    async fn complete(&self, request_id: u64, symbol: String) -> SubmitOutcome {
        let result = self.api.fetch_options(&symbol).await;

        let mut session = self.lock();
        if request_id != session.latest_request_id {
            debug!(
                request_id,
                latest = session.latest_request_id,
                symbol = %symbol,
                "Discarding response from superseded request"
            );
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok(data) => {
                self.show(&render_options(&data));
                info!(
                    request_id,
                    symbol = %symbol,
                    expirations = data.expirations.len(),
                    "Options rendered"
                );
                session.state = PresenterState::Rendered { request_id, symbol };
                SubmitOutcome::Rendered
            }
            Err(e) => {
                error!(request_id, symbol = %symbol, kind = e.kind(), error = %e, "Submission failed");
                self.show(&render_error(&e));
                session.state = PresenterState::ErrorDisplayed {
                    request_id,
                    symbol,
                    error: e.clone(),
                };
                SubmitOutcome::ErrorDisplayed(e)
            }
        }
    }

    /// Nouveau numéro de requête + indicateur de chargement (synchrone)
    fn begin(&self, symbol: &str) -> u64 {
        let mut session = self.lock();
        session.latest_request_id += 1;
        let request_id = session.latest_request_id;

        self.show(&render_loading());
        session.state = PresenterState::Loading {
            request_id,
            symbol: symbol.to_string(),
        };

        info!(request_id, symbol = %symbol, "Submission started");
        request_id
    }

    /// Remplace la zone de résultats ; un échec d'écriture est seulement loggé
    fn show(&self, markup: &str) {
        if let Err(e) = self.sink.replace(markup) {
            warn!(error = %e, "Failed to write results region");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
