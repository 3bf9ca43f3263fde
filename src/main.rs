// ============================================================================
// LazyOptions - Analytics d'options en HTML
// ============================================================================
// Envoie des symboles au serveur d'analytics et écrit les résultats dans
// une page HTML (la "zone de résultats")
//
//   lazyoptions AAPL TSLA   : soumet chaque symbole, l'un après l'autre
//   lazyoptions             : mode interactif, un symbole par ligne sur stdin
//
// CONCEPTS RUST CLÉS :
// 1. Async dans sync : tokio::runtime::Runtime pour les appels réseau
// 2. Arc : presenter partagé entre les tâches tokio
// 3. JoinSet : attendre toutes les soumissions en vol avant de quitter
// ============================================================================

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use lazyoptions::api::OptionsServerClient;
use lazyoptions::config::Config;
use lazyoptions::ui::HtmlFileSink;
use lazyoptions::{RequestPresenter, SubmitOutcome};

type Presenter = RequestPresenter<OptionsServerClient, HtmlFileSink>;

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging vers fichier
// - stdout est réservé au prompt et aux résumés pour l'utilisateur
// - Les détails (statuts HTTP, erreurs complètes) vont dans le fichier
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
/// - RollingFileAppender : rotation automatique
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyoptions/logs/lazyoptions.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=lazyoptions=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();

    // Crée le répertoire s'il n'existe pas
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyoptions.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: lazyoptions::api::options_server)
                .with_thread_ids(true) // Plusieurs tâches peuvent être en vol
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyoptions, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyoptions=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Un .env absent n'est pas une erreur
    dotenv::dotenv().ok();

    let config = Config::from_env().context("Configuration invalide")?;

    // Si le logging échoue, on continue quand même
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        server = %config.server_url,
        output = %config.output_path.display(),
        timeout = ?config.request_timeout,
        "LazyOptions starting up"
    );

    let symbols: Vec<String> = std::env::args().skip(1).collect();

    let client = OptionsServerClient::new(&config.server_url, config.request_timeout)?;
    let sink = HtmlFileSink::new(&config.output_path).with_title(page_title(&symbols));
    let presenter = Arc::new(RequestPresenter::new(client, sink));

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let result = if symbols.is_empty() {
        runtime.block_on(run_interactive(presenter, &config))
    } else {
        runtime.block_on(run_batch(&presenter, &config, symbols))
    };

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Modes d'exécution
// ============================================================================

/// Soumet chaque symbole de la ligne de commande, l'un après l'autre
async fn run_batch(presenter: &Presenter, config: &Config, symbols: Vec<String>) -> Result<()> {
    for (i, symbol) in symbols.iter().enumerate() {
        debug!(symbol = %symbol, progress = i + 1, total = symbols.len(), "Submitting symbol");
        println!("  [{}/{}] {}...", i + 1, symbols.len(), symbol);

        let outcome = presenter.submit(symbol.clone()).await;
        report(symbol, &outcome, config);
    }

    Ok(())
}

/// Un symbole par ligne sur stdin, chaque ligne part dans sa propre tâche
///
/// CONCEPT : soumissions concurrentes
/// - Une ligne n'attend pas la réponse de la précédente
/// - Le presenter ignore les réponses des soumissions dépassées
async fn run_interactive(presenter: Arc<Presenter>, config: &Config) -> Result<()> {
    println!("📊 Résultats écrits dans {}", config.output_path.display());
    println!("   Tapez un symbole puis Entrée (Ctrl-D pour quitter)\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    prompt()?;
    while let Some(line) = lines.next_line().await.context("Échec de la lecture de stdin")? {
        let symbol = line.trim().to_string();
        if !symbol.is_empty() {
            let handle = presenter.spawn_submit(symbol.clone());
            let config = config.clone();

            tasks.spawn(async move {
                match handle.await {
                    Ok(outcome) => report(&symbol, &outcome, &config),
                    Err(e) => error!(symbol = %symbol, error = %e, "Submission task panicked"),
                }
            });
        }
        prompt()?;
    }

    // EOF : attend les soumissions encore en vol
    debug!(pending = tasks.len(), "Waiting for outstanding submissions");
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Report task failed");
        }
    }

    println!();
    Ok(())
}

/// Titre de la page : les symboles de la ligne de commande s'il y en a
fn page_title(symbols: &[String]) -> String {
    if symbols.is_empty() {
        "Options Analytics".to_string()
    } else {
        format!("Options Analytics: {}", symbols.join(", "))
    }
}

fn prompt() -> Result<()> {
    print!("symbol> ");
    std::io::stdout().flush().context("Échec de l'écriture sur stdout")
}

/// Résumé d'une soumission pour l'utilisateur
fn report(symbol: &str, outcome: &SubmitOutcome, config: &Config) {
    match outcome {
        SubmitOutcome::Rendered => {
            println!("    ✓ {} : résultats écrits dans {}", symbol, config.output_path.display())
        }
        SubmitOutcome::ErrorDisplayed(e) => println!("    ✗ {} : {}", symbol, e),
        SubmitOutcome::Superseded => {
            println!("    … {} : réponse ignorée (soumission plus récente)", symbol)
        }
    }
}
