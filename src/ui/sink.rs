// ============================================================================
// Zone de résultats
// ============================================================================
// Surface de sortie remplaçable : chaque écriture écrase tout le contenu
// précédent (jamais de mise à jour partielle)
//
// CONCEPTS RUST :
// 1. Trait objet / générique : le presenter ne connaît que ResultsSink
// 2. Mutex : mutabilité intérieure derrière &self (partagé entre tâches)
// 3. Écriture atomique : fichier temporaire puis rename
// ============================================================================

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use tracing::debug;

use super::html::escape;

/// Zone d'affichage dont le contenu est remplacé en entier
pub trait ResultsSink: Send + Sync {
    /// Remplace tout le contenu par `markup`
    fn replace(&self, markup: &str) -> io::Result<()>;
}

// ============================================================================
// MemorySink
// ============================================================================

/// Zone en mémoire, garde aussi l'historique des écritures
#[derive(Debug, Default)]
pub struct MemorySink {
    writes: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contenu actuel (vide si rien n'a encore été écrit)
    pub fn current(&self) -> String {
        self.lock().last().cloned().unwrap_or_default()
    }

    /// Toutes les écritures, dans l'ordre
    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // Un panic pendant un push ne laisse pas le Vec incohérent
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResultsSink for MemorySink {
    fn replace(&self, markup: &str) -> io::Result<()> {
        self.lock().push(markup.to_string());
        Ok(())
    }
}

// ============================================================================
// HtmlFileSink
// ============================================================================

/// Page HTML autonome sur disque, réécrite à chaque mise à jour
#[derive(Debug, Clone)]
pub struct HtmlFileSink {
    path: PathBuf,
    title: String,
}

impl HtmlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: "Options Analytics".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enveloppe le fragment dans une page complète
    fn page(&self, markup: &str) -> String {
        format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body>\n\
             <div id=\"results\">{markup}</div>\n\
             <footer>Generated at {generated}</footer>\n\
             </body>\n\
             </html>\n",
            title = escape(&self.title),
            markup = markup,
            generated = Local::now().format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

impl ResultsSink for HtmlFileSink {
    fn replace(&self, markup: &str) -> io::Result<()> {
        // Écrit à côté puis renomme : un lecteur ne voit jamais une page à moitié écrite
        let tmp = self.path.with_extension("html.tmp");
        std::fs::write(&tmp, self.page(markup))?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), bytes = markup.len(), "Results page written");
        Ok(())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_overwrites() {
        let sink = MemorySink::new();
        assert_eq!(sink.current(), "");

        sink.replace("<p>one</p>").unwrap();
        sink.replace("<p>two</p>").unwrap();

        assert_eq!(sink.current(), "<p>two</p>");
        assert_eq!(sink.history(), vec!["<p>one</p>", "<p>two</p>"]);
    }

    #[test]
    fn test_html_file_sink_writes_full_page() {
        let path = std::env::temp_dir().join(format!("lazyoptions-sink-{}.html", std::process::id()));
        let sink = HtmlFileSink::new(&path).with_title("AAPL & co");

        sink.replace("<p class=\"loading\">Loading...</p>").unwrap();
        sink.replace("<p class=\"error\">bad symbol</p>").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("<title>AAPL &amp; co</title>"));
        assert!(content.contains("<div id=\"results\"><p class=\"error\">bad symbol</p></div>"));
        assert!(!content.contains("Loading..."));
        assert!(!path.with_extension("html.tmp").exists());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_html_file_sink_missing_directory_fails() {
        let sink = HtmlFileSink::new("/nonexistent-lazyoptions-dir/results.html");
        assert!(sink.replace("<p>x</p>").is_err());
    }
}
