// ============================================================================
// Module : ui
// ============================================================================
// Gère la zone de résultats : rendu HTML et surface d'affichage
// ============================================================================

pub mod html; // Rendu HTML (chargement, erreurs, tableaux d'options)
pub mod sink; // Zone de résultats remplaçable (fichier, mémoire)

// Re-exports pour simplifier les imports
pub use html::{render_error, render_loading, render_options};
pub use sink::{HtmlFileSink, MemorySink, ResultsSink};
