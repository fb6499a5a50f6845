//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `OptimizeError` enum per categorizzare gli errori dell'orchestratore
//! - Definisce `EngineError` per i fallimenti del transform engine esterno
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `Validation`: Documento che non supera il check strutturale
//! - `Engine`: Il transform engine ha fallito (recuperato dal fallback executor)
//! - `Configuration`: Nome di preset/switch sconosciuto o config non valida
//! - `MissingDependency`: Tool esterno mancante (svgo)
//! - `Io` / `Json`: Errori standard convertiti automaticamente
//!
//! ## Propagazione:
//! - `Validation` ed `Engine` non arrivano mai al chiamante di un run: il
//!   fallback executor li converte in "prova il tier successivo"
//! - `Configuration` è fatale e interrompe l'operazione
//!
//! ## Esempio:
//! ```rust,ignore
//! if !validator::is_acceptable(&content) {
//!     return Err(OptimizeError::Validation("missing <svg> root".to_string()));
//! }
//! ```

use std::time::Duration;

/// Custom error types for SVG optimization
#[derive(thiserror::Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document validation error: {0}")]
    Validation(String),

    #[error("Transform engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Dependency missing: {0}")]
    MissingDependency(String),
}

/// Failures raised by a transform engine
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("engine produced unusable output: {0}")]
    InvalidOutput(String),

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("unsupported pass combination: {0}")]
    UnsupportedPassCombination(String),
}
