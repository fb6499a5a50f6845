//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con opzioni di ottimizzazione e parametri runtime
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `options`: Option model (preset + switch), default: preset `basic`
//! - `svgo_path`: Path esplicito del binario svgo (default: None = auto-detect)
//! - `pacing_delay_ms`: Ritardo prima di ogni run (default: 300, 0 = disabilitato)
//! - `engine_timeout_secs`: Timeout per singola chiamata all'engine (default: 30)
//! - `workers`: Numero di file processati in parallelo (default: 4)
//! - `output_path`: Directory di output (default: None = accanto al sorgente)
//! - `dry_run`: Non scrive nessun file (default: false)
//! - `json_output`: Output JSON line-delimited (default: false)
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     workers: 8,
//!     pacing_delay_ms: 0,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::options::OptionModel;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for SVG optimization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preset and switches used for the full tier
    pub options: OptionModel,
    /// Explicit svgo binary (None = auto-detect)
    pub svgo_path: Option<PathBuf>,
    /// Delay before each optimization run, in milliseconds
    pub pacing_delay_ms: u64,
    /// Upper bound for a single engine call, in seconds
    pub engine_timeout_secs: u64,
    /// Number of files optimized concurrently
    pub workers: usize,
    /// Output directory for optimized files (None = next to the source)
    pub output_path: Option<PathBuf>,
    /// Dry run - don't write any file
    pub dry_run: bool,
    /// Output progress and results as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: OptionModel::default(),
            svgo_path: None,
            pacing_delay_ms: 300,
            engine_timeout_secs: 30,
            workers: 4,
            output_path: None,
            dry_run: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        if self.engine_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Engine timeout must be greater than 0 seconds"));
        }

        if self.pacing_delay_ms > 10_000 {
            return Err(anyhow::anyhow!("Pacing delay must be at most 10000 ms"));
        }

        if let Some(ref svgo_path) = self.svgo_path {
            if !svgo_path.is_file() {
                return Err(anyhow::anyhow!("svgo binary does not exist: {}", svgo_path.display()));
            }
        }

        if let Some(ref output_path) = self.output_path {
            if output_path.exists() && !output_path.is_dir() {
                return Err(anyhow::anyhow!("Output path is not a directory: {}", output_path.display()));
            }
        }

        Ok(())
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs)
    }

    /// `~/.svg-optimizer/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".svg-optimizer").join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let mut config: Config = serde_json::from_str(&content)?;
        // missing switches were filled from the basic table
        config.options = config.options.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
