//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON (una riga per messaggio)
//! per l'uso programmatico della CLI.
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio batch con preset e pass compilati
//! - `file_complete`: Documento ottimizzato (tier usato, stats, tier falliti)
//! - `file_rejected`: Documento rifiutato dal validator
//! - `complete`: Fine batch con statistiche finali
//! - `error`: Errore durante elaborazione

use crate::optimizer::fallback::{OptimizationResult, Tier, TierFailure};
use crate::options::Preset;
use crate::progress::BatchStats;
use crate::stats::{CodeStats, Stats};
use serde::Serialize;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonMessage {
    /// Inizio del batch
    Start {
        total_files: usize,
        preset: Preset,
        passes: Vec<String>,
        dry_run: bool,
    },

    /// Documento ottimizzato
    FileComplete {
        path: Option<PathBuf>,
        output_path: Option<PathBuf>,
        tier: Tier,
        stats: Stats,
        code_stats: CodeStats,
        failures: Vec<TierFailure>,
    },

    /// Documento rifiutato dal validator
    FileRejected { path: Option<PathBuf>, reason: String },

    /// Batch completato
    Complete {
        files_processed: usize,
        files_optimized: usize,
        files_passthrough: usize,
        files_rejected: usize,
        errors: usize,
        total_bytes_saved: i64,
        average_reduction: f64,
        duration_seconds: f64,
    },

    /// Errore generale
    Error { message: String, details: Option<String> },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(total_files: usize, preset: Preset, passes: &[crate::passes::PassId], dry_run: bool) -> Self {
        Self::Start {
            total_files,
            preset,
            passes: passes.iter().map(|pass| pass.to_string()).collect(),
            dry_run,
        }
    }

    pub fn file_complete(
        path: Option<PathBuf>,
        output_path: Option<PathBuf>,
        result: &OptimizationResult,
    ) -> Self {
        Self::FileComplete {
            path,
            output_path,
            tier: result.tier_used,
            stats: result.stats,
            code_stats: result.code_stats,
            failures: result.failures.clone(),
        }
    }

    pub fn file_rejected(path: Option<PathBuf>, reason: String) -> Self {
        Self::FileRejected { path, reason }
    }

    pub fn complete(stats: &BatchStats, duration_seconds: f64) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_optimized: stats.files_optimized,
            files_passthrough: stats.files_passthrough,
            files_rejected: stats.files_rejected,
            errors: stats.errors,
            total_bytes_saved: stats.total_bytes_saved(),
            average_reduction: stats.overall_reduction_percent(),
            duration_seconds,
        }
    }

    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::PassId;

    #[test]
    fn test_start_message_shape() {
        let message = JsonMessage::start(3, Preset::Basic, &[PassId::REMOVE_COMMENTS], false);
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "start");
        assert_eq!(json["preset"], "basic");
        assert_eq!(json["passes"][0], "removeComments");
        assert_eq!(json["total_files"], 3);
    }

    #[test]
    fn test_rejected_message_shape() {
        let message = JsonMessage::file_rejected(None, "document is empty".to_string());
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "file_rejected");
        assert!(json["path"].is_null());
        assert_eq!(json["reason"], "document is empty");
    }

    #[test]
    fn test_file_complete_carries_tier() {
        let result = OptimizationResult {
            accepted_output: "<svg></svg>".to_string(),
            tier_used: Tier::Safe,
            stats: Stats::compute("<svg> </svg>", "<svg></svg>"),
            code_stats: CodeStats::compute("<svg> </svg>", "<svg></svg>"),
            failures: vec![TierFailure {
                tier: Tier::Full,
                reason: "boom".to_string(),
            }],
        };
        let json = serde_json::to_value(JsonMessage::file_complete(None, None, &result)).unwrap();

        assert_eq!(json["type"], "file_complete");
        assert_eq!(json["tier"], "safe");
        assert_eq!(json["stats"]["savings_bytes"], 1);
        assert_eq!(json["failures"][0]["tier"], "full");
    }
}
