//! # Stats Module
//!
//! Calcola le statistiche before/after di un singolo documento.
//!
//! ## Regole:
//! - Le dimensioni sono i byte della codifica UTF-8, non i caratteri
//! - `savings_bytes` può essere negativo se l'output è più grande (nessun clamp)
//! - `savings_percent` vale 0 quando il documento originale è vuoto
//! - `CodeStats` conta i caratteri: solo per display, non autoritativo per la "size"

use crate::file_manager::FileManager;
use serde::{Deserialize, Serialize};

/// Byte-size comparison between an original and an optimized document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub original_bytes: u64,
    pub optimized_bytes: u64,
    pub savings_bytes: i64,
    pub savings_percent: f64,
}

impl Stats {
    pub fn compute(original: &str, optimized: &str) -> Self {
        let original_bytes = original.len() as u64;
        let optimized_bytes = optimized.len() as u64;
        let savings_bytes = original_bytes as i64 - optimized_bytes as i64;

        Self {
            original_bytes,
            optimized_bytes,
            savings_bytes,
            savings_percent: percent(savings_bytes, original_bytes),
        }
    }

    pub fn format_summary(&self) -> String {
        let saved = if self.savings_bytes < 0 {
            format!("-{}", FileManager::format_size(self.savings_bytes.unsigned_abs()))
        } else {
            FileManager::format_size(self.savings_bytes as u64)
        };

        format!(
            "{} → {} (saved {}, {:.1}%)",
            FileManager::format_size(self.original_bytes),
            FileManager::format_size(self.optimized_bytes),
            saved,
            self.savings_percent
        )
    }
}

/// Character counts, reported alongside `Stats` for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CodeStats {
    pub original_chars: u64,
    pub optimized_chars: u64,
    pub chars_saved: i64,
    pub chars_reduction: f64,
}

impl CodeStats {
    pub fn compute(original: &str, optimized: &str) -> Self {
        let original_chars = original.chars().count() as u64;
        let optimized_chars = optimized.chars().count() as u64;
        let chars_saved = original_chars as i64 - optimized_chars as i64;

        Self {
            original_chars,
            optimized_chars,
            chars_saved,
            chars_reduction: percent(chars_saved, original_chars),
        }
    }
}

fn percent(saved: i64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (saved as f64 / total as f64) * 100.0
    }
}
