//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche aggregate di un batch.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche cumulative (file ottimizzati, passthrough, rifiutati, errori)
//! - Calcolo percentuale di riduzione complessiva
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati
//! - **files_optimized**: File accettati dal tier `full` o `safe`
//! - **files_passthrough**: File restituiti invariati (tutti i tier engine falliti)
//! - **files_rejected**: File che non passano il validator
//! - **errors**: Errori di I/O durante lettura/scrittura
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:03] [========================================] 12/12 (100%) ✅ logo.svg: 41.3% saved
//! ```

use crate::file_manager::FileManager;
use crate::optimizer::fallback::{OptimizationResult, Tier};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a batch
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager; `hidden` keeps stdout clean for JSON output
    pub fn new(total_files: u64, hidden: bool) -> Self {
        if hidden {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total_files);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics tracker for a batch of documents
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchStats {
    pub files_processed: usize,
    pub files_optimized: usize,
    pub files_passthrough: usize,
    pub files_rejected: usize,
    pub errors: usize,
    pub total_original_size: u64,
    pub total_optimized_size: u64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: &OptimizationResult) {
        self.files_processed += 1;
        match result.tier_used {
            Tier::Full | Tier::Safe => self.files_optimized += 1,
            Tier::Passthrough => self.files_passthrough += 1,
        }
        self.total_original_size += result.stats.original_bytes;
        self.total_optimized_size += result.stats.optimized_bytes;
    }

    pub fn add_rejected(&mut self) {
        self.files_processed += 1;
        self.files_rejected += 1;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    pub fn total_bytes_saved(&self) -> i64 {
        self.total_original_size as i64 - self.total_optimized_size as i64
    }

    pub fn overall_reduction_percent(&self) -> f64 {
        if self.total_original_size > 0 {
            (self.total_bytes_saved() as f64 / self.total_original_size as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Optimized: {} | Unchanged: {} | Rejected: {} | Errors: {} | Total saved: {} ({:.2}%)",
            self.files_processed,
            self.files_optimized,
            self.files_passthrough,
            self.files_rejected,
            self.errors,
            FileManager::format_size(self.total_bytes_saved().max(0) as u64),
            self.overall_reduction_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CodeStats, Stats};

    fn result(original: &str, output: &str, tier: Tier) -> OptimizationResult {
        OptimizationResult {
            accepted_output: output.to_string(),
            tier_used: tier,
            stats: Stats::compute(original, output),
            code_stats: CodeStats::compute(original, output),
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_batch_stats() {
        let mut stats = BatchStats::new();
        stats.add_result(&result(&"a".repeat(100), &"a".repeat(60), Tier::Full));
        stats.add_result(&result(&"b".repeat(100), &"b".repeat(100), Tier::Passthrough));
        stats.add_rejected();
        stats.add_error();

        assert_eq!(stats.files_processed, 4);
        assert_eq!(stats.files_optimized, 1);
        assert_eq!(stats.files_passthrough, 1);
        assert_eq!(stats.files_rejected, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.total_bytes_saved(), 40);
        assert!((stats.overall_reduction_percent() - 20.0).abs() < 1e-9);
        assert!(stats.format_summary().contains("Optimized: 1"));
    }

    #[test]
    fn test_empty_batch_has_no_reduction() {
        let stats = BatchStats::new();
        assert_eq!(stats.overall_reduction_percent(), 0.0);
    }

    #[test]
    fn test_hidden_progress_does_not_panic() {
        let progress = ProgressManager::new(2, true);
        progress.update("one");
        progress.update("two");
        progress.finish("done");
    }
}
