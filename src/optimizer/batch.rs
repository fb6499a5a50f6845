//! # Batch Optimizer
//!
//! Orchestratore CLI: ottimizza molti file, ognuno nella propria `Session`.
//!
//! ## Flusso di esecuzione:
//! 1. **Inizializzazione**: valida la config, costruisce il fallback executor
//! 2. **Processing parallelo**: al massimo `workers` file alla volta
//! 3. **Per file**: lettura → upload (validator) → fallback executor → download
//! 4. **Progress tracking**: progress bar o messaggi JSON per ogni file
//! 5. **Reporting**: statistiche aggregate con byte risparmiati e percentuali
//!
//! ## Error handling:
//! - Documenti rifiutati dal validator vengono contati, non bloccano il batch
//! - Errori di I/O per singoli file non bloccano l'operazione
//! - In dry run nessun file viene scritto

use crate::config::Config;
use crate::engine::TransformEngine;
use crate::error::OptimizeError;
use crate::file_manager::FileManager;
use crate::json_output::JsonMessage;
use crate::optimizer::fallback::{FallbackExecutor, OptimizationResult};
use crate::optimizer::session::Session;
use crate::passes;
use crate::progress::{BatchStats, ProgressManager};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// What happened to one input file
#[derive(Debug)]
pub enum FileOutcome {
    Optimized {
        output_path: Option<PathBuf>,
        result: OptimizationResult,
    },
    Rejected {
        reason: String,
    },
}

/// Runs many documents through their own sessions with bounded concurrency
pub struct BatchOptimizer<E> {
    config: Config,
    executor: FallbackExecutor<E>,
}

impl<E: TransformEngine> BatchOptimizer<E> {
    pub fn new(engine: Arc<E>, config: Config) -> Result<Self> {
        config.validate()?;
        let executor = FallbackExecutor::from_config(engine, &config);

        Ok(Self { config, executor })
    }

    /// Optimize every file and report aggregated statistics
    pub async fn run(&self, files: Vec<PathBuf>) -> Result<BatchStats> {
        let options = &self.config.options;
        let compiled = passes::compile(options);

        info!("Starting SVG optimization of {} files", files.len());
        info!(
            "🎯 Preset: {} ({})",
            options.preset.title(),
            options.preset.status_text()
        );
        debug!("Compiled passes: {}", passes::describe(&compiled));
        if options.remove_dimensions {
            info!("📐 Removing width/height: previews may render blank without CSS sizing");
        }
        match self.config.output_path {
            Some(ref output_path) => info!("📁 Output directory: {}", output_path.display()),
            None => info!("📁 Mode: Write next to the source files"),
        }
        if self.config.dry_run {
            info!("🧪 Dry run mode: No files will be written");
        }

        let mut stats = BatchStats::new();
        if files.is_empty() {
            info!("No SVG files found to process");
            return Ok(stats);
        }

        FileManager::ensure_unique_outputs(&files, self.config.output_path.as_deref())?;

        if self.config.json_output {
            JsonMessage::start(files.len(), options.preset, &compiled, self.config.dry_run).emit();
        }

        let start_time = Instant::now();
        let progress = ProgressManager::new(files.len() as u64, self.config.json_output);

        let mut outcomes = stream::iter(files)
            .map(|path| async move {
                let outcome = self.process_file(&path).await;
                (path, outcome)
            })
            .buffer_unordered(self.config.workers);

        while let Some((path, outcome)) = outcomes.next().await {
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            let message = match outcome {
                Ok(FileOutcome::Optimized { output_path, result }) => {
                    stats.add_result(&result);
                    if self.config.json_output {
                        JsonMessage::file_complete(Some(path.clone()), output_path, &result).emit();
                    }
                    format!(
                        "✅ {}: {:.1}% saved ({} tier)",
                        name, result.stats.savings_percent, result.tier_used
                    )
                }
                Ok(FileOutcome::Rejected { reason }) => {
                    stats.add_rejected();
                    if self.config.json_output {
                        JsonMessage::file_rejected(Some(path.clone()), reason.clone()).emit();
                    }
                    format!("⏩ {}: not a valid SVG ({})", name, reason)
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", path.display(), e);
                    stats.add_error();
                    if self.config.json_output {
                        JsonMessage::error(format!("Failed to process {}", path.display()), Some(e.to_string())).emit();
                    }
                    format!("❌ {}: error", name)
                }
            };

            progress.update(&message);
        }

        let summary = stats.format_summary();
        progress.finish(&summary);

        if self.config.json_output {
            JsonMessage::complete(&stats, start_time.elapsed().as_secs_f64()).emit();
        } else {
            info!("{}", summary);
        }

        Ok(stats)
    }

    /// Optimize one file through a fresh session
    pub async fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let content = FileManager::read_document(path).await?;
        let filename = path.file_name().map(|n| n.to_string_lossy().to_string());

        let session = Session::new(self.executor.clone(), self.config.options.clone());
        match session.upload(content, filename.as_deref()).await {
            Ok(_) => {}
            Err(OptimizeError::Validation(reason)) => return Ok(FileOutcome::Rejected { reason }),
            Err(e) => return Err(e.into()),
        }

        let result = session
            .snapshot()
            .await
            .result
            .ok_or_else(|| anyhow::anyhow!("Session produced no result for {}", path.display()))?;
        let download = session
            .download()
            .await
            .ok_or_else(|| anyhow::anyhow!("Nothing to download for {}", path.display()))?;

        let target = FileManager::output_path(path, self.config.output_path.as_deref(), &download.filename);

        if self.config.dry_run {
            debug!("Dry run: would write {}", target.display());
            return Ok(FileOutcome::Optimized {
                output_path: None,
                result,
            });
        }

        FileManager::write_download(&download, &target).await?;
        debug!("Wrote {}", target.display());

        Ok(FileOutcome::Optimized {
            output_path: Some(target),
            result,
        })
    }

    /// Optimize a single in-memory document (stdin mode)
    pub async fn optimize_document(&self, content: String) -> Result<OptimizationResult, OptimizeError> {
        let session = Session::new(self.executor.clone(), self.config.options.clone());
        session.upload(content, None).await?;

        session
            .snapshot()
            .await
            .result
            .ok_or_else(|| OptimizeError::Configuration("session produced no result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedEngine;
    use crate::optimizer::fallback::Tier;
    use tempfile::TempDir;

    fn config(output: Option<PathBuf>, dry_run: bool) -> Config {
        Config {
            pacing_delay_ms: 0,
            output_path: output,
            dry_run,
            workers: 2,
            ..Default::default()
        }
    }

    fn strip_comments() -> Arc<ScriptedEngine> {
        Arc::new(ScriptedEngine::new(|doc, _| Ok(doc.replace("<!--c-->", ""))))
    }

    #[tokio::test]
    async fn test_batch_writes_outputs_and_counts() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let good = temp_dir.path().join("good.svg");
        let bad = temp_dir.path().join("bad.svg");
        std::fs::write(&good, "<svg><title>x</title><!--c--></svg>").unwrap();
        std::fs::write(&bad, "not svg").unwrap();

        let batch = BatchOptimizer::new(strip_comments(), config(Some(out_dir.clone()), false)).unwrap();
        let stats = batch.run(vec![good, bad]).await.unwrap();

        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.files_optimized, 1);
        assert_eq!(stats.files_rejected, 1);
        assert_eq!(stats.total_bytes_saved(), 8);

        let written = std::fs::read_to_string(out_dir.join("good_optimized.svg")).unwrap();
        assert_eq!(written, "<svg><title>x</title></svg>");
        assert!(!out_dir.join("bad_optimized.svg").exists());
    }

    #[tokio::test]
    async fn test_colliding_outputs_abort_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let first = temp_dir.path().join("a").join("logo.svg");
        let second = temp_dir.path().join("b").join("logo.svg");
        for path in [&first, &second] {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "<svg><title>x</title><!--c--></svg>").unwrap();
        }

        let batch = BatchOptimizer::new(strip_comments(), config(Some(out_dir.clone()), false)).unwrap();
        let result = batch.run(vec![first, second]).await;

        assert!(result.is_err());
        assert!(!out_dir.join("logo_optimized.svg").exists());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("logo.svg");
        std::fs::write(&source, "<svg><title>x</title><!--c--></svg>").unwrap();

        let batch = BatchOptimizer::new(strip_comments(), config(None, true)).unwrap();
        match batch.process_file(&source).await.unwrap() {
            FileOutcome::Optimized { output_path, result } => {
                assert!(output_path.is_none());
                assert_eq!(result.tier_used, Tier::Full);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!temp_dir.path().join("logo_optimized.svg").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let batch = BatchOptimizer::new(strip_comments(), config(None, true)).unwrap();
        let stats = batch.run(vec![PathBuf::from("/definitely/not/here.svg")]).await.unwrap();
        assert_eq!(stats.errors, 1);
    }

    #[tokio::test]
    async fn test_optimize_document() {
        let batch = BatchOptimizer::new(strip_comments(), config(None, false)).unwrap();

        let result = batch
            .optimize_document("<svg><title>x</title><!--c--></svg>".to_string())
            .await
            .unwrap();
        assert_eq!(result.accepted_output, "<svg><title>x</title></svg>");

        let rejected = batch.optimize_document("not svg".to_string()).await;
        assert!(matches!(rejected, Err(OptimizeError::Validation(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = Config {
            workers: 0,
            ..Default::default()
        };
        assert!(BatchOptimizer::new(strip_comments(), bad).is_err());
    }
}
