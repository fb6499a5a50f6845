//! # Fallback Executor Module
//!
//! Esegue il transform engine attraverso una scala di tier a rischio
//! decrescente e garantisce sempre un risultato valido.
//!
//! ## Tier (strettamente in ordine, mai in parallelo):
//! 1. **Full**: lista di pass compilata dalle opzioni
//! 2. **Safe**: lista fissa e conservativa (`SAFE_PASSES`), non altera la geometria
//! 3. **Passthrough**: documento originale invariato, savings = 0
//!
//! Un tier viene scartato se l'engine fallisce, supera il timeout o produce
//! un output che non passa il validator. Il passthrough non può fallire,
//! quindi `run` non restituisce mai errori.
//!
//! ## Pacing:
//! - Un ritardo fisso (default 300ms) prima di chiamare l'engine rende
//!   visibile la fase `Optimizing` ai chiamanti. `Duration::ZERO` lo disabilita.

use crate::config::Config;
use crate::engine::TransformEngine;
use crate::error::{EngineError, OptimizeError};
use crate::options::OptionModel;
use crate::passes::{self, PassId, PassList, SAFE_PASSES};
use crate::stats::{CodeStats, Stats};
use crate::validator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Fallback level that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Full,
    Safe,
    Passthrough,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Full => "full",
            Tier::Safe => "safe",
            Tier::Passthrough => "passthrough",
        })
    }
}

/// One engine attempt in the ladder
#[derive(Debug, Clone, PartialEq)]
pub struct TierPlan {
    pub tier: Tier,
    pub passes: PassList,
    pub lossy: bool,
}

/// A tier that was tried and rejected
#[derive(Debug, Clone, Serialize)]
pub struct TierFailure {
    pub tier: Tier,
    pub reason: String,
}

/// Outcome of one optimization run
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub accepted_output: String,
    pub tier_used: Tier,
    pub stats: Stats,
    pub code_stats: CodeStats,
    pub failures: Vec<TierFailure>,
}

impl OptimizationResult {
    fn accepted(original: &str, output: String, tier: Tier, failures: Vec<TierFailure>) -> Self {
        Self {
            stats: Stats::compute(original, &output),
            code_stats: CodeStats::compute(original, &output),
            accepted_output: output,
            tier_used: tier,
            failures,
        }
    }

    fn passthrough(original: &str, failures: Vec<TierFailure>) -> Self {
        Self::accepted(original, original.to_string(), Tier::Passthrough, failures)
    }
}

/// Drives a transform engine through the Full → Safe → Passthrough ladder
pub struct FallbackExecutor<E> {
    engine: Arc<E>,
    pacing_delay: Duration,
    engine_timeout: Duration,
}

impl<E> Clone for FallbackExecutor<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            pacing_delay: self.pacing_delay,
            engine_timeout: self.engine_timeout,
        }
    }
}

impl<E: TransformEngine> FallbackExecutor<E> {
    pub fn new(engine: Arc<E>) -> Self {
        let defaults = Config::default();
        Self {
            engine,
            pacing_delay: defaults.pacing_delay(),
            engine_timeout: defaults.engine_timeout(),
        }
    }

    pub fn from_config(engine: Arc<E>, config: &Config) -> Self {
        Self::new(engine)
            .with_pacing_delay(config.pacing_delay())
            .with_engine_timeout(config.engine_timeout())
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    pub fn with_engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = timeout;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Engine tiers in the order they are attempted; passthrough is the implicit last step
    pub fn ladder(passes: &[PassId]) -> Vec<TierPlan> {
        vec![
            TierPlan {
                tier: Tier::Full,
                passes: passes.to_vec(),
                lossy: passes.iter().any(|pass| pass.is_lossy()),
            },
            TierPlan {
                tier: Tier::Safe,
                passes: SAFE_PASSES.to_vec(),
                lossy: false,
            },
        ]
    }

    /// Request/response entry point: compile the options and run them
    pub async fn orchestrate(&self, options: &OptionModel, document: &str) -> OptimizationResult {
        self.run(document, &passes::compile(options)).await
    }

    /// Run the ladder; always returns an acceptable document
    pub async fn run(&self, document: &str, passes: &[PassId]) -> OptimizationResult {
        if !self.pacing_delay.is_zero() {
            tokio::time::sleep(self.pacing_delay).await;
        }

        let mut failures = Vec::new();

        for plan in Self::ladder(passes) {
            debug!(
                "Trying {} tier with {} (lossy: {}): {}",
                plan.tier,
                self.engine.name(),
                plan.lossy,
                passes::describe(&plan.passes)
            );

            let start_time = Instant::now();
            match self.attempt(document, &plan).await {
                Ok(output) => {
                    let result = OptimizationResult::accepted(document, output, plan.tier, failures);
                    info!(
                        "✅ {} tier accepted in {:?}: {}",
                        plan.tier,
                        start_time.elapsed(),
                        result.stats.format_summary()
                    );
                    return result;
                }
                Err(e) => {
                    warn!("⚠️ {} tier rejected, falling back: {}", plan.tier, e);
                    failures.push(TierFailure {
                        tier: plan.tier,
                        reason: e.to_string(),
                    });
                }
            }
        }

        warn!("⏩ All engine tiers failed, returning the original document");
        OptimizationResult::passthrough(document, failures)
    }

    async fn attempt(&self, document: &str, plan: &TierPlan) -> Result<String, OptimizeError> {
        let call = self.engine.transform(document, &plan.passes);

        let output = match tokio::time::timeout(self.engine_timeout, call).await {
            Ok(result) => result?,
            Err(_) => return Err(EngineError::Timeout(self.engine_timeout).into()),
        };

        if let Some(reason) = validator::rejection_reason(&output) {
            return Err(OptimizeError::Validation(reason));
        }

        Ok(output)
    }
}
