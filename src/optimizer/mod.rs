//! # Optimizer Module
//!
//! Modulo che separa le responsabilità dell'orchestratore in sottomoduli:
//! - `fallback`: Fallback executor a tre tier (full → safe → passthrough)
//! - `session`: State machine di un singolo documento
//! - `batch`: Orchestratore CLI per molti file

pub mod batch;
pub mod fallback;
pub mod session;

pub use batch::{BatchOptimizer, FileOutcome};
pub use fallback::{FallbackExecutor, OptimizationResult, Tier, TierFailure, TierPlan};
pub use session::{Session, SessionPhase, SessionSnapshot};
