//! # SVG Optimizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `options`: Option model (switch + preset basic/aggressive/custom)
//! - `passes`: Pass compiler, dalle opzioni alla lista ordinata di pass
//! - `validator`: Check strutturale economico dei documenti
//! - `stats`: Statistiche before/after (byte e caratteri)
//! - `engine`: Trait del transform engine e implementazione svgo
//! - `optimizer`: Fallback executor, session state machine, batch
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom
//! - `file_manager`: Discovery SVG, upload e download
//! - `tool_resolver`: Ricerca del binario svgo
//! - `progress` / `json_output`: Feedback per la CLI
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use svg_optimizer::{FallbackExecutor, OptionModel, Preset, Session, SvgoEngine};
//!
//! let engine = Arc::new(SvgoEngine::discover(None)?);
//! let session = Session::new(FallbackExecutor::new(engine), OptionModel::default());
//! session.upload(svg, Some("logo.svg")).await?;
//! session.apply_preset(Preset::Aggressive).await;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod optimizer;
pub mod options;
pub mod passes;
pub mod progress;
pub mod stats;
pub mod tool_resolver;
pub mod validator;

pub use config::Config;
pub use engine::{SvgoEngine, TransformEngine};
pub use error::{EngineError, OptimizeError};
pub use file_manager::Download;
pub use optimizer::{
    BatchOptimizer, FallbackExecutor, OptimizationResult, Session, SessionPhase, Tier,
};
pub use options::{OptionModel, Preset, Switch};
pub use passes::{compile, PassId, PassList};
pub use stats::{CodeStats, Stats};
