//! # Session State Machine
//!
//! Sequenzia upload → optimize → re-optimize su cambio opzioni → clear per
//! un singolo documento, ed espone la fase corrente ai chiamanti.
//!
//! ## Stati:
//! - `Empty`: stato iniziale, nessun documento
//! - `Optimizing`: un run del fallback executor è in corso
//! - `Ready`: contiene l'ultimo `OptimizationResult`
//! - `Cleared`: dopo `clear()`, si comporta esattamente come `Empty`
//!
//! Non esiste uno stato di errore: i fallimenti dell'engine vengono assorbiti
//! dal fallback executor e nel caso peggiore il run termina con `Passthrough`.
//!
//! ## Concorrenza:
//! - Ogni run riceve un numero di sequenza crescente
//! - Un nuovo run non cancella quello in corso, ma il risultato di un run che
//!   non è più l'ultimo emesso viene scartato
//! - `clear()` invalida anche i run in corso
//! - Fase e risultato vengono pubblicati insieme sotto lo stesso lock
//!
//! ## Esempio:
//! ```rust,ignore
//! let session = Session::new(executor, OptionModel::default());
//! session.upload(svg, Some("logo.svg")).await?;
//! session.apply_preset(Preset::Aggressive).await;
//! let download = session.download().await;
//! ```

use crate::engine::TransformEngine;
use crate::error::OptimizeError;
use crate::file_manager::{Download, DEFAULT_FILENAME};
use crate::optimizer::fallback::{FallbackExecutor, OptimizationResult};
use crate::options::{OptionModel, Preset, Switch};
use crate::passes::{self, PassList};
use crate::validator;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Published phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Empty,
    Optimizing,
    Ready,
    Cleared,
}

/// Phase and result as observed together
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub result: Option<OptimizationResult>,
}

struct SessionState {
    document: Option<Arc<str>>,
    filename: Option<String>,
    options: OptionModel,
    phase: SessionPhase,
    result: Option<OptimizationResult>,
    latest_run: u64,
}

/// Everything a run needs, captured when it is issued
struct RunTicket {
    id: u64,
    document: Arc<str>,
    passes: PassList,
}

/// Holds one document and re-optimizes it whenever it or the options change
pub struct Session<E> {
    executor: FallbackExecutor<E>,
    state: Mutex<SessionState>,
}

impl<E: TransformEngine> Session<E> {
    pub fn new(executor: FallbackExecutor<E>, options: OptionModel) -> Self {
        Self {
            executor,
            state: Mutex::new(SessionState {
                document: None,
                filename: None,
                options,
                phase: SessionPhase::Empty,
                result: None,
                latest_run: 0,
            }),
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.lock().await.phase
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            phase: state.phase,
            result: state.result.clone(),
        }
    }

    pub async fn options(&self) -> OptionModel {
        self.state.lock().await.options.clone()
    }

    pub async fn document(&self) -> Option<Arc<str>> {
        self.state.lock().await.document.clone()
    }

    pub async fn filename(&self) -> String {
        self.state
            .lock()
            .await
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
    }

    /// Replace the document and optimize it.
    ///
    /// Rejected documents leave the session untouched. Returns `None` when a
    /// newer run superseded this one before it finished.
    pub async fn upload(
        &self,
        content: impl Into<String>,
        filename: Option<&str>,
    ) -> Result<Option<OptimizationResult>, OptimizeError> {
        let content = content.into();

        if let Some(reason) = validator::rejection_reason(&content) {
            warn!("❌ Rejected upload {}: {}", filename.unwrap_or("(unnamed)"), reason);
            return Err(OptimizeError::Validation(reason));
        }

        let ticket = {
            let mut state = self.state.lock().await;
            state.document = Some(Arc::from(content));
            state.filename = filename.map(str::to_string);
            state.result = None;
            Self::issue_run(&mut state)
        };

        match ticket {
            Some(ticket) => Ok(self.execute(ticket).await),
            None => Ok(None),
        }
    }

    /// Replace the options; re-optimizes when a document is loaded.
    ///
    /// A named preset wins over the switches it controls.
    pub async fn set_options(&self, options: OptionModel) -> Option<OptimizationResult> {
        self.update_options(|_| options.normalized()).await
    }

    pub async fn apply_preset(&self, preset: Preset) -> Option<OptimizationResult> {
        self.update_options(|current| current.apply_preset(preset)).await
    }

    pub async fn toggle_switch(&self, switch: Switch, value: bool) -> Option<OptimizationResult> {
        self.update_options(|current| current.toggle_switch(switch, value)).await
    }

    /// Drop document and result; in-flight runs will be discarded
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.document = None;
        state.filename = None;
        state.result = None;
        state.phase = SessionPhase::Cleared;
        state.latest_run += 1;
        debug!("Session cleared");
    }

    /// Latest accepted output, ready for the download boundary
    pub async fn download(&self) -> Option<Download> {
        let state = self.state.lock().await;
        let result = state.result.as_ref()?;
        Some(Download::new(&result.accepted_output, state.filename.as_deref()))
    }

    async fn update_options(
        &self,
        change: impl FnOnce(&OptionModel) -> OptionModel,
    ) -> Option<OptimizationResult> {
        let ticket = {
            let mut state = self.state.lock().await;
            let next = change(&state.options);
            state.options = next;
            debug!("Options updated: preset {}", state.options.preset);
            Self::issue_run(&mut state)
        }?;

        self.execute(ticket).await
    }

    fn issue_run(state: &mut SessionState) -> Option<RunTicket> {
        let document = state.document.clone()?;

        state.latest_run += 1;
        state.phase = SessionPhase::Optimizing;

        Some(RunTicket {
            id: state.latest_run,
            document,
            passes: passes::compile(&state.options),
        })
    }

    async fn execute(&self, ticket: RunTicket) -> Option<OptimizationResult> {
        let result = self.executor.run(&ticket.document, &ticket.passes).await;

        let mut state = self.state.lock().await;
        if ticket.id != state.latest_run {
            debug!("Discarding stale run #{} (latest is #{})", ticket.id, state.latest_run);
            return None;
        }

        info!("📄 Run #{} ready ({} tier)", ticket.id, result.tier_used);
        state.phase = SessionPhase::Ready;
        state.result = Some(result.clone());
        Some(result)
    }
}
