//! # Transform Engine Module
//!
//! Il transform engine è il collaboratore esterno che applica davvero i pass
//! al documento. L'orchestratore lo tratta come una black box.
//!
//! ## Componenti:
//! - `TransformEngine`: trait implementato da ogni engine
//! - `SvgoEngine`: engine di default che pilota il binario `svgo`
//!
//! ## Contratto:
//! - `transform(document, passes)` restituisce il documento trasformato
//! - Qualsiasi fallimento è un `EngineError`; il fallback executor lo
//!   assorbe passando al tier successivo

pub mod svgo;

pub use svgo::SvgoEngine;

use crate::error::EngineError;
use crate::passes::PassId;
use std::future::Future;

/// External engine that applies an ordered list of passes to a document
pub trait TransformEngine: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn transform(
        &self,
        document: &str,
        passes: &[PassId],
    ) -> impl Future<Output = Result<String, EngineError>> + Send;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    type Script = Box<dyn Fn(&str, &[PassId]) -> Result<String, EngineError> + Send + Sync>;

    /// Engine driven by a closure, recording every pass list it receives
    pub struct ScriptedEngine {
        script: Script,
        delay: Box<dyn Fn(&str) -> Duration + Send + Sync>,
        pub calls: Mutex<Vec<Vec<PassId>>>,
    }

    impl ScriptedEngine {
        pub fn new(
            script: impl Fn(&str, &[PassId]) -> Result<String, EngineError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                script: Box::new(script),
                delay: Box::new(|_| Duration::ZERO),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Per-document artificial latency
        pub fn with_delay(mut self, delay: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
            self.delay = Box::new(delay);
            self
        }

        pub fn failing() -> Self {
            Self::new(|_, _| Err(EngineError::InvalidOutput("scripted failure".to_string())))
        }

        pub fn calls(&self) -> Vec<Vec<PassId>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TransformEngine for ScriptedEngine {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn transform(&self, document: &str, passes: &[PassId]) -> Result<String, EngineError> {
            self.calls.lock().unwrap().push(passes.to_vec());
            let delay = (self.delay)(document);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            (self.script)(document, passes)
        }
    }
}
