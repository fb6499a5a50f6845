//! # svgo Engine
//!
//! Pilota il binario `svgo` come processo esterno, come fanno gli altri
//! processor con i loro tool: nessuna trasformazione in-process.
//!
//! ## Pipeline per ogni chiamata:
//! 1. Scrive un `svgo.config.cjs` con la lista dei plugin in una temp dir
//! 2. Lancia `svgo --config <file> -i - -o -`
//! 3. Scrive il documento su stdin e legge il risultato da stdout
//! 4. Exit code non zero o output non UTF-8 → `EngineError`
//!
//! Una lista vuota è valida: svgo si limita a ri-serializzare il documento.

use crate::engine::TransformEngine;
use crate::error::{EngineError, OptimizeError};
use crate::passes::PassId;
use crate::tool_resolver::ToolPathResolver;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

const TOOL_NAME: &str = "svgo";
const CONFIG_FILE_NAME: &str = "svgo.config.cjs";

/// Transform engine backed by the svgo command line tool
#[derive(Debug, Clone)]
pub struct SvgoEngine {
    binary: PathBuf,
}

impl SvgoEngine {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Locate svgo, preferring an explicit path
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self, OptimizeError> {
        let resolver = ToolPathResolver::new(explicit);

        resolver
            .resolve_tool(TOOL_NAME)
            .map(Self::new)
            .ok_or_else(|| {
                OptimizeError::MissingDependency(format!(
                    "{} not found (install with: {})",
                    TOOL_NAME,
                    ToolPathResolver::install_instructions(TOOL_NAME)
                ))
            })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// `svgo --version`, used to confirm the binary actually runs
    pub async fn version(&self) -> Result<String, EngineError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                tool: TOOL_NAME.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                tool: TOOL_NAME.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// CommonJS config enabling exactly the given plugins, in order
    pub fn config_source(passes: &[PassId]) -> Result<String, EngineError> {
        let plugins = serde_json::to_string(passes)
            .map_err(|e| EngineError::UnsupportedPassCombination(e.to_string()))?;

        Ok(format!(
            "module.exports = {{\n  multipass: false,\n  plugins: {},\n}};\n",
            plugins
        ))
    }

    async fn run(&self, document: &str, passes: &[PassId]) -> Result<String, EngineError> {
        let spawn_error = |source| EngineError::Spawn {
            tool: TOOL_NAME.to_string(),
            source,
        };

        let config_dir = tempfile::tempdir().map_err(spawn_error)?;
        let config_path = config_dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&config_path, Self::config_source(passes)?)
            .await
            .map_err(spawn_error)?;

        let start_time = Instant::now();
        let mut child = Command::new(&self.binary)
            .arg("--config")
            .arg(&config_path)
            .args(["-i", "-", "-o", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin concurrently so a chatty child can't deadlock on a full pipe
        let stdin_task = child.stdin.take().map(|mut stdin| {
            let input = document.as_bytes().to_vec();
            tokio::spawn(async move {
                let written = stdin.write_all(&input).await;
                drop(stdin);
                written
            })
        });

        let output = child.wait_with_output().await.map_err(spawn_error)?;

        if let Some(task) = stdin_task {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("svgo closed stdin early: {}", e),
                Err(e) => debug!("stdin writer task failed: {}", e),
            }
        }

        let elapsed = start_time.elapsed();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("svgo failed after {:?}: {}", elapsed, stderr);
            return Err(EngineError::Failed {
                tool: TOOL_NAME.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        debug!("svgo completed successfully in {:?}", elapsed);
        String::from_utf8(output.stdout)
            .map_err(|e| EngineError::InvalidOutput(format!("svgo output is not UTF-8: {}", e)))
    }
}

impl TransformEngine for SvgoEngine {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    async fn transform(&self, document: &str, passes: &[PassId]) -> Result<String, EngineError> {
        self.run(document, passes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_lists_plugins_in_order() {
        let source =
            SvgoEngine::config_source(&[PassId::REMOVE_COMMENTS, PassId::REMOVE_DIMENSIONS]).unwrap();
        assert!(source.starts_with("module.exports = {"));
        assert!(source.contains(r#"plugins: ["removeComments","removeDimensions"]"#));
    }

    #[test]
    fn test_empty_pass_list_still_produces_a_config() {
        let source = SvgoEngine::config_source(&[]).unwrap();
        assert!(source.contains("plugins: []"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let engine = SvgoEngine::new(PathBuf::from("/definitely/not/svgo"));
        let result = engine
            .transform("<svg><!--c--></svg>", &[PassId::REMOVE_COMMENTS])
            .await;
        assert!(matches!(result, Err(EngineError::Spawn { .. })));
    }

    #[test]
    fn test_discover_reports_missing_dependency() {
        // explicit path that doesn't exist falls through; only fails if svgo is absent everywhere
        match SvgoEngine::discover(Some(PathBuf::from("/definitely/not/svgo"))) {
            Ok(engine) => assert_ne!(engine.binary(), Path::new("/definitely/not/svgo")),
            Err(e) => assert!(matches!(e, OptimizeError::MissingDependency(_))),
        }
    }
}
