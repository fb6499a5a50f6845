//! # Tool Path Resolver
//!
//! This module handles finding the `svgo` binary in different environments:
//! - Explicit path from config or CLI
//! - `SVGO_PATH` / `TOOLS_DIR` environment overrides
//! - A local `node_modules/.bin` (walking up from the current directory)
//! - System-installed tools on `PATH`

use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tool path resolver for the transform engine binaries
pub struct ToolPathResolver {
    /// Explicit binary path, checked before anything else
    explicit: Option<PathBuf>,
    /// Directory holding bundled tools
    tools_dir: Option<PathBuf>,
}

impl ToolPathResolver {
    /// Create a new path resolver
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            tools_dir: Self::detect_tools_dir(),
        }
    }

    fn detect_tools_dir() -> Option<PathBuf> {
        let tools_path = PathBuf::from(env::var_os("TOOLS_DIR")?);
        debug!("Checking TOOLS_DIR environment variable: {:?}", tools_path);
        tools_path.is_dir().then_some(tools_path)
    }

    /// Resolve the path to a specific tool
    pub fn resolve_tool(&self, tool_name: &str) -> Option<PathBuf> {
        debug!("Resolving tool: {}", tool_name);

        // Strategy 1: explicit path wins, even over the environment
        if let Some(ref explicit) = self.explicit {
            if explicit.is_file() {
                return Some(explicit.clone());
            }
            warn!("Configured path for {} does not exist: {}", tool_name, explicit.display());
        }

        // Strategy 2: <TOOL>_PATH override (SVGO_PATH)
        let env_key = format!("{}_PATH", tool_name.to_uppercase());
        if let Some(path) = env::var_os(&env_key).map(PathBuf::from) {
            debug!("Checking {}: {:?}", env_key, path);
            if path.is_file() {
                return Some(path);
            }
        }

        // Strategy 3: bundled tools directory
        if let Some(ref tools_dir) = self.tools_dir {
            let bundled = tools_dir.join(Self::executable_name(tool_name));
            if bundled.is_file() {
                debug!("Using bundled tool: {:?}", bundled);
                return Some(bundled);
            }
        }

        // Strategy 4: node_modules/.bin, walking up the directory tree
        if let Ok(current_dir) = env::current_dir() {
            if let Some(local) = Self::find_in_node_modules(&current_dir, tool_name) {
                debug!("Using project-local tool: {:?}", local);
                return Some(local);
            }
        }

        // Strategy 5: system PATH
        if let Some(system_path) = Self::find_in_system_path(tool_name) {
            debug!("Using system tool: {} -> {:?}", tool_name, system_path);
            return Some(system_path);
        }

        warn!("Tool not found: {}", tool_name);
        None
    }

    /// Platform-specific executable name (npm installs `.cmd` shims on Windows)
    fn executable_name(tool_name: &str) -> String {
        if cfg!(windows) {
            format!("{}.cmd", tool_name)
        } else {
            tool_name.to_string()
        }
    }

    fn find_in_node_modules(start: &Path, tool_name: &str) -> Option<PathBuf> {
        let executable = Self::executable_name(tool_name);

        start
            .ancestors()
            .take(10) // Max 10 levels up
            .map(|dir| dir.join("node_modules").join(".bin").join(&executable))
            .find(|path| path.is_file())
    }

    fn find_in_system_path(tool_name: &str) -> Option<PathBuf> {
        let executable = Self::executable_name(tool_name);
        let path_var = env::var_os("PATH")?;

        env::split_paths(&path_var)
            .map(|dir| dir.join(&executable))
            .find(|path| path.is_file())
    }

    /// Check if a specific tool is available
    pub fn is_tool_available(&self, tool_name: &str) -> bool {
        self.resolve_tool(tool_name).is_some()
    }

    /// Installation hint shown when a tool is missing
    pub fn install_instructions(tool_name: &str) -> String {
        match tool_name {
            "svgo" => "npm install -g svgo  # or: npm install --save-dev svgo".to_string(),
            _ => format!("install {} and make sure it is on PATH", tool_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let temp_dir = TempDir::new().unwrap();
        let fake = temp_dir.path().join("my-svgo");
        std::fs::write(&fake, "#!/bin/sh\n").unwrap();

        let resolver = ToolPathResolver::new(Some(fake.clone()));
        assert_eq!(resolver.resolve_tool("svgo"), Some(fake));
    }

    #[test]
    fn test_node_modules_lookup_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let bin_dir = temp_dir.path().join("node_modules").join(".bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        let tool = bin_dir.join(ToolPathResolver::executable_name("svgo"));
        std::fs::write(&tool, "").unwrap();

        let deep = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&deep).unwrap();

        assert_eq!(ToolPathResolver::find_in_node_modules(&deep, "svgo"), Some(tool));
        assert_eq!(ToolPathResolver::find_in_node_modules(&deep, "not-a-tool"), None);
    }

    #[test]
    fn test_missing_tool() {
        let resolver = ToolPathResolver::new(None);
        assert!(!resolver.is_tool_available("definitely-not-an-installed-tool-xyz"));
        assert!(ToolPathResolver::install_instructions("svgo").contains("npm"));
    }
}
