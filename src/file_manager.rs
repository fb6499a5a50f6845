//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file: discovery degli SVG,
//! lettura degli upload e scrittura dei download.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di file `.svg` in directory
//! - Lettura del documento da file o stdin
//! - Derivazione del nome di download (`logo.svg` → `logo_optimized.svg`)
//! - Scrittura sicura dell'output (directory dedicata o accanto al sorgente)
//! - Formattazione human-readable delle dimensioni
//!
//! ## Esempio:
//! ```rust,ignore
//! let files = FileManager::collect_inputs(&[PathBuf::from("icons/")])?;
//! for file in files {
//!     let content = FileManager::read_document(&file).await?;
//!     // upload into a Session
//! }
//! ```

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use walkdir::WalkDir;

/// Media type of every download
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";
/// Filename used when an upload arrives without one
pub const DEFAULT_FILENAME: &str = "optimized.svg";

const OPTIMIZED_SUFFIX: &str = "_optimized";

/// Optimized document ready to be handed to the download boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub filename: String,
}

impl Download {
    pub fn new(content: &str, source_name: Option<&str>) -> Self {
        Self {
            bytes: content.as_bytes().to_vec(),
            media_type: SVG_MEDIA_TYPE,
            filename: FileManager::download_filename(source_name),
        }
    }
}

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Expand files and directories into the list of SVG files to process
    pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_dir() {
                files.extend(Self::find_svg_files(input)?);
            } else if input.is_file() {
                files.push(input.clone());
            } else {
                return Err(anyhow::anyhow!("Input does not exist: {}", input.display()));
            }
        }

        Ok(files)
    }

    /// Find all SVG files in a directory
    pub fn find_svg_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if Self::is_svg(path) && !Self::is_optimized_output(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Check if a file looks like an SVG by extension
    pub fn is_svg(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("svg"))
            .unwrap_or(false)
    }

    /// Files we wrote ourselves on a previous run
    fn is_optimized_output(path: &Path) -> bool {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(OPTIMIZED_SUFFIX))
            .unwrap_or(false)
    }

    /// Read a document from disk
    pub async fn read_document(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Read a document from stdin
    pub async fn read_stdin() -> Result<String> {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        Ok(content)
    }

    /// Insert `_optimized` before the `.svg` extension
    pub fn download_filename(source_name: Option<&str>) -> String {
        let Some(name) = source_name.filter(|n| !n.trim().is_empty()) else {
            return DEFAULT_FILENAME.to_string();
        };

        let path = Path::new(name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.to_string());

        format!("{}{}.svg", stem, OPTIMIZED_SUFFIX)
    }

    /// Where the download for `source` lands
    pub fn output_path(source: &Path, output_dir: Option<&Path>, filename: &str) -> PathBuf {
        match output_dir {
            Some(dir) => dir.join(filename),
            None => source
                .parent()
                .map(|parent| parent.join(filename))
                .unwrap_or_else(|| PathBuf::from(filename)),
        }
    }

    /// Fail when two sources would be written to the same download path
    pub fn ensure_unique_outputs(files: &[PathBuf], output_dir: Option<&Path>) -> Result<()> {
        let mut targets: HashMap<PathBuf, &Path> = HashMap::new();

        for file in files {
            let name = file.file_name().map(|n| n.to_string_lossy().to_string());
            let target = Self::output_path(file, output_dir, &Self::download_filename(name.as_deref()));

            if let Some(previous) = targets.insert(target.clone(), file) {
                return Err(anyhow::anyhow!(
                    "{} and {} would both be written to {}",
                    previous.display(),
                    file.display(),
                    target.display()
                ));
            }
        }

        Ok(())
    }

    /// Write a download to disk, creating parent directories as needed
    pub async fn write_download(download: &Download, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        fs::write(target, &download.bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_download_filename() {
        assert_eq!(FileManager::download_filename(Some("logo.svg")), "logo_optimized.svg");
        assert_eq!(FileManager::download_filename(Some("a.b.svg")), "a.b_optimized.svg");
        assert_eq!(FileManager::download_filename(Some("icon")), "icon_optimized.svg");
        assert_eq!(FileManager::download_filename(None), DEFAULT_FILENAME);
        assert_eq!(FileManager::download_filename(Some("  ")), DEFAULT_FILENAME);
    }

    #[test]
    fn test_download_carries_media_type() {
        let download = Download::new("<svg></svg>", Some("pasted.svg"));
        assert_eq!(download.media_type, "image/svg+xml");
        assert_eq!(download.bytes, b"<svg></svg>".to_vec());
        assert_eq!(download.filename, "pasted_optimized.svg");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(0), "0 B");
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1536), "1.50 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_output_path() {
        let source = Path::new("/icons/logo.svg");
        assert_eq!(
            FileManager::output_path(source, None, "logo_optimized.svg"),
            PathBuf::from("/icons/logo_optimized.svg")
        );
        assert_eq!(
            FileManager::output_path(source, Some(Path::new("/out")), "logo_optimized.svg"),
            PathBuf::from("/out/logo_optimized.svg")
        );
    }

    #[test]
    fn test_find_svg_files_skips_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join("a.svg"), "<svg/>").unwrap();
        std::fs::write(nested.join("b.SVG"), "<svg/>").unwrap();
        std::fs::write(temp_dir.path().join("a_optimized.svg"), "<svg/>").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "hi").unwrap();

        let files = FileManager::find_svg_files(temp_dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.svg".to_string(), "b.SVG".to_string()]);
    }

    #[test]
    fn test_same_name_in_sibling_dirs_collides_in_output_dir() {
        let files = vec![
            PathBuf::from("/icons/a/logo.svg"),
            PathBuf::from("/icons/b/logo.svg"),
        ];

        let err = FileManager::ensure_unique_outputs(&files, Some(Path::new("/out"))).unwrap_err();
        assert!(err.to_string().contains("logo_optimized.svg"));

        // next to the sources they land in different directories
        assert!(FileManager::ensure_unique_outputs(&files, None).is_ok());
    }

    #[test]
    fn test_collect_inputs_rejects_missing() {
        let result = FileManager::collect_inputs(&[PathBuf::from("/definitely/not/here.svg")]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_write_download_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("out").join("x_optimized.svg");
        let download = Download::new("<svg>content</svg>", Some("x.svg"));

        FileManager::write_download(&download, &target).await.unwrap();
        let written = FileManager::read_document(&target).await.unwrap();
        assert_eq!(written, "<svg>content</svg>");
    }
}
