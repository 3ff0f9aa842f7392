// Cross-platform file utilities: document discovery and the ancestor walk
// for a project's `pyproject.toml`-style config table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File utilities for cross-platform operations.
pub struct FileUtils;

impl FileUtils {
    /// Collect candidate documents under `path`: the file itself if it's a
    /// plain file, or every non-dotfile regular file found by walking a
    /// directory. Document format is plain text with no required extension
    /// — test-type and front matter, not the filename, decide whether a
    /// document has anything to extract.
    pub fn collect_test_files(path: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            let walker = walkdir::WalkDir::new(path).into_iter().filter_entry(|e| {
                if e.depth() == 0 {
                    return true;
                }
                !e.file_name().to_string_lossy().starts_with('.')
            });

            for entry in walker.flatten() {
                if entry.file_type().is_file() {
                    files.push(entry.path().to_path_buf());
                }
            }
        }

        files
    }

    /// Sort files by given criteria.
    pub fn sort_files(files: &mut [PathBuf], sort_by: &str) {
        match sort_by {
            "name" => files.sort_by(|a, b| a.file_name().cmp(&b.file_name())),
            "size" => files.sort_by_key(|a| Self::get_file_size(a).unwrap_or(0)),
            "mtime" => files.sort_by_key(|a| Self::get_mtime(a).unwrap_or(0)),
            "random" => {
                use rand::seq::SliceRandom;
                use rand::thread_rng;
                let mut rng = thread_rng();
                files.shuffle(&mut rng);
            }
            _ => files.sort(),
        }
    }

    /// Get file modification time (cross-platform), seconds since epoch.
    pub fn get_mtime(path: &Path) -> Result<i64> {
        use std::time::UNIX_EPOCH;
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("getting metadata for {}", path.display()))?;
        Ok(metadata.modified()?.duration_since(UNIX_EPOCH)?.as_secs() as i64)
    }

    /// Get file size (cross-platform).
    pub fn get_file_size(path: &Path) -> Result<u64> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("getting size for {}", path.display()))?;
        Ok(metadata.len())
    }

    /// Resolve a path relative to a base file path (used for `include`-style
    /// front-matter references).
    pub fn resolve_relative_path(base_file_path: &Path, relative_path: &str) -> PathBuf {
        let path = Path::new(relative_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            let base_dir = base_file_path.parent().unwrap_or_else(|| Path::new("."));
            base_dir.join(path)
        }
    }

    /// Walk upward from `doc_path`'s directory looking for a `pyproject.toml`
    /// carrying a `[tool.groktest]` table, stopping at the first ancestor
    /// that has one (or at the filesystem root). Returns an empty JSON
    /// object when nothing is found.
    pub fn discover_project_config(doc_path: &Path) -> serde_json::Value {
        let mut dir = doc_path.parent().map(Path::to_path_buf);

        while let Some(current) = dir {
            let candidate = current.join("pyproject.toml");
            if candidate.is_file() {
                if let Some(table) = read_tool_groktest_table(&candidate) {
                    return table;
                }
            }
            dir = current.parent().map(Path::to_path_buf);
        }

        serde_json::Value::Object(serde_json::Map::new())
    }
}

fn read_tool_groktest_table(path: &Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(path).ok()?;
    let parsed: serde_json::Value = toml::from_str(&content).ok()?;
    parsed.get("tool")?.get("groktest").cloned()
}
