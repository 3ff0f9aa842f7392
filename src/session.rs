// Persisted "last session" state, consulted by `--last` and rewritten on
// every other invocation. The only process-wide state in the crate — kept
// as an explicit service with load/save/clear rather than an ambient
// global, so callers can see exactly when it is touched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const STATE_DIR_ENV: &str = "GROKTEST_STATE_DIR";
const SESSION_FILE: &str = "last-session.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastSession {
    pub files: Vec<PathBuf>,
    pub cli_options: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}

impl LastSession {
    pub fn new(files: Vec<PathBuf>, cli_options: serde_json::Value) -> Self {
        Self { files, cli_options, saved_at: Utc::now() }
    }

    /// Load the persisted session, if any. Absence or a corrupt file is not
    /// an error — `--last` on a fresh machine simply has nothing to re-run.
    pub fn load() -> Option<Self> {
        let path = state_path().ok()?;
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Write atomically: serialize to a sibling temp file, then rename over
    /// the real path, so a crash mid-write never leaves a truncated session.
    pub fn save(&self) -> Result<()> {
        let path = state_path()?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).with_context(|| format!("creating state dir {dir:?}"))?;
        }
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp, content).with_context(|| format!("writing {tmp:?}"))?;
        std::fs::rename(&tmp, &path).with_context(|| format!("renaming into {path:?}"))?;
        Ok(())
    }

    pub fn clear() -> Result<()> {
        let path = state_path()?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {path:?}")),
        }
    }
}

fn state_path() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(STATE_DIR_ENV) {
        return Ok(Path::new(&dir).join(SESSION_FILE));
    }
    let dir = dirs::cache_dir()
        .map(|d| d.join("groktest"))
        .context("could not determine a cache directory for session state")?;
    Ok(dir.join(SESSION_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_through_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        // SAFETY: test-only, single-threaded access to this process's env.
        unsafe { std::env::set_var(STATE_DIR_ENV, dir.path()) };

        let session = LastSession::new(vec![PathBuf::from("doc.md")], json!({"fail-fast": true}));
        session.save().unwrap();

        let loaded = LastSession::load().unwrap();
        assert_eq!(loaded.files, session.files);
        assert_eq!(loaded.cli_options, session.cli_options);

        LastSession::clear().unwrap();
        assert!(LastSession::load().is_none());

        unsafe { std::env::remove_var(STATE_DIR_ENV) };
    }

    #[test]
    fn load_with_no_file_present_is_none_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var(STATE_DIR_ENV, dir.path()) };
        assert!(LastSession::load().is_none());
        unsafe { std::env::remove_var(STATE_DIR_ENV) };
    }
}
