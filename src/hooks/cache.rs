// src/hooks/cache.rs
//! Persisted hook state: the protection-check cache and the per-branch
//! plan-approval marker.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{ArchError, Result};

/// Default freshness window for the protection-check cache.
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

const CACHE_REL_PATH: &str = ".claude/.cache/protection.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    checked_at: u64,
    protected: bool,
}

/// TTL-based cache for the branch-protection probe, so the reporter
/// does not hit third-party APIs on every session start.
pub struct ProtectionCache {
    path: PathBuf,
}

impl ProtectionCache {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            path: project_root.join(CACHE_REL_PATH),
        }
    }

    /// The cached result, if it is still inside the TTL. Stale or
    /// unreadable entries return `None` and the caller falls through
    /// to a live check.
    #[must_use]
    pub fn read_fresh(&self, ttl_secs: u64) -> Option<bool> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let entry: CacheEntry = serde_json::from_str(&raw).ok()?;
        let age = now_secs().saturating_sub(entry.checked_at);
        (age <= ttl_secs).then_some(entry.protected)
    }

    /// Records a fresh probe result.
    ///
    /// # Errors
    /// Returns an error when the cache directory or file cannot be
    /// written.
    pub fn write(&self, protected: bool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ArchError::Io {
                source,
                path: parent.to_path_buf(),
            })?;
        }
        let entry = CacheEntry {
            checked_at: now_secs(),
            protected,
        };
        let raw = serde_json::to_string(&entry)?;
        fs::write(&self.path, raw).map_err(|source| ArchError::Io {
            source,
            path: self.path.clone(),
        })
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Maps a branch name onto the marker-safe alphabet.
#[must_use]
pub fn sanitize_branch(branch: &str) -> String {
    branch
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Per-branch "plan approved" marker used by the approval gate.
pub struct PlanMarker;

impl PlanMarker {
    #[must_use]
    pub fn path(project_root: &Path, branch: &str) -> PathBuf {
        project_root.join(format!(".plan-approved-{}", sanitize_branch(branch)))
    }

    /// Creates the marker for the branch.
    ///
    /// # Errors
    /// Returns an error when the marker file cannot be written.
    pub fn approve(project_root: &Path, branch: &str) -> Result<()> {
        let path = Self::path(project_root, branch);
        fs::write(&path, b"approved\n").map_err(|source| ArchError::Io { source, path })
    }

    #[must_use]
    pub fn is_approved(project_root: &Path, branch: &str) -> bool {
        Self::path(project_root, branch).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_branch() {
        assert_eq!(sanitize_branch("feature/add-sync"), "feature-add-sync");
        assert_eq!(sanitize_branch("v1.2_rc"), "v1.2_rc");
        assert_eq!(sanitize_branch("weird name!"), "weird-name-");
    }

    #[test]
    fn test_marker_path() {
        let path = PlanMarker::path(Path::new("/tmp/p"), "fix/thing");
        assert!(path.ends_with(".plan-approved-fix-thing"));
    }
}
