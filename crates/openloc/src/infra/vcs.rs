//! Version-control root discovery.

use std::path::{Path, PathBuf};

/// Working-copy marker directories of the supported version-control systems.
pub const DEFAULT_MARKERS: &[&str] = &[".git", ".hg", ".svn", ".bzr", ".jj"];

/// Walks upward from a directory looking for a working-copy marker.
#[derive(Debug, Clone)]
pub struct VcsRootFinder {
    markers: Vec<String>,
}

impl Default for VcsRootFinder {
    fn default() -> Self {
        Self::with_markers(DEFAULT_MARKERS.iter().copied())
    }
}

impl VcsRootFinder {
    /// Use a custom set of marker names instead of [`DEFAULT_MARKERS`].
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// Return the first ancestor of `start` (inclusive) containing any marker.
    pub fn find_root(&self, start: &Path) -> Option<PathBuf> {
        let mut current = start;
        loop {
            if self.is_root(current) {
                return Some(current.to_path_buf());
            }
            match current.parent() {
                Some(parent) if parent != current => current = parent,
                _ => return None,
            }
        }
    }

    fn is_root(&self, dir: &Path) -> bool {
        self.markers.iter().any(|marker| dir.join(marker).exists())
    }
}

/// Convenience helper using the default markers.
pub fn find_vcs_root(start: &Path) -> Option<PathBuf> {
    VcsRootFinder::default().find_root(start)
}
