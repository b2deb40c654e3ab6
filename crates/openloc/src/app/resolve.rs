//! Best-effort mapping of partial, relative, or stale filenames onto files on disk.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};

use crate::app::scan::{find_matches, literal_pattern};
use crate::domain::errors::ResolveError;
use crate::infra::vcs::VcsRootFinder;

/// Prefixes unified diffs put in front of the old and new file names.
const DIFF_PREFIXES: &[&str] = &["a/", "b/"];

/// Resolves filenames against the working directory and its enclosing repository root.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    vcs: VcsRootFinder,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vcs_finder(vcs: VcsRootFinder) -> Self {
        Self { vcs }
    }

    /// Directories tried for one resolution: `cwd`, then its repository root when different.
    pub fn search_roots(&self, cwd: &Path) -> Vec<PathBuf> {
        let mut roots = vec![cwd.to_path_buf()];
        if let Some(root) = self.vcs.find_root(cwd).filter(|root| root != cwd) {
            roots.push(root);
        }
        roots
    }

    /// Resolve `filename` to an existing absolute path, searching every root from
    /// [`PathResolver::search_roots`] in order.
    pub fn resolve(&self, filename: &str, cwd: &Path) -> Result<PathBuf, ResolveError> {
        let cwd = absolute(cwd)?;
        let filename = strip_diff_prefix(filename, &cwd);
        let roots = self.search_roots(&cwd);

        for root in &roots {
            match resolve_in(filename, root) {
                Ok(path) => return Ok(path),
                Err(ResolveError::NotFound { .. }) => {
                    tracing::debug!(filename, root = %root.display(), "no match under root");
                }
                Err(err) => return Err(err),
            }
        }

        Err(ResolveError::NotFound {
            filename: filename.to_owned(),
            searched: roots,
        })
    }
}

/// Resolve `filename` under a single root directory.
///
/// Tries, in order: the literal path, the path relative to `root`, then a recursive search for
/// the basename picking the first candidate (in sorted order) that ends with the requested path,
/// falling back to wildcard matching of the whole candidate path.
pub fn resolve_in(filename: &str, root: &Path) -> Result<PathBuf, ResolveError> {
    let literal = Path::new(filename);
    if literal.exists() {
        return absolute(literal);
    }

    let joined = root.join(filename);
    if joined.exists() {
        return absolute(&joined);
    }

    let not_found = || ResolveError::NotFound {
        filename: filename.to_owned(),
        searched: vec![root.to_path_buf()],
    };

    let Some(basename) = literal.file_name().and_then(|name| name.to_str()) else {
        return Err(not_found());
    };

    let mut candidates: Vec<PathBuf> = find_matches(root, &literal_pattern(basename))?.collect();
    candidates.sort();
    tracing::debug!(filename, count = candidates.len(), "collected candidates");

    let trailing = Path::new(filename.trim_start_matches(['.', '/']));
    if !trailing.as_os_str().is_empty()
        && let Some(found) = candidates.iter().find(|candidate| candidate.ends_with(trailing))
    {
        return Ok(found.clone());
    }

    for pattern in fallback_patterns(filename)? {
        if let Some(found) = candidates
            .iter()
            .find(|candidate| pattern.is_match(candidate))
        {
            tracing::debug!(
                filename,
                pattern = pattern.glob().glob(),
                "wildcard fallback matched"
            );
            return Ok(found.clone());
        }
    }

    Err(not_found())
}

/// Drop a leading `a/` or `b/` from diff output unless the literal path exists.
pub fn strip_diff_prefix<'a>(filename: &'a str, cwd: &Path) -> &'a str {
    if Path::new(filename).exists() || cwd.join(filename).exists() {
        return filename;
    }
    DIFF_PREFIXES
        .iter()
        .find_map(|prefix| filename.strip_prefix(prefix))
        .unwrap_or(filename)
}

fn fallback_patterns(filename: &str) -> Result<[GlobMatcher; 2], ResolveError> {
    let compile = |pattern: String| {
        Glob::new(&pattern)
            .map(|glob| glob.compile_matcher())
            .map_err(|source| ResolveError::Pattern { pattern, source })
    };
    Ok([
        compile(format!("*/{}", literal_pattern(filename.trim_start_matches('/'))))?,
        compile(format!("*{}", literal_pattern(filename)))?,
    ])
}

fn absolute(path: &Path) -> Result<PathBuf, ResolveError> {
    std::path::absolute(path).map_err(|source| ResolveError::Absolute {
        path: path.to_path_buf(),
        source,
    })
}
