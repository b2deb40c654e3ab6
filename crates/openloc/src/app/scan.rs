//! Recursive file matching under a search root.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use ignore::{DirEntry, Walk, WalkBuilder};

use crate::domain::errors::ResolveError;

/// Lazily yields files under a root whose basename matches a shell-style pattern.
///
/// Directories whose name starts with `.` are never descended into, which keeps version-control
/// internals out of the results. Every call walks the filesystem afresh.
pub struct Matches {
    walk: Walk,
    matcher: GlobMatcher,
}

impl Matches {
    /// Start a walk of `root` matching basenames against `pattern`.
    pub fn new(root: &Path, pattern: &str) -> Result<Self, ResolveError> {
        let matcher = Glob::new(pattern)
            .map_err(|source| ResolveError::Pattern {
                pattern: pattern.to_owned(),
                source,
            })?
            .compile_matcher();

        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(|entry| !is_dot_dir(entry));

        Ok(Self {
            walk: builder.build(),
            matcher,
        })
    }
}

impl Iterator for Matches {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        for result in self.walk.by_ref() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "matcher walk error");
                    continue;
                }
            };
            let Some(kind) = entry.file_type() else {
                continue;
            };
            if kind.is_dir() || (kind.is_symlink() && !entry.path().is_file()) {
                continue;
            }
            if self.matcher.is_match(Path::new(entry.file_name())) {
                return Some(entry.into_path());
            }
        }
        None
    }
}

/// Convenience wrapper returning an iterator over matches of `pattern` under `root`.
pub fn find_matches(root: &Path, pattern: &str) -> Result<Matches, ResolveError> {
    Matches::new(root, pattern)
}

/// Turn a filename into a basename pattern.
///
/// `*`, `?` and closed `[...]` classes stay live. Braces, backslashes and an unclosed `[` are
/// matched literally, so no user filename can fail to compile or expand into alternatives.
pub fn literal_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(c) = rest.chars().next() {
        match c {
            '{' | '}' => {
                pattern.push('[');
                pattern.push(c);
                pattern.push(']');
            }
            '[' => match class_len(rest) {
                Some(len) => {
                    pattern.push_str(&rest[..len]);
                    rest = &rest[len..];
                    continue;
                }
                None => pattern.push_str("[[]"),
            },
            '\\' => pattern.push_str(r"\\"),
            _ => pattern.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    pattern
}

/// Byte length of the character class opening `text`, if it is closed.
fn class_len(text: &str) -> Option<usize> {
    let body = &text[1..];
    let negated = usize::from(body.starts_with('!'));
    // A `]` right after the opening bracket is a member, not the end of the class.
    let first = body[negated..].chars().next()?;
    let start = 1 + negated + first.len_utf8();
    text[start..].find(']').map(|end| start + end + 1)
}

fn is_dot_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|kind| kind.is_dir())
        && entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use anyhow::Result;

    fn sorted(matches: Matches) -> Vec<PathBuf> {
        let mut paths: Vec<_> = matches.collect();
        paths.sort();
        paths
    }

    #[test]
    fn finds_files_by_basename_at_any_depth() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("a/b"))?;
        fs::write(root.join("target.c"), b"")?;
        fs::write(root.join("a/b/target.c"), b"")?;
        fs::write(root.join("a/other.c"), b"")?;

        let found = sorted(find_matches(root, "target.c")?);
        let root = std::path::absolute(root)?;
        assert_eq!(found, vec![root.join("a/b/target.c"), root.join("target.c")]);
        Ok(())
    }

    #[test]
    fn supports_shell_wildcards() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("src"))?;
        fs::write(root.join("src/main.rs"), b"")?;
        fs::write(root.join("src/lib.rs"), b"")?;
        fs::write(root.join("src/notes.md"), b"")?;

        let found = sorted(find_matches(root, "*.rs")?);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().is_some_and(|e| e == "rs")));
        Ok(())
    }

    #[test]
    fn never_descends_into_dot_directories() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join(".git/objects"))?;
        fs::create_dir_all(root.join("pkg/.cache"))?;
        fs::write(root.join(".git/objects/hidden.c"), b"")?;
        fs::write(root.join("pkg/.cache/hidden.c"), b"")?;

        assert!(find_matches(root, "hidden.c")?.next().is_none());
        Ok(())
    }

    #[test]
    fn dot_files_are_still_matched() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::write(root.join(".env"), b"")?;

        assert_eq!(find_matches(root, ".env")?.count(), 1);
        Ok(())
    }

    #[test]
    fn ignores_gitignore_rules() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("build"))?;
        fs::write(root.join(".gitignore"), "build/\n")?;
        fs::write(root.join("build/gen.c"), b"")?;

        assert_eq!(find_matches(root, "gen.c")?.count(), 1);
        Ok(())
    }

    #[test]
    fn directories_are_not_candidates() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::create_dir_all(temp.path().join("module"))?;

        assert!(find_matches(temp.path(), "module")?.next().is_none());
        Ok(())
    }

    #[test]
    fn literal_pattern_escapes_only_unmatchable_syntax() {
        assert_eq!(literal_pattern("main.c"), "main.c");
        assert_eq!(literal_pattern("*.rs"), "*.rs");
        assert_eq!(literal_pattern("file[0-9].c"), "file[0-9].c");
        assert_eq!(literal_pattern("weird[.c"), "weird[[].c");
        assert_eq!(literal_pattern("odd{x.c"), "odd[{]x.c");
        assert_eq!(literal_pattern("{a,b}.c"), "[{]a,b[}].c");
        assert_eq!(literal_pattern("[]x].c"), "[]x].c");
        assert_eq!(literal_pattern(r"dir\x.c"), r"dir\\x.c");
    }

    #[test]
    fn literal_patterns_find_files_with_glob_characters() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("sub"))?;
        fs::write(root.join("sub/weird[.c"), b"")?;
        fs::write(root.join("sub/{a,b}.c"), b"")?;
        fs::write(root.join("sub/a.c"), b"")?;

        assert_eq!(find_matches(root, &literal_pattern("weird[.c"))?.count(), 1);
        let found: Vec<_> = find_matches(root, &literal_pattern("{a,b}.c"))?.collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("sub/{a,b}.c"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_candidates() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("real"))?;
        fs::write(root.join("target.c"), b"")?;
        std::os::unix::fs::symlink(root.join("real"), root.join("linked.c"))?;
        std::os::unix::fs::symlink(root.join("target.c"), root.join("alias.c"))?;

        assert!(find_matches(root, "linked.c")?.next().is_none());
        assert_eq!(find_matches(root, "alias.c")?.count(), 1);
        Ok(())
    }

    #[test]
    fn rejects_invalid_patterns() {
        let err = find_matches(Path::new("."), "[unclosed").err();
        assert!(matches!(err, Some(ResolveError::Pattern { .. })));
    }
}
