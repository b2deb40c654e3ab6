//! Domain models for parsed and resolved source locations.

use std::fmt;
use std::path::PathBuf;

/// A `(filename, line, column)` reference parsed from free-form text.
///
/// `line` and `column` are 1-based when present. A missing line means the file should simply be
/// opened without positioning the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    pub filename: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl LocationRef {
    pub fn new(filename: impl Into<String>, line: Option<u32>, column: Option<u32>) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }

    /// Reference to a whole file without any positioning.
    pub fn file(filename: impl Into<String>) -> Self {
        Self::new(filename, None, None)
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filename)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
            if let Some(column) = self.column {
                write!(f, ":{column}")?;
            }
        }
        Ok(())
    }
}

/// A [`LocationRef`] whose filename has been mapped to an existing absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub path: PathBuf,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ResolvedLocation {
    pub fn from_ref(path: PathBuf, location: &LocationRef) -> Self {
        Self {
            path,
            line: location.line,
            column: location.column,
        }
    }

    /// Basename used when matching editor selection rules.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_only_present_fields() {
        assert_eq!(LocationRef::file("a.c").to_string(), "a.c");
        assert_eq!(LocationRef::new("a.c", Some(3), None).to_string(), "a.c:3");
        assert_eq!(
            LocationRef::new("a.c", Some(3), Some(7)).to_string(),
            "a.c:3:7"
        );
    }

    #[test]
    fn resolved_file_name_is_basename() {
        let location = LocationRef::new("src/lib.rs", Some(1), None);
        let resolved = ResolvedLocation::from_ref(PathBuf::from("/repo/src/lib.rs"), &location);
        assert_eq!(resolved.file_name(), "lib.rs");
        assert_eq!(resolved.line, Some(1));
    }
}
