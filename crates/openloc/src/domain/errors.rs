//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed traceback or compiler notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("traceback `line` marker at the start of the arguments has no filename before it")]
    MissingFilename,
    #[error("traceback `line` marker after `{filename}` has no line number")]
    MissingLine { filename: String },
    #[error("invalid line number `{value}` in `{token}`")]
    InvalidLine { token: String, value: String },
}

/// Failure to map a filename onto an existing file.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not find `{filename}` (searched: {})", display_roots(searched))]
    NotFound {
        filename: String,
        searched: Vec<PathBuf>,
    },
    #[error("invalid file pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("failed to make `{}` absolute", path.display())]
    Absolute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid editor configuration or selection rules.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor rule `{rule}`: {reason}")]
    InvalidRule { rule: String, reason: String },
    #[error("no editor rule matches `{file_name}`")]
    NoEditorMatches { file_name: String },
}

/// Failure to turn an editor name into a launch command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown editor `{name}`; known editors: {}", known.join(", "))]
    UnknownEditor { name: String, known: Vec<String> },
}

/// Any error that stops an `openloc` run.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

fn display_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_error_names_the_path() {
        let err = ResolveError::Absolute {
            path: PathBuf::from("src/main.c"),
            source: std::io::Error::other("no cwd"),
        };
        assert_eq!(err.to_string(), "failed to make `src/main.c` absolute");
    }
}
