//! End-to-end run: sanitize, parse, resolve, select an editor, dispatch.

use std::path::PathBuf;

use crate::app::dispatch::Dispatcher;
use crate::app::parse::parse_locations;
use crate::app::resolve::PathResolver;
use crate::domain::errors::{ConfigError, OpenError};
use crate::domain::model::ResolvedLocation;
use crate::infra::ansi::sanitize_args;
use crate::infra::config::{Config, EditorRules};
use crate::infra::editors::LaunchCommand;
use crate::infra::process::{Launcher, ProcessLauncher};

/// A location that was resolved and handed to an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub location: ResolvedLocation,
    pub editor: String,
    pub command: LaunchCommand,
}

/// Opens every location found in a batch of arguments, one after another.
pub struct Opener<L> {
    cwd: PathBuf,
    resolver: PathResolver,
    rules: EditorRules,
    dispatcher: Dispatcher<L>,
}

impl Opener<ProcessLauncher> {
    /// Build an opener that launches real processes, using `config` for editors and rules.
    pub fn from_config(config: &Config, cwd: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self::new(
            cwd,
            PathResolver::new(),
            config.editor_rules()?,
            Dispatcher::new(config.catalog(), ProcessLauncher),
        ))
    }
}

impl<L: Launcher> Opener<L> {
    pub fn new(
        cwd: PathBuf,
        resolver: PathResolver,
        rules: EditorRules,
        dispatcher: Dispatcher<L>,
    ) -> Self {
        Self {
            cwd,
            resolver,
            rules,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<L> {
        &self.dispatcher
    }

    /// Process `args` in order. The first location that fails to resolve, has no matching editor
    /// rule, or names an unknown editor stops the run; earlier locations stay opened.
    pub fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<Opened>, OpenError> {
        let args = sanitize_args(args);
        let locations = parse_locations(&args)?;
        tracing::debug!(count = locations.len(), "parsed locations");

        let mut opened = Vec::with_capacity(locations.len());
        for location in &locations {
            let path = self.resolver.resolve(&location.filename, &self.cwd)?;
            let resolved = ResolvedLocation::from_ref(path, location);
            let editor = self.rules.select(&resolved.file_name())?;
            let command = self.dispatcher.dispatch(editor, &resolved)?;
            opened.push(Opened {
                location: resolved,
                editor: editor.to_owned(),
                command,
            });
        }
        Ok(opened)
    }
}
