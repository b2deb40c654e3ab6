//! Editor dispatch: turn a resolved location into a launched editor.

use crate::domain::errors::DispatchError;
use crate::domain::model::ResolvedLocation;
use crate::infra::editors::{EditorCatalog, LaunchCommand};
use crate::infra::process::Launcher;

/// Looks editors up in a catalog and starts them through a [`Launcher`].
pub struct Dispatcher<L> {
    catalog: EditorCatalog,
    launcher: L,
}

impl<L: Launcher> Dispatcher<L> {
    pub fn new(catalog: EditorCatalog, launcher: L) -> Self {
        Self { catalog, launcher }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Build the launch command for `editor` without starting anything.
    pub fn command_for(
        &self,
        editor: &str,
        location: &ResolvedLocation,
    ) -> Result<LaunchCommand, DispatchError> {
        let handler = self
            .catalog
            .get(editor)
            .ok_or_else(|| DispatchError::UnknownEditor {
                name: editor.to_owned(),
                known: self.catalog.names(),
            })?;
        Ok(handler.command(&location.path, location.line, location.column))
    }

    /// Open `location` in `editor`.
    ///
    /// The editor is started detached. Failures to start it are logged and not returned: the
    /// dispatch is complete once the launch has been attempted.
    pub fn dispatch(
        &self,
        editor: &str,
        location: &ResolvedLocation,
    ) -> Result<LaunchCommand, DispatchError> {
        let command = self.command_for(editor, location)?;
        tracing::debug!(editor, command = %command, "dispatching");
        if let Err(err) = self.launcher.launch(&command) {
            tracing::warn!(editor, error = %err, "editor launch failed");
        }
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    use anyhow::{Result, anyhow};

    #[derive(Default)]
    struct Recorder {
        launched: RefCell<Vec<LaunchCommand>>,
        fail: bool,
    }

    impl Launcher for Recorder {
        fn launch(&self, command: &LaunchCommand) -> Result<()> {
            self.launched.borrow_mut().push(command.clone());
            if self.fail {
                return Err(anyhow!("spawn failed"));
            }
            Ok(())
        }
    }

    fn location(line: Option<u32>, column: Option<u32>) -> ResolvedLocation {
        ResolvedLocation {
            path: PathBuf::from("/repo/src/app.c"),
            line,
            column,
        }
    }

    #[test]
    fn launches_known_editor() -> Result<()> {
        let dispatcher = Dispatcher::new(EditorCatalog::builtin(), Recorder::default());
        let command = dispatcher.dispatch("emacs", &location(Some(88), Some(3)))?;

        assert_eq!(command.argv, ["emacs", "+88:3", "/repo/src/app.c"]);
        assert_eq!(*dispatcher.launcher().launched.borrow(), vec![command]);
        Ok(())
    }

    #[test]
    fn unknown_editor_lists_sorted_names_and_launches_nothing() {
        let dispatcher = Dispatcher::new(EditorCatalog::builtin(), Recorder::default());
        let err = dispatcher
            .dispatch("notepad", &location(None, None))
            .unwrap_err();

        let DispatchError::UnknownEditor { name, known } = err;
        assert_eq!(name, "notepad");
        let mut sorted = known.clone();
        sorted.sort();
        assert_eq!(known, sorted);
        assert!(known.contains(&"vim".to_owned()));
        assert!(dispatcher.launcher().launched.borrow().is_empty());
    }

    #[test]
    fn launch_failures_are_not_surfaced() -> Result<()> {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let dispatcher = Dispatcher::new(EditorCatalog::builtin(), recorder);
        let command = dispatcher.dispatch("vim", &location(Some(1), None))?;
        assert_eq!(command.argv, ["vim", "+1", "/repo/src/app.c"]);
        Ok(())
    }
}
