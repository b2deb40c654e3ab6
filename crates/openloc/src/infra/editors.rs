//! Editor catalog mapping editor names to launch command builders.
//!
//! Built-in editors and editors defined in the config file are both [`TemplateEditor`]s: argv
//! templates using the `$FILE`, `$LINE`, and `$COLUMN` placeholders. Anything implementing
//! [`EditorCommand`] can be registered alongside them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Positioning features an editor's command line supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub line: bool,
    pub column: bool,
}

/// A ready-to-spawn command: program plus arguments, and extra environment for the child.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchCommand {
    pub argv: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl LaunchCommand {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={value:?} ")?;
        }
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Builds the command line that opens a file in one particular editor.
pub trait EditorCommand: fmt::Debug + Send + Sync {
    fn capabilities(&self) -> Capabilities;

    fn command(&self, path: &Path, line: Option<u32>, column: Option<u32>) -> LaunchCommand;
}

/// Editor described by argv templates, as used by the built-ins and the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEditor {
    /// Arguments used when no line is requested or the editor cannot position the cursor.
    pub plain: Vec<String>,
    #[serde(default)]
    pub at_line: Option<Vec<String>>,
    #[serde(default)]
    pub at_column: Option<Vec<String>>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl TemplateEditor {
    fn template_for(&self, line: Option<u32>, column: Option<u32>) -> &[String] {
        match (line, column, &self.at_line, &self.at_column) {
            (Some(_), Some(_), _, Some(at_column)) => at_column,
            (Some(_), _, Some(at_line), _) => at_line,
            _ => &self.plain,
        }
    }
}

impl EditorCommand for TemplateEditor {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            line: self.at_line.is_some() || self.at_column.is_some(),
            column: self.at_column.is_some(),
        }
    }

    fn command(&self, path: &Path, line: Option<u32>, column: Option<u32>) -> LaunchCommand {
        // An editor with only a column template still wants it for line-only requests.
        let column = match (line, &self.at_line) {
            (Some(_), None) => Some(column.unwrap_or(1)),
            _ => column,
        };
        let argv = self
            .template_for(line, column)
            .iter()
            .map(|arg| substitute(arg, path, line, column))
            .collect();
        LaunchCommand {
            argv,
            env: self.env.clone(),
        }
    }
}

/// Replace `$FILE`, `$LINE` and `$COLUMN` in one template argument. Columns below 1 become 1.
///
/// The template is scanned once, so placeholder text inside the substituted path is kept as is.
pub fn substitute(template: &str, path: &Path, line: Option<u32>, column: Option<u32>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        if let Some(tail) = rest.strip_prefix("$FILE") {
            out.push_str(&path.display().to_string());
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("$LINE") {
            out.push_str(&line.unwrap_or(1).to_string());
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("$COLUMN") {
            out.push_str(&column.unwrap_or(1).max(1).to_string());
            rest = tail;
        } else {
            out.push('$');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

struct BuiltinEditor {
    name: &'static str,
    plain: &'static [&'static str],
    at_line: Option<&'static [&'static str]>,
    at_column: Option<&'static [&'static str]>,
    env: &'static [(&'static str, &'static str)],
}

const BUILTIN_EDITORS: &[BuiltinEditor] = &[
    BuiltinEditor {
        name: "vim",
        plain: &["vim", "$FILE"],
        at_line: Some(&["vim", "+$LINE", "$FILE"]),
        at_column: Some(&["vim", "+call cursor($LINE, $COLUMN)", "$FILE"]),
        env: &[],
    },
    BuiltinEditor {
        name: "nvim",
        plain: &["nvim", "$FILE"],
        at_line: Some(&["nvim", "+$LINE", "$FILE"]),
        at_column: Some(&["nvim", "+call cursor($LINE, $COLUMN)", "$FILE"]),
        env: &[],
    },
    BuiltinEditor {
        name: "gvim",
        plain: &["gvim", "--remote-silent", "$FILE"],
        at_line: Some(&["gvim", "--remote-silent", "+$LINE", "$FILE"]),
        at_column: Some(&[
            "gvim",
            "--remote-silent",
            "+call cursor($LINE, $COLUMN)",
            "$FILE",
        ]),
        env: &[],
    },
    BuiltinEditor {
        name: "emacs",
        plain: &["emacs", "$FILE"],
        at_line: Some(&["emacs", "+$LINE", "$FILE"]),
        at_column: Some(&["emacs", "+$LINE:$COLUMN", "$FILE"]),
        env: &[],
    },
    BuiltinEditor {
        name: "emacsclient",
        plain: &["emacsclient", "-n", "$FILE"],
        at_line: Some(&["emacsclient", "-n", "+$LINE", "$FILE"]),
        at_column: Some(&["emacsclient", "-n", "+$LINE:$COLUMN", "$FILE"]),
        env: &[("ALTERNATE_EDITOR", "")],
    },
    BuiltinEditor {
        name: "nano",
        plain: &["nano", "$FILE"],
        at_line: Some(&["nano", "+$LINE", "$FILE"]),
        at_column: Some(&["nano", "+$LINE,$COLUMN", "$FILE"]),
        env: &[],
    },
    BuiltinEditor {
        name: "code",
        plain: &["code", "$FILE"],
        at_line: Some(&["code", "--goto", "$FILE:$LINE"]),
        at_column: Some(&["code", "--goto", "$FILE:$LINE:$COLUMN"]),
        env: &[],
    },
    BuiltinEditor {
        name: "subl",
        plain: &["subl", "$FILE"],
        at_line: Some(&["subl", "$FILE:$LINE"]),
        at_column: Some(&["subl", "$FILE:$LINE:$COLUMN"]),
        env: &[],
    },
    BuiltinEditor {
        name: "zed",
        plain: &["zed", "$FILE"],
        at_line: Some(&["zed", "$FILE:$LINE"]),
        at_column: Some(&["zed", "$FILE:$LINE:$COLUMN"]),
        env: &[],
    },
    BuiltinEditor {
        name: "idea",
        plain: &["idea", "$FILE"],
        at_line: Some(&["idea", "--line", "$LINE", "$FILE"]),
        at_column: Some(&["idea", "--line", "$LINE", "--column", "$COLUMN", "$FILE"]),
        env: &[],
    },
    BuiltinEditor {
        name: "kate",
        plain: &["kate", "$FILE"],
        at_line: Some(&["kate", "-l", "$LINE", "$FILE"]),
        at_column: Some(&["kate", "-l", "$LINE", "-c", "$COLUMN", "$FILE"]),
        env: &[],
    },
    BuiltinEditor {
        name: "less",
        plain: &["less", "$FILE"],
        at_line: Some(&["less", "+$LINEG", "$FILE"]),
        at_column: None,
        env: &[],
    },
];

impl From<&BuiltinEditor> for TemplateEditor {
    fn from(value: &BuiltinEditor) -> Self {
        let owned = |args: &[&str]| -> Vec<String> {
            args.iter().map(|arg| (*arg).to_owned()).collect()
        };
        Self {
            plain: owned(value.plain),
            at_line: value.at_line.map(owned),
            at_column: value.at_column.map(owned),
            env: value
                .env
                .iter()
                .map(|(key, val)| ((*key).to_owned(), (*val).to_owned()))
                .collect(),
        }
    }
}

/// Registry of editors by name.
#[derive(Debug, Default)]
pub struct EditorCatalog {
    editors: BTreeMap<String, Box<dyn EditorCommand>>,
}

impl EditorCatalog {
    /// Catalog with no editors registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in editors.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for editor in BUILTIN_EDITORS {
            catalog.register(editor.name, TemplateEditor::from(editor));
        }
        catalog
    }

    /// Register `editor` under `name`, replacing any editor of the same name.
    pub fn register(&mut self, name: impl Into<String>, editor: impl EditorCommand + 'static) {
        self.editors.insert(name.into(), Box::new(editor));
    }

    pub fn get(&self, name: &str) -> Option<&dyn EditorCommand> {
        self.editors.get(name).map(|editor| editor.as_ref())
    }

    /// Registered editor names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.editors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(
        catalog: &EditorCatalog,
        name: &str,
        line: Option<u32>,
        column: Option<u32>,
    ) -> Vec<String> {
        catalog
            .get(name)
            .expect("editor registered")
            .command(Path::new("/src/app.c"), line, column)
            .argv
    }

    #[test]
    fn picks_template_by_requested_position() {
        let catalog = EditorCatalog::builtin();
        assert_eq!(argv(&catalog, "vim", None, None), ["vim", "/src/app.c"]);
        assert_eq!(argv(&catalog, "vim", Some(12), None), ["vim", "+12", "/src/app.c"]);
        assert_eq!(
            argv(&catalog, "vim", Some(12), Some(4)),
            ["vim", "+call cursor(12, 4)", "/src/app.c"]
        );
    }

    #[test]
    fn line_only_editors_ignore_columns() {
        let catalog = EditorCatalog::builtin();
        assert_eq!(
            argv(&catalog, "less", Some(30), Some(2)),
            ["less", "+30G", "/src/app.c"]
        );
        let caps = catalog.get("less").expect("less").capabilities();
        assert_eq!(caps, Capabilities { line: true, column: false });
    }

    #[test]
    fn zero_column_is_clamped() {
        let catalog = EditorCatalog::builtin();
        assert_eq!(
            argv(&catalog, "code", Some(3), Some(0)),
            ["code", "--goto", "/src/app.c:3:1"]
        );
    }

    #[test]
    fn placeholders_inside_the_path_are_left_alone() {
        let catalog = EditorCatalog::builtin();
        let cmd = catalog
            .get("code")
            .expect("code")
            .command(Path::new("/p/$LINE.txt"), Some(3), Some(4));
        assert_eq!(cmd.argv, ["code", "--goto", "/p/$LINE.txt:3:4"]);
        assert_eq!(
            substitute("$FILE:$COLUMN $5", Path::new("/$COLUMN"), None, None),
            "/$COLUMN:1 $5"
        );
    }

    #[test]
    fn column_only_template_serves_line_requests() {
        let editor = TemplateEditor {
            plain: vec!["ed".into(), "$FILE".into()],
            at_line: None,
            at_column: Some(vec!["ed".into(), "$FILE@$LINE,$COLUMN".into()]),
            env: BTreeMap::new(),
        };
        let cmd = editor.command(Path::new("/f"), Some(9), None);
        assert_eq!(cmd.argv, ["ed", "/f@9,1"]);
    }

    #[test]
    fn plain_only_editor_has_no_capabilities() {
        let editor = TemplateEditor {
            plain: vec!["open".into(), "$FILE".into()],
            at_line: None,
            at_column: None,
            env: BTreeMap::new(),
        };
        assert_eq!(editor.capabilities(), Capabilities::default());
        assert_eq!(editor.command(Path::new("/f"), Some(3), Some(2)).argv, ["open", "/f"]);
    }

    #[test]
    fn emacsclient_carries_environment() {
        let catalog = EditorCatalog::builtin();
        let cmd = catalog
            .get("emacsclient")
            .expect("emacsclient")
            .command(Path::new("/f.el"), Some(1), Some(1));
        assert_eq!(cmd.env.get("ALTERNATE_EDITOR").map(String::as_str), Some(""));
        assert_eq!(cmd.program(), Some("emacsclient"));
    }

    #[test]
    fn names_are_sorted_and_registration_shadows() {
        let mut catalog = EditorCatalog::builtin();
        let names = catalog.names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);

        let before = catalog.len();
        catalog.register(
            "vim",
            TemplateEditor {
                plain: vec!["myvim".into(), "$FILE".into()],
                at_line: None,
                at_column: None,
                env: BTreeMap::new(),
            },
        );
        assert_eq!(catalog.len(), before);
        assert_eq!(argv(&catalog, "vim", Some(1), None), ["myvim", "/src/app.c"]);
    }
}
