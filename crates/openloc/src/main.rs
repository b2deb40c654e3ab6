use anyhow::Context;
use clap::Parser;

use openloc::app::open::Opener;
use openloc::domain::errors::OpenError;
use openloc::infra::config::Config;

/// Open file references from compiler output, tracebacks, and diffs in an editor.
///
/// The editor is chosen with OPENLOC_EDITOR, a `;`-separated list of `editor[=regex]` rules
/// matched against the file name, e.g. `emacs=\.py$;vim=`.
#[derive(Parser)]
#[command(name = "openloc", version, about, long_about = None)]
struct Cli {
    /// Text containing locations, e.g. `src/main.c:12:5:` or `"foo.py", line 42`
    #[arg(
        value_name = "TEXT",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    text: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    openloc::init();
    let cli = Cli::parse();

    let config = Config::load()?;
    let cwd = std::env::current_dir().context("failed to determine the current directory")?;
    let opener = Opener::from_config(&config, cwd)?;

    match opener.run(&cli.text) {
        Ok(opened) => {
            for item in &opened {
                tracing::info!(
                    editor = %item.editor,
                    path = %item.location.path.display(),
                    "opened"
                );
            }
            Ok(())
        }
        Err(OpenError::Dispatch(err)) => {
            eprintln!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
