//! Removal of the terminal escape codes commonly left in copy-pasted tool output.

/// Bold, reset, and bare reset. Colorized compiler diagnostics wrap file names in these.
const STRIPPED_SEQUENCES: &[&str] = &["\x1b[1m", "\x1b[0m", "\x1b[m"];

/// Strip the known escape sequences from a single argument.
pub fn strip_ansi_codes(input: &str) -> String {
    STRIPPED_SEQUENCES
        .iter()
        .fold(input.to_owned(), |text, sequence| text.replace(sequence, ""))
}

/// Sanitize every argument before it reaches the parser.
pub fn sanitize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| strip_ansi_codes(arg.as_ref()))
        .collect()
}
