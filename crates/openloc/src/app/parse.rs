//! Location parsing for traceback and compiler/diff notations.
//!
//! Two notations are recognized:
//!
//! - Traceback: `File "foo.py", line 42, in <module>`. Whenever the token `line` appears, the token
//!   before it is the filename and the token after it is the line number.
//! - Compiler/diff: `path`, `path:LINE`, or `path:LINE:COLUMN`, possibly followed by more text.

use crate::domain::errors::ParseError;
use crate::domain::model::LocationRef;

/// Marker token that switches the parser into traceback notation.
const TRACEBACK_MARKER: &str = "line";

/// Trailing punctuation trimmed from numeric fields before they are parsed.
const NUMERIC_JUNK: &[char] = &[
    '`', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '=', '[', ']', ';', '\'', '"',
    '?', ',', '.',
];

/// Parse every location reference contained in `args`, in input order.
pub fn parse_locations<S: AsRef<str>>(args: &[S]) -> Result<Vec<LocationRef>, ParseError> {
    let tokens: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let mut locations = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = tokens[cursor..]
        .iter()
        .position(|token| *token == TRACEBACK_MARKER)
    {
        let marker = cursor + offset;
        locations.push(parse_traceback(&tokens, marker)?);
        cursor = (marker + 2).min(tokens.len());
    }

    for token in &tokens[cursor..] {
        locations.push(parse_compiler_token(token)?);
    }

    Ok(locations)
}

/// Build the reference around a `line` marker at index `marker`.
fn parse_traceback(tokens: &[&str], marker: usize) -> Result<LocationRef, ParseError> {
    let raw_filename = marker
        .checked_sub(1)
        .map(|index| tokens[index])
        .ok_or(ParseError::MissingFilename)?;
    let filename = raw_filename
        .strip_suffix(',')
        .unwrap_or(raw_filename)
        .trim_matches(|c| c == '"' || c == '\'');

    let raw_line = tokens
        .get(marker + 1)
        .copied()
        .ok_or_else(|| ParseError::MissingLine {
            filename: filename.to_owned(),
        })?;
    let value = raw_line.strip_suffix(',').unwrap_or(raw_line);
    let line = value.parse::<u32>().map_err(|_| ParseError::InvalidLine {
        token: raw_line.to_owned(),
        value: value.to_owned(),
    })?;

    Ok(LocationRef::new(filename, Some(line), None))
}

/// Parse a single `path[:line[:column]]` token.
pub fn parse_compiler_token(token: &str) -> Result<LocationRef, ParseError> {
    let Some((filename, rest)) = token.split_once(':') else {
        return Ok(LocationRef::file(token));
    };

    let mut fields = rest.split(':');
    let line_field = strip_numeric_junk(fields.next().unwrap_or_default());
    let line = if line_field.is_empty() {
        None
    } else {
        Some(
            line_field
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidLine {
                    token: token.to_owned(),
                    value: line_field.to_owned(),
                })?,
        )
    };

    // Text after a second colon is often source code rather than a column.
    let column = fields
        .next()
        .map(strip_numeric_junk)
        .filter(|field| !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|field| field.parse::<u32>().ok());

    Ok(LocationRef::new(filename, line, column))
}

/// Trim trailing punctuation that compilers and linters glue onto numbers.
pub fn strip_numeric_junk(value: &str) -> &str {
    value.trim_end_matches(NUMERIC_JUNK)
}
