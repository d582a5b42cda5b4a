use std::{fs, io, path::Path};

/// Marker line excluded from the dependency list.
///
/// Note this is `-e.`, not pip's `-e .`; a `-e .` line is kept as a requirement.
pub const HYPHEN_E_DOT: &str = "-e.";

/// Read a requirements file into one entry per line.
pub fn get_requirements(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_requirements(&contents))
}

/// Split `contents` into lines, dropping only the line terminators, and
/// remove the first [`HYPHEN_E_DOT`] entry if present.
///
/// `\n`, `\r\n` and a bare `\r` all end a line. Blank lines, comments and
/// surrounding whitespace are kept as-is.
pub fn parse_requirements(contents: &str) -> Vec<String> {
    let mut requirements = split_lines(contents);
    if let Some(pos) = requirements.iter().position(|r| r == HYPHEN_E_DOT) {
        requirements.remove(pos);
    }
    requirements
}

fn split_lines(contents: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = contents;
    while !rest.is_empty() {
        let Some(end) = rest.find(['\r', '\n']) else {
            lines.push(rest.to_string());
            break;
        };
        lines.push(rest[..end].to_string());
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
    }
    lines
}
