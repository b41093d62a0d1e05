//! Operation scripts
//!
//! A script holds one command per line. Blank lines and lines starting with
//! `#` are skipped. Command names are case-insensitive; everything after the
//! key of an `add` is the payload, with runs of whitespace collapsed to one
//! space.
//!
//! ```text
//! add 5 hello world
//! get 5
//! print-table
//! ```

use crate::error::{DriverError, Result};
use chain_cache::Key;
use std::fmt;
use std::fs;
use std::path::Path;

/// One parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { key: Key, payload: String },
    Get(Key),
    Contains(Key),
    Remove(Key),
    Touch(Key),
    Clear,
    Size,
    /// Full dump: list and table.
    Print,
    /// Ordering list, most recently used first.
    PrintList,
    /// Ordering list, least recently used first.
    PrintReverse,
    PrintTable,
}

impl fmt::Display for Command {
    /// Formats the command in script syntax, so it parses back to itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Add { key, payload } => write!(f, "add {key} {payload}"),
            Command::Get(key) => write!(f, "get {key}"),
            Command::Contains(key) => write!(f, "contains {key}"),
            Command::Remove(key) => write!(f, "remove {key}"),
            Command::Touch(key) => write!(f, "touch {key}"),
            Command::Clear => f.write_str("clear"),
            Command::Size => f.write_str("size"),
            Command::Print => f.write_str("print"),
            Command::PrintList => f.write_str("print-list"),
            Command::PrintReverse => f.write_str("print-reverse"),
            Command::PrintTable => f.write_str("print-table"),
        }
    }
}

/// A command together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Parses a single line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(text: &str, line: usize) -> Result<Option<Command>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut words = text.split_whitespace();
    // text is non-empty after trimming, so there is at least one word
    let name = words.next().unwrap_or_default().to_ascii_lowercase();

    let command = match name.as_str() {
        "add" => {
            let key = parse_key(words.next(), line, &name)?;
            let payload = words.by_ref().collect::<Vec<_>>().join(" ");
            if payload.is_empty() {
                return Err(DriverError::parse(line, "add requires a payload"));
            }
            Command::Add { key, payload }
        }
        "get" => Command::Get(parse_key(words.next(), line, &name)?),
        "contains" => Command::Contains(parse_key(words.next(), line, &name)?),
        "remove" => Command::Remove(parse_key(words.next(), line, &name)?),
        "touch" => Command::Touch(parse_key(words.next(), line, &name)?),
        "clear" => Command::Clear,
        "size" => Command::Size,
        "print" => Command::Print,
        "print-list" => Command::PrintList,
        "print-reverse" => Command::PrintReverse,
        "print-table" => Command::PrintTable,
        other => {
            return Err(DriverError::parse(
                line,
                format!("unknown command '{other}'"),
            ))
        }
    };

    if let Some(extra) = words.next() {
        return Err(DriverError::parse(
            line,
            format!("unexpected argument '{extra}' after {name}"),
        ));
    }
    Ok(Some(command))
}

fn parse_key(word: Option<&str>, line: usize, command: &str) -> Result<Key> {
    let word = word.ok_or_else(|| DriverError::parse(line, format!("{command} requires a key")))?;
    word.parse::<Key>()
        .map_err(|_| DriverError::parse(line, format!("invalid key '{word}'")))
}

/// Parses a whole script. Fails on the first bad line.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, text) in source.lines().enumerate() {
        let line = index + 1;
        if let Some(command) = parse_line(text, line)? {
            lines.push(ScriptLine { line, command });
        }
    }
    Ok(lines)
}

/// Reads and parses the script at `path`.
pub fn load_script(path: &Path) -> Result<Vec<ScriptLine>> {
    let source = fs::read_to_string(path).map_err(|e| DriverError::file(path, e))?;
    parse_script(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_command() {
        let source = "\
add 1 one
get 1
contains 2
remove 3
touch 4
clear
size
print
print-list
print-reverse
print-table
";
        let commands: Vec<Command> = parse_script(source)
            .unwrap()
            .into_iter()
            .map(|line| line.command)
            .collect();
        assert_eq!(
            commands,
            vec![
                Command::Add {
                    key: 1,
                    payload: "one".to_string()
                },
                Command::Get(1),
                Command::Contains(2),
                Command::Remove(3),
                Command::Touch(4),
                Command::Clear,
                Command::Size,
                Command::Print,
                Command::PrintList,
                Command::PrintReverse,
                Command::PrintTable,
            ]
        );
    }

    #[test]
    fn test_comments_and_blank_lines_keep_line_numbers() {
        let source = "# header\n\n  get 7  \n# trailing\nADD -3 multi   word payload\n";
        let lines = parse_script(source).unwrap();
        assert_eq!(
            lines,
            vec![
                ScriptLine {
                    line: 3,
                    command: Command::Get(7)
                },
                ScriptLine {
                    line: 5,
                    command: Command::Add {
                        key: -3,
                        payload: "multi word payload".to_string()
                    }
                },
            ]
        );
    }

    #[test]
    fn test_errors_report_line() {
        let err = parse_script("get 1\nfrobnicate 2\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown command 'frobnicate'");

        let err = parse_script("get x").unwrap_err();
        assert_eq!(err.to_string(), "line 1: invalid key 'x'");

        let err = parse_script("\nremove").unwrap_err();
        assert_eq!(err.to_string(), "line 2: remove requires a key");

        let err = parse_script("add 4").unwrap_err();
        assert_eq!(err.to_string(), "line 1: add requires a payload");

        let err = parse_script("size 3").unwrap_err();
        assert_eq!(err.to_string(), "line 1: unexpected argument '3' after size");
    }

    #[test]
    fn test_display_parses_back() {
        let commands = [
            Command::Add {
                key: -12,
                payload: "a b".to_string(),
            },
            Command::Touch(9),
            Command::PrintReverse,
        ];
        for command in commands {
            let text = command.to_string();
            assert_eq!(parse_line(&text, 1).unwrap(), Some(command));
        }
    }

    #[test]
    fn test_load_script_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_script(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, DriverError::File { .. }));
    }
}
