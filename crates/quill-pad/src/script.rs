/// Script parsing and execution for the headless driver.
///
/// A script is a sequence of newline-separated commands, one per line.
/// Blank lines and lines starting with `#` are skipped. Text arguments
/// support `\n`, `\t`, and `\\` escapes.
use anyhow::{bail, Context, Result};

use quill_pad_config::AppConfig;
use quill_pad_core::{Document, SearchOptions};

/// One script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert text at the caret.
    Insert(String),
    /// Replace the whole buffer.
    Set(String),
    Undo,
    Redo,
    /// Begin table composition; `None` uses the configured default size.
    Table(Option<(usize, usize)>),
    /// Confirm the current table cell with this value.
    Cell(String),
    /// Abandon the active table composition.
    Cancel,
    /// Replace every occurrence of `find` with `with`.
    Replace { find: String, with: String },
    /// Emit the current buffer content.
    Print,
}

/// Parses one script line. Returns `None` for blank and comment lines.
///
/// # Errors
///
/// Returns an error for an unknown command or malformed arguments.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim_start()),
        None => (trimmed, ""),
    };

    let command = match keyword {
        "insert" => Command::Insert(unescape(rest)),
        "set" => Command::Set(unescape(rest)),
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "table" => {
            if rest.is_empty() {
                Command::Table(None)
            } else {
                let mut parts = rest.split_whitespace();
                let rows = parse_dimension(parts.next(), "rows")?;
                let cols = parse_dimension(parts.next(), "cols")?;
                if parts.next().is_some() {
                    bail!("table takes at most two arguments");
                }
                Command::Table(Some((rows, cols)))
            }
        }
        "cell" => Command::Cell(unescape(rest)),
        "cancel" => Command::Cancel,
        "replace" => {
            let mut parts = rest.split_whitespace();
            let (Some(find), Some(with)) = (parts.next(), parts.next()) else {
                bail!("replace needs a search term and a replacement");
            };
            if parts.next().is_some() {
                bail!("replace takes exactly two arguments");
            }
            Command::Replace {
                find: unescape(find),
                with: unescape(with),
            }
        }
        "print" => Command::Print,
        other => bail!("unknown command {other:?}"),
    };
    Ok(Some(command))
}

fn parse_dimension(token: Option<&str>, name: &str) -> Result<usize> {
    let token = token.with_context(|| format!("table is missing {name}"))?;
    token
        .parse()
        .with_context(|| format!("invalid table {name} {token:?}"))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Executes script commands against a document.
pub struct Runner {
    doc: Document,
    default_rows: usize,
    default_cols: usize,
}

impl Runner {
    pub fn new(doc: Document, config: &AppConfig) -> Self {
        Self {
            doc,
            default_rows: config.default_table_rows,
            default_cols: config.default_table_cols,
        }
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Parses and executes a whole script, printing `print` output to
    /// stdout.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failing line on a parse or execution
    /// failure. Table-state errors are reported and skipped instead, the
    /// way an editor ignores a confirmation key with no table active.
    pub fn run(&mut self, source: &str) -> Result<()> {
        for (idx, line) in source.lines().enumerate() {
            let parsed =
                parse_line(line).with_context(|| format!("Failed to parse line {}", idx + 1))?;
            if let Some(command) = parsed {
                let output = self
                    .step(&command)
                    .with_context(|| format!("Failed to execute line {}", idx + 1))?;
                if let Some(output) = output {
                    println!("{output}");
                }
            }
        }
        Ok(())
    }

    /// Executes one command, returning any output it produced.
    ///
    /// # Errors
    ///
    /// Returns an error if a buffer edit fails. Composer-state errors are
    /// logged and swallowed: the requested action is ignored and state is
    /// left unchanged.
    pub fn step(&mut self, command: &Command) -> Result<Option<String>> {
        match command {
            Command::Insert(text) => self.doc.insert_text(text)?,
            Command::Set(text) => self.doc.set_buffer_text(text),
            Command::Undo => self.doc.undo(),
            Command::Redo => self.doc.redo(),
            Command::Table(dims) => {
                let (rows, cols) = dims.unwrap_or((self.default_rows, self.default_cols));
                if let Err(error) = self.doc.begin_table(rows, cols) {
                    tracing::warn!(%error, "table composition not started");
                }
            }
            Command::Cell(value) => {
                if let Err(error) = self.doc.confirm_table_cell(value) {
                    tracing::warn!(%error, "cell confirmation ignored");
                }
            }
            Command::Cancel => self.doc.cancel_table(),
            Command::Replace { find, with } => {
                let count = self
                    .doc
                    .replace_all(&SearchOptions::new(find.clone()), with)?;
                tracing::debug!(count, "replaced occurrences");
            }
            Command::Print => return Ok(Some(self.doc.buffer_text())),
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> Runner {
        Runner::new(Document::new(), &AppConfig::default())
    }

    fn run_collect(runner: &mut Runner, source: &str) -> Vec<String> {
        let mut outputs = Vec::new();
        for line in source.lines() {
            if let Some(command) = parse_line(line).expect("parse") {
                if let Some(output) = runner.step(&command).expect("step") {
                    outputs.push(output);
                }
            }
        }
        outputs
    }

    // ── Parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# a comment").unwrap(), None);
    }

    #[test]
    fn test_parse_text_commands_with_escapes() {
        assert_eq!(
            parse_line(r"insert line one\nline two").unwrap(),
            Some(Command::Insert("line one\nline two".to_string()))
        );
        assert_eq!(
            parse_line(r"set a\tb\\c").unwrap(),
            Some(Command::Set("a\tb\\c".to_string()))
        );
    }

    #[test]
    fn test_parse_bare_cell_is_empty_value() {
        assert_eq!(
            parse_line("cell").unwrap(),
            Some(Command::Cell(String::new()))
        );
    }

    #[test]
    fn test_parse_table_with_and_without_dimensions() {
        assert_eq!(
            parse_line("table 3 4").unwrap(),
            Some(Command::Table(Some((3, 4))))
        );
        assert_eq!(parse_line("table").unwrap(), Some(Command::Table(None)));
        assert!(parse_line("table 3").is_err());
        assert!(parse_line("table x y").is_err());
    }

    #[test]
    fn test_parse_replace() {
        assert_eq!(
            parse_line("replace old new").unwrap(),
            Some(Command::Replace {
                find: "old".to_string(),
                with: "new".to_string(),
            })
        );
        assert!(parse_line("replace lonely").is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(parse_line("explode").is_err());
    }

    // ── Execution ────────────────────────────────────────────────────

    #[test]
    fn test_insert_undo_redo_script() {
        let mut runner = runner();
        let outputs = run_collect(
            &mut runner,
            "set hello\n\
             undo\n\
             print\n\
             redo\n\
             print",
        );
        assert_eq!(outputs, vec!["".to_string(), "hello".to_string()]);
    }

    #[test]
    fn test_table_script_inserts_block() {
        let mut runner = runner();
        let outputs = run_collect(
            &mut runner,
            "table 2 2\n\
             cell a\n\
             cell b\n\
             cell c\n\
             cell d\n\
             print",
        );
        assert_eq!(outputs, vec!["| a | b |\n| c | d |\n\n".to_string()]);
    }

    #[test]
    fn test_table_uses_configured_defaults() {
        let config = AppConfig {
            default_table_rows: 1,
            default_table_cols: 2,
            ..AppConfig::default()
        };
        let mut runner = Runner::new(Document::new(), &config);
        let outputs = run_collect(
            &mut runner,
            "table\n\
             cell x\n\
             cell y\n\
             print",
        );
        assert_eq!(outputs, vec!["| x | y |\n\n".to_string()]);
    }

    #[test]
    fn test_stray_cell_is_ignored() {
        let mut runner = runner();
        let outputs = run_collect(
            &mut runner,
            "set untouched\n\
             cell orphan\n\
             print",
        );
        assert_eq!(outputs, vec!["untouched".to_string()]);
    }

    #[test]
    fn test_replace_script() {
        let mut runner = runner();
        let outputs = run_collect(
            &mut runner,
            "set one fish two fish\n\
             replace fish bird\n\
             print",
        );
        assert_eq!(outputs, vec!["one bird two bird".to_string()]);
    }

    #[test]
    fn test_run_reports_failing_line() {
        let mut runner = runner();
        let err = runner.run("set fine\nbogus command").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
