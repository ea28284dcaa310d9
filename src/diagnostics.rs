//! Printable compile messages for the embedding generator
use colored::Colorize;
use graphql_parser::Pos;
use std::fmt;
use std::path::{Path, PathBuf};

const SUGGESTION_SIMILARITY_FLOOR: f64 = 0.74;
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug)]
struct SourceContext {
    file_path: PathBuf,
    position: Pos,
    line: Option<String>,
}

/// A formatted message about one finding in a compile, printable as-is.
#[derive(Debug)]
pub struct PrintableMessage {
    severity: Severity,
    summary: String,
    source: Option<SourceContext>,
    hint: Option<String>,
}

impl PrintableMessage {
    pub fn new_compile_error(
        summary: &str,
        file_path: &Path,
        contents: &str,
        position: &Pos,
        hint: Option<&str>,
    ) -> Self {
        Self::with_source(Severity::Error, summary, file_path, contents, position, hint)
    }

    pub fn new_compile_warning(
        summary: &str,
        file_path: &Path,
        contents: &str,
        position: &Pos,
        hint: Option<&str>,
    ) -> Self {
        Self::with_source(
            Severity::Warning,
            summary,
            file_path,
            contents,
            position,
            hint,
        )
    }

    /// For failures with no useful source location (internal inconsistencies).
    pub fn new_simple_program_error(summary: &str) -> Self {
        PrintableMessage {
            severity: Severity::Error,
            summary: summary.to_string(),
            source: None,
            hint: None,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn with_source(
        severity: Severity,
        summary: &str,
        file_path: &Path,
        contents: &str,
        position: &Pos,
        hint: Option<&str>,
    ) -> Self {
        let line = contents
            .lines()
            .nth(position.line.saturating_sub(1))
            .map(str::to_string);
        PrintableMessage {
            severity,
            summary: summary.to_string(),
            source: Some(SourceContext {
                file_path: file_path.to_path_buf(),
                position: *position,
                line,
            }),
            hint: hint.map(str::to_string),
        }
    }
}

impl fmt::Display for PrintableMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        writeln!(f, "{label}: {}", self.summary.bold())?;
        if let Some(source) = &self.source {
            let line_number = source.position.line.to_string();
            let gutter = " ".repeat(line_number.len());
            writeln!(
                f,
                "{gutter}{} {}:{}:{}",
                "-->".blue().bold(),
                source.file_path.display(),
                source.position.line,
                source.position.column,
            )?;
            if let Some(line) = &source.line {
                let pipe = "|".blue().bold();
                writeln!(f, "{gutter} {pipe}")?;
                writeln!(f, "{} {pipe} {line}", line_number.blue().bold())?;
                let caret_pad = " ".repeat(source.position.column.saturating_sub(1));
                let caret = match self.severity {
                    Severity::Error => "^".red().bold(),
                    Severity::Warning => "^".yellow().bold(),
                };
                writeln!(f, "{gutter} {pipe} {caret_pad}{caret}")?;
            }
        }
        if let Some(hint) = &self.hint {
            writeln!(f, "  {} {hint}", "= help:".bold())?;
        }
        Ok(())
    }
}

/// Build a "did you mean" suffix from the names in scope, if any are close
/// enough to the unknown one. The returned string starts with a space so it
/// can be appended to a help sentence directly.
pub fn similar_help_suggestions(
    unknown: &str,
    possibilities: impl Iterator<Item = String>,
) -> Option<String> {
    let mut scored: Vec<(f64, String)> = possibilities
        .filter_map(|candidate| {
            let score = strsim::jaro_winkler(unknown, &candidate);
            (score >= SUGGESTION_SIMILARITY_FLOOR).then(|| (score, candidate))
        })
        .collect();
    if scored.is_empty() {
        return None;
    }
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    let names = scored
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| format!("`{name}`"))
        .collect::<Vec<_>>();
    if names.len() == 1 {
        Some(format!(" Did you mean {}?", names[0]))
    } else {
        Some(format!(" Did you mean one of {}?", names.join(", ")))
    }
}
