// std imports
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::io;
use std::sync::Arc;

// third-party imports
use config::ConfigError;
use itertools::Itertools;
use owo_colors::OwoColorize;
use thiserror::Error;

// local imports
use crate::model::Field;
use crate::xerr::{Highlight, HighlightQuoted, Suggestions};

// ---

/// Error is an error which may occur in the application.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to parse playlist item: {0}")]
    Json(#[from] json::Error),
    #[error("failed to parse query: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("file {filename} not found", filename=.filename.hlq())]
    FileNotFound { filename: String },
}

impl Error {
    pub fn log(&self, app: &impl AppInfoProvider) {
        self.log_to(&mut io::stderr(), app).ok();
    }

    pub fn log_to(&self, target: &mut impl io::Write, app: &impl AppInfoProvider) -> io::Result<()> {
        writeln!(target, "{} {:#}", "error:".bright_red().bold(), self)?;
        write!(target, "{}", self.tips(app))
    }

    pub fn tips<'a, A: AppInfoProvider>(&'a self, app: &'a A) -> Tips<'a, A> {
        Tips { err: self, app }
    }
}

/// Result is an alias for standard result with bound Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ---

/// Supplies application specific details for error reporting.
pub trait AppInfoProvider {
    fn app_name(&self) -> Cow<'static, str> {
        env!("CARGO_PKG_NAME").into()
    }
}

/// Hints shown below an error message.
pub struct Tips<'a, A> {
    err: &'a Error,
    app: &'a A,
}

impl<A: AppInfoProvider> fmt::Display for Tips<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = "  tip:".green().bold().to_string();
        match self.err {
            Error::Template(TemplateError::Unknown { suggestions, .. }) => {
                if let Some(text) = did_you_mean(suggestions) {
                    writeln!(f, "{} {}", prefix, text)?;
                }
            }
            Error::Parse(ParseError::Syntax { expected, .. }) if expected.contains("field name") => {
                writeln!(f, "{} known fields are {}", prefix, Field::names().map(|name| name.hl()).join(", "))?;
            }
            Error::FileNotFound { .. } => {
                writeln!(f, "{} run {} to see usage", prefix, format!("{} --help", self.app.app_name()).bold())?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn did_you_mean(suggestions: &Suggestions) -> Option<String> {
    if suggestions.is_empty() {
        return None;
    }

    let mut text = String::from("did you mean ");
    for (i, candidate) in suggestions.iter().enumerate() {
        if i > 0 {
            text.push_str(" or ");
        }
        write!(text, "{}", candidate.hlq()).ok()?;
    }
    text.push('?');
    Some(text)
}

// ---

/// ParseError is an error which may occur when compiling a filter expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} at offset {offset}")]
    Syntax { offset: usize, expected: String },
    #[error("invalid regular expression {pattern} at offset {offset}: {source}", pattern=.pattern.hlq())]
    InvalidRegex {
        offset: usize,
        pattern: Arc<str>,
        source: regex::Error,
    },
    #[error("parser gave up at offset {offset}: {message}")]
    Aborted { offset: usize, message: String },
}

impl ParseError {
    /// Byte offset in the filter string where the problem was detected.
    pub fn offset(&self) -> usize {
        match self {
            Self::Syntax { offset, .. } | Self::InvalidRegex { offset, .. } | Self::Aborted { offset, .. } => *offset,
        }
    }

    /// Replaces the offset, e.g. to point into the text before template expansion.
    pub fn map_offset(mut self, f: impl FnOnce(usize) -> usize) -> Self {
        match &mut self {
            Self::Syntax { offset, .. } | Self::InvalidRegex { offset, .. } | Self::Aborted { offset, .. } => {
                *offset = f(*offset)
            }
        }
        self
    }
}

// ---

/// EvaluationError describes why a single comparison could not be evaluated.
///
/// It never stops evaluation, the comparison is considered not matching.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("field {field} is not available", field=.field.hlq())]
    FieldUnavailable { field: Field },
    #[error("item type is not available")]
    TypeUnavailable,
    #[error("invalid regular expression {pattern}: {source}", pattern=.pattern.hlq())]
    InvalidRegex { pattern: Arc<str>, source: regex::Error },
}

// ---

/// TemplateError is an error which may occur when expanding template references.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("unknown template {name}", name=.name.hlq())]
    Unknown { name: String, suggestions: Suggestions },
    #[error("template {name} is defined more than once", name=.name.hlq())]
    Duplicate { name: String },
    #[error("cyclic template reference {chain}", chain=.chain.join(" -> "))]
    Cycle { chain: Vec<String> },
    #[error("unterminated template reference at offset {offset}")]
    Unterminated { offset: usize },
}

#[cfg(test)]
mod tests;
