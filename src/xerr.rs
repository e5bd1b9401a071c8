//! Helpers for user facing diagnostics.

// std imports
use std::fmt;

// third-party imports
use owo_colors::{OwoColorize, Style};

// ---

const HIGHLIGHT: Style = Style::new().yellow();
const MIN_RELEVANCE: f64 = 0.75;

// ---

pub trait Highlight {
    type Output: fmt::Display;

    fn hl(self) -> Self::Output;
}

impl<'a, S> Highlight for &'a S
where
    S: fmt::Display + ?Sized,
{
    type Output = Highlighted<&'a S>;

    fn hl(self) -> Self::Output {
        Highlighted(self)
    }
}

pub trait HighlightQuoted {
    type Output: fmt::Display;

    fn hlq(self) -> Self::Output;
}

impl<'a, S> HighlightQuoted for &'a S
where
    S: fmt::Display + ?Sized,
{
    type Output = Highlighted<Quoted<&'a S>>;

    fn hlq(self) -> Self::Output {
        Highlighted(Quoted(self))
    }
}

// ---

pub struct Highlighted<S>(S);

impl<S: fmt::Display> fmt::Display for Highlighted<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.style(HIGHLIGHT))
    }
}

pub struct Quoted<S>(S);

impl<S: fmt::Display> fmt::Display for Quoted<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0.to_string())
    }
}

// ---

/// Known values that look similar to a mistyped one, most relevant first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    candidates: Vec<String>,
}

impl Suggestions {
    pub fn new<T, I>(wanted: &str, variants: I) -> Self
    where
        T: AsRef<str>,
        I: IntoIterator<Item = T>,
    {
        let mut scored = Vec::<(f64, String)>::new();
        for variant in variants {
            let variant = variant.as_ref();
            if scored.iter().any(|(_, known)| known == variant) {
                continue;
            }

            let relevance = strsim::jaro(wanted, variant);
            if relevance > MIN_RELEVANCE {
                scored.push((relevance, variant.to_owned()));
            }
        }

        // stable sort keeps the original order for equally relevant candidates
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Self {
            candidates: scored.into_iter().map(|(_, candidate)| candidate).collect(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(String::as_str)
    }
}
