//! Named filter fragments.
//!
//! A template is referenced from a filter expression as `!name!`. Template
//! values may reference other templates. Every expansion is wrapped in
//! parentheses so that it behaves as a single operand. Regular expression
//! literals are copied as they are, a `!` inside of them has no special meaning.

// std imports
use std::collections::HashMap;
use std::ops::Range;

// third-party imports
use itertools::Itertools;
use serde::{Deserialize, Serialize};

// local imports
use crate::error::TemplateError;
use crate::xerr::Suggestions;

// ---

const MARKER: char = '!';

/// Template definition as found in the configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PatternTemplate {
    pub name: String,
    pub value: String,
}

impl PatternTemplate {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ---

/// Set of templates with all nested references resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Templates {
    resolved: HashMap<String, String>,
}

impl Templates {
    /// Resolves nested references of the given definitions.
    ///
    /// Fails on duplicate names, unknown references and reference cycles.
    pub fn new<'a, I>(definitions: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = &'a PatternTemplate>,
    {
        let mut raw = HashMap::new();
        for template in definitions {
            if raw.insert(template.name.as_str(), template.value.as_str()).is_some() {
                return Err(TemplateError::Duplicate {
                    name: template.name.clone(),
                });
            }
        }

        let mut resolver = Resolver {
            raw: &raw,
            resolved: HashMap::new(),
            stack: Vec::new(),
        };
        let mut names: Vec<_> = raw.keys().copied().collect();
        names.sort_unstable();
        for name in names {
            resolver.resolve(name)?;
        }

        log::debug!("resolved {} template(s)", resolver.resolved.len());
        Ok(Self {
            resolved: resolver.resolved,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Returns the fully expanded value of a template.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.resolved.get(name).map(String::as_str)
    }

    /// Replaces every template reference in the filter expression with its value.
    pub fn expand(&self, text: &str) -> Result<String, TemplateError> {
        Ok(self.expand_mapped(text)?.text)
    }

    /// Same as [`Templates::expand`] but also keeps track of where each reference was,
    /// so that offsets in the expanded text can be traced back to the original one.
    pub fn expand_mapped(&self, text: &str) -> Result<Expansion, TemplateError> {
        let unknown = |name: &str| TemplateError::Unknown {
            name: name.to_owned(),
            suggestions: Suggestions::new(name, self.resolved.keys().sorted()),
        };

        substitute(text, |name| self.get(name).map(str::to_owned).ok_or_else(|| unknown(name)))
    }
}

// ---

/// Filter expression with all template references replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expansion {
    text: String,
    spans: Vec<Span>,
}

impl Expansion {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Translates a byte offset in the expanded text into an offset in the original text.
    ///
    /// An offset inside of an expanded reference points at the reference itself.
    pub fn source_offset(&self, offset: usize) -> usize {
        let mut last = None;
        for span in &self.spans {
            if offset < span.output.start {
                break;
            }
            if offset < span.output.end {
                return span.input.start;
            }
            last = Some(span);
        }

        match last {
            Some(span) => offset - span.output.end + span.input.end,
            None => offset,
        }
    }
}

/// Location of a single reference before and after expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Span {
    input: Range<usize>,
    output: Range<usize>,
}

// ---

struct Resolver<'a> {
    raw: &'a HashMap<&'a str, &'a str>,
    resolved: HashMap<String, String>,
    stack: Vec<&'a str>,
}

impl<'a> Resolver<'a> {
    fn resolve(&mut self, name: &'a str) -> Result<String, TemplateError> {
        if let Some(value) = self.resolved.get(name) {
            return Ok(value.clone());
        }

        if let Some(pos) = self.stack.iter().position(|&x| x == name) {
            let mut chain: Vec<String> = self.stack[pos..].iter().map(|&x| x.to_owned()).collect();
            chain.push(name.to_owned());
            return Err(TemplateError::Cycle { chain });
        }

        let Some((&key, &value)) = self.raw.get_key_value(name) else {
            return Err(TemplateError::Unknown {
                name: name.to_owned(),
                suggestions: Suggestions::new(name, self.raw.keys().sorted()),
            });
        };

        self.stack.push(key);
        let result = substitute(value, |reference| {
            let key = self.raw.get_key_value(reference).map(|(&key, _)| key);
            match key {
                Some(key) => self.resolve(key),
                None => Err(TemplateError::Unknown {
                    name: reference.to_owned(),
                    suggestions: Suggestions::new(reference, self.raw.keys().sorted()),
                }),
            }
        });
        self.stack.pop();

        let value = result?.text;
        self.resolved.insert(key.to_owned(), value.clone());
        Ok(value)
    }
}

// ---

/// Scans a filter expression and replaces references outside of regular
/// expression literals using `lookup`.
fn substitute<F>(text: &str, mut lookup: F) -> Result<Expansion, TemplateError>
where
    F: FnMut(&str) -> Result<String, TemplateError>,
{
    let mut result = String::with_capacity(text.len());
    let mut spans = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut in_literal = false;

    while let Some((pos, c)) = chars.next() {
        if in_literal {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(&(_, '"')) = chars.peek() {
                        result.push('"');
                        chars.next();
                    }
                }
                '"' => in_literal = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_literal = true;
                result.push(c);
            }
            MARKER => {
                let start = pos + c.len_utf8();
                let len = text[start..]
                    .find(|c: char| !is_name_char(c))
                    .unwrap_or(text.len() - start);
                if len == 0 || !text[start + len..].starts_with(MARKER) {
                    return Err(TemplateError::Unterminated { offset: pos });
                }

                let name = &text[start..start + len];
                let output_start = result.len();
                result.push('(');
                result.push_str(&lookup(name)?);
                result.push(')');
                spans.push(Span {
                    input: pos..start + len + MARKER.len_utf8(),
                    output: output_start..result.len(),
                });

                // skip the name and the closing marker
                for _ in 0..name.chars().count() + 1 {
                    chars.next();
                }
            }
            _ => result.push(c),
        }
    }

    Ok(Expansion { text: result, spans })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
