//! Abstract syntax tree of filter expressions.
//!
//! The tree is built once by the parser and is never modified afterwards.
//! Its [`Display`](fmt::Display) implementation produces the canonical text
//! form, which parses back into an identical tree.

// std imports
use std::fmt;
use std::sync::Arc;

// third-party imports
use strum::{AsRefStr, Display, EnumString};

// local imports
use crate::model::{Field, ItemType};

// ---

/// Filter expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Matches if the value of `field` contains a match of `pattern`.
    FieldComparison { field: Field, pattern: Pattern },
    /// Matches if the record is of the given type.
    TypeComparison { value: ItemType },
    /// Parenthesised sub-expression.
    Group { inner: Box<Expr> },
    /// Negation.
    Not { inner: Box<Expr> },
    /// Conjunction or disjunction.
    BoolExpr { op: BoolOp, left: Box<Expr>, right: Box<Expr> },
}

impl Expr {
    pub fn field(field: Field, pattern: impl Into<Pattern>) -> Self {
        Self::FieldComparison {
            field,
            pattern: pattern.into(),
        }
    }

    pub fn item_type(value: ItemType) -> Self {
        Self::TypeComparison { value }
    }

    pub fn group(inner: Expr) -> Self {
        Self::Group { inner: Box::new(inner) }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expr) -> Self {
        Self::Not { inner: Box::new(inner) }
    }

    pub fn binary(op: BoolOp, left: Expr, right: Expr) -> Self {
        Self::BoolExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(self, rhs: Expr) -> Self {
        Self::binary(BoolOp::And, self, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        Self::binary(BoolOp::Or, self, rhs)
    }

    /// Visits every regular expression pattern in the tree, left to right.
    pub fn patterns(&self) -> Patterns<'_> {
        Patterns { stack: vec![self] }
    }

    /// Removes all [`Expr::Group`] nodes without changing the meaning of the expression.
    pub fn ungrouped(self) -> Self {
        match self {
            Self::Group { inner } => inner.ungrouped(),
            Self::Not { inner } => Self::not(inner.ungrouped()),
            Self::BoolExpr { op, left, right } => Self::binary(op, left.ungrouped(), right.ungrouped()),
            leaf => leaf,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldComparison { field, pattern } => write!(f, "{} ~ {}", field, pattern),
            Self::TypeComparison { value } => write!(f, "type = {}", value),
            Self::Group { inner } => write!(f, "({})", inner),
            Self::Not { inner } => match **inner {
                Self::BoolExpr { .. } | Self::Not { .. } => write!(f, "not ({})", inner),
                _ => write!(f, "not {}", inner),
            },
            Self::BoolExpr { op, left, right } => {
                // Chains associate to the right, so only a compound left operand needs parentheses.
                match **left {
                    Self::BoolExpr { .. } => write!(f, "({})", left)?,
                    _ => write!(f, "{}", left)?,
                }
                write!(f, " {} {}", op, right)
            }
        }
    }
}

impl std::ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        Expr::not(self)
    }
}

// ---

/// Boolean connective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BoolOp {
    And,
    Or,
}

// ---

/// Regular expression source text of a field comparison.
///
/// Holds the text with `\"` already unescaped to `"`. No other escape
/// sequence has a meaning at this level, backslashes are passed to the
/// regular expression engine as they are.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(Arc<str>);

impl Pattern {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    /// Builds a pattern from the raw text between the quotes of a literal.
    pub fn unescape(raw: &str) -> Self {
        if raw.contains(r#"\""#) {
            Self(raw.replace(r#"\""#, "\"").into())
        } else {
            Self(raw.into())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn shared(&self) -> Arc<str> {
        self.0.clone()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        let mut parts = self.0.split('"');
        if let Some(first) = parts.next() {
            f.write_str(first)?;
        }
        for part in parts {
            f.write_str(r#"\""#)?;
            f.write_str(part)?;
        }
        f.write_str("\"")
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// ---

/// Depth-first iterator over the patterns of an expression.
pub struct Patterns<'a> {
    stack: Vec<&'a Expr>,
}

impl<'a> Iterator for Patterns<'a> {
    type Item = &'a Pattern;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(expr) = self.stack.pop() {
            match expr {
                Expr::FieldComparison { pattern, .. } => return Some(pattern),
                Expr::TypeComparison { .. } => {}
                Expr::Group { inner } | Expr::Not { inner } => self.stack.push(inner),
                Expr::BoolExpr { left, right, .. } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}
