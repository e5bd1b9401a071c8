// std imports
use std::fmt;
use std::str::FromStr;

// third-party imports
use itertools::Itertools;
use pest::{
    Parser,
    error::{ErrorVariant, InputLocation},
    iterators::Pair,
};
use pest_derive::Parser;

// local imports
use crate::ast::{BoolOp, Expr, Pattern};
use crate::error::{ParseError, Result};
use crate::evaluation::RegexCache;
use crate::template::Templates;

// ---

#[derive(Parser)]
#[grammar = "query.pest"]
pub struct QueryParser;

// ---

/// Compiled filter expression.
///
/// Holds the expression tree together with the compiled regular expressions
/// it refers to. A query is immutable and can be shared between threads.
#[derive(Clone, Debug)]
pub struct Query {
    expr: Expr,
    regexes: RegexCache,
}

impl Query {
    /// Builds a query from an expression tree.
    ///
    /// Regular expressions are compiled on first use, an invalid one is
    /// reported as an evaluation warning and never matches.
    pub fn new(expr: Expr) -> Self {
        let regexes = RegexCache::for_expr(&expr);
        Self { expr, regexes }
    }

    pub fn parse(str: &str) -> Result<Self, ParseError> {
        parse(str)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn into_expr(self) -> Expr {
        self.expr
    }

    pub(crate) fn regexes(&self) -> &RegexCache {
        &self.regexes
    }

    pub fn and(self, rhs: Query) -> Query {
        self.combine(BoolOp::And, rhs)
    }

    pub fn or(self, rhs: Query) -> Query {
        self.combine(BoolOp::Or, rhs)
    }

    fn combine(self, op: BoolOp, rhs: Query) -> Query {
        Query {
            expr: Expr::binary(op, self.expr, rhs.expr),
            regexes: self.regexes.merge(rhs.regexes),
        }
    }
}

impl From<Expr> for Query {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

impl FromStr for Query {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl std::ops::BitAnd for Query {
    type Output = Query;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Query {
    type Output = Query;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl std::ops::Not for Query {
    type Output = Query;

    fn not(self) -> Self::Output {
        Query {
            expr: Expr::not(self.expr),
            regexes: self.regexes,
        }
    }
}

// ---

/// Compiles a filter expression.
///
/// `and` and `or` share a single precedence level and chain to the right,
/// so `a and b or c` is `a and (b or c)`. A `not` applies to the comparison
/// or parenthesised group directly after it.
pub fn parse(str: &str) -> Result<Query, ParseError> {
    let mut pairs = QueryParser::parse(Rule::input, str).map_err(syntax_error)?;
    let mut regexes = RegexCache::default();
    let expr = new_stmt(pairs.next().unwrap(), &mut regexes)?;
    log::debug!("compiled query with {} distinct pattern(s): {}", regexes.len(), expr);
    Ok(Query { expr, regexes })
}

/// Expands template references and compiles the resulting filter expression.
///
/// Offsets of parse errors refer to `str`, an error inside of an expanded
/// template points at the reference.
pub fn parse_with_templates(str: &str, templates: &Templates) -> Result<Query> {
    let expansion = templates.expand_mapped(str)?;
    parse(expansion.text()).map_err(|err| err.map_offset(|offset| expansion.source_offset(offset)).into())
}

fn new_stmt(pair: Pair<Rule>, regexes: &mut RegexCache) -> Result<Expr, ParseError> {
    assert_eq!(pair.as_rule(), Rule::stmt);

    new_chain(pair, regexes)
}

fn new_expr(pair: Pair<Rule>, regexes: &mut RegexCache) -> Result<Expr, ParseError> {
    assert_eq!(pair.as_rule(), Rule::expr);

    new_chain(pair, regexes)
}

// Both `stmt` and `expr` consist of an operand followed by (operator, expr) pairs.
// The nested `expr` already swallows the rest of the chain, so the tree leans right.
fn new_chain(pair: Pair<Rule>, regexes: &mut RegexCache) -> Result<Expr, ParseError> {
    let mut inner = pair.into_inner();
    let mut lhs = new_operand(inner.next().unwrap(), regexes)?;
    while let Some(op) = inner.next() {
        let op = new_bool_op(op);
        let rhs = new_expr(inner.next().unwrap(), regexes)?;
        lhs = Expr::binary(op, lhs, rhs);
    }
    Ok(lhs)
}

fn new_operand(pair: Pair<Rule>, regexes: &mut RegexCache) -> Result<Expr, ParseError> {
    match pair.as_rule() {
        Rule::expr => new_expr(pair, regexes),
        Rule::not_expr => new_not_expr(pair, regexes),
        Rule::field_comparison => new_field_comparison(pair, regexes),
        Rule::type_comparison => new_type_comparison(pair),
        Rule::expr_group => new_expr_group(pair, regexes),
        _ => unreachable!(),
    }
}

fn new_not_expr(pair: Pair<Rule>, regexes: &mut RegexCache) -> Result<Expr, ParseError> {
    assert_eq!(pair.as_rule(), Rule::not_expr);

    let mut inner = pair.into_inner();
    assert_eq!(inner.next().unwrap().as_rule(), Rule::not);
    let arg = new_operand(inner.next().unwrap(), regexes)?;
    Ok(Expr::not(arg))
}

fn new_expr_group(pair: Pair<Rule>, regexes: &mut RegexCache) -> Result<Expr, ParseError> {
    assert_eq!(pair.as_rule(), Rule::expr_group);

    let inner = new_expr(pair.into_inner().next().unwrap(), regexes)?;
    Ok(Expr::group(inner))
}

fn new_field_comparison(pair: Pair<Rule>, regexes: &mut RegexCache) -> Result<Expr, ParseError> {
    assert_eq!(pair.as_rule(), Rule::field_comparison);

    let mut inner = pair.into_inner();
    let field = new_keyword(inner.next().unwrap())?;
    let regex = inner.next().unwrap();
    assert_eq!(regex.as_rule(), Rule::regex);

    let body = regex.into_inner().next().unwrap();
    let pattern = Pattern::unescape(body.as_str());
    regexes.compile(&pattern, body.as_span().start())?;

    Ok(Expr::field(field, pattern))
}

fn new_type_comparison(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    assert_eq!(pair.as_rule(), Rule::type_comparison);

    let value = new_keyword(pair.into_inner().next().unwrap())?;
    Ok(Expr::item_type(value))
}

fn new_bool_op(pair: Pair<Rule>) -> BoolOp {
    match pair.as_rule() {
        Rule::and => BoolOp::And,
        Rule::or => BoolOp::Or,
        _ => unreachable!(),
    }
}

fn new_keyword<T: FromStr>(pair: Pair<Rule>) -> Result<T, ParseError> {
    pair.as_str().parse().map_err(|_| ParseError::Syntax {
        offset: pair.as_span().start(),
        expected: describe(pair.as_rule()).into(),
    })
}

// ---

fn syntax_error(err: pest::error::Error<Rule>) -> ParseError {
    let offset = match err.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };
    match err.variant {
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => ParseError::Syntax {
            offset,
            expected: positives.iter().map(|rule| describe(*rule)).unique().join(" or "),
        },
        ErrorVariant::ParsingError { .. } => ParseError::Syntax {
            offset,
            expected: describe(Rule::stmt).into(),
        },
        ErrorVariant::CustomError { message } => ParseError::Aborted { offset, message },
    }
}

fn describe(rule: Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::field => "field name",
        Rule::type_value => "type value",
        Rule::and | Rule::or => "boolean operator",
        Rule::not => "not",
        Rule::regex | Rule::regex_body => "quoted regular expression",
        Rule::field_comparison | Rule::type_comparison => "comparison",
        Rule::expr_group => "parenthesised expression",
        _ => "expression",
    }
}
