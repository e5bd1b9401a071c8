//! Evaluation of compiled queries against records.

// std imports
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

// third-party imports
use once_cell::sync::OnceCell;
use regex::Regex;

// local imports
use crate::ast::{BoolOp, Expr, Pattern};
use crate::error::{EvaluationError, ParseError};
use crate::model::{FilterMode, Record};
use crate::query::Query;

// ---

/// Compiled regular expressions of a query keyed by their source text.
///
/// The set of keys is fixed when the owning query is built. Each entry is
/// compiled at most once, even when several threads race for it.
#[derive(Clone, Debug, Default)]
pub struct RegexCache {
    entries: HashMap<Arc<str>, OnceCell<Result<Regex, regex::Error>>>,
}

impl RegexCache {
    /// Creates a cache with an empty slot for every pattern of the expression.
    pub fn for_expr(expr: &Expr) -> Self {
        Self {
            entries: expr.patterns().map(|pattern| (pattern.shared(), OnceCell::new())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that were compiled successfully.
    pub fn compiled(&self) -> usize {
        self.entries.values().filter(|cell| matches!(cell.get(), Some(Ok(_)))).count()
    }

    /// Compiles the pattern right away, an invalid one is reported at `offset`.
    pub(crate) fn compile(&mut self, pattern: &Pattern, offset: usize) -> Result<(), ParseError> {
        if self.entries.contains_key(pattern.as_str()) {
            return Ok(());
        }

        let regex = Regex::new(pattern.as_str()).map_err(|source| ParseError::InvalidRegex {
            offset,
            pattern: pattern.shared(),
            source,
        })?;
        self.entries.insert(pattern.shared(), OnceCell::with_value(Ok(regex)));
        Ok(())
    }

    pub fn get(&self, pattern: &Pattern) -> Result<Cow<'_, Regex>, EvaluationError> {
        let invalid = |source: &regex::Error| EvaluationError::InvalidRegex {
            pattern: pattern.shared(),
            source: source.clone(),
        };

        match self.entries.get(pattern.as_str()) {
            Some(cell) => match cell.get_or_init(|| Regex::new(pattern.as_str())) {
                Ok(regex) => Ok(Cow::Borrowed(regex)),
                Err(err) => Err(invalid(err)),
            },
            None => Regex::new(pattern.as_str()).map(Cow::Owned).map_err(|err| invalid(&err)),
        }
    }

    pub(crate) fn merge(mut self, other: Self) -> Self {
        for (pattern, cell) in other.entries {
            self.entries.entry(pattern).or_insert(cell);
        }
        self
    }
}

// ---

/// Verdict for a single record together with the warnings raised on the way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
    pub matched: bool,
    pub warnings: Vec<EvaluationError>,
}

/// Warning sink used by [`Query::filter`] and [`Query::select`].
pub type LogWarning<T> = fn(&T, EvaluationError);

impl Query {
    /// Tells whether the record matches the query.
    ///
    /// Comparisons that cannot be evaluated do not match and are logged as warnings.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.matches_with(record, |warning| log::warn!("{}", warning))
    }

    /// Same as [`Query::matches`] but collects the warnings instead of logging them.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> Evaluation {
        let mut warnings = Vec::new();
        let matched = self.matches_with(record, |warning| warnings.push(warning));
        Evaluation { matched, warnings }
    }

    fn matches_with<R, F>(&self, record: &R, report: F) -> bool
    where
        R: Record + ?Sized,
        F: FnMut(EvaluationError),
    {
        Evaluator {
            regexes: self.regexes(),
            report,
        }
        .eval(self.expr(), record)
    }

    /// Lazily keeps the records matching the query, in their original order.
    pub fn filter<I>(&self, records: I) -> Matches<'_, I::IntoIter, LogWarning<I::Item>>
    where
        I: IntoIterator,
        I::Item: Record,
    {
        self.select(records, FilterMode::Include)
    }

    /// Lazily keeps or drops the matching records depending on `mode`.
    pub fn select<I>(&self, records: I, mode: FilterMode) -> Matches<'_, I::IntoIter, LogWarning<I::Item>>
    where
        I: IntoIterator,
        I::Item: Record,
    {
        self.select_with(records, mode, log_warning::<I::Item> as LogWarning<I::Item>)
    }

    /// Lazily keeps the matching records and hands every warning to `sink`.
    pub fn filter_with<I, F>(&self, records: I, sink: F) -> Matches<'_, I::IntoIter, F>
    where
        I: IntoIterator,
        I::Item: Record,
        F: FnMut(&I::Item, EvaluationError),
    {
        self.select_with(records, FilterMode::Include, sink)
    }

    pub fn select_with<I, F>(&self, records: I, mode: FilterMode, sink: F) -> Matches<'_, I::IntoIter, F>
    where
        I: IntoIterator,
        I::Item: Record,
        F: FnMut(&I::Item, EvaluationError),
    {
        Matches {
            query: self,
            records: records.into_iter(),
            mode,
            sink,
        }
    }
}

fn log_warning<T>(_: &T, warning: EvaluationError) {
    log::warn!("{}", warning);
}

// ---

/// Iterator over the records selected by a query.
#[derive(Clone)]
pub struct Matches<'q, I, F> {
    query: &'q Query,
    records: I,
    mode: FilterMode,
    sink: F,
}

impl<I, F> Iterator for Matches<'_, I, F>
where
    I: Iterator,
    I::Item: Record,
    F: FnMut(&I::Item, EvaluationError),
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let Self {
            query,
            records,
            mode,
            sink,
        } = self;

        records.find(|record| {
            let matched = query.matches_with(record, |warning| sink(record, warning));
            mode.keep(matched)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}

// ---

struct Evaluator<'q, F> {
    regexes: &'q RegexCache,
    report: F,
}

impl<F> Evaluator<'_, F>
where
    F: FnMut(EvaluationError),
{
    fn eval<R: Record + ?Sized>(&mut self, expr: &Expr, record: &R) -> bool {
        match expr {
            Expr::FieldComparison { field, pattern } => {
                let Some(value) = record.get(*field) else {
                    (self.report)(EvaluationError::FieldUnavailable { field: *field });
                    return false;
                };
                match self.regexes.get(pattern) {
                    Ok(regex) => regex.is_match(&value),
                    Err(err) => {
                        (self.report)(err);
                        false
                    }
                }
            }
            Expr::TypeComparison { value } => match record.item_type() {
                Some(item_type) => item_type == *value,
                None => {
                    (self.report)(EvaluationError::TypeUnavailable);
                    false
                }
            },
            Expr::Group { inner } => self.eval(inner, record),
            Expr::Not { inner } => !self.eval(inner, record),
            Expr::BoolExpr {
                op: BoolOp::And,
                left,
                right,
            } => self.eval(left, record) && self.eval(right, record),
            Expr::BoolExpr {
                op: BoolOp::Or,
                left,
                right,
            } => self.eval(left, record) || self.eval(right, record),
        }
    }
}
