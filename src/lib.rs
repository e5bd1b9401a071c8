//! Filter query engine for playlist and channel entries.
//!
//! A query selects records by regular expression matches on their fields and
//! by their type, combined with `and`, `or`, `not` and parentheses:
//!
//! ```
//! use plq::{ItemType, PlaylistItem, Query, model::Field};
//!
//! let query = Query::parse(r#"group ~ "^Sport" and not title ~ "(?i)replay""#).unwrap();
//!
//! let live = PlaylistItem::new(ItemType::Live)
//!     .with(Field::Group, "Sport HD")
//!     .with(Field::Title, "Match of the day");
//! assert!(query.matches(&live));
//!
//! let replay = live.clone().with(Field::Title, "Match of the day (Replay)");
//! assert!(!query.matches(&replay));
//! ```
//!
//! `and` and `or` have the same precedence and chain to the right, so
//! `a and b or c` means `a and (b or c)`.

// public modules
pub mod ast;
pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod query;
pub mod settings;
pub mod template;

// private modules
mod xerr;

// public uses
pub use ast::{BoolOp, Expr, Pattern};
pub use error::{Error, EvaluationError, ParseError, Result, TemplateError};
pub use evaluation::{Evaluation, Matches};
pub use model::{FilterMode, ItemType, PlaylistItem, Record};
pub use query::{Query, parse, parse_with_templates};
pub use settings::Settings;
pub use template::{PatternTemplate, Templates};
