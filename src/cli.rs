// std imports
use std::path::PathBuf;

// third-party imports
use clap::Parser;

// local imports
use crate::model::FilterMode;

// ---

/// Filters playlist entries given as JSON lines with a query.
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Opt {
    /// Configuration file path, may be specified multiple times, later files override earlier ones.
    /// Use '-' to discard the files given before it together with the user configuration file.
    #[arg(long, short = 'c', value_name = "FILE", env = "PLQ_CONFIG", num_args = 1)]
    pub config: Vec<PathBuf>,

    /// Keep (include) or drop (discard) the entries matching the query [default: from configuration].
    #[arg(long, short = 'm', env = "PLQ_MODE", ignore_case = true, overrides_with = "mode")]
    #[arg(value_enum)]
    pub mode: Option<FilterMode>,

    /// Print the query in canonical form and exit.
    #[arg(long)]
    pub explain: bool,

    /// Query, e.g. 'group ~ "^News" and not type = vod', templates are referenced as !name!.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Files to process, use '-' or omit to read from standard input.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Opt {
    /// Configuration files to load and whether the user configuration file is skipped.
    ///
    /// An empty or `-` entry drops everything given before it including the user
    /// configuration file.
    pub fn configs(&self) -> (&[PathBuf], bool) {
        let (offset, no_default) = self
            .config
            .iter()
            .rposition(|x| x.as_os_str().is_empty() || x.as_os_str() == "-")
            .map(|x| (x + 1, true))
            .unwrap_or_default();
        (&self.config[offset..], no_default)
    }
}
