// std imports
use std::path::{Path, PathBuf};

// third-party imports
use once_cell::sync::Lazy;

// local imports
use crate::error::Result;
use crate::settings::{Settings, Source, SourceFile};

// ---

pub const APP_NAME: &str = "plq";

static DEFAULT: Lazy<Settings> = Lazy::new(Settings::default);

/// Returns the built-in settings.
pub fn default() -> &'static Settings {
    &DEFAULT
}

/// Path of the user configuration file, if the platform has a configuration directory.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.yaml"))
}

/// Prepares loading of settings from the given files instead of the default one.
///
/// Without any files the default user configuration file is loaded if it exists.
pub fn at<I, P>(paths: I) -> Loader
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    Loader::new(paths.into_iter().map(|path| path.as_ref().to_path_buf()).collect())
}

// ---

pub struct Loader {
    paths: Vec<PathBuf>,
    no_default: bool,
}

impl Loader {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            no_default: false,
        }
    }

    /// Skips the user configuration file even if no explicit files are given.
    pub fn no_default(self, no_default: bool) -> Self {
        Self { no_default, ..self }
    }

    pub fn load(self) -> Result<Settings> {
        if self.no_default && self.paths.is_empty() {
            return Ok(default().clone());
        }

        if !self.paths.is_empty() {
            return Settings::load(self.paths.into_iter().map(|path| Source::from(SourceFile::new(path))));
        }

        Settings::load(default_path().map(|path| Source::from(SourceFile::new(path).required(false))))
    }
}
