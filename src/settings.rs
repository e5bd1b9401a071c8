// std imports
use std::include_str;
use std::path::PathBuf;

// third-party imports
use config::{Config, File, FileFormat};
use serde::Deserialize;

// local imports
use crate::error::{Result, TemplateError};
use crate::model::FilterMode;
use crate::template::{PatternTemplate, Templates};

// ---

static DEFAULT_SETTINGS: &str = include_str!("../etc/defaults/config.yaml");

// ---

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub mode: FilterMode,
    #[serde(default)]
    pub templates: Vec<PatternTemplate>,
}

impl Settings {
    /// Loads the embedded defaults overridden by the given sources in order.
    pub fn load<I>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = Source>,
    {
        let mut builder = Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Yaml));
        for source in sources {
            match source {
                Source::File(file) => {
                    log::debug!("loading settings from {:?}", file.path);
                    builder = builder.add_source(File::from(file.path).required(file.required));
                }
                Source::Str(text, format) => {
                    builder = builder.add_source(File::from_str(&text, format));
                }
            }
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Resolves the configured templates.
    pub fn templates(&self) -> Result<Templates, TemplateError> {
        Templates::new(&self.templates)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}

// ---

/// Source of settings layered on top of the defaults.
#[derive(Debug, Clone)]
pub enum Source {
    File(SourceFile),
    Str(String, FileFormat),
}

impl From<SourceFile> for Source {
    fn from(file: SourceFile) -> Self {
        Self::File(file)
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub required: bool,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn required(self, required: bool) -> Self {
        Self { required, ..self }
    }
}
