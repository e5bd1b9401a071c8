// std imports
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

// third-party imports
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

// ---

/// Named string attribute of a playlist entry that can be matched by a query.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Field {
    Group,
    Title,
    Name,
    Url,
    Input,
    Caption,
}

impl Field {
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::iter().map(<&'static str>::from)
    }
}

// ---

/// Categorical classification of a playlist entry.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ItemType {
    #[default]
    Live,
    Vod,
    Series,
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Cow::<'de, str>::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(&s, &["live", "vod", "series"])
        })
    }
}

// ---

/// Read-only accessor to a candidate record.
///
/// A query never mutates the record. Returning `None` means the value is not
/// available, which makes the corresponding comparison evaluate to `false`.
pub trait Record {
    fn get(&self, field: Field) -> Option<Cow<'_, str>>;
    fn item_type(&self) -> Option<ItemType>;
}

impl<R: Record + ?Sized> Record for &R {
    #[inline]
    fn get(&self, field: Field) -> Option<Cow<'_, str>> {
        (**self).get(field)
    }

    #[inline]
    fn item_type(&self) -> Option<ItemType> {
        (**self).item_type()
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    #[inline]
    fn get(&self, field: Field) -> Option<Cow<'_, str>> {
        (**self).get(field)
    }

    #[inline]
    fn item_type(&self) -> Option<ItemType> {
        (**self).item_type()
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    #[inline]
    fn get(&self, field: Field) -> Option<Cow<'_, str>> {
        (**self).get(field)
    }

    #[inline]
    fn item_type(&self) -> Option<ItemType> {
        (**self).item_type()
    }
}

// ---

/// Playlist entry as exchanged in JSON lines.
///
/// Keys other than the known fields are kept in `extra`. Known fields that are
/// absent stay absent on output, a field set to `null` is dropped. A record
/// without `type` is treated as `live` but written back without it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, json::Value>,
}

impl PlaylistItem {
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type: Some(item_type),
            ..Default::default()
        }
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        *self.slot(field) = Some(value.into());
        self
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Group => &mut self.group,
            Field::Title => &mut self.title,
            Field::Name => &mut self.name,
            Field::Url => &mut self.url,
            Field::Input => &mut self.input,
            Field::Caption => &mut self.caption,
        }
    }
}

impl Record for PlaylistItem {
    fn get(&self, field: Field) -> Option<Cow<'_, str>> {
        let value = match field {
            Field::Group => &self.group,
            Field::Title => &self.title,
            Field::Name => &self.name,
            Field::Url => &self.url,
            Field::Input => &self.input,
            Field::Caption => &self.caption,
        };
        value.as_deref().map(Cow::Borrowed)
    }

    fn item_type(&self) -> Option<ItemType> {
        Some(self.item_type.unwrap_or_default())
    }
}

// ---

/// Tells whether records matching a query are kept or dropped.
#[derive(ValueEnum, Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FilterMode {
    #[default]
    Include,
    Discard,
}

impl FilterMode {
    #[inline]
    pub fn keep(self, matched: bool) -> bool {
        match self {
            Self::Include => matched,
            Self::Discard => !matched,
        }
    }
}

#[cfg(test)]
mod tests;
