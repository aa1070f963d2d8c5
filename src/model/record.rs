//! One correspondence event, as published in the archive.
//!
//! The feed document is a JSON array whose field names are in the archive's
//! native script. That naming is a fixed external contract; the mapping to
//! Rust fields is total:
//!
//! | Feed field        | Rust field  | Type                  |
//! |-------------------|-------------|-----------------------|
//! | `Номер_в_издании` | `id`        | `LetterId` (u64)      |
//! | `Отправитель`     | `senders`   | `NameList`, non-empty |
//! | `Получатель`      | `receivers` | `NameList`, may be empty |
//! | `Год`             | `year`      | `Option<i32>`         |
//! | `Название`        | `title`     | `Option<String>`      |
//! | `Текст`           | `text`      | `Option<String>`      |
//! | `Дата`            | `date`      | `Option<String>`      |
//! | `Локация`         | `location`  | `Option<String>`      |
//! | `Источник`        | `source`    | `Option<String>`      |
//! | `Аннотация`       | `annotation`| `Option<String>`      |
//!
//! A scalar sender/receiver in the feed normalizes to a one-element list;
//! `null` or an absent receiver normalizes to an empty list ("no addressee").

use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

/// Opaque letter identifier ("number in publication").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LetterId(pub u64);

impl std::fmt::Display for LetterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LetterId {
    fn from(v: u64) -> Self {
        LetterId(v)
    }
}

/// An ordered list of entity names.
///
/// Letters are nearly always written by (and to) a single person, so the
/// one-element case stays inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameList(SmallVec<[String; 1]>);

impl NameList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Names joined for display ("А. С. Пушкин, Н. Н. Гончарова").
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl std::ops::Deref for NameList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a NameList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for NameList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        NameList(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for NameList {
    fn from(names: Vec<S>) -> Self {
        names.into_iter().collect()
    }
}

/// Accepts a scalar name, a list of names, or `null`.
impl<'de> Deserialize<'de> for NameList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        let raw = Option::<OneOrMany>::deserialize(deserializer)?;
        Ok(match raw {
            None => NameList::new(),
            Some(OneOrMany::One(name)) => std::iter::once(name).collect(),
            Some(OneOrMany::Many(names)) => names.into_iter().collect(),
        })
    }
}

/// One letter from the archive. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterRecord {
    #[serde(rename = "Номер_в_издании")]
    pub id: LetterId,

    #[serde(rename = "Отправитель", default)]
    pub senders: NameList,

    #[serde(rename = "Получатель", default)]
    pub receivers: NameList,

    #[serde(rename = "Год", default)]
    pub year: Option<i32>,

    #[serde(rename = "Название", default)]
    pub title: Option<String>,

    #[serde(rename = "Текст", default)]
    pub text: Option<String>,

    #[serde(rename = "Дата", default)]
    pub date: Option<String>,

    #[serde(rename = "Локация", default)]
    pub location: Option<String>,

    #[serde(rename = "Источник", default)]
    pub source: Option<String>,

    #[serde(rename = "Аннотация", default)]
    pub annotation: Option<String>,
}

impl LetterRecord {
    pub fn new(
        id: impl Into<LetterId>,
        senders: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            senders: senders.into_iter().collect(),
            receivers: NameList::new(),
            year: None,
            title: None,
            text: None,
            date: None,
            location: None,
            source: None,
            annotation: None,
        }
    }

    pub fn with_receivers(
        mut self,
        receivers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.receivers = receivers.into_iter().collect();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// "No addressee": the letter has no receiver side at all.
    pub fn has_no_receiver(&self) -> bool {
        self.receivers.is_empty()
    }
}
