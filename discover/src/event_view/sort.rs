//! Sort directions and their URL encoding.
//!
//! `-field` is descending, a bare `field` is ascending.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKind {
    Asc,
    Desc,
}

impl SortKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKind::Asc => "asc",
            SortKind::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortKind::Asc => SortKind::Desc,
            SortKind::Desc => SortKind::Asc,
        }
    }
}

impl FromStr for SortKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortKind::Asc),
            "desc" => Ok(SortKind::Desc),
            other => Err(Error::InvalidSortKind(other.to_string())),
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort on a column alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub kind: SortKind,
}

impl Sort {
    pub fn new(field: impl Into<String>, kind: SortKind) -> Self {
        Self { field: field.into(), kind }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortKind::Desc)
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortKind::Asc)
    }
}

/// Parse one encoded sort. An empty string, or a lone `-`, is not a sort.
pub fn decode_sort(sort: &str) -> Option<Sort> {
    let sort = sort.trim();
    match sort.strip_prefix('-') {
        Some("") => None,
        Some(field) => Some(Sort::desc(field)),
        None if sort.is_empty() => None,
        None => Some(Sort::asc(sort)),
    }
}

/// Parse every encoded sort, skipping empty entries.
pub fn decode_sorts<S: AsRef<str>>(sorts: &[S]) -> Vec<Sort> {
    sorts.iter().filter_map(|s| decode_sort(s.as_ref())).collect()
}

pub fn encode_sort(sort: &Sort) -> String {
    match sort.kind {
        SortKind::Desc => format!("-{}", sort.field),
        SortKind::Asc => sort.field.clone(),
    }
}

pub fn encode_sorts(sorts: &[Sort]) -> Vec<String> {
    sorts.iter().map(encode_sort).collect()
}

/// Encode a direction given as text, rejecting anything but `asc`/`desc`.
pub fn encode_sort_with_kind(field: &str, kind: &str) -> Result<String> {
    let kind: SortKind = kind.parse()?;
    Ok(encode_sort(&Sort::new(field, kind)))
}

pub fn reverse_sort(sort: &Sort) -> Sort {
    Sort::new(sort.field.clone(), sort.kind.reversed())
}
