//! Wire types for the page endpoint

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// Identifying key of a record. Endpoints hand out either numeric or string ids.
///
/// Numbers keep their JSON value, so ids beyond `i64` and fractional ids
/// decode too. A float with no fractional part is stored as the equal integer
/// so that `10` and `10.0` name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordKey {
    Number(Number),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireKey {
    Number(Number),
    Text(String),
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match WireKey::deserialize(deserializer)? {
            WireKey::Number(n) => RecordKey::Number(integral(n)),
            WireKey::Text(s) => RecordKey::Text(s),
        })
    }
}

fn integral(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => Number::from(f as i64),
        _ => n,
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Number(n) => write!(f, "{}", n),
            RecordKey::Text(s) => f.write_str(s),
        }
    }
}

/// A single row as served by the endpoint.
///
/// Only `id`, `mainCatName` and `sequence` are read; everything else is carried
/// along untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordKey,

    #[serde(default)]
    pub main_cat_name: Option<String>,

    #[serde(default)]
    pub sequence: Option<Number>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    #[cfg(test)]
    pub fn new(id: i64, name: &str, sequence: i64) -> Self {
        Self {
            id: RecordKey::Number(Number::from(id)),
            main_cat_name: Some(name.to_string()),
            sequence: Some(Number::from(sequence)),
            extra: Map::new(),
        }
    }

    /// Text for the "Category Name" column
    pub fn display_name(&self) -> &str {
        self.main_cat_name.as_deref().unwrap_or("")
    }

    /// Text for the "Sequence" column; empty when the record has none
    pub fn display_sequence(&self) -> String {
        self.sequence
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_default()
    }
}

/// Sort direction sent with every page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}', expected asc or desc", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// JSON body of a page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: u32,
    pub page_size: u32,
    pub order_by: String,
    pub direction: SortDirection,
}

/// JSON body of a page response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub main_categories: Vec<Record>,
}
