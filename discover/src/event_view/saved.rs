//! Saved queries: the persisted shape of an event view.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::sort::{decode_sorts, encode_sorts};
use super::{dedupe_strings, fields_with_widths, parse_projects, EventView, EventViewProps};
use crate::dates::DateTimeParams;
use crate::location::{Location, QueryValue};
use crate::Result;

/// Backend data source a query runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscoverDataset {
    #[default]
    Discover,
    Errors,
    Transactions,
    Metrics,
    MetricsEnhanced,
    SpansIndexed,
    SpansMetrics,
    /// A dataset this crate does not know by name; passed through as is.
    Other(String),
}

impl DiscoverDataset {
    pub fn as_str(&self) -> &str {
        match self {
            DiscoverDataset::Discover => "discover",
            DiscoverDataset::Errors => "errors",
            DiscoverDataset::Transactions => "transactions",
            DiscoverDataset::Metrics => "metrics",
            DiscoverDataset::MetricsEnhanced => "metricsEnhanced",
            DiscoverDataset::SpansIndexed => "spansIndexed",
            DiscoverDataset::SpansMetrics => "spansMetrics",
            DiscoverDataset::Other(name) => name,
        }
    }
}

impl From<String> for DiscoverDataset {
    fn from(name: String) -> Self {
        match name.as_str() {
            "discover" => DiscoverDataset::Discover,
            "errors" => DiscoverDataset::Errors,
            "transactions" => DiscoverDataset::Transactions,
            "metrics" => DiscoverDataset::Metrics,
            "metricsEnhanced" => DiscoverDataset::MetricsEnhanced,
            "spansIndexed" => DiscoverDataset::SpansIndexed,
            "spansMetrics" => DiscoverDataset::SpansMetrics,
            _ => DiscoverDataset::Other(name),
        }
    }
}

impl From<DiscoverDataset> for String {
    fn from(dataset: DiscoverDataset) -> Self {
        dataset.as_str().to_string()
    }
}

impl fmt::Display for DiscoverDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Saved query ids arrive as strings or as bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    String(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::String(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

/// A saved (or about to be saved) discover query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    #[serde(default, deserialize_with = "deserialize_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub widths: Vec<String>,
    #[serde(default)]
    pub projects: Vec<i64>,
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Relative period, e.g. `14d`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// `true`/`false`, as a boolean or a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc: Option<serde_json::Value>,
    /// Encoded sort, or a list of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<QueryValue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<QueryValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_events: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DiscoverDataset>,
}

impl SavedQuery {
    /// Load a saved query from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn utc_string(&self) -> Option<String> {
        match self.utc.as_ref()? {
            serde_json::Value::Bool(b) => Some(b.to_string()),
            serde_json::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl EventView {
    pub fn from_saved_query(saved: &SavedQuery) -> Self {
        let datetime = DateTimeParams {
            start: saved.start.clone(),
            end: saved.end.clone(),
            stats_period: saved.range.clone(),
            utc: saved.utc_string(),
        }
        .normalize(None);

        Self::new(EventViewProps {
            id: saved.id.clone(),
            name: Some(saved.name.clone()),
            fields: fields_with_widths(&saved.fields, &saved.widths),
            sorts: saved
                .orderby
                .as_ref()
                .map(|orderby| decode_sorts(&orderby.to_list()))
                .unwrap_or_default(),
            query: saved.query.clone(),
            team: saved.teams.clone(),
            project: saved.projects.clone(),
            start: datetime.start,
            end: datetime.end,
            stats_period: datetime.stats_period,
            utc: datetime.utc,
            environment: dedupe_strings(saved.environment.iter().cloned()),
            y_axis: saved
                .y_axis
                .as_ref()
                .map(|y| dedupe_strings(y.to_list()))
                .unwrap_or_default(),
            display: saved.display.clone(),
            top_events: saved.top_events.clone(),
            interval: saved.interval.clone(),
            expired: saved.expired,
            created_by: saved.created_by.clone(),
            dataset: saved.dataset.clone(),
            ..EventViewProps::default()
        })
    }

    /// A saved query whose missing project, environment and datetime
    /// selection are taken from the location.
    pub fn from_new_query_with_location(new_query: &SavedQuery, location: &Location) -> Self {
        let mut saved = new_query.clone();
        if saved.environment.is_empty() {
            saved.environment = dedupe_strings(location.decode_list("environment"));
        }
        if saved.projects.is_empty() {
            saved.projects = parse_projects(&location.decode_list("project"));
        }
        saved.start = saved.start.or_else(|| location.decode_scalar("start"));
        saved.end = saved.end.or_else(|| location.decode_scalar("end"));
        saved.range = saved.range.or_else(|| location.decode_scalar("statsPeriod"));
        Self::from_saved_query(&saved)
    }

    /// The saved-query shape of this view.
    pub fn to_new_query(&self) -> SavedQuery {
        let y_axis = match self.y_axis.as_slice() {
            [] => None,
            [single] => Some(QueryValue::from(single.as_str())),
            many => Some(QueryValue::List(many.to_vec())),
        };
        SavedQuery {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_default(),
            version: Some(2),
            fields: self.get_fields(),
            widths: self.get_widths().iter().map(i32::to_string).collect(),
            projects: self.project.clone(),
            environment: self.environment.clone(),
            teams: self.team.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            range: self.stats_period.clone(),
            utc: self.utc.clone().map(serde_json::Value::String),
            orderby: encode_sorts(self.sorts()).into_iter().next().map(QueryValue::from),
            query: self.query.clone(),
            y_axis,
            display: self.display.clone(),
            top_events: self.top_events.clone(),
            interval: self.interval.clone(),
            created_by: None,
            expired: None,
            dataset: self.dataset.clone(),
        }
    }
}
