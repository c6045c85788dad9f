//! Request payloads and URL state built from an event view.

use std::collections::BTreeMap;

use serde::Serialize;

use super::sort::{encode_sort, encode_sorts, Sort};
use super::{dedupe_strings, EventView};
use crate::config::{Config, DEFAULT_PER_PAGE, DEFAULT_STATS_PERIOD};
use crate::dates::DateTimeParams;
use crate::fields::{explode_field_string, get_calculated_field, Column};
use crate::location::{Location, Query, QueryValue};

/// Settings applied while building payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadOptions {
    pub per_page: u32,
    /// Window used when neither the view nor the location selects one.
    pub default_stats_period: Option<String>,
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            default_stats_period: Some(DEFAULT_STATS_PERIOD.to_string()),
        }
    }
}

impl From<&Config> for PayloadOptions {
    fn from(config: &Config) -> Self {
        Self {
            per_page: config.per_page,
            default_stats_period: Some(config.default_stats_period.clone())
                .filter(|p| !p.is_empty()),
        }
    }
}

/// Query parameters for the events endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventsPayload {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field: Vec<String>,
    /// One encoded sort, or a list when several survive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<QueryValue>,
    pub query: String,
    pub project: Vec<String>,
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(rename = "statsPeriod", skip_serializing_if = "Option::is_none")]
    pub stats_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl EventsPayload {
    /// Flatten into URL parameters.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        let lists = [
            ("field", &self.field),
            ("project", &self.project),
            ("environment", &self.environment),
        ];
        for (key, values) in lists {
            if !values.is_empty() {
                query.insert(key.to_string(), QueryValue::List(values.clone()));
            }
        }
        if let Some(team) = &self.team {
            query.insert("team".to_string(), QueryValue::List(team.clone()));
        }
        if let Some(sort) = &self.sort {
            query.insert("sort".to_string(), sort.clone());
        }
        query.insert("query".to_string(), QueryValue::from(self.query.as_str()));
        if let Some(per_page) = self.per_page {
            query.insert("per_page".to_string(), QueryValue::from(per_page.to_string()));
        }
        let scalars = [
            ("dataset", &self.dataset),
            ("start", &self.start),
            ("end", &self.end),
            ("statsPeriod", &self.stats_period),
            ("utc", &self.utc),
            ("cursor", &self.cursor),
        ];
        for (key, value) in scalars {
            if let Some(v) = value {
                query.insert(key.to_string(), QueryValue::from(v.as_str()));
            }
        }
        query
    }
}

/// Query parameters for the metrics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsPayload {
    pub field: Vec<String>,
    pub group_by: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub project: Vec<String>,
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc: Option<String>,
}

/// Datetime part of [`PageFilters`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageDateTime {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Relative period, empty when the window is absolute.
    pub period: String,
    pub utc: bool,
}

/// Project, environment and datetime selection of a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageFilters {
    pub projects: Vec<i64>,
    pub environments: Vec<String>,
    pub datetime: PageDateTime,
}

/// Field string a metrics request uses for a column, if it is a metric.
fn metric_field(raw: &str) -> Option<String> {
    match explode_field_string(raw, None) {
        Column::Function { .. } => Some(raw.to_string()),
        Column::CalculatedField { .. } => get_calculated_field(raw).map(str::to_string),
        _ => None,
    }
}

impl EventView {
    /// The datetime window a request should use.
    ///
    /// The view's own selection wins over the location's. A `utc` flag on
    /// the location wins over the view's.
    fn request_window(&self, location: &Location, default_period: Option<&str>) -> DateTimeParams {
        let from_location = DateTimeParams::from_query(&location.query);
        let own = self.date_time_params();
        let selection = if own.has_selection() {
            let utc = from_location.utc.clone().or_else(|| own.utc.clone());
            DateTimeParams { utc, ..own }
        } else {
            from_location
        };
        selection.normalize(default_period)
    }

    /// Events payload with default options.
    pub fn get_events_api_payload(
        &self,
        location: &Location,
        force_append_raw_query_string: Option<&str>,
    ) -> EventsPayload {
        self.get_events_api_payload_with(
            location,
            force_append_raw_query_string,
            &PayloadOptions::default(),
        )
    }

    /// Build the events endpoint parameters.
    ///
    /// `team` and `sort` are left out when empty so the server applies its
    /// own defaults.
    pub fn get_events_api_payload_with(
        &self,
        location: &Location,
        force_append_raw_query_string: Option<&str>,
        options: &PayloadOptions,
    ) -> EventsPayload {
        let window = self.request_window(location, options.default_stats_period.as_deref());

        let sort = match self.sorts() {
            [] => None,
            [single] => Some(QueryValue::from(encode_sort(single))),
            many => Some(QueryValue::List(encode_sorts(many))),
        };

        let mut query = self.get_query_with_additional_conditions();
        if let Some(raw) = force_append_raw_query_string.filter(|r| !r.trim().is_empty()) {
            if !query.is_empty() {
                query.push(' ');
            }
            query.push_str(raw);
        }

        EventsPayload {
            field: dedupe_strings(self.get_fields()),
            sort,
            query,
            project: self.project.iter().map(i64::to_string).collect(),
            environment: self.environment.clone(),
            team: Some(self.team.clone()).filter(|t| !t.is_empty()),
            per_page: Some(options.per_page),
            dataset: self.dataset.as_ref().map(|d| d.as_str().to_string()),
            start: window.start,
            end: window.end,
            stats_period: window.stats_period,
            utc: window.utc,
            cursor: location.decode_scalar("cursor"),
        }
    }

    /// Facets payload with default options.
    pub fn get_facets_api_payload(&self, location: &Location) -> EventsPayload {
        self.get_facets_api_payload_with(location, &PayloadOptions::default())
    }

    /// The events payload without paging, sorting or field selection.
    pub fn get_facets_api_payload_with(
        &self,
        location: &Location,
        options: &PayloadOptions,
    ) -> EventsPayload {
        EventsPayload {
            field: Vec::new(),
            sort: None,
            per_page: None,
            cursor: None,
            ..self.get_events_api_payload_with(location, None, options)
        }
    }

    /// Build the metrics endpoint parameters.
    ///
    /// Functions and calculated fields become `field`, plain fields become
    /// `groupBy`. The first sort becomes `orderBy` when it is on a metric.
    pub fn get_metrics_payload(
        &self,
        location: &Location,
        limit: Option<u32>,
        options: &PayloadOptions,
    ) -> MetricsPayload {
        let window = self.request_window(location, options.default_stats_period.as_deref());

        let mut field = Vec::new();
        let mut group_by = Vec::new();
        for f in self.fields() {
            match metric_field(&f.field) {
                Some(metric) => field.push(metric),
                None if matches!(explode_field_string(&f.field, None), Column::Field { .. }) => {
                    group_by.push(f.field.clone())
                }
                None => {}
            }
        }

        let order_by = self.sorts().first().and_then(|sort| {
            let target = self
                .fields()
                .iter()
                .find(|f| self.sort_for_field(f, None) == Some(sort))?;
            let metric = metric_field(&target.field)?;
            Some(encode_sort(&Sort::new(metric, sort.kind)))
        });

        MetricsPayload {
            field: dedupe_strings(field),
            group_by: dedupe_strings(group_by),
            order_by,
            limit,
            cursor: location.decode_scalar("cursor"),
            project: self.project.iter().map(i64::to_string).collect(),
            environment: self.environment.clone(),
            query: self.get_query_with_additional_conditions(),
            start: window.start,
            end: window.end,
            stats_period: window.stats_period,
            utc: window.utc,
        }
    }

    pub fn get_page_filters(&self) -> PageFilters {
        PageFilters {
            projects: self.project.clone(),
            environments: self.environment.clone(),
            datetime: PageDateTime {
                start: self.start.clone(),
                end: self.end.clone(),
                period: self.stats_period.clone().unwrap_or_default(),
                utc: self.utc.as_deref() == Some("true"),
            },
        }
    }

    /// URL parameters that reproduce this view.
    pub fn generate_query_string_object(&self) -> Query {
        let mut output = Query::new();
        let mut put = |key: &str, value: QueryValue| {
            output.insert(key.to_string(), value);
        };

        if let Some(id) = &self.id {
            put("id", QueryValue::from(id.as_str()));
        }
        if let Some(name) = &self.name {
            put("name", QueryValue::from(name.as_str()));
        }
        put("field", QueryValue::List(self.get_fields()));
        put("widths", QueryValue::List(self.get_widths().iter().map(i32::to_string).collect()));
        put("sort", QueryValue::List(encode_sorts(self.sorts())));
        put("environment", QueryValue::List(self.environment.clone()));
        put("project", QueryValue::List(self.project.iter().map(i64::to_string).collect()));
        put("query", QueryValue::from(self.query.as_str()));
        put(
            "yAxis",
            match self.y_axis.as_slice() {
                [] => QueryValue::from(self.get_y_axis()),
                [single] => QueryValue::from(single.as_str()),
                many => QueryValue::List(many.to_vec()),
            },
        );
        if !self.team.is_empty() {
            put("team", QueryValue::List(self.team.clone()));
        }
        let optional = [
            ("display", self.display.clone()),
            ("topEvents", self.top_events.clone()),
            ("interval", self.interval.clone()),
            ("dataset", self.dataset.as_ref().map(|d| d.as_str().to_string())),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                put(key, QueryValue::from(v));
            }
        }

        self.date_time_params().write_to(&mut output);
        output
    }

    /// Every key this view writes to the URL, set to `None`, for clearing
    /// the URL with [`Location::apply`].
    pub fn generate_blank_query_string_object(&self) -> BTreeMap<String, Option<QueryValue>> {
        [
            "id",
            "name",
            "field",
            "widths",
            "sort",
            "tag",
            "query",
            "yAxis",
            "display",
            "topEvents",
            "interval",
            "dataset",
            "team",
            "project",
            "environment",
            "start",
            "end",
            "statsPeriod",
            "utc",
            "cursor",
        ]
        .into_iter()
        .map(|key| (key.to_string(), None))
        .collect()
    }
}
