//! The event view: the complete state of a discover query.
//!
//! An [`EventView`] holds the selected fields, sorts, search query, project
//! scoping, datetime window and chart settings. It is built from a URL
//! ([`EventView::from_location`]) or a saved query
//! ([`EventView::from_saved_query`]) and turned into API payloads.
//!
//! Every `with_*` method takes `&self` and returns a new view; nothing is
//! modified in place.
//!
//! # Sort keys
//!
//! Sorts refer to columns by key, not by raw field string: functions use
//! their aggregate alias (`count()` sorts as `count`) and the n-th equation
//! of the field list sorts as `equation[n]`. A sort whose key matches no
//! sortable field is dropped at construction.

mod display;
mod payload;
mod saved;
mod sort;

use crate::config::DEFAULT_STATS_PERIOD;
use crate::dates::{parse_date, DateTimeParams};
use crate::fields::{
    column_type, explode_field, explode_field_string, field_alignment, find_aggregation,
    generate_field_as_string, get_equation_alias, get_sort_key_from_field, is_aggregate_equation,
    is_aggregate_field, is_equation, is_legal_y_axis_type, Alignment, Column, ColumnType, Field,
    MetaType, COL_WIDTH_UNDEFINED,
};
use crate::location::Location;
use crate::search::MutableSearch;

pub use display::{
    resolve_display_mode, DisplayFallbacks, DisplayMode, DisplayOption, MAX_DISPLAY_FALLBACK_STEPS,
};
pub use payload::{EventsPayload, MetricsPayload, PageDateTime, PageFilters, PayloadOptions};
pub use saved::{DiscoverDataset, SavedQuery};
pub use sort::{
    decode_sort, decode_sorts, encode_sort, encode_sort_with_kind, encode_sorts, reverse_sort,
    Sort, SortKind,
};

/// Y-axis used when a view does not configure one.
pub const DEFAULT_Y_AXIS: &str = "count()";

/// Number of series in top-N display modes.
pub const TOP_N: &str = "5";

/// Always offered as y-axis choices, after the view's own aggregates.
const Y_AXIS_FALLBACKS: [&str; 2] = ["count()", "count_unique(user)"];

/// Aggregates that produce a single value per group and cannot be charted.
const NON_CHARTABLE_FIELDS: [&str; 2] = ["last_seen()", "latest_event()"];

/// Inputs for [`EventView::new`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventViewProps {
    pub id: Option<String>,
    pub name: Option<String>,
    pub fields: Vec<Field>,
    pub sorts: Vec<Sort>,
    pub query: String,
    pub team: Vec<String>,
    pub project: Vec<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub stats_period: Option<String>,
    pub utc: Option<String>,
    pub environment: Vec<String>,
    pub y_axis: Vec<String>,
    pub display: Option<String>,
    pub top_events: Option<String>,
    pub interval: Option<String>,
    pub expired: Option<bool>,
    pub created_by: Option<serde_json::Value>,
    pub additional_conditions: MutableSearch,
    pub dataset: Option<DiscoverDataset>,
}

/// Keys compared by [`EventView::is_equal_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventViewKey {
    Id,
    Name,
    Query,
    StatsPeriod,
    Fields,
    Sorts,
    Project,
    Environment,
    Interval,
    YAxis,
    Display,
    TopEvents,
    Dataset,
    Start,
    End,
}

impl EventViewKey {
    pub const ALL: [EventViewKey; 15] = [
        EventViewKey::Id,
        EventViewKey::Name,
        EventViewKey::Query,
        EventViewKey::StatsPeriod,
        EventViewKey::Fields,
        EventViewKey::Sorts,
        EventViewKey::Project,
        EventViewKey::Environment,
        EventViewKey::Interval,
        EventViewKey::YAxis,
        EventViewKey::Display,
        EventViewKey::TopEvents,
        EventViewKey::Dataset,
        EventViewKey::Start,
        EventViewKey::End,
    ];
}

/// A rendered table column.
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    /// Raw field string.
    pub key: String,
    /// Display name: the alias when set, else the raw field.
    pub name: String,
    pub column: Column,
    pub column_type: ColumnType,
    pub alignment: Alignment,
    pub is_sortable: bool,
    pub width: i32,
}

/// Complete state of a discover query.
#[derive(Debug, Clone, PartialEq)]
pub struct EventView {
    pub id: Option<String>,
    pub name: Option<String>,
    fields: Vec<Field>,
    sorts: Vec<Sort>,
    pub query: String,
    pub team: Vec<String>,
    pub project: Vec<i64>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub stats_period: Option<String>,
    pub utc: Option<String>,
    pub environment: Vec<String>,
    pub y_axis: Vec<String>,
    pub display: Option<String>,
    pub top_events: Option<String>,
    pub interval: Option<String>,
    pub expired: Option<bool>,
    pub created_by: Option<serde_json::Value>,
    /// Merged into the query at request time, never stored in `query`.
    pub additional_conditions: MutableSearch,
    pub dataset: Option<DiscoverDataset>,
}

impl Default for EventView {
    fn default() -> Self {
        Self::new(EventViewProps::default())
    }
}

/// Sort key of each field, `None` where the field cannot be sorted.
fn sort_keys(
    fields: &[Field],
    meta: Option<&MetaType>,
    use_function_format: bool,
) -> Vec<Option<String>> {
    let mut equations = 0;
    fields
        .iter()
        .map(|field| {
            if is_equation(&field.field) {
                let alias = get_equation_alias(equations);
                equations += 1;
                Some(alias)
            } else {
                get_sort_key_from_field(&field.field, meta, use_function_format)
            }
        })
        .collect()
}

/// Re-key sorts after a field list change.
///
/// `index_map` maps a position in the old list to its position in the new
/// one, or `None` for a position that no longer carries the same field. A
/// sort that cannot be re-keyed comes back as `None`.
fn rekey_sorts(
    sorts: &[Sort],
    old_keys: &[Option<String>],
    new_keys: &[Option<String>],
    index_map: impl Fn(usize) -> Option<usize>,
) -> Vec<Option<Sort>> {
    sorts
        .iter()
        .map(|sort| {
            old_keys
                .iter()
                .enumerate()
                .filter(|(_, key)| key.as_deref() == Some(sort.field.as_str()))
                .find_map(|(i, _)| index_map(i))
                .and_then(|j| new_keys.get(j).cloned().flatten())
                .map(|key| Sort::new(key, sort.kind))
        })
        .collect()
}

fn dedupe_sorts(sorts: impl IntoIterator<Item = Sort>) -> Vec<Sort> {
    let mut out: Vec<Sort> = Vec::new();
    for sort in sorts {
        if !out.contains(&sort) {
            out.push(sort);
        }
    }
    out
}

/// Descending sort on the first sortable key.
fn default_sort(keys: &[Option<String>]) -> Option<Sort> {
    keys.iter().flatten().next().map(|key| Sort::desc(key.clone()))
}

fn dedupe_strings(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Parse a width, treating anything unparseable as automatic.
fn parse_width(width: Option<&str>) -> i32 {
    width
        .and_then(|w| w.trim().parse::<i32>().ok())
        .unwrap_or(COL_WIDTH_UNDEFINED)
}

/// Pair field strings with their widths, dropping empty fields.
fn fields_with_widths(fields: &[String], widths: &[String]) -> Vec<Field> {
    fields
        .iter()
        .enumerate()
        .filter(|(_, field)| !field.is_empty())
        .map(|(i, field)| {
            Field::with_width(field.clone(), parse_width(widths.get(i).map(String::as_str)))
        })
        .collect()
}

fn parse_projects(values: &[String]) -> Vec<i64> {
    values.iter().filter_map(|v| v.trim().parse().ok()).collect()
}

/// Equality of two optional dates as instants. Dates are only compared
/// when both sides are set; unparseable dates compare as strings.
fn dates_equal(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => match (parse_date(a), parse_date(b)) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => true,
    }
}

impl EventView {
    /// Build a view, keeping at most one sort: the first whose key matches
    /// a sortable field.
    pub fn new(props: EventViewProps) -> Self {
        let keys = sort_keys(&props.fields, None, false);
        let sort = props
            .sorts
            .iter()
            .find(|sort| keys.iter().flatten().any(|key| *key == sort.field))
            .cloned();
        if props.sorts.len() > usize::from(sort.is_some()) {
            tracing::debug!(
                requested = props.sorts.len(),
                kept = usize::from(sort.is_some()),
                "pruned sorts that do not match a field"
            );
        }

        Self {
            id: props.id,
            name: props.name,
            fields: props.fields,
            sorts: sort.into_iter().collect(),
            query: props.query,
            team: props.team,
            project: props.project,
            start: props.start,
            end: props.end,
            stats_period: props.stats_period,
            utc: props.utc,
            environment: props.environment,
            y_axis: props.y_axis,
            display: props.display,
            top_events: props.top_events,
            interval: props.interval,
            expired: props.expired,
            created_by: props.created_by,
            additional_conditions: props.additional_conditions,
            dataset: props.dataset,
        }
    }

    /// Build a view from URL parameters.
    pub fn from_location(location: &Location) -> Self {
        let datetime = DateTimeParams::from_query(&location.query).normalize(None);
        Self::new(EventViewProps {
            id: location.decode_scalar("id"),
            name: location.decode_scalar("name"),
            fields: fields_with_widths(
                &location.decode_list("field"),
                &location.decode_list("widths"),
            ),
            sorts: decode_sorts(&location.decode_list("sort")),
            query: location.decode_scalar("query").unwrap_or_default().trim().to_string(),
            team: dedupe_strings(location.decode_list("team")),
            project: parse_projects(&location.decode_list("project")),
            start: datetime.start,
            end: datetime.end,
            stats_period: datetime.stats_period,
            utc: datetime.utc,
            environment: dedupe_strings(location.decode_list("environment")),
            y_axis: dedupe_strings(location.decode_list("yAxis")),
            display: location.decode_scalar("display"),
            top_events: location.decode_scalar("topEvents"),
            interval: location.decode_scalar("interval"),
            dataset: location.decode_scalar("dataset").map(DiscoverDataset::from),
            ..EventViewProps::default()
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    /// Raw field strings.
    pub fn get_fields(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.field.clone()).collect()
    }

    pub fn get_widths(&self) -> Vec<i32> {
        self.fields.iter().map(|f| f.width).collect()
    }

    pub fn get_equations(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| is_equation(&f.field))
            .map(|f| f.field.clone())
            .collect()
    }

    /// Functions and equations that reference functions.
    pub fn get_aggregate_fields(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| is_aggregate_field(&f.field) || is_aggregate_equation(&f.field))
            .collect()
    }

    pub fn has_aggregate_field(&self) -> bool {
        !self.get_aggregate_fields().is_empty()
    }

    pub fn has_id_field(&self) -> bool {
        self.fields.iter().any(|f| f.field == "id")
    }

    pub fn num_of_columns(&self) -> usize {
        self.fields.len()
    }

    /// A view needs at least one field to be queried.
    pub fn is_valid(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Column descriptors for a table renderer.
    pub fn get_columns(&self, meta: Option<&MetaType>) -> Vec<TableColumn> {
        let keys = sort_keys(&self.fields, meta, false);
        self.fields
            .iter()
            .zip(keys)
            .map(|(field, key)| {
                let column = explode_field(field);
                let ty = column_type(&column, meta);
                TableColumn {
                    key: field.field.clone(),
                    name: field.alias.clone().unwrap_or_else(|| field.field.clone()),
                    column,
                    column_type: ty,
                    alignment: field_alignment(ty),
                    is_sortable: key.is_some(),
                    width: field.width,
                }
            })
            .collect()
    }

    /// The view's own datetime window, as stored.
    pub fn date_time_params(&self) -> DateTimeParams {
        DateTimeParams {
            start: self.start.clone(),
            end: self.end.clone(),
            stats_period: self.stats_period.clone(),
            utc: self.utc.clone(),
        }
    }

    /// Length of the window in days, assuming the default period when the
    /// view has no window.
    pub fn get_days(&self) -> f64 {
        self.date_time_params().normalize(Some(DEFAULT_STATS_PERIOD)).days()
    }

    /// The search query with additional conditions merged in.
    ///
    /// Only values not already present for a key are added.
    pub fn get_query_with_additional_conditions(&self) -> String {
        if self.additional_conditions.is_empty() {
            return self.query.clone();
        }

        let mut conditions = MutableSearch::new(&self.query);
        for (key, values) in self.additional_conditions.filters() {
            let existing = conditions.get_filter_values(&key);
            let new_values: Vec<&String> =
                values.iter().filter(|v| !existing.contains(v)).collect();
            if !new_values.is_empty() {
                conditions.add_filter_values(&key, &new_values, false);
            }
        }
        conditions.format_string()
    }

    /// Sort key for a field of this view. Equations are keyed by their
    /// position among the view's equations.
    fn sort_key_for(
        &self,
        field: &Field,
        meta: Option<&MetaType>,
        use_function_format: bool,
    ) -> Option<String> {
        if !is_equation(&field.field) {
            return get_sort_key_from_field(&field.field, meta, use_function_format);
        }
        let mut equations = 0;
        for f in &self.fields {
            if f.field == field.field {
                return Some(get_equation_alias(equations));
            }
            if is_equation(&f.field) {
                equations += 1;
            }
        }
        None
    }

    /// The sort applied to `field`, if any.
    pub fn sort_for_field(&self, field: &Field, meta: Option<&MetaType>) -> Option<&Sort> {
        let keys = [
            self.sort_key_for(field, meta, false),
            self.sort_key_for(field, meta, true),
        ];
        self.sorts
            .iter()
            .find(|sort| keys.iter().flatten().any(|key| *key == sort.field))
    }

    pub fn is_field_sorted(&self, field: &Field, meta: Option<&MetaType>) -> bool {
        self.sort_for_field(field, meta).is_some()
    }

    /// Replace the sorts, keeping only those that match a field.
    pub fn with_sorts(&self, sorts: Vec<Sort>) -> Self {
        let keys = sort_keys(&self.fields, None, false);
        let mut view = self.clone();
        view.sorts = sorts
            .into_iter()
            .filter(|sort| keys.iter().flatten().any(|key| *key == sort.field))
            .collect();
        view
    }

    /// Rebuild the field list from columns.
    ///
    /// Columns without an expression are skipped. A field keeps its width
    /// only if the same field sat at the same position before. Sorts on
    /// removed fields are dropped; if none remain, the first sortable field
    /// is sorted descending.
    pub fn with_columns(&self, columns: &[Column]) -> Self {
        let fields: Vec<Field> = columns
            .iter()
            .filter(|column| column.is_usable())
            .enumerate()
            .map(|(i, column)| {
                let field = generate_field_as_string(column);
                let width = match self.fields.get(i) {
                    Some(existing) if existing.field == field => existing.width,
                    _ => COL_WIDTH_UNDEFINED,
                };
                Field {
                    field,
                    alias: column.alias().map(str::to_string),
                    width,
                }
            })
            .collect();

        let keys = sort_keys(&fields, None, false);
        let mut sorts: Vec<Sort> = self
            .sorts
            .iter()
            .filter(|sort| keys.iter().flatten().any(|key| *key == sort.field))
            .cloned()
            .collect();
        if sorts.is_empty() {
            sorts.extend(default_sort(&keys));
        }

        let mut view = self.clone();
        view.fields = fields;
        view.sorts = sorts;
        view
    }

    /// Append a column with automatic width.
    pub fn with_new_column(&self, column: &Column) -> Self {
        let mut view = self.clone();
        if !column.is_usable() {
            return view;
        }
        view.fields.push(Field {
            field: generate_field_as_string(column),
            alias: column.alias().map(str::to_string),
            width: COL_WIDTH_UNDEFINED,
        });
        view
    }

    pub fn with_resized_column(&self, index: usize, width: i32) -> Self {
        let mut view = self.clone();
        if let Some(field) = view.fields.get_mut(index) {
            if field.width != width {
                field.width = width;
            }
        }
        view
    }

    /// Replace the column at `index`.
    ///
    /// A sort on the replaced column moves to the new column, keeping its
    /// direction, unless another column still carries the old key. If the
    /// new column cannot be sorted the sort is dropped, and when no sort is
    /// left the first sortable field is used.
    pub fn with_updated_column(
        &self,
        index: usize,
        column: &Column,
        meta: Option<&MetaType>,
    ) -> Self {
        let Some(current) = self.fields.get(index) else {
            return self.clone();
        };
        let field = generate_field_as_string(column);
        if current.field == field {
            return self.clone();
        }

        let mut view = self.clone();
        view.fields[index] = Field {
            field,
            alias: column.alias().map(str::to_string),
            width: COL_WIDTH_UNDEFINED,
        };

        let old_keys = sort_keys(&self.fields, meta, false);
        let new_keys = sort_keys(&view.fields, meta, false);
        let needle = old_keys[index]
            .as_ref()
            .and_then(|key| self.sorts.iter().position(|sort| sort.field == *key));

        let mut sorts =
            rekey_sorts(&self.sorts, &old_keys, &new_keys, |i| (i != index).then_some(i));
        if let Some(n) = needle {
            let needle_sort = &self.sorts[n];
            let columns_with_key = old_keys
                .iter()
                .filter(|key| key.as_deref() == Some(needle_sort.field.as_str()))
                .count();
            if columns_with_key <= 1 {
                sorts[n] = new_keys[index].clone().map(|key| Sort::new(key, needle_sort.kind));
            }
        }
        view.sorts = dedupe_sorts(sorts.into_iter().flatten());

        if let Some(n) = needle {
            if view.sorts.is_empty() && !view.fields.is_empty() {
                let kind = self.sorts[n].kind;
                view.sorts = match &new_keys[index] {
                    Some(key) => vec![Sort::new(key.clone(), kind)],
                    None => default_sort(&new_keys).into_iter().collect(),
                };
            }
        }
        view
    }

    /// Remove the column at `index`.
    ///
    /// The last remaining column and out of range indexes are left alone.
    /// At least one column keeps automatic width afterwards.
    pub fn with_deleted_column(&self, index: usize, meta: Option<&MetaType>) -> Self {
        if self.fields.len() <= 1 || index >= self.fields.len() {
            return self.clone();
        }

        let mut view = self.clone();
        view.fields.remove(index);
        if !view.fields.iter().any(|f| f.width == COL_WIDTH_UNDEFINED) {
            view.fields[0].width = COL_WIDTH_UNDEFINED;
        }

        let old_keys = sort_keys(&self.fields, meta, false);
        let new_keys = sort_keys(&view.fields, meta, false);
        let needle = old_keys[index]
            .as_ref()
            .and_then(|key| self.sorts.iter().position(|sort| sort.field == *key));

        let sorts = rekey_sorts(&self.sorts, &old_keys, &new_keys, |i| match i.cmp(&index) {
            std::cmp::Ordering::Less => Some(i),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(i - 1),
        });
        view.sorts = dedupe_sorts(sorts.into_iter().flatten());

        if needle.is_some() && view.sorts.is_empty() {
            view.sorts = default_sort(&new_keys).into_iter().collect();
        }
        view
    }

    pub fn with_teams(&self, teams: Vec<String>) -> Self {
        let mut view = self.clone();
        view.team = teams;
        view
    }

    pub fn with_query(&self, query: impl Into<String>) -> Self {
        let mut view = self.clone();
        view.query = query.into();
        view
    }

    pub fn with_additional_conditions(&self, conditions: MutableSearch) -> Self {
        let mut view = self.clone();
        view.additional_conditions = conditions;
        view
    }

    /// Sort on `field`.
    ///
    /// If the field is already sorted, applies `kind` or reverses the
    /// current direction. Otherwise the field becomes the only sort,
    /// descending unless `kind` says otherwise. Unsortable fields leave the
    /// view unchanged.
    pub fn sort_on_field(
        &self,
        field: &Field,
        meta: Option<&MetaType>,
        kind: Option<SortKind>,
        use_function_format: bool,
    ) -> Self {
        let Some(key) = self.sort_key_for(field, meta, use_function_format) else {
            return self.clone();
        };

        let mut view = self.clone();
        let position = self
            .sort_for_field(field, meta)
            .and_then(|current| self.sorts.iter().position(|s| s == current));
        match position {
            Some(i) => {
                let sort = &mut view.sorts[i];
                sort.kind = kind.unwrap_or(sort.kind.reversed());
            }
            None => {
                view.sorts = vec![Sort::new(key, kind.unwrap_or(SortKind::Desc))];
            }
        }
        view
    }

    /// Chartable y-axis values: the view's aggregates followed by the fixed
    /// fallbacks, without duplicates.
    pub fn get_y_axis_options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for field in &self.fields {
            let raw = field.field.as_str();
            if NON_CHARTABLE_FIELDS.contains(&raw) {
                continue;
            }
            let column = explode_field_string(raw, None);
            let chartable = match &column {
                Column::Equation { .. } => is_aggregate_equation(raw),
                Column::Function { call, .. } => {
                    find_aggregation(&call.name).map_or(true, |agg| agg.chartable)
                        && is_legal_y_axis_type(column_type(&column, None))
                }
                _ => false,
            };
            if chartable && !options.iter().any(|o| o == raw) {
                options.push(raw.to_string());
            }
        }
        for fallback in Y_AXIS_FALLBACKS {
            if !options.iter().any(|o| o == fallback) {
                options.push(fallback.to_string());
            }
        }
        options
    }

    /// The configured y-axis if it is a valid option, else the first option.
    pub fn get_y_axis(&self) -> String {
        let options = self.get_y_axis_options();
        let fallback = options.first().cloned().unwrap_or_else(|| DEFAULT_Y_AXIS.to_string());
        match self.y_axis.first() {
            Some(y_axis) if options.contains(y_axis) => y_axis.clone(),
            _ => fallback,
        }
    }

    /// Every display mode, with those the view cannot render disabled.
    pub fn get_display_options(&self) -> Vec<DisplayOption> {
        let absolute = self.start.is_some() || self.end.is_some();
        let aggregates = self.has_aggregate_field();
        let short = self.get_days() < 1.0;
        DisplayMode::ALL
            .into_iter()
            .map(|mode| DisplayOption {
                mode,
                disabled: match mode {
                    DisplayMode::Previous => absolute,
                    DisplayMode::Top5 => !aggregates,
                    DisplayMode::Daily => short,
                    DisplayMode::DailyTop5 => !aggregates || short,
                    DisplayMode::Default | DisplayMode::Bar => false,
                },
            })
            .collect()
    }

    pub fn get_display_mode(&self) -> DisplayMode {
        self.get_display_mode_with(&DisplayFallbacks::default())
    }

    /// Resolve the configured display mode against a fallback table.
    pub fn get_display_mode_with(&self, fallbacks: &DisplayFallbacks) -> DisplayMode {
        let requested = self
            .display
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or(DisplayMode::Default);
        resolve_display_mode(requested, &self.get_display_options(), fallbacks)
    }

    /// Compare two views on every key except those in `omit`.
    ///
    /// Unset y-axis, display, top events and dataset compare equal to their
    /// defaults. Start and end compare as instants.
    pub fn is_equal_to(&self, other: &EventView, omit: &[EventViewKey]) -> bool {
        EventViewKey::ALL
            .into_iter()
            .filter(|key| !omit.contains(key))
            .all(|key| self.key_equal(other, key))
    }

    fn key_equal(&self, other: &EventView, key: EventViewKey) -> bool {
        match key {
            EventViewKey::Id => self.id == other.id,
            EventViewKey::Name => self.name == other.name,
            EventViewKey::Query => self.query == other.query,
            EventViewKey::StatsPeriod => self.stats_period == other.stats_period,
            EventViewKey::Fields => self.fields == other.fields,
            EventViewKey::Sorts => self.sorts == other.sorts,
            EventViewKey::Project => self.project == other.project,
            EventViewKey::Environment => self.environment == other.environment,
            EventViewKey::Interval => self.interval == other.interval,
            EventViewKey::YAxis => self.y_axis_or_default() == other.y_axis_or_default(),
            EventViewKey::Display => {
                self.display.as_deref().unwrap_or(DisplayMode::Default.as_str())
                    == other.display.as_deref().unwrap_or(DisplayMode::Default.as_str())
            }
            EventViewKey::TopEvents => {
                self.top_events.as_deref().unwrap_or(TOP_N)
                    == other.top_events.as_deref().unwrap_or(TOP_N)
            }
            EventViewKey::Dataset => {
                self.dataset.clone().unwrap_or_default()
                    == other.dataset.clone().unwrap_or_default()
            }
            EventViewKey::Start => dates_equal(self.start.as_deref(), other.start.as_deref()),
            EventViewKey::End => dates_equal(self.end.as_deref(), other.end.as_deref()),
        }
    }

    fn y_axis_or_default(&self) -> Vec<String> {
        if self.y_axis.is_empty() {
            vec![DEFAULT_Y_AXIS.to_string()]
        } else {
            self.y_axis.clone()
        }
    }
}

#[cfg(test)]
mod tests;
