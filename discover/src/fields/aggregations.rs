//! Catalogue of aggregate functions and well-known fields.

use super::ColumnType;

/// How an aggregate's output type is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// Always this type.
    Fixed(ColumnType),
    /// Same type as the first argument (min, max, avg, percentiles...).
    FromArgument,
}

/// A known aggregate function.
#[derive(Debug, Clone, Copy)]
pub struct Aggregation {
    pub name: &'static str,
    pub output: OutputType,
    /// Whether the aggregate's value can be plotted on a chart axis.
    pub chartable: bool,
}

const fn fixed(name: &'static str, ty: ColumnType, chartable: bool) -> Aggregation {
    Aggregation { name, output: OutputType::Fixed(ty), chartable }
}

const fn from_argument(name: &'static str) -> Aggregation {
    Aggregation { name, output: OutputType::FromArgument, chartable: true }
}

pub const AGGREGATIONS: &[Aggregation] = &[
    fixed("count", ColumnType::Integer, true),
    fixed("count_unique", ColumnType::Integer, true),
    fixed("count_if", ColumnType::Integer, true),
    fixed("count_miserable", ColumnType::Integer, true),
    fixed("count_web_vitals", ColumnType::Integer, true),
    fixed("failure_count", ColumnType::Integer, true),
    fixed("failure_rate", ColumnType::Percentage, true),
    fixed("apdex", ColumnType::Number, true),
    fixed("user_misery", ColumnType::Number, true),
    fixed("performance_score", ColumnType::Score, true),
    fixed("eps", ColumnType::Rate, true),
    fixed("epm", ColumnType::Rate, true),
    fixed("spm", ColumnType::Rate, true),
    fixed("sps", ColumnType::Rate, true),
    fixed("last_seen", ColumnType::Date, false),
    fixed("latest_event", ColumnType::String, false),
    fixed("to_other", ColumnType::String, false),
    fixed("spans_histogram", ColumnType::Number, false),
    from_argument("min"),
    from_argument("max"),
    from_argument("sum"),
    from_argument("avg"),
    from_argument("any"),
    from_argument("percentile"),
    from_argument("p50"),
    from_argument("p75"),
    from_argument("p90"),
    from_argument("p95"),
    from_argument("p99"),
    from_argument("p100"),
];

/// Types of well-known fields. Fields not listed are strings.
const FIELD_TYPES: &[(&str, ColumnType)] = &[
    ("id", ColumnType::String),
    ("timestamp", ColumnType::Date),
    ("time", ColumnType::Date),
    ("transaction", ColumnType::String),
    ("transaction.duration", ColumnType::Duration),
    ("span.duration", ColumnType::Duration),
    ("span.self_time", ColumnType::Duration),
    ("measurements.lcp", ColumnType::Duration),
    ("measurements.fcp", ColumnType::Duration),
    ("measurements.fid", ColumnType::Duration),
    ("measurements.cls", ColumnType::Number),
    ("http.response_content_length", ColumnType::Size),
    ("http.decoded_response_content_length", ColumnType::Size),
    ("http.response_transfer_size", ColumnType::Size),
    ("error.handled", ColumnType::Boolean),
    ("error.unhandled", ColumnType::Boolean),
    ("error.type", ColumnType::Never),
    ("error.value", ColumnType::Never),
    ("stack.filename", ColumnType::Never),
    ("tags.key", ColumnType::Never),
    ("tags.value", ColumnType::Never),
];

/// Look up an aggregate by function name.
pub fn find_aggregation(name: &str) -> Option<&'static Aggregation> {
    AGGREGATIONS.iter().find(|agg| agg.name == name)
}

/// The declared type of a plain field.
pub fn field_type(field: &str) -> ColumnType {
    FIELD_TYPES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, ty)| *ty)
        .unwrap_or(ColumnType::String)
}
