//! Field and column model for discover queries.
//!
//! A [`Field`] is what travels in URLs and saved queries: a raw expression
//! plus display hints. A [`Column`] is the parsed form of that expression.
//!
//! # Expression forms
//!
//! - **Bare field**: `transaction.duration`
//! - **Function**: `p75(transaction.duration)`, `count()`
//! - **Equation**: `equation|count() / 2`
//! - **Calculated field**: `calculated|crash_free_rate`
//!
//! Parsing never fails: anything that is not recognised becomes a bare
//! field.

mod aggregations;
mod parser;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use aggregations::{find_aggregation, field_type, Aggregation, OutputType, AGGREGATIONS};
pub use parser::{parse_arguments, parse_function, ParsedFunction};

/// Width sentinel for columns sized automatically.
pub const COL_WIDTH_UNDEFINED: i32 = -1;

/// Smallest width a column can be resized to.
pub const COL_WIDTH_MINIMUM: i32 = 90;

pub const EQUATION_PREFIX: &str = "equation|";
pub const CALCULATED_FIELD_PREFIX: &str = "calculated|";
pub const EQUATION_ALIAS_PREFIX: &str = "equation[";

/// A field as stored in the URL or a saved query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default = "default_width")]
    pub width: i32,
}

fn default_width() -> i32 {
    COL_WIDTH_UNDEFINED
}

impl Field {
    /// A field with automatic width and no alias.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            alias: None,
            width: COL_WIDTH_UNDEFINED,
        }
    }

    pub fn with_width(field: impl Into<String>, width: i32) -> Self {
        Self {
            field: field.into(),
            alias: None,
            width,
        }
    }
}

/// A function call with at most three positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCall {
    pub name: String,
    pub arguments: Vec<String>,
}

impl AggregateCall {
    pub fn new(name: impl Into<String>, arguments: &[&str]) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// First argument, or the empty string.
    pub fn first_argument(&self) -> &str {
        self.arguments.first().map(String::as_str).unwrap_or("")
    }
}

/// A parsed field expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Field { field: String, alias: Option<String> },
    Function { call: AggregateCall, alias: Option<String> },
    Equation { expression: String, alias: Option<String> },
    CalculatedField { name: String, alias: Option<String> },
}

impl Column {
    pub fn field(field: impl Into<String>) -> Self {
        Column::Field { field: field.into(), alias: None }
    }

    pub fn function(name: impl Into<String>, arguments: &[&str]) -> Self {
        Column::Function {
            call: AggregateCall::new(name, arguments),
            alias: None,
        }
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        Column::Equation { expression: expression.into(), alias: None }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            Column::Field { alias, .. }
            | Column::Function { alias, .. }
            | Column::Equation { alias, .. }
            | Column::CalculatedField { alias, .. } => alias.as_deref(),
        }
    }

    /// Short name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Field { .. } => "field",
            Column::Function { .. } => "function",
            Column::Equation { .. } => "equation",
            Column::CalculatedField { .. } => "calculatedField",
        }
    }

    /// Whether the column has an expression worth keeping in a field list.
    pub fn is_usable(&self) -> bool {
        match self {
            Column::Field { field, .. } => !field.is_empty(),
            Column::Function { call, .. } => !call.name.is_empty(),
            Column::Equation { expression, .. } => !expression.is_empty(),
            Column::CalculatedField { name, .. } => !name.is_empty(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&generate_field_as_string(self))
    }
}

/// Parse a raw field string into a column.
pub fn explode_field_string(field: &str, alias: Option<&str>) -> Column {
    let alias = alias.map(str::to_string);

    if is_equation(field) {
        return Column::Equation {
            expression: get_equation(field).to_string(),
            alias,
        };
    }

    if let Some(name) = get_calculated_field(field) {
        return Column::CalculatedField { name: name.to_string(), alias };
    }

    if let Some(parsed) = parse_function(field) {
        let mut arguments = parsed.arguments;
        arguments.truncate(3);
        return Column::Function {
            call: AggregateCall { name: parsed.name, arguments },
            alias,
        };
    }

    Column::Field { field: field.to_string(), alias }
}

/// Parse a [`Field`], carrying its alias over.
pub fn explode_field(field: &Field) -> Column {
    explode_field_string(&field.field, field.alias.as_deref())
}

/// Parse a raw field string that carries no alias.
pub fn get_column_from_field(field: &str) -> Column {
    explode_field_string(field, None)
}

/// Serialize a column back into its raw field string.
pub fn generate_field_as_string(column: &Column) -> String {
    match column {
        Column::Field { field, .. } => field.clone(),
        Column::CalculatedField { name, .. } => format!("{}{}", CALCULATED_FIELD_PREFIX, name),
        Column::Equation { expression, .. } => format!("{}{}", EQUATION_PREFIX, expression.trim()),
        Column::Function { call, .. } => {
            let parameters: Vec<&str> = call
                .arguments
                .iter()
                .map(String::as_str)
                .filter(|arg| !arg.is_empty())
                .collect();
            format!("{}({})", call.name, parameters.join(","))
        }
    }
}

/// Response column name for a field expression.
///
/// `p75(transaction.duration)` becomes `p75_transaction_duration` and
/// `count()` becomes `count`. Non-function fields are returned unchanged.
pub fn get_aggregate_alias(field: &str) -> String {
    let Some(parsed) = parse_function(field) else {
        return field.to_string();
    };

    let mut alias = parsed.name;
    if !parsed.arguments.is_empty() {
        alias.push('_');
        alias.push_str(&parsed.arguments.join("_"));
    }

    let mut collapsed = String::with_capacity(alias.len());
    let mut in_run = false;
    for c in alias.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            collapsed.push(c);
            in_run = false;
        } else if !in_run {
            collapsed.push('_');
            in_run = true;
        }
    }

    collapsed.trim_matches('_').to_string()
}

pub fn is_equation(field: &str) -> bool {
    field.starts_with(EQUATION_PREFIX)
}

/// Whether the field is an `equation[N]` alias.
pub fn is_equation_alias(field: &str) -> bool {
    get_equation_alias_index(field).is_some()
}

/// Index from an `equation[N]` alias.
pub fn get_equation_alias_index(field: &str) -> Option<usize> {
    field
        .strip_prefix(EQUATION_ALIAS_PREFIX)?
        .strip_suffix(']')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))?
        .parse()
        .ok()
}

/// Alias addressing the n-th equation of a field list.
pub fn get_equation_alias(index: usize) -> String {
    format!("{}{}]", EQUATION_ALIAS_PREFIX, index)
}

/// Equation body with the `equation|` prefix removed.
pub fn get_equation(field: &str) -> &str {
    field.strip_prefix(EQUATION_PREFIX).unwrap_or(field)
}

/// Whether the equation references at least one aggregate.
pub fn is_aggregate_equation(field: &str) -> bool {
    is_equation(field) && parser::contains_function_call(get_equation(field))
}

pub fn is_aggregate_field(field: &str) -> bool {
    parse_function(field).is_some()
}

pub fn get_calculated_field(field: &str) -> Option<&str> {
    field.strip_prefix(CALCULATED_FIELD_PREFIX)
}

/// Derived metrics are computed by the backend and referenced by name.
pub fn is_derived_metric(field: &str) -> bool {
    field.starts_with(CALCULATED_FIELD_PREFIX)
}

/// Value type of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    Date,
    Duration,
    Integer,
    Number,
    Percentage,
    String,
    Size,
    Rate,
    Score,
    Never,
    #[serde(other)]
    Other,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Duration => "duration",
            ColumnType::Integer => "integer",
            ColumnType::Number => "number",
            ColumnType::Percentage => "percentage",
            ColumnType::String => "string",
            ColumnType::Size => "size",
            ColumnType::Rate => "rate",
            ColumnType::Score => "score",
            ColumnType::Never => "never",
            ColumnType::Other => "other",
        }
    }

    /// Numeric family: right aligned, chartable.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnType::Integer
                | ColumnType::Number
                | ColumnType::Duration
                | ColumnType::Percentage
                | ColumnType::Size
                | ColumnType::Rate
                | ColumnType::Score
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "boolean" => ColumnType::Boolean,
            "date" => ColumnType::Date,
            "duration" => ColumnType::Duration,
            "integer" => ColumnType::Integer,
            "number" => ColumnType::Number,
            "percentage" => ColumnType::Percentage,
            "string" => ColumnType::String,
            "size" => ColumnType::Size,
            "rate" => ColumnType::Rate,
            "score" => ColumnType::Score,
            "never" => ColumnType::Never,
            _ => ColumnType::Other,
        })
    }
}

/// Declared types and units of result columns, keyed by alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaType {
    #[serde(default)]
    pub fields: BTreeMap<String, ColumnType>,
    #[serde(default)]
    pub units: BTreeMap<String, Option<String>>,
}

impl MetaType {
    pub fn with_field(mut self, alias: impl Into<String>, ty: ColumnType) -> Self {
        self.fields.insert(alias.into(), ty);
        self
    }

    pub fn with_unit(mut self, alias: impl Into<String>, unit: impl Into<String>) -> Self {
        self.units.insert(alias.into(), Some(unit.into()));
        self
    }

    pub fn field_type(&self, alias: &str) -> Option<ColumnType> {
        self.fields.get(alias).copied()
    }

    pub fn unit(&self, alias: &str) -> Option<&str> {
        self.units.get(alias).and_then(|u| u.as_deref())
    }
}

/// Horizontal alignment of a rendered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

pub fn field_alignment(ty: ColumnType) -> Alignment {
    if ty.is_numeric() {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

/// Whether values of this type can be plotted on a chart axis.
pub fn is_legal_y_axis_type(ty: ColumnType) -> bool {
    ty.is_numeric()
}

/// Output type of an aggregate call, without consulting result metadata.
pub fn aggregate_output_type(call: &AggregateCall) -> ColumnType {
    match find_aggregation(&call.name).map(|agg| agg.output) {
        Some(OutputType::Fixed(ty)) => ty,
        Some(OutputType::FromArgument) => match field_type(call.first_argument()) {
            ColumnType::String | ColumnType::Other => ColumnType::Number,
            ty => ty,
        },
        None => ColumnType::Number,
    }
}

/// Type of a column, preferring result metadata when it is available.
pub fn column_type(column: &Column, meta: Option<&MetaType>) -> ColumnType {
    let key = match column {
        Column::Field { field, .. } => field.clone(),
        Column::Function { .. } => get_aggregate_alias(&generate_field_as_string(column)),
        Column::Equation { .. } | Column::CalculatedField { .. } => {
            generate_field_as_string(column)
        }
    };
    if let Some(ty) = meta.and_then(|m| m.field_type(&key)) {
        return ty;
    }

    match column {
        Column::Field { field, .. } if is_equation_alias(field) => ColumnType::Number,
        Column::Field { field, .. } => field_type(field),
        Column::Function { call, .. } => aggregate_output_type(call),
        Column::Equation { .. } | Column::CalculatedField { .. } => ColumnType::Number,
    }
}

/// Whether a table can be ordered by this column.
pub fn is_sortable(column: &Column, meta: Option<&MetaType>) -> bool {
    match column {
        Column::Equation { .. } => true,
        Column::CalculatedField { .. } => false,
        _ => column_type(column, meta) != ColumnType::Never,
    }
}

/// Sort key for a single field string, or `None` if it cannot be sorted.
///
/// Functions sort by their aggregate alias unless `use_function_format` asks
/// for the raw call. Equations must already be in `equation[N]` form; a raw
/// `equation|...` string has no key without its position in the field list.
pub fn get_sort_key_from_field(
    field: &str,
    meta: Option<&MetaType>,
    use_function_format: bool,
) -> Option<String> {
    if is_equation(field) {
        return None;
    }
    let column = explode_field_string(field, None);
    if !is_sortable(&column, meta) {
        return None;
    }
    match column {
        Column::Function { .. } if use_function_format => Some(field.to_string()),
        Column::Function { .. } => Some(get_aggregate_alias(field)),
        _ => Some(field.to_string()),
    }
}
