//! Result tables returned by the events API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::{ColumnType, MetaType};
use crate::units::{DurationUnit, RateUnit, SizeUnit, Unit};

/// One result row, keyed by column alias.
pub type TableDataRow = BTreeMap<String, serde_json::Value>;

/// A page of results plus the declared column metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub data: Vec<TableDataRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaType>,
}

/// Unit assumed for a typed column that does not declare one.
fn base_unit(ty: ColumnType) -> Option<Unit> {
    match ty {
        ColumnType::Duration => Some(Unit::Duration(DurationUnit::Millisecond)),
        ColumnType::Size => Some(Unit::Size(SizeUnit::Byte)),
        ColumnType::Rate => Some(Unit::Rate(RateUnit::PerSecond)),
        _ => None,
    }
}

fn same_family(ty: ColumnType, unit: Unit) -> bool {
    matches!(
        (ty, unit),
        (ColumnType::Duration, Unit::Duration(_))
            | (ColumnType::Size, Unit::Size(_))
            | (ColumnType::Rate, Unit::Rate(_))
    )
}

/// Convert every value of `column` into `target_unit`.
///
/// Only duration, size and rate columns are scaled, and only when both the
/// declared unit and the target belong to the column's family. Anything else
/// returns the data unchanged; a family mismatch is logged.
pub fn scale_tabular_data_column(data: &TableData, column: &str, target_unit: &str) -> TableData {
    let Some(meta) = data.meta.as_ref() else {
        return data.clone();
    };
    let Some(ty) = meta.field_type(column) else {
        return data.clone();
    };
    let Some(default_unit) = base_unit(ty) else {
        tracing::debug!(column, column_type = %ty, "column type has no unit, not scaling");
        return data.clone();
    };

    let from = match meta.unit(column) {
        Some(name) => Unit::parse(name).ok(),
        None => Some(default_unit),
    };
    let to = Unit::parse(target_unit).ok();

    let (from, to) = match (from, to) {
        (Some(from), Some(to)) if same_family(ty, from) && same_family(ty, to) => (from, to),
        _ => {
            tracing::warn!(
                column,
                column_type = %ty,
                from_unit = meta.unit(column).unwrap_or(default_unit.as_str()),
                to_unit = target_unit,
                "cannot scale column across unit families"
            );
            return data.clone();
        }
    };

    let mut scaled = data.clone();
    for row in &mut scaled.data {
        let Some(value) = row.get_mut(column) else {
            continue;
        };
        let converted = value
            .as_f64()
            .and_then(|v| from.convert(v, to))
            .and_then(serde_json::Number::from_f64);
        if let Some(n) = converted {
            *value = serde_json::Value::Number(n);
        }
    }
    if let Some(meta) = scaled.meta.as_mut() {
        meta.units.insert(column.to_string(), Some(to.as_str().to_string()));
    }
    scaled
}
