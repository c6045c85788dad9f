//! CLI command implementations.

use std::path::Path;

use discover::dates::{
    format_date_for_display, get_time_stamp_from_table_date_field, get_utc_date_string, parse_date,
};
use discover::fields::{column_type, get_column_from_field, get_sort_key_from_field};
use discover::{
    generate_field_as_string, get_aggregate_alias, scale_tabular_data_column, Config, Error,
    EventView, Location, MutableSearch, PayloadOptions, Result, SavedQuery, TableData, Unit,
};
use serde_json::json;

/// Which payload `dq payload` prints.
pub enum PayloadKind {
    Events,
    Facets,
    Metrics { limit: Option<u32> },
}

/// Load config from an explicit root, or resolve it the usual way.
pub fn load_config(root: Option<&Path>) -> Result<Config> {
    match root {
        Some(root) => Config::load_from(root),
        None => Config::load(),
    }
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| Error::InvalidArgument(format!("Expected KEY=VALUE, got '{}'", pair)))
}

/// Merge a raw query string and `KEY=VALUE` parameters into one location.
/// Repeated keys collect into lists.
fn build_location(query_string: Option<&str>, params: &[String]) -> Result<Location> {
    let mut pairs: Vec<(String, String)> = match query_string {
        Some(raw) => Location::from_query_string(raw)
            .query
            .into_iter()
            .flat_map(|(key, value)| {
                value
                    .to_list()
                    .into_iter()
                    .map(move |v| (key.clone(), v))
            })
            .collect(),
        None => Vec::new(),
    };
    for param in params {
        let (key, value) = split_pair(param)?;
        pairs.push((key.to_string(), value.to_string()));
    }
    Ok(Location::from_pairs(pairs))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn field(fields: &[String], format: &str) -> Result<()> {
    let mut rows = Vec::new();
    for field in fields {
        let column = get_column_from_field(field);
        rows.push(json!({
            "field": field,
            "kind": column.kind(),
            "canonical": generate_field_as_string(&column),
            "alias": get_aggregate_alias(field),
            "type": column_type(&column, None).as_str(),
            "sort_key": get_sort_key_from_field(field, None, false),
        }));
    }

    match format {
        "json" => print_json(&rows)?,
        _ => {
            for (i, row) in rows.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("Field:     {}", row["field"].as_str().unwrap_or_default());
                println!("Kind:      {}", row["kind"].as_str().unwrap_or_default());
                println!("Canonical: {}", row["canonical"].as_str().unwrap_or_default());
                println!("Alias:     {}", row["alias"].as_str().unwrap_or_default());
                println!("Type:      {}", row["type"].as_str().unwrap_or_default());
                println!("Sort key:  {}", row["sort_key"].as_str().unwrap_or("-"));
            }
        }
    }
    Ok(())
}

pub fn search(query: &str, remove: &[String], set: &[String], format: &str) -> Result<()> {
    let mut search = MutableSearch::new(query);
    for key in remove {
        search.remove_filter(key);
    }
    for pair in set {
        let (key, value) = split_pair(pair)?;
        search.set_filter_values(key, &[value], false);
    }

    match format {
        "json" => {
            let tokens: Vec<_> = search
                .tokens()
                .iter()
                .map(|token| {
                    json!({
                        "type": token.token_type().as_str(),
                        "key": token.key(),
                        "value": token.value(),
                    })
                })
                .collect();
            print_json(&json!({ "tokens": tokens, "query": search.format_string() }))?;
        }
        _ => {
            for token in search.tokens() {
                match token.key() {
                    Some(key) => {
                        println!("{:<9} {} = {}", token.token_type().as_str(), key, token.value())
                    }
                    None => println!("{:<9} {}", token.token_type().as_str(), token.value()),
                }
            }
            println!("Query: {}", search);
        }
    }
    Ok(())
}

pub fn payload(
    config: &Config,
    query_string: Option<&str>,
    params: &[String],
    kind: PayloadKind,
) -> Result<()> {
    let location = build_location(query_string, params)?;
    let view = EventView::from_location(&location);
    if !view.is_valid() {
        return Err(Error::InvalidArgument(
            "No fields selected; pass at least one field=...".to_string(),
        ));
    }
    tracing::debug!(fields = view.num_of_columns(), sorts = view.sorts().len(), "built event view");

    let options = PayloadOptions::from(config);
    match kind {
        PayloadKind::Events => {
            print_json(&view.get_events_api_payload_with(&location, None, &options))
        }
        PayloadKind::Facets => print_json(&view.get_facets_api_payload_with(&location, &options)),
        PayloadKind::Metrics { limit } => {
            print_json(&view.get_metrics_payload(&location, limit, &options))
        }
    }
}

pub fn saved(config: &Config, file: &Path, params: &[String]) -> Result<()> {
    let saved = SavedQuery::from_file(file)?;
    let location = build_location(None, params)?;
    let view = EventView::from_new_query_with_location(&saved, &location);
    tracing::debug!(name = %saved.name, fields = view.num_of_columns(), "loaded saved query");

    let options = PayloadOptions::from(config);
    print_json(&view.get_events_api_payload_with(&location, None, &options))
}

pub fn convert(value: f64, from: &str, to: &str) -> Result<()> {
    let from = Unit::parse(from)?;
    let to = Unit::parse(to)?;
    let converted = from
        .convert(value, to)
        .ok_or_else(|| Error::InvalidArgument(format!("Cannot convert {} to {}", from, to)))?;
    println!("{} {}", converted, to);
    Ok(())
}

pub fn date(config: &Config, value: &str) -> Result<()> {
    let dt = parse_date(value).ok_or_else(|| Error::InvalidTimestamp(value.to_string()))?;
    let timestamp =
        get_time_stamp_from_table_date_field(&serde_json::Value::String(value.to_string()))?;

    println!("UTC:       {}", get_utc_date_string(&dt));
    println!("Display:   {}", format_date_for_display(&dt, &config.display));
    if let Some(ts) = timestamp {
        println!("Timestamp: {}", ts);
    }
    Ok(())
}

pub fn scale(file: &Path, column: &str, unit: &str) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let data: TableData = serde_json::from_str(&contents)?;
    print_json(&scale_tabular_data_column(&data, column, unit))
}
