//! Tests for the event view.

use super::*;
use crate::location::{Location, QueryValue};
use crate::Error;

fn view(fields: &[&str], sorts: &[Sort]) -> EventView {
    EventView::new(EventViewProps {
        fields: fields.iter().map(|f| Field::new(*f)).collect(),
        sorts: sorts.to_vec(),
        ..Default::default()
    })
}

fn location(pairs: &[(&str, &str)]) -> Location {
    Location::from_pairs(pairs.iter().copied())
}

// ===== Construction =====

#[test]
fn test_matching_sort_is_kept() {
    let v = view(&["count()"], &[Sort::desc("count")]);
    assert_eq!(v.sorts(), &[Sort::desc("count")]);
}

#[test]
fn test_sort_without_field_is_dropped() {
    let v = view(&["count()"], &[Sort::desc("title")]);
    assert!(v.sorts().is_empty());
}

#[test]
fn test_only_first_matching_sort_survives() {
    let v = view(
        &["title", "count()"],
        &[Sort::desc("nope"), Sort::asc("title"), Sort::desc("count")],
    );
    assert_eq!(v.sorts(), &[Sort::asc("title")]);
}

#[test]
fn test_equation_and_unsortable_keys() {
    let v = view(&["count()", "equation|count() * 2"], &[Sort::desc("equation[0]")]);
    assert_eq!(v.sorts(), &[Sort::desc("equation[0]")]);

    let v = view(&["error.type"], &[Sort::desc("error.type")]);
    assert!(v.sorts().is_empty());
}

#[test]
fn test_from_location() {
    let v = EventView::from_location(&location(&[
        ("id", "42"),
        ("name", "Errors"),
        ("field", "title"),
        ("field", "count()"),
        ("widths", "300"),
        ("widths", "abc"),
        ("sort", "-count"),
        ("query", " event.type:error "),
        ("project", "1"),
        ("project", "x"),
        ("project", "2"),
        ("environment", "prod"),
        ("environment", "prod"),
        ("statsPeriod", "24h"),
        ("yAxis", "count()"),
        ("display", "top5"),
        ("dataset", "errors"),
    ]));

    assert_eq!(v.id.as_deref(), Some("42"));
    assert_eq!(v.name.as_deref(), Some("Errors"));
    assert_eq!(v.fields(), &[Field::with_width("title", 300), Field::new("count()")]);
    assert_eq!(v.sorts(), &[Sort::desc("count")]);
    assert_eq!(v.query, "event.type:error");
    assert_eq!(v.project, vec![1, 2]);
    assert_eq!(v.environment, vec!["prod"]);
    assert_eq!(v.stats_period.as_deref(), Some("24h"));
    assert_eq!(v.y_axis, vec!["count()"]);
    assert_eq!(v.display.as_deref(), Some("top5"));
    assert_eq!(v.dataset, Some(DiscoverDataset::Errors));
}

#[test]
fn test_from_location_period_alias() {
    let v = EventView::from_location(&location(&[("field", "title"), ("period", "7d")]));
    assert_eq!(v.stats_period.as_deref(), Some("7d"));
    assert_eq!(v.start, None);
}

#[test]
fn test_accessors() {
    let v = view(&["id", "count()", "equation|count() * 2", "equation|1 + 1"], &[]);
    assert!(v.is_valid());
    assert!(v.has_id_field());
    assert!(v.has_aggregate_field());
    assert_eq!(v.num_of_columns(), 4);
    assert_eq!(v.get_equations(), vec!["equation|count() * 2", "equation|1 + 1"]);
    assert_eq!(v.get_aggregate_fields().len(), 2);
    assert_eq!(v.get_widths(), vec![-1, -1, -1, -1]);
    assert!(!EventView::default().is_valid());
}

#[test]
fn test_get_columns() {
    let v = view(&["title", "count()", "error.type"], &[]).with_resized_column(0, 200);
    let columns = v.get_columns(None);
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].width, 200);
    assert_eq!(columns[1].column_type, ColumnType::Integer);
    assert_eq!(columns[1].alignment, Alignment::Right);
    assert!(columns[1].is_sortable);
    assert!(!columns[2].is_sortable);
    assert_eq!(columns[2].column_type, ColumnType::Never);
}

// ===== Column mutators =====

#[test]
fn test_with_columns_keeps_unchanged_widths() {
    let v = EventView::new(EventViewProps {
        fields: vec![Field::with_width("title", 100), Field::with_width("count()", 200)],
        sorts: vec![Sort::desc("count")],
        ..Default::default()
    });

    let updated = v.with_columns(&[
        Column::field("title"),
        Column::function("p95", &["transaction.duration"]),
        Column::field(""),
    ]);
    assert_eq!(
        updated.fields(),
        &[Field::with_width("title", 100), Field::new("p95(transaction.duration)")]
    );
    // sorted field went away, first sortable field takes over
    assert_eq!(updated.sorts(), &[Sort::desc("title")]);

    assert_eq!(v.fields()[1].field, "count()");
    assert_eq!(v.sorts(), &[Sort::desc("count")]);
}

#[test]
fn test_with_columns_keeps_surviving_sort() {
    let v = view(&["title", "count()"], &[Sort::asc("count")]);
    let updated = v.with_columns(&[Column::function("count", &[]), Column::field("title")]);
    assert_eq!(updated.sorts(), &[Sort::asc("count")]);
    assert_eq!(updated.get_widths(), vec![-1, -1]);
}

#[test]
fn test_with_new_column() {
    let v = view(&["title", "count()"], &[]);
    let updated = v.with_new_column(&Column::function("count_unique", &["user"]));
    assert_eq!(updated.num_of_columns(), 3);
    assert_eq!(updated.fields()[2], Field::new("count_unique(user)"));
    assert_eq!(v.num_of_columns(), 2);

    assert_eq!(v.with_new_column(&Column::field("")), v);
}

#[test]
fn test_with_resized_column() {
    let v = view(&["title", "count()"], &[]);
    assert_eq!(v.with_resized_column(0, 250).get_widths(), vec![250, -1]);
    assert_eq!(v.with_resized_column(9, 250), v);
}

#[test]
fn test_with_updated_column_moves_sort() {
    let v = view(&["title", "count()"], &[Sort::asc("count")]);
    let updated =
        v.with_updated_column(1, &Column::function("p50", &["transaction.duration"]), None);
    assert_eq!(updated.fields()[1].field, "p50(transaction.duration)");
    assert_eq!(updated.sorts(), &[Sort::asc("p50_transaction_duration")]);
}

#[test]
fn test_with_updated_column_to_unsortable() {
    let v = view(&["title", "count()"], &[Sort::asc("count")]);
    let updated = v.with_updated_column(1, &Column::field("error.type"), None);
    assert_eq!(updated.sorts(), &[Sort::desc("title")]);
}

#[test]
fn test_with_updated_column_same_field_is_noop() {
    let v = view(&["title", "count()"], &[Sort::asc("count")]);
    assert_eq!(v.with_updated_column(1, &Column::function("count", &[]), None), v);
    assert_eq!(v.with_updated_column(5, &Column::field("x"), None), v);
}

#[test]
fn test_with_updated_column_duplicate_key_keeps_sort() {
    let v = view(&["count()", "title", "count()"], &[Sort::desc("count")]);
    let updated = v.with_updated_column(0, &Column::field("release"), None);
    assert_eq!(updated.get_fields(), vec!["release", "title", "count()"]);
    assert_eq!(updated.sorts(), &[Sort::desc("count")]);
}

#[test]
fn test_with_deleted_column_refuses_last_column() {
    let v = view(&["title"], &[]);
    assert_eq!(v.with_deleted_column(0, None), v);

    let v = view(&["title", "count()"], &[]);
    assert_eq!(v.with_deleted_column(5, None), v);
}

#[test]
fn test_with_deleted_column_repairs_sort_and_width() {
    let v = EventView::new(EventViewProps {
        fields: vec![Field::with_width("title", 100), Field::new("count()")],
        sorts: vec![Sort::desc("count")],
        ..Default::default()
    });
    let updated = v.with_deleted_column(1, None);
    assert_eq!(updated.fields(), &[Field::new("title")]);
    assert_eq!(updated.sorts(), &[Sort::desc("title")]);
}

#[test]
fn test_with_deleted_column_shifts_equation_sorts() {
    let v = view(
        &["equation|count() + 1", "count()", "equation|count() * 2"],
        &[Sort::desc("equation[1]")],
    );
    assert_eq!(v.sorts(), &[Sort::desc("equation[1]")]);

    let updated = v.with_deleted_column(0, None);
    assert_eq!(updated.sorts(), &[Sort::desc("equation[0]")]);
}

#[test]
fn test_with_sorts_filters_unknown_keys() {
    let v = view(&["title", "count()"], &[]);
    let updated = v.with_sorts(vec![Sort::desc("count"), Sort::asc("nope"), Sort::asc("title")]);
    assert_eq!(updated.sorts(), &[Sort::desc("count"), Sort::asc("title")]);
}

// ===== Sorting =====

#[test]
fn test_sort_on_sorted_field_reverses() {
    let v = view(&["title", "count()"], &[Sort::desc("count")]);
    let count = Field::new("count()");

    assert_eq!(v.sort_on_field(&count, None, None, false).sorts(), &[Sort::asc("count")]);
    assert_eq!(
        v.sort_on_field(&count, None, Some(SortKind::Desc), false).sorts(),
        &[Sort::desc("count")]
    );
    assert!(v.is_field_sorted(&count, None));
    assert_eq!(v.sort_for_field(&count, None), Some(&Sort::desc("count")));
}

#[test]
fn test_sort_on_new_field_replaces() {
    let v = view(&["title", "count()"], &[Sort::desc("count")]);
    let title = Field::new("title");
    assert_eq!(v.sort_on_field(&title, None, None, false).sorts(), &[Sort::desc("title")]);
    assert_eq!(
        v.sort_on_field(&title, None, Some(SortKind::Asc), false).sorts(),
        &[Sort::asc("title")]
    );
}

#[test]
fn test_sort_on_unsortable_field_is_noop() {
    let v = view(&["error.type", "title"], &[]);
    assert_eq!(v.sort_on_field(&Field::new("error.type"), None, None, false), v);
}

#[test]
fn test_sort_on_field_function_format_and_equations() {
    let v = view(&["title", "count_unique(user)"], &[]);
    let sorted = v.sort_on_field(&Field::new("count_unique(user)"), None, None, true);
    assert_eq!(sorted.sorts(), &[Sort::desc("count_unique(user)")]);

    let v = view(&["count()", "equation|count() * 2"], &[]);
    let sorted = v.sort_on_field(&Field::new("equation|count() * 2"), None, None, false);
    assert_eq!(sorted.sorts(), &[Sort::desc("equation[0]")]);
}

// ===== Y axis and display =====

#[test]
fn test_y_axis_options() {
    let v = view(
        &[
            "title",
            "count()",
            "p95(transaction.duration)",
            "last_seen()",
            "equation|count() * 2",
            "equation|1 + 1",
            "count()",
            "latest_event()",
            "avg(transaction.duration)",
        ],
        &[],
    );
    assert_eq!(
        v.get_y_axis_options(),
        vec![
            "count()",
            "p95(transaction.duration)",
            "equation|count() * 2",
            "avg(transaction.duration)",
            "count_unique(user)",
        ]
    );
    assert_eq!(view(&["title"], &[]).get_y_axis_options(), vec!["count()", "count_unique(user)"]);
}

#[test]
fn test_y_axis_falls_back_to_first_option() {
    let mut v = view(&["p95(transaction.duration)"], &[]);
    assert_eq!(v.get_y_axis(), "p95(transaction.duration)");

    v.y_axis = vec!["count()".to_string()];
    assert_eq!(v.get_y_axis(), "count()");

    v.y_axis = vec!["bogus()".to_string()];
    assert_eq!(v.get_y_axis(), "p95(transaction.duration)");
}

#[test]
fn test_display_options() {
    let mut v = view(&["title"], &[]);
    v.start = Some("2024-01-01T00:00:00".into());
    v.end = Some("2024-01-01T06:00:00".into());
    let disabled: Vec<DisplayMode> = v
        .get_display_options()
        .into_iter()
        .filter(|o| o.disabled)
        .map(|o| o.mode)
        .collect();
    assert_eq!(
        disabled,
        vec![DisplayMode::Previous, DisplayMode::Top5, DisplayMode::Daily, DisplayMode::DailyTop5]
    );
}

#[test]
fn test_display_mode_fallbacks() {
    let mut v = view(&["title"], &[]);
    v.display = Some("top5".into());
    assert_eq!(v.get_display_mode(), DisplayMode::Default);

    let mut v = view(&["title", "count()"], &[]);
    v.display = Some("dailytop5".into());
    assert_eq!(v.get_display_mode(), DisplayMode::DailyTop5);

    v.stats_period = Some("12h".into());
    assert_eq!(v.get_display_mode(), DisplayMode::Default);

    v.display = Some("bar".into());
    assert_eq!(v.get_display_mode(), DisplayMode::Bar);

    v.display = Some("sideways".into());
    assert_eq!(v.get_display_mode(), DisplayMode::Default);
}

#[test]
fn test_display_mode_cyclic_table_terminates() {
    let mut v = view(&["title"], &[]);
    v.display = Some("top5".into());
    v.stats_period = Some("12h".into());
    let cyclic = DisplayFallbacks::empty()
        .with(DisplayMode::Top5, DisplayMode::Daily)
        .with(DisplayMode::Daily, DisplayMode::Top5);
    assert_eq!(v.get_display_mode_with(&cyclic), DisplayMode::Default);
}

#[test]
fn test_get_days() {
    let mut v = view(&["title"], &[]);
    assert_eq!(v.get_days(), 14.0);
    v.stats_period = Some("12h".into());
    assert_eq!(v.get_days(), 0.5);
}

// ===== Equality =====

#[test]
fn test_is_equal_to_substitutes_defaults() {
    let a = EventView::from_location(&location(&[("field", "title"), ("statsPeriod", "14d")]));
    let mut b = a.clone();
    b.display = Some("default".into());
    b.y_axis = vec!["count()".into()];
    b.top_events = Some("5".into());
    b.dataset = Some(DiscoverDataset::Discover);
    assert!(a.is_equal_to(&b, &[]));

    b.query = "x".into();
    assert!(!a.is_equal_to(&b, &[]));
    assert!(a.is_equal_to(&b, &[EventViewKey::Query]));
}

#[test]
fn test_is_equal_to_compares_dates_as_instants() {
    let mut a = view(&["title"], &[]);
    let mut b = a.clone();
    a.start = Some("2024-01-01T00:00:00".into());
    b.start = Some("2024-01-01T02:00:00+02:00".into());
    assert!(a.is_equal_to(&b, &[]));

    b.start = Some("2024-01-02T00:00:00".into());
    assert!(!a.is_equal_to(&b, &[]));
    assert!(a.is_equal_to(&b, &[EventViewKey::Start]));
}

#[test]
fn test_is_equal_to_skips_dates_set_on_one_side() {
    let mut a = view(&["title"], &[]);
    let b = a.clone();
    a.start = Some("2024-01-01T00:00:00".into());
    a.end = Some("2024-01-02T00:00:00".into());
    assert!(a.is_equal_to(&b, &[]));
    assert!(b.is_equal_to(&a, &[]));
}

#[test]
fn test_with_teams_and_query_do_not_alias() {
    let a = view(&["title"], &[]);
    let b = a.with_teams(vec!["myteams".into()]).with_query("is:unresolved");
    assert!(a.team.is_empty());
    assert_eq!(a.query, "");
    assert_eq!(b.team, vec!["myteams"]);
    assert_eq!(b.query, "is:unresolved");
}

// ===== Payloads =====

fn payload_view() -> EventView {
    EventView::from_location(&location(&[
        ("field", "title"),
        ("field", "count()"),
        ("field", "title"),
        ("sort", "-count"),
        ("query", "event.type:error"),
        ("project", "1"),
        ("environment", "prod"),
        ("statsPeriod", "24h"),
    ]))
}

#[test]
fn test_events_payload() {
    let v = payload_view();
    let payload = v.get_events_api_payload(
        &location(&[("cursor", "0:50:0"), ("statsPeriod", "7d"), ("utc", "true")]),
        None,
    );

    assert_eq!(payload.field, vec!["title", "count()"]);
    assert_eq!(payload.sort, Some(QueryValue::from("-count")));
    assert_eq!(payload.query, "event.type:error");
    assert_eq!(payload.project, vec!["1"]);
    assert_eq!(payload.environment, vec!["prod"]);
    assert_eq!(payload.team, None);
    assert_eq!(payload.per_page, Some(50));
    assert_eq!(payload.stats_period.as_deref(), Some("24h"));
    assert_eq!(payload.utc.as_deref(), Some("true"));
    assert_eq!(payload.cursor.as_deref(), Some("0:50:0"));

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["sort"], "-count");
    assert_eq!(json["statsPeriod"], "24h");
    assert_eq!(json["per_page"], 50);
    assert!(json.get("team").is_none());
}

#[test]
fn test_events_payload_datetime_sources() {
    let v = view(&["title"], &[]);
    let payload = v.get_events_api_payload(&location(&[("statsPeriod", "7d")]), None);
    assert_eq!(payload.stats_period.as_deref(), Some("7d"));

    let payload = v.get_events_api_payload(&Location::default(), None);
    assert_eq!(payload.stats_period.as_deref(), Some("14d"));

    let options = PayloadOptions { per_page: 10, default_stats_period: None };
    let payload = v.get_events_api_payload_with(&Location::default(), None, &options);
    assert_eq!(payload.stats_period, None);
    assert_eq!(payload.per_page, Some(10));
}

#[test]
fn test_events_payload_sort_forms() {
    let v = payload_view();
    let multi = v.with_sorts(vec![Sort::desc("count"), Sort::asc("title")]);
    let payload = multi.get_events_api_payload(&Location::default(), None);
    assert_eq!(payload.sort, Some(QueryValue::List(vec!["-count".into(), "title".into()])));

    let none = v.with_sorts(Vec::new());
    let payload = none.get_events_api_payload(&Location::default(), None);
    assert_eq!(payload.sort, None);
    assert!(serde_json::to_value(&payload).unwrap().get("sort").is_none());
}

#[test]
fn test_events_payload_team_and_forced_query() {
    let v = payload_view().with_teams(vec!["myteams".into()]);
    let payload = v.get_events_api_payload(&Location::default(), Some("transaction:/checkout"));
    assert_eq!(payload.team, Some(vec!["myteams".to_string()]));
    assert_eq!(payload.query, "event.type:error transaction:/checkout");

    let payload = view(&["title"], &[]).get_events_api_payload(&Location::default(), Some("a:1"));
    assert_eq!(payload.query, "a:1");
}

#[test]
fn test_additional_conditions_are_merged() {
    let mut conditions = MutableSearch::empty();
    conditions.add_filter_value("event.type", "error", false);
    conditions.add_filter_value("transaction", "checkout", false);

    let v = payload_view().with_additional_conditions(conditions);
    assert_eq!(v.query, "event.type:error");
    assert_eq!(
        v.get_query_with_additional_conditions(),
        "event.type:error transaction:checkout"
    );
    let payload = v.get_events_api_payload(&Location::default(), None);
    assert_eq!(payload.query, "event.type:error transaction:checkout");
}

#[test]
fn test_facets_payload() {
    let v = payload_view();
    let payload = v.get_facets_api_payload(&location(&[("cursor", "0:50:0")]));
    assert!(payload.field.is_empty());
    assert_eq!(payload.sort, None);
    assert_eq!(payload.per_page, None);
    assert_eq!(payload.cursor, None);
    assert_eq!(payload.query, "event.type:error");

    let json = serde_json::to_value(&payload).unwrap();
    for key in ["field", "sort", "per_page", "cursor"] {
        assert!(json.get(key).is_none(), "{} should be omitted", key);
    }
}

#[test]
fn test_metrics_payload() {
    let v = view(
        &["release", "count()", "calculated|crash_free_rate", "equation|count() * 2"],
        &[Sort::desc("count")],
    );
    let payload = v.get_metrics_payload(&Location::default(), Some(10), &PayloadOptions::default());
    assert_eq!(payload.field, vec!["count()", "crash_free_rate"]);
    assert_eq!(payload.group_by, vec!["release"]);
    assert_eq!(payload.order_by.as_deref(), Some("-count()"));
    assert_eq!(payload.limit, Some(10));

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["groupBy"][0], "release");
    assert_eq!(json["orderBy"], "-count()");
}

#[test]
fn test_events_payload_to_query() {
    let query = payload_view().get_events_api_payload(&Location::default(), None).to_query();
    assert_eq!(query["field"], QueryValue::List(vec!["title".into(), "count()".into()]));
    assert_eq!(query["per_page"], QueryValue::from("50"));
    assert!(!query.contains_key("team"));
}

#[test]
fn test_page_filters() {
    let mut v = payload_view();
    v.utc = Some("true".into());
    let filters = v.get_page_filters();
    assert_eq!(filters.projects, vec![1]);
    assert_eq!(filters.environments, vec!["prod"]);
    assert_eq!(filters.datetime.period, "24h");
    assert!(filters.datetime.utc);
}

// ===== URL state =====

#[test]
fn test_query_string_object_round_trip() {
    let v = EventView::from_location(&location(&[
        ("field", "title"),
        ("field", "count()"),
        ("widths", "300"),
        ("sort", "-count"),
        ("query", "q"),
        ("project", "1"),
        ("statsPeriod", "24h"),
    ]));
    let output = v.generate_query_string_object();
    assert_eq!(output["field"], QueryValue::List(vec!["title".into(), "count()".into()]));
    assert_eq!(output["widths"], QueryValue::List(vec!["300".into(), "-1".into()]));
    assert_eq!(output["sort"], QueryValue::List(vec!["-count".into()]));
    assert_eq!(output["yAxis"], QueryValue::from("count()"));
    assert_eq!(output["statsPeriod"], QueryValue::from("24h"));
    assert!(!output.contains_key("display"));

    let again = EventView::from_location(&Location::new(output));
    assert!(again.is_equal_to(&v, &[]));
}

#[test]
fn test_blank_query_string_object_clears_view_keys() {
    let v = payload_view();
    let mut url = location(&[
        ("field", "title"),
        ("cursor", "0:50:0"),
        ("statsPeriod", "24h"),
        ("referrer", "sidebar"),
    ]);
    url.apply(v.generate_blank_query_string_object());
    assert_eq!(url.query.keys().collect::<Vec<_>>(), vec!["referrer"]);
}

// ===== Saved queries =====

const SAVED: &str = r#"{
    "id": "7",
    "name": "Slow pages",
    "version": 2,
    "fields": ["transaction", "p95(transaction.duration)"],
    "widths": ["-1", "250"],
    "projects": [3],
    "environment": ["prod"],
    "range": "7d",
    "orderby": "-p95_transaction_duration",
    "query": "event.type:transaction",
    "yAxis": ["p95(transaction.duration)"],
    "display": "top5",
    "topEvents": "5",
    "dataset": "transactions",
    "utc": true
}"#;

#[test]
fn test_from_saved_query() {
    let saved: SavedQuery = serde_json::from_str(SAVED).unwrap();
    let v = EventView::from_saved_query(&saved);

    assert_eq!(v.id.as_deref(), Some("7"));
    assert_eq!(v.name.as_deref(), Some("Slow pages"));
    assert_eq!(
        v.fields(),
        &[Field::new("transaction"), Field::with_width("p95(transaction.duration)", 250)]
    );
    assert_eq!(v.sorts(), &[Sort::desc("p95_transaction_duration")]);
    assert_eq!(v.stats_period.as_deref(), Some("7d"));
    assert_eq!(v.utc.as_deref(), Some("true"));
    assert_eq!(v.y_axis, vec!["p95(transaction.duration)"]);
    assert_eq!(v.dataset, Some(DiscoverDataset::Transactions));
    assert_eq!(v.project, vec![3]);
}

#[test]
fn test_saved_query_numeric_id() {
    let saved: SavedQuery =
        serde_json::from_str(r#"{"id": 17, "name": "q", "fields": ["count()"]}"#).unwrap();
    assert_eq!(saved.id.as_deref(), Some("17"));

    let v = EventView::from_saved_query(&saved);
    assert_eq!(v.id.as_deref(), Some("17"));

    let saved: SavedQuery = serde_json::from_str(r#"{"id": null, "fields": ["title"]}"#).unwrap();
    assert_eq!(saved.id, None);
}

#[test]
fn test_to_new_query_round_trip() {
    let saved: SavedQuery = serde_json::from_str(SAVED).unwrap();
    let v = EventView::from_saved_query(&saved);
    let new_query = v.to_new_query();

    assert_eq!(new_query.version, Some(2));
    assert_eq!(new_query.orderby, Some(QueryValue::from("-p95_transaction_duration")));
    assert_eq!(new_query.range.as_deref(), Some("7d"));
    assert_eq!(new_query.widths, vec!["-1", "250"]);
    assert_eq!(new_query.y_axis, Some(QueryValue::from("p95(transaction.duration)")));

    let json = serde_json::to_value(&new_query).unwrap();
    assert_eq!(json["yAxis"], "p95(transaction.duration)");
    assert_eq!(json["dataset"], "transactions");

    assert!(EventView::from_saved_query(&new_query).is_equal_to(&v, &[]));
}

#[test]
fn test_from_new_query_with_location() {
    let saved = SavedQuery {
        name: "draft".into(),
        fields: vec!["title".into()],
        ..Default::default()
    };
    let url = location(&[("project", "5"), ("environment", "dev"), ("statsPeriod", "24h")]);
    let v = EventView::from_new_query_with_location(&saved, &url);
    assert_eq!(v.project, vec![5]);
    assert_eq!(v.environment, vec!["dev"]);
    assert_eq!(v.stats_period.as_deref(), Some("24h"));

    let saved = SavedQuery { projects: vec![3], ..saved };
    let v = EventView::from_new_query_with_location(&saved, &url);
    assert_eq!(v.project, vec![3]);
}

#[test]
fn test_saved_query_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.json");
    std::fs::write(&path, SAVED).unwrap();
    let saved = SavedQuery::from_file(&path).unwrap();
    assert_eq!(saved.name, "Slow pages");

    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(SavedQuery::from_file(&path), Err(Error::Json(_))));
    assert!(matches!(
        SavedQuery::from_file(&dir.path().join("missing.json")),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_unknown_dataset_passes_through() {
    let dataset: DiscoverDataset = serde_json::from_str(r#""issuePlatform""#).unwrap();
    assert_eq!(dataset, DiscoverDataset::Other("issuePlatform".into()));
    assert_eq!(serde_json::to_string(&dataset).unwrap(), r#""issuePlatform""#);
}
