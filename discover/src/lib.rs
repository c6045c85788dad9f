//! Discover: the query model behind an events explorer.
//!
//! Parses field expressions and search queries, keeps the state of a query
//! as an [`EventView`], and turns it into API payloads and URL parameters.

pub mod config;
pub mod dates;
pub mod error;
pub mod event_view;
pub mod fields;
pub mod location;
pub mod search;
pub mod table;
pub mod units;

pub use config::{Config, DisplayConfig};
pub use error::{Error, Result};
pub use event_view::{
    DiscoverDataset, DisplayMode, EventView, EventViewKey, EventViewProps, EventsPayload,
    MetricsPayload, PayloadOptions, SavedQuery, Sort, SortKind,
};
pub use fields::{
    explode_field_string, generate_field_as_string, get_aggregate_alias, Column, Field, MetaType,
};
pub use location::{Location, Query, QueryValue};
pub use search::{MutableSearch, Token, TokenType};
pub use table::{scale_tabular_data_column, TableData, TableDataRow};
pub use units::{
    convert_duration, convert_rate, convert_size, DurationUnit, RateUnit, SizeUnit, Unit,
};
