// src/constants.rs

//! Shared literals.

/// Separator used to render a location path (`a.0.b`) when annotating failures.
pub const PATH_SEPARATOR: &str = ".";

/// First line of the message of an aggregated pending failure.
pub const AGGREGATE_HEADER: &str = "Pending values rejected:";

/// Prefix of each failure line in an aggregated failure message.
pub const AGGREGATE_BULLET: &str = "\n - ";

/// File extension recognised as a TOML options layer.
pub const TOML_EXTENSION: &str = "toml";

/// File extension recognised as a JSON options layer.
pub const JSON_EXTENSION: &str = "json";
