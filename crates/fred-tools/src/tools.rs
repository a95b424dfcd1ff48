//! MCP tool surface for the FRED client.
//!
//! Schemas are hand-built JSON Schema objects carrying the FRED parameter
//! enumerations and bounds; dispatch decodes the argument object into the
//! matching typed parameter struct and calls the client.

use crate::client::{
    FredClient, GetCategoryParams, GetObservationsParams, GetReleasesParams, GetSeriesParams,
    GetSeriesUpdatesParams, SearchSeriesParams,
};
use crate::error::{FredError, Result};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};
use std::sync::Arc;

/// Default `limit` applied at the tool layer for the two listing tools.
const DEFAULT_LIST_LIMIT: u32 = 20;

const ORDER_BY_SEARCH: [&str; 13] = [
    "search_rank",
    "series_id",
    "title",
    "units",
    "frequency",
    "seasonal_adjustment",
    "realtime_start",
    "realtime_end",
    "last_updated",
    "observation_start",
    "observation_end",
    "popularity",
    "group_popularity",
];

const ORDER_BY_RELEASES: [&str; 5] = [
    "release_id",
    "name",
    "press_release",
    "realtime_start",
    "realtime_end",
];

const UNITS: [&str; 9] = [
    "lin", "chg", "ch1", "pch", "pc1", "pca", "cch", "cca", "log",
];

const FREQUENCIES: [&str; 7] = ["d", "w", "bw", "m", "q", "sa", "a"];

/// List the six MCP tools exposed by the server.
#[must_use]
pub fn list_tools() -> Vec<Tool> {
    vec![
        tool(
            "search_series",
            "Search for FRED economic data series by keyword",
            json!({
                "type": "object",
                "properties": {
                    "search_text": {
                        "type": "string",
                        "description": "Keywords to search for"
                    },
                    "search_type": {
                        "type": "string",
                        "enum": ["full_text", "series_id"],
                        "description": "Type of search (default: full_text)"
                    },
                    "limit": {
                        "type": "number",
                        "minimum": 1,
                        "maximum": 1000,
                        "description": "Max results (default: 20)"
                    },
                    "offset": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Result offset for pagination"
                    },
                    "order_by": { "type": "string", "enum": ORDER_BY_SEARCH },
                    "sort_order": { "type": "string", "enum": ["asc", "desc"] },
                    "tag_names": {
                        "type": "string",
                        "description": "Semicolon-delimited tag names to filter by"
                    }
                },
                "required": ["search_text"]
            }),
        ),
        tool(
            "get_series",
            "Get metadata for a specific FRED series",
            json!({
                "type": "object",
                "properties": {
                    "series_id": {
                        "type": "string",
                        "description": "FRED series ID (e.g. GDP, UNRATE, CPIAUCSL)"
                    }
                },
                "required": ["series_id"]
            }),
        ),
        tool(
            "get_observations",
            "Get data points (observations) for a FRED series",
            json!({
                "type": "object",
                "properties": {
                    "series_id": {
                        "type": "string",
                        "description": "FRED series ID"
                    },
                    "observation_start": {
                        "type": "string",
                        "description": "Start date (YYYY-MM-DD)"
                    },
                    "observation_end": {
                        "type": "string",
                        "description": "End date (YYYY-MM-DD)"
                    },
                    "limit": {
                        "type": "number",
                        "minimum": 1,
                        "maximum": 100000,
                        "description": "Max observations (default: 10000)"
                    },
                    "offset": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Observation offset for pagination"
                    },
                    "sort_order": {
                        "type": "string",
                        "enum": ["asc", "desc"],
                        "description": "Sort by date (default: asc)"
                    },
                    "units": {
                        "type": "string",
                        "enum": UNITS,
                        "description": "Data transformation (lin=levels, pch=% change, etc.)"
                    },
                    "frequency": {
                        "type": "string",
                        "enum": FREQUENCIES,
                        "description": "Frequency aggregation"
                    }
                },
                "required": ["series_id"]
            }),
        ),
        tool(
            "get_categories",
            "Browse the FRED category tree",
            json!({
                "type": "object",
                "properties": {
                    "category_id": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Category ID (default: 0 = root)"
                    },
                    "children": {
                        "type": "boolean",
                        "description": "Get child categories instead of the category itself"
                    },
                    "series": {
                        "type": "boolean",
                        "description": "Get series in this category"
                    }
                }
            }),
        ),
        tool(
            "get_releases",
            "Get economic data releases and schedules",
            json!({
                "type": "object",
                "properties": {
                    "dates": {
                        "type": "boolean",
                        "description": "Get release dates instead of releases"
                    },
                    "limit": {
                        "type": "number",
                        "minimum": 1,
                        "maximum": 1000,
                        "description": "Max results"
                    },
                    "offset": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Result offset for pagination"
                    },
                    "order_by": { "type": "string", "enum": ORDER_BY_RELEASES },
                    "sort_order": { "type": "string", "enum": ["asc", "desc"] }
                }
            }),
        ),
        tool(
            "get_popular_series",
            "Get recently updated/popular FRED series",
            json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "number",
                        "minimum": 1,
                        "maximum": 1000,
                        "description": "Max results (default: 20)"
                    },
                    "offset": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Result offset for pagination"
                    }
                }
            }),
        ),
    ]
}

/// Execute a tool call against the FRED client.
///
/// # Errors
///
/// Returns [`FredError::UnknownTool`] for unrecognized names,
/// [`FredError::InvalidArguments`] when the arguments do not decode, and
/// otherwise whatever the client call returns (rate limit, transport, API).
pub async fn call_tool(client: &FredClient, name: &str, arguments: Value) -> Result<CallToolResult> {
    let data = match name {
        "search_series" => {
            let mut params: SearchSeriesParams = decode_args(arguments)?;
            params.limit = params.limit.or(Some(DEFAULT_LIST_LIMIT));
            client.search_series(&params).await?
        }
        "get_series" => {
            let params: GetSeriesParams = decode_args(arguments)?;
            client.get_series(&params).await?
        }
        "get_observations" => {
            let params: GetObservationsParams = decode_args(arguments)?;
            client.get_observations(&params).await?
        }
        "get_categories" => {
            let params: GetCategoryParams = decode_args(arguments)?;
            client.get_category(&params).await?
        }
        "get_releases" => {
            let params: GetReleasesParams = decode_args(arguments)?;
            client.get_releases(&params).await?
        }
        "get_popular_series" => {
            let mut params: GetSeriesUpdatesParams = decode_args(arguments)?;
            params.limit = params.limit.or(Some(DEFAULT_LIST_LIMIT));
            client.get_series_updates(&params).await?
        }
        other => return Err(FredError::UnknownTool(other.to_string())),
    };

    let text = serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string());
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn decode_args<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| FredError::InvalidArguments(e.to_string()))
}

fn tool(name: &'static str, description: &'static str, schema: Value) -> Tool {
    let schema_obj = schema.as_object().cloned().unwrap_or_else(JsonObject::new);
    let mut tool = Tool::new(name, description, Arc::new(schema_obj));
    // All six tools are GETs against an external system.
    tool.annotations = Some(ToolAnnotations {
        title: None,
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    });
    tool
}
