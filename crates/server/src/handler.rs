//! MCP server handler wiring the tool catalog to the transport.

use fred_tools::{FredClient, FredError, tools};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use serde_json::Value;

pub struct FredServer {
    client: FredClient,
}

impl FredServer {
    #[must_use]
    pub fn new(client: FredClient) -> Self {
        Self { client }
    }
}

impl ServerHandler for FredServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fred-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Query FRED (Federal Reserve Economic Data): search series, fetch series \
                 metadata and observations, browse categories, and list releases. All tools \
                 are read-only. Outbound calls are limited to 120 per minute."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: tools::list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request.arguments.map_or(Value::Null, Value::Object);

        match tools::call_tool(&self.client, &request.name, arguments).await {
            Ok(result) => Ok(result),
            // Protocol-level failures: the caller sent something we cannot route.
            Err(e @ (FredError::UnknownTool(_) | FredError::InvalidArguments(_))) => {
                Err(ErrorData::invalid_params(e.to_string(), None))
            }
            // Execution failures (rate limit, upstream, transport) are tool results.
            Err(e) => {
                tracing::warn!(tool = %request.name, error = %e, "tool call failed");
                Ok(CallToolResult {
                    content: vec![Content::text(e.to_string())],
                    structured_content: None,
                    is_error: Some(true),
                    meta: None,
                })
            }
        }
    }
}
