//! MCP server implementation for quickopen.
//!
//! Exposes browser search as MCP tools for AI editors.

use std::borrow::Cow;
use std::fmt::Write;

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::Deserialize;

use crate::commands;

/// Parameters for `search_browser` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    #[schemars(
        description = "The search query. Prefix with 'h ', 'b ', 't ' or 's ' to search only history, bookmarks, tabs or search engines, '#' for tags, '~' for folders"
    )]
    pub query: String,
    #[schemars(description = "Maximum number of results to show (default: all)")]
    pub limit: Option<usize>,
}

/// MCP server exposing quickopen tools.
#[derive(Clone)]
pub struct QuickopenServer {
    tool_router: ToolRouter<Self>,
}

impl Default for QuickopenServer {
    fn default() -> Self {
        Self::new()
    }
}

fn internal_error(context: &str, e: &anyhow::Error) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(format!("{context}: {e}")),
        data: None,
    }
}

#[tool_router]
impl QuickopenServer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Search open tabs, bookmarks and browsing history")]
    async fn search_browser(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let state = commands::run_search(&params.query, None, None)
            .map_err(|e| internal_error("Search failed", &e))?;

        if state.results.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(format!(
                "No matches found for '{}'",
                params.query
            ))]));
        }

        let limit = params.limit.unwrap_or(state.count());
        let mut output = String::new();
        for item in state.results.iter().take(limit) {
            let title = item.title.as_deref().unwrap_or(&item.url);
            let _ = write!(
                output,
                "- **{}** ({}, score {:.1})\n  {}\n",
                title, item.kind, item.score, item.original_url
            );
            if let Some(tags) = item.tags.as_ref().filter(|t| !t.is_empty()) {
                let _ = writeln!(output, "  tags: {}", tags.join(", "));
            }
        }
        let _ = write!(output, "*{} result(s) in {} mode*", state.count(), state.mode);

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(description = "Show how many tabs, bookmarks and history items are available")]
    async fn list_sources(&self) -> Result<CallToolResult, McpError> {
        let counts =
            commands::sources(None).map_err(|e| internal_error("Failed to load sources", &e))?;

        let output = format!(
            "- tabs: {}\n- bookmarks: {}\n- history: {}",
            counts.tabs, counts.bookmarks, counts.history
        );
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }
}

#[tool_handler]
impl ServerHandler for QuickopenServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "quickopen searches the user's browser tabs, bookmarks and history. \
                Use search_browser to find pages and list_sources to see what data is available."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Start the MCP server with stdio transport.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn serve() -> anyhow::Result<()> {
    let server = QuickopenServer::new();
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
