use std::sync::Arc;

use postman_runner_core::schema::run_request_schema;
use postman_runner_core::{
    CallError, CollectionRunner, RunRequest, TestResult, RUN_COLLECTION_TOOL_DESCRIPTION,
    RUN_COLLECTION_TOOL_NAME,
};
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::transport::stdio;
use rmcp::{ErrorData, RoleServer, ServiceExt};
use serde_json::json;

use super::envelope;
use super::transport::ClientScript;

pub(super) const SERVER_NAME: &str = "postman-runner";

const TEST_TRANSPORT_ENV: &str = "POSTMAN_RUNNER_MCP_TEST_TRANSPORT";
const EXIT_IMMEDIATELY_ENV: &str = "POSTMAN_RUNNER_MCP_EXIT_IMMEDIATELY";
const BAD_TRANSPORT_ENV: &str = "POSTMAN_RUNNER_MCP_BAD_TRANSPORT";

fn env_flag(name: &str) -> bool {
    std::env::var_os(name).is_some()
}

/// Serves the `run-collection` tool. Calls share the runner and nothing else.
#[derive(Clone, Debug)]
pub(super) struct McpServer {
    runner: Arc<CollectionRunner>,
}

impl McpServer {
    pub(super) fn new(runner: Arc<CollectionRunner>) -> Self {
        Self { runner }
    }

    /// Routes a tool call. Only an unknown tool name is a protocol error;
    /// every other failure is reported inside the envelope.
    pub(super) async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        if name != RUN_COLLECTION_TOOL_NAME {
            return Err(unknown_tool_error(name));
        }
        match self.run_collection(arguments).await {
            Ok(result) => Ok(envelope::success(&result)),
            Err(error) => {
                log::warn!("{RUN_COLLECTION_TOOL_NAME} failed: {error}");
                Ok(envelope::failure(error.message()))
            }
        }
    }

    async fn run_collection(&self, arguments: Option<JsonObject>) -> Result<TestResult, CallError> {
        let request = RunRequest::from_arguments(arguments)?;
        Ok(self.runner.run_collection(&request).await?)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::default()
            },
            ..ServerInfo::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: vec![run_collection_tool()],
            ..Default::default()
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.dispatch(&request.name, request.arguments).await }
    }
}

pub(super) fn run_collection_tool() -> Tool {
    Tool {
        name: RUN_COLLECTION_TOOL_NAME.into(),
        title: None,
        description: Some(RUN_COLLECTION_TOOL_DESCRIPTION.into()),
        input_schema: run_request_schema(),
        output_schema: None,
        annotations: None,
        icons: None,
    }
}

pub(super) fn unknown_tool_error(name: &str) -> ErrorData {
    ErrorData::invalid_params(
        format!("Unknown tool: {name}"),
        Some(json!({ "available_tools": [RUN_COLLECTION_TOOL_NAME] })),
    )
}

pub(super) async fn run_stdio(runner: Arc<CollectionRunner>) -> Result<(), String> {
    let server = McpServer::new(runner);
    let service = if env_flag(TEST_TRANSPORT_ENV) {
        let script = if env_flag(BAD_TRANSPORT_ENV) {
            ClientScript::HangUp
        } else {
            ClientScript::Handshake
        };
        let transport = script.transport();
        server
            .serve(transport)
            .await
            .map_err(|error| format!("failed to start MCP stdio server: {error}"))?
    } else {
        server
            .serve(stdio())
            .await
            .map_err(|error| format!("failed to start MCP stdio server: {error}"))?
    };
    log::info!("serving {RUN_COLLECTION_TOOL_NAME} over MCP stdio");
    if env_flag(EXIT_IMMEDIATELY_ENV) {
        service
            .cancel()
            .await
            .map_err(|error| format!("MCP stdio server failed: {error}"))?;
        return Ok(());
    }
    service
        .waiting()
        .await
        .map_err(|error| format!("MCP stdio server failed: {error}"))?;
    Ok(())
}
