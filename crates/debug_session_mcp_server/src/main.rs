use std::collections::BTreeMap;
use std::sync::Arc;

use debug_session_core::types::{StartRequest, StepCommand};
use debug_session_core::{DebugClient, DebugConfig, SessionController};
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::*,
    tool, tool_handler, tool_router, transport, ErrorData as McpError, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct EmptyParams {}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct StartParams {
    source_code: String,
    #[serde(default)]
    aux_files: Option<BTreeMap<String, String>>,
    #[serde(default)]
    inputs: Option<Map<String, Value>>,
}

impl StartParams {
    fn into_request(self) -> StartRequest {
        StartRequest {
            source_code: self.source_code,
            aux_files: self.aux_files,
            inputs: self.inputs.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct StepParams {
    /// One of: next, stepIn, stepOut, continue
    command: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
struct ToggleBreakpointParams {
    line: u32,
}

#[derive(Clone)]
struct DebugSessionMcpServer {
    tool_router: ToolRouter<Self>,
    controller: Arc<SessionController<DebugClient>>,
}

fn parse_step_command(command: &str) -> Result<StepCommand, McpError> {
    command
        .parse::<StepCommand>()
        .map_err(|e| McpError::invalid_params(e, None))
}

#[tool_router]
impl DebugSessionMcpServer {
    fn new(controller: Arc<SessionController<DebugClient>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            controller,
        }
    }

    fn outcome(&self, ok: bool) -> CallToolResult {
        CallToolResult::structured(json!({
            "ok": ok,
            "status": self.controller.status(),
        }))
    }

    #[tool(description = "Check whether the debug-adapter server is reachable")]
    async fn debug_health(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        let available = self.controller.health_check().await;
        Ok(CallToolResult::structured(json!({ "available": available })))
    }

    #[tool(description = "Compile the program and start a debugging session paused at entry")]
    async fn debug_start(
        &self,
        params: Parameters<StartParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0.into_request();
        let ok = self.controller.start(&request).await;
        Ok(self.outcome(ok))
    }

    #[tool(description = "Stop the current debugging session (breakpoints are kept)")]
    async fn debug_stop(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        self.controller.stop().await;
        Ok(self.outcome(true))
    }

    #[tool(description = "Terminate the current session and start a new one")]
    async fn debug_restart(
        &self,
        params: Parameters<StartParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = params.0.into_request();
        let ok = self.controller.restart(&request).await;
        Ok(self.outcome(ok))
    }

    #[tool(description = "Execute one step command: next, stepIn, stepOut or continue")]
    async fn debug_step(&self, params: Parameters<StepParams>) -> Result<CallToolResult, McpError> {
        let command = parse_step_command(&params.0.command)?;
        let ok = self.controller.step(command).await;
        Ok(self.outcome(ok))
    }

    #[tool(description = "Add or remove the breakpoint on a source line")]
    async fn debug_toggle_breakpoint(
        &self,
        params: Parameters<ToggleBreakpointParams>,
    ) -> Result<CallToolResult, McpError> {
        self.controller.toggle_breakpoint(params.0.line).await;
        Ok(self.outcome(true))
    }

    #[tool(description = "Clear the latest reported error")]
    async fn debug_clear_error(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        self.controller.clear_error();
        Ok(self.outcome(true))
    }

    #[tool(description = "Current session state, pause location, breakpoints and debug data")]
    async fn debug_status(
        &self,
        _params: Parameters<EmptyParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.outcome(true))
    }
}

#[tool_handler]
impl ServerHandler for DebugSessionMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Step-through debugging against a remote debug-adapter server. \
                 Start a session, toggle breakpoints, then step."
                    .into(),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = DebugConfig::from_env();
    tracing::info!("Using debug adapter at {}", config.endpoint);
    let controller = Arc::new(SessionController::from_config(config)?);

    let server = DebugSessionMcpServer::new(controller);
    let transport = transport::stdio();

    tracing::info!("Starting Debug Session MCP Server on stdio...");

    server.serve(transport).await?.waiting().await?;

    Ok(())
}
