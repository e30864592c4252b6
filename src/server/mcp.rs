//! MCP protocol implementation for JSON-RPC 2.0 communication.
//!
//! This module provides the core MCP server implementation including:
//! - JSON-RPC 2.0 request/response handling
//! - Tool definitions and schemas
//! - Line-delimited stdio transport with a final flush of open blueprints

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::{handle_tool_call, SharedState};

#[cfg(test)]
#[path = "mcp_tests.rs"]
mod mcp_tests;

/// JSON-RPC parse error code.
pub const PARSE_ERROR: i32 = -32700;
/// JSON-RPC method-not-found error code.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC invalid-params error code.
pub const INVALID_PARAMS: i32 = -32602;
/// JSON-RPC internal error code.
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request identifier (None for notifications).
    pub id: Option<Value>,
    /// The method name to invoke.
    pub method: String,
    /// Optional parameters for the method.
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: String,
    /// Request identifier (null for notifications and parse errors).
    pub id: Value,
    /// The result on success (mutually exclusive with error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// The error on failure (mutually exclusive with result).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// Error code (negative for predefined errors).
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// MCP server information returned during initialization.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    /// The server name identifier.
    pub name: String,
    /// The server version string.
    pub version: String,
}

/// MCP server capabilities advertised to clients.
#[derive(Debug, Serialize)]
pub struct Capabilities {
    /// Tool-related capabilities.
    pub tools: ToolCapabilities,
}

/// Tool-specific capabilities.
#[derive(Debug, Serialize)]
pub struct ToolCapabilities {
    /// Whether the tool list can change dynamically.
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Result of the MCP initialize handshake.
#[derive(Debug, Serialize)]
pub struct InitializeResult {
    /// The MCP protocol version supported.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server capabilities.
    pub capabilities: Capabilities,
    /// Server identification information.
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// MCP tool definition with JSON Schema.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    /// Unique tool name (used in tool calls).
    pub name: String,
    /// Human-readable description of the tool.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Parameters for a tools/call request.
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    /// The name of the tool to invoke.
    pub name: String,
    /// Optional arguments for the tool.
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Content item within a tool result.
#[derive(Debug, Serialize)]
pub struct ToolResultContent {
    /// The content type (e.g., "text").
    #[serde(rename = "type")]
    pub content_type: String,
    /// The text content of the result.
    pub text: String,
}

/// Result of a tool invocation.
#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    /// The result content items.
    pub content: Vec<ToolResultContent>,
    /// Whether the result represents an error.
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl JsonRpcResponse {
    /// Create a success response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP Server running over stdio.
///
/// Handles JSON-RPC 2.0 messages over stdin/stdout for MCP protocol
/// communication with clients.
pub struct McpServer {
    /// Shared application state.
    state: SharedState,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }

    /// Run the server using async stdio
    pub async fn run(&self) -> std::io::Result<()> {
        info!("JDX Tech Hub MCP server starting...");
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve line-delimited JSON-RPC from `reader` to `writer` until EOF,
    /// then stop running timers and save every dirty blueprint.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            // EOF reached
            if bytes_read == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!(request = %trimmed, "Received request");

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    error!(error = %e, "Failed to parse request");
                    Some(JsonRpcResponse::error(
                        None,
                        PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))
                }
            };

            // Only send response if not a notification (JSON-RPC 2.0)
            if let Some(response) = response {
                let response_json = serde_json::to_string(&response)?;
                debug!(response = %response_json, "Sending response");

                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        let failed = self.state.flush_all(Utc::now()).await;
        if failed > 0 {
            error!(failed, "Unsaved blueprint changes lost on shutdown");
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    ///
    /// Returns None for notifications (requests without id).
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let is_notification = request.id.is_none();

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(request.id)),
            "initialized" | "notifications/initialized" => {
                debug!("Received initialized notification");
                None
            }
            "notifications/cancelled" => {
                debug!("Received cancelled notification");
                None
            }
            "tools/list" => Some(self.handle_tools_list(request.id)),
            "tools/call" => Some(self.handle_tool_call(request.id, request.params).await),
            "ping" => Some(JsonRpcResponse::success(
                request.id,
                Value::Object(Default::default()),
            )),
            method => {
                if is_notification {
                    debug!(method = %method, "Unknown notification, ignoring");
                    None
                } else {
                    error!(method = %method, "Unknown method");
                    Some(JsonRpcResponse::error(
                        request.id,
                        METHOD_NOT_FOUND,
                        format!("Method not found: {}", method),
                    ))
                }
            }
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("Handling initialize request");

        let result = InitializeResult {
            protocol_version: "2024-11-05".to_string(),
            capabilities: Capabilities {
                tools: ToolCapabilities {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: "jdx-tech-hub".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => {
                error!(error = %e, "Failed to serialize initialize result");
                JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {}", e))
            }
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("Handling tools/list request");

        JsonRpcResponse::success(
            id,
            serde_json::json!({
                "tools": all_tools()
            }),
        )
    }

    /// Handle tools/call request
    async fn handle_tool_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params");
            }
        };

        info!(tool = %params.name, "Handling tool call");

        let (content, is_error) =
            match handle_tool_call(&self.state, &params.name, params.arguments).await {
                Ok(result) => {
                    let text = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                        error!(error = %e, "Failed to serialize tool result");
                        format!("{{\"error\": \"Serialization failed: {}\"}}", e)
                    });
                    (
                        ToolResultContent {
                            content_type: "text".to_string(),
                            text,
                        },
                        None,
                    )
                }
                Err(e) => {
                    error!(tool = %params.name, error = %e, "Tool call failed");
                    (
                        ToolResultContent {
                            content_type: "text".to_string(),
                            text: format!("Error: {}", e),
                        },
                        Some(true),
                    )
                }
            };

        let tool_result = ToolCallResult {
            content: vec![content],
            is_error,
        };

        match serde_json::to_value(tool_result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => {
                error!(error = %e, "Failed to serialize tool call result");
                JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {}", e))
            }
        }
    }
}

/// Every tool advertised by `tools/list`.
pub fn all_tools() -> Vec<Tool> {
    vec![
        // Projects
        get_project_create_tool(),
        get_project_get_tool(),
        get_project_list_tool(),
        get_project_update_tool(),
        get_project_delete_tool(),
        // Templates
        get_template_list_tool(),
        // Blueprint lifecycle
        get_blueprint_open_tool(),
        get_blueprint_get_tool(),
        get_blueprint_save_tool(),
        // Progress
        get_toggle_checklist_tool(),
        get_stats_tool(),
        get_next_task_tool(),
        get_complete_phase_tool(),
        // Time tracking
        get_timer_start_tool(),
        get_timer_stop_tool(),
        get_reset_time_tool(),
        // Decisions, credentials, context
        get_add_decision_tool(),
        get_delete_decision_tool(),
        get_set_credential_tool(),
        get_context_tool(),
    ]
}

/// Schema fragment for the project id argument.
fn project_id_property() -> Value {
    serde_json::json!({
        "type": "string",
        "description": "Project ID"
    })
}

/// Schema taking only a project id.
fn project_only_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "project_id": project_id_property()
        },
        "required": ["project_id"],
        "additionalProperties": false
    })
}

fn get_project_create_tool() -> Tool {
    Tool {
        name: "project_create".to_string(),
        description: "Create a project. Returns the stored record with its generated id.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Project name"
                },
                "description": {
                    "type": "string",
                    "description": "What the project is"
                },
                "status": {
                    "type": "string",
                    "description": "Free-form status label (default: active)"
                },
                "tech_stack": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Technologies used"
                }
            },
            "required": ["name"],
            "additionalProperties": false
        }),
    }
}

fn get_project_get_tool() -> Tool {
    Tool {
        name: "project_get".to_string(),
        description: "Get a project record by id.".to_string(),
        input_schema: project_only_schema(),
    }
}

fn get_project_list_tool() -> Tool {
    Tool {
        name: "project_list".to_string(),
        description: "List all projects, most recently updated first.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    }
}

fn get_project_update_tool() -> Tool {
    Tool {
        name: "project_update".to_string(),
        description: "Update a project's fields. Omitted fields keep their value.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "name": {"type": "string"},
                "description": {"type": "string"},
                "status": {"type": "string"},
                "tech_stack": {
                    "type": "array",
                    "items": {"type": "string"}
                }
            },
            "required": ["project_id"],
            "additionalProperties": false
        }),
    }
}

fn get_project_delete_tool() -> Tool {
    Tool {
        name: "project_delete".to_string(),
        description: "Delete a project and its blueprint. Unsaved blueprint changes are discarded.".to_string(),
        input_schema: project_only_schema(),
    }
}

fn get_template_list_tool() -> Tool {
    Tool {
        name: "template_list".to_string(),
        description: "List blueprint templates with phase and task counts.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    }
}

fn get_blueprint_open_tool() -> Tool {
    Tool {
        name: "blueprint_open".to_string(),
        description: "Open a project's blueprint and start a work session. Projects without a blueprint are seeded from a template.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "template": {
                    "type": "string",
                    "enum": ["jdx-tech-hub", "saas", "website", "mobile", "custom"],
                    "description": "Template for a new blueprint (default from config)"
                }
            },
            "required": ["project_id"],
            "additionalProperties": false
        }),
    }
}

fn get_blueprint_get_tool() -> Tool {
    Tool {
        name: "blueprint_get".to_string(),
        description: "Get the full blueprint document. Credential values are redacted.".to_string(),
        input_schema: project_only_schema(),
    }
}

fn get_blueprint_save_tool() -> Tool {
    Tool {
        name: "blueprint_save".to_string(),
        description: "Save the blueprint now instead of waiting for autosave.".to_string(),
        input_schema: project_only_schema(),
    }
}

fn get_toggle_checklist_tool() -> Tool {
    Tool {
        name: "blueprint_toggle_checklist".to_string(),
        description: "Flip one checklist item. The task completes when every item is checked.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "task_id": {
                    "type": "string",
                    "description": "Task owning the checklist"
                },
                "index": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Zero-based checklist item index"
                }
            },
            "required": ["project_id", "task_id", "index"],
            "additionalProperties": false
        }),
    }
}

fn get_stats_tool() -> Tool {
    Tool {
        name: "blueprint_stats".to_string(),
        description: "Completion rate, time spent, per-phase progress and today's sessions.".to_string(),
        input_schema: project_only_schema(),
    }
}

fn get_next_task_tool() -> Tool {
    Tool {
        name: "blueprint_next_task".to_string(),
        description: "Recommend the next task: critical blockers first, then in-progress work, then priority order.".to_string(),
        input_schema: project_only_schema(),
    }
}

fn get_complete_phase_tool() -> Tool {
    Tool {
        name: "blueprint_complete_phase".to_string(),
        description: "Mark every task and checklist item of a phase completed.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "phase_id": {
                    "type": "string",
                    "description": "Phase to complete"
                }
            },
            "required": ["project_id", "phase_id"],
            "additionalProperties": false
        }),
    }
}

/// Schema taking a project id and a task id.
fn task_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "project_id": project_id_property(),
            "task_id": {
                "type": "string",
                "description": description
            }
        },
        "required": ["project_id", "task_id"],
        "additionalProperties": false
    })
}

fn get_timer_start_tool() -> Tool {
    Tool {
        name: "blueprint_timer_start".to_string(),
        description: "Start timing a task. A running timer is stopped and recorded first.".to_string(),
        input_schema: task_schema("Task to time"),
    }
}

fn get_timer_stop_tool() -> Tool {
    Tool {
        name: "blueprint_timer_stop".to_string(),
        description: "Stop the running timer and add the elapsed time to its task.".to_string(),
        input_schema: project_only_schema(),
    }
}

fn get_reset_time_tool() -> Tool {
    Tool {
        name: "blueprint_reset_time".to_string(),
        description: "Reset the recorded time of a task to zero.".to_string(),
        input_schema: task_schema("Task whose time to reset"),
    }
}

fn get_add_decision_tool() -> Tool {
    Tool {
        name: "blueprint_add_decision".to_string(),
        description: "Record a decision with its reason and impact. It is linked to the current focus task.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "decision": {
                    "type": "string",
                    "minLength": 1,
                    "description": "What was decided"
                },
                "reason": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Why"
                },
                "impact": {
                    "type": "string",
                    "description": "Expected impact"
                }
            },
            "required": ["project_id", "decision", "reason"],
            "additionalProperties": false
        }),
    }
}

fn get_delete_decision_tool() -> Tool {
    Tool {
        name: "blueprint_delete_decision".to_string(),
        description: "Remove a decision from the log.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "decision_id": {
                    "type": "string",
                    "description": "Decision to remove"
                }
            },
            "required": ["project_id", "decision_id"],
            "additionalProperties": false
        }),
    }
}

fn get_set_credential_tool() -> Tool {
    Tool {
        name: "blueprint_set_credential".to_string(),
        description: "Store a credential value on the blueprint, or remove it when value is omitted.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "key": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Credential name"
                },
                "value": {
                    "type": "string",
                    "description": "Credential value; omit to remove"
                }
            },
            "required": ["project_id", "key"],
            "additionalProperties": false
        }),
    }
}

fn get_context_tool() -> Tool {
    Tool {
        name: "blueprint_context".to_string(),
        description: "Render a plain-text project briefing to paste into an assistant chat. Never includes credentials.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "project_id": project_id_property(),
                "kind": {
                    "type": "string",
                    "enum": ["continue", "debug", "feature", "question"],
                    "description": "Briefing flavour (default: continue)"
                }
            },
            "required": ["project_id"],
            "additionalProperties": false
        }),
    }
}
