//! MCP (Model Context Protocol) tool server
//!
//! JSON-RPC 2.0 over a line-delimited stream, normally stdio. Each tool call
//! runs on a blocking worker under a timeout. A call that times out is
//! abandoned and reported as a tool error; matching never mutates the index,
//! so the abandoned worker can finish on its own.

use std::sync::Arc;
use std::time::Duration;

use platform_context_core::{ApiResult, PlatformApi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::format;

/// MCP protocol version
const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "platform-context";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// JSON-RPC 2.0 error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ServerCapabilities {
    tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
struct ToolsCapability {
    #[serde(rename = "listChanged")]
    list_changed: bool,
}

#[derive(Debug, Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    protocol_version: String,
    capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

#[derive(Debug, Serialize)]
struct ToolsListResult {
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct ToolResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ToolContent {
    #[serde(rename = "type")]
    content_type: String,
    text: String,
}

impl ToolResult {
    fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text: message,
            }],
            is_error: Some(true),
        }
    }
}

fn define_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "search".to_string(),
            description: "Search the platform API by name or natural-language phrase. \
                          Finds global methods, global properties, types and type members."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search text, e.g. 'Таблица значений' or 'найти по ссылке'"
                    },
                    "type": {
                        "type": "string",
                        "description": "Restrict to one kind: method, property or type"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results (default 10, max 50)"
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "info".to_string(),
            description: "Detailed card for an element with the exact given name".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Exact element name (case-insensitive)"
                    },
                    "type": {
                        "type": "string",
                        "description": "Restrict to one kind: method, property or type"
                    }
                },
                "required": ["name"]
            }),
        },
        Tool {
            name: "getMember".to_string(),
            description: "Method or property declared by a type".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "typeName": {
                        "type": "string",
                        "description": "Type name, e.g. 'ТаблицаЗначений'"
                    },
                    "memberName": {
                        "type": "string",
                        "description": "Member name, e.g. 'Добавить'"
                    }
                },
                "required": ["typeName", "memberName"]
            }),
        },
        Tool {
            name: "getMembers".to_string(),
            description: "All methods and properties of a type".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "typeName": {
                        "type": "string",
                        "description": "Type name"
                    }
                },
                "required": ["typeName"]
            }),
        },
        Tool {
            name: "getConstructors".to_string(),
            description: "Constructor signatures of a type".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "typeName": {
                        "type": "string",
                        "description": "Type name"
                    }
                },
                "required": ["typeName"]
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct InfoArgs {
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberArgs {
    type_name: String,
    member_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeArgs {
    type_name: String,
}

/// A validated tool invocation.
#[derive(Debug)]
enum ToolCall {
    Search(SearchArgs),
    Info(InfoArgs),
    GetMember(MemberArgs),
    GetMembers(TypeArgs),
    GetConstructors(TypeArgs),
}

impl ToolCall {
    fn parse(params: Value) -> std::result::Result<Self, String> {
        let call: CallParams =
            serde_json::from_value(params).map_err(|e| format!("invalid tool call: {}", e))?;
        let arguments = match call.arguments {
            Value::Null => json!({}),
            other => other,
        };

        let parsed = match call.name.as_str() {
            "search" => serde_json::from_value(arguments).map(ToolCall::Search),
            "info" => serde_json::from_value(arguments).map(ToolCall::Info),
            "getMember" => serde_json::from_value(arguments).map(ToolCall::GetMember),
            "getMembers" => serde_json::from_value(arguments).map(ToolCall::GetMembers),
            "getConstructors" => serde_json::from_value(arguments).map(ToolCall::GetConstructors),
            other => return Err(format!("unknown tool: {}", other)),
        };
        parsed.map_err(|e| format!("invalid arguments for {}: {}", call.name, e))
    }

    fn name(&self) -> &'static str {
        match self {
            ToolCall::Search(_) => "search",
            ToolCall::Info(_) => "info",
            ToolCall::GetMember(_) => "getMember",
            ToolCall::GetMembers(_) => "getMembers",
            ToolCall::GetConstructors(_) => "getConstructors",
        }
    }

    /// Run against the API and render the Markdown answer.
    fn execute(&self, api: &PlatformApi) -> ApiResult<String> {
        match self {
            ToolCall::Search(args) => {
                let hits = api.search(&args.query, args.kind.as_deref(), args.limit)?;
                Ok(format::search_results(&args.query, &hits))
            }
            ToolCall::Info(args) => {
                let element = api.info(&args.name, args.kind.as_deref())?;
                Ok(format::element_card(&element, None))
            }
            ToolCall::GetMember(args) => {
                let hit = api.get_member(&args.type_name, &args.member_name)?;
                Ok(format::member_card(&hit))
            }
            ToolCall::GetMembers(args) => {
                let ty = api.get_members(&args.type_name)?;
                Ok(format::type_members(&ty))
            }
            ToolCall::GetConstructors(args) => {
                let constructors = api.get_constructors(&args.type_name)?;
                Ok(format::constructors(args.type_name.trim(), &constructors))
            }
        }
    }
}

/// Serves platform API tools to an MCP client.
pub struct McpServer {
    api: Arc<PlatformApi>,
    timeout: Duration,
}

impl McpServer {
    pub fn new(api: Arc<PlatformApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run_stdio(&self) -> Result<()> {
        info!(
            server = SERVER_NAME,
            version = SERVER_VERSION,
            protocol = PROTOCOL_VERSION,
            "Starting MCP server (stdio)"
        );
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve line-delimited JSON-RPC until `reader` reaches end of input.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!(request = %line, "MCP request");

            let Some(response) = self.handle_line(line).await else {
                continue;
            };
            let mut frame = serde_json::to_string(&response)?;
            frame.push('\n');
            writer.write_all(frame.as_bytes()).await?;
            writer.flush().await?;
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one frame. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ))
            }
        };
        let id = value.get("id").cloned();

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ))
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid JSON-RPC version",
            ));
        }

        match request.id {
            None => {
                debug!(method = %request.method, "MCP notification");
                None
            }
            Some(id) => Some(self.handle_request(id, &request.method, request.params).await),
        }
    }

    async fn handle_request(&self, id: Value, method: &str, params: Value) -> JsonRpcResponse {
        let id = Some(id);
        let result = match method {
            "initialize" => to_result(&InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: ServerCapabilities {
                    tools: ToolsCapability {
                        list_changed: false,
                    },
                },
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: SERVER_VERSION.to_string(),
                },
            }),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(&ToolsListResult {
                tools: define_tools(),
            }),
            "tools/call" => match ToolCall::parse(params) {
                Ok(call) => to_result(&self.call_tool(call).await),
                Err(message) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, message);
                }
            },
            other => {
                return JsonRpcResponse::error(
                    id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", other),
                );
            }
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                error!(error = %e, method, "Failed to serialize MCP result");
                JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {}", e))
            }
        }
    }

    async fn call_tool(&self, call: ToolCall) -> ToolResult {
        let tool = call.name();
        let api = Arc::clone(&self.api);
        let task = tokio::task::spawn_blocking(move || call.execute(&api));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(text))) => ToolResult::text(text),
            Ok(Ok(Err(e))) => {
                debug!(tool, error = %e, "Tool returned an error");
                ToolResult::error(format::error(&e))
            }
            Ok(Err(e)) => {
                error!(tool, error = %e, "Tool worker failed");
                ToolResult::error(format!("❌ **Error:** {} failed", tool))
            }
            Err(_) => {
                warn!(
                    tool,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Tool call timed out"
                );
                ToolResult::error(format!(
                    "❌ **Error:** {} timed out after {} ms",
                    tool,
                    self.timeout.as_millis()
                ))
            }
        }
    }
}

fn to_result<T: Serialize>(value: &T) -> serde_json::Result<Value> {
    serde_json::to_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_parsing() {
        let call = ToolCall::parse(json!({
            "name": "search",
            "arguments": {"query": "массив", "type": "тип", "limit": 3}
        }))
        .unwrap();
        match call {
            ToolCall::Search(args) => {
                assert_eq!(args.query, "массив");
                assert_eq!(args.kind.as_deref(), Some("тип"));
                assert_eq!(args.limit, Some(3));
            }
            other => panic!("unexpected call: {:?}", other),
        }

        let call = ToolCall::parse(json!({
            "name": "getMember",
            "arguments": {"typeName": "Массив", "memberName": "Добавить"}
        }))
        .unwrap();
        assert_eq!(call.name(), "getMember");
    }

    #[test]
    fn test_tool_call_rejects_bad_input() {
        let err = ToolCall::parse(json!({"name": "delete", "arguments": {}})).unwrap_err();
        assert_eq!(err, "unknown tool: delete");

        let err = ToolCall::parse(json!({"name": "getMembers"})).unwrap_err();
        assert!(err.starts_with("invalid arguments for getMembers"));
    }

    #[test]
    fn test_tools_are_listed_with_schemas() {
        let names: Vec<String> = define_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec!["search", "info", "getMember", "getMembers", "getConstructors"]
        );
    }
}
