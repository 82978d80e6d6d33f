use crate::tools::{self, SwarmTool};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::Path;
use swarm_core::ops::envelope;

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
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
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    is_error: bool,
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

pub fn run(root: &Path) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let tools = tools::all_tools();
    tracing::info!(root = %root.display(), tools = tools.len(), "tool server ready");

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(response) = handle_line(&line, &tools, root) else {
            continue;
        };
        let mut out = stdout.lock();
        serde_json::to_writer(&mut out, &response)?;
        writeln!(out)?;
        out.flush()?;
    }

    tracing::info!("stdin closed, tool server exiting");
    Ok(())
}

/// One input line in, at most one response out. Blank lines and
/// notifications (no `id` key) produce nothing.
pub fn handle_line(
    line: &str,
    tools: &[Box<dyn SwarmTool>],
    root: &Path,
) -> Option<JsonRpcResponse> {
    if line.trim().is_empty() {
        return None;
    }

    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "unparsable request line");
            return Some(JsonRpcResponse::failure(
                None,
                PARSE_ERROR,
                format!("parse error: {e}"),
            ));
        }
    };

    if !raw
        .as_object()
        .map(|o| o.contains_key("id"))
        .unwrap_or(false)
    {
        if !raw.is_object() {
            return Some(JsonRpcResponse::failure(
                None,
                INVALID_REQUEST,
                "invalid request: expected an object",
            ));
        }
        tracing::debug!(method = ?raw.get("method"), "notification ignored");
        return None;
    }

    let id = raw.get("id").cloned();
    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                format!("invalid request: {e}"),
            ));
        }
    };

    Some(handle_request(&request, tools, root))
}

// ---------------------------------------------------------------------------
// Request dispatch (pub for unit tests)
// ---------------------------------------------------------------------------

pub fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn SwarmTool>],
    root: &Path,
) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "swarm",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),

        "ping" => JsonRpcResponse::success(id, serde_json::json!({})),

        "tools/list" => {
            let tool_list: Vec<Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name(),
                        "description": t.description(),
                        "inputSchema": t.schema()
                    })
                })
                .collect();
            JsonRpcResponse::success(id, serde_json::json!({ "tools": tool_list }))
        }

        "tools/call" => {
            let Some(params) = &req.params else {
                return JsonRpcResponse::failure(id, INVALID_PARAMS, "missing params");
            };
            let Some(tool_name) = params["name"].as_str() else {
                return JsonRpcResponse::failure(id, INVALID_PARAMS, "missing tool name in params");
            };
            let args = params.get("arguments").cloned().unwrap_or(Value::Null);

            let Some(tool) = tools.iter().find(|t| t.name() == tool_name) else {
                return JsonRpcResponse::failure(
                    id,
                    METHOD_NOT_FOUND,
                    format!("tool not found: {tool_name}"),
                );
            };

            let result = tool.call(args, root);
            let is_error = result.is_err();
            if let Err(failure) = &result {
                tracing::debug!(tool = tool_name, error = %failure.error, "tool call failed");
            }
            let text = serde_json::to_string_pretty(&envelope(&result))
                .unwrap_or_else(|e| format!("serialization error: {e}"));

            let call_result = ToolCallResult {
                content: vec![ToolContent {
                    r#type: "text",
                    text,
                }],
                is_error,
            };
            JsonRpcResponse::success(
                id,
                serde_json::to_value(&call_result)
                    .unwrap_or_else(|e| serde_json::json!({"error": e.to_string()})),
            )
        }

        other => JsonRpcResponse::failure(
            id,
            METHOD_NOT_FOUND,
            format!("method not found: {other}"),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
