//! MCP server over stdio
//!
//! Reads one JSON-RPC message per line, answers the MCP handshake, lists the
//! `poke` tool and routes `tools/call` to it. Requests are handled one at a
//! time, in arrival order. Diagnostics go to stderr through `tracing`; stdout
//! carries protocol traffic only.

mod poke;
pub mod protocol;

pub use poke::PokeTool;

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::notifier::Notifier;

use protocol::{codes, negotiate_version, JsonRpcRequest, JsonRpcResponse, ToolResult};

/// Name reported in `serverInfo`
pub const SERVER_NAME: &str = "mcp-poke";

/// The MCP server
#[derive(Debug, Clone)]
pub struct McpServer {
    config: Arc<Config>,
    poke: PokeTool,
}

impl McpServer {
    /// Create a server exposing `poke` backed by `notifier`
    pub fn new(config: Arc<Config>, notifier: Arc<Notifier>) -> Self {
        let poke = PokeTool::new(config.clone(), notifier);
        Self { config, poke }
    }

    /// Serve on the process stdin/stdout until stdin closes
    pub async fn run_stdio(&self) -> Result<()> {
        if self.config.verbose() {
            info!("[MCP Server] Starting MCP server on stdio");
        }
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve line-delimited JSON-RPC from `reader`, answering on `writer`
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            if buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            if let Some(response) = self.handle_message(&buf).await {
                write_response(&mut writer, &response).await?;
            }
        }

        if self.config.verbose() {
            info!("[MCP Server] stdin closed, shutting down");
        }
        Ok(())
    }

    /// Handle one raw message, returning the response to send, if any
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        self.handle_message(line.as_bytes()).await
    }

    /// Handle one raw message given as bytes
    ///
    /// Bytes that are not JSON (invalid UTF-8 included) get `-32700`; JSON
    /// that is not a request object gets `-32600`.
    pub async fn handle_message(&self, bytes: &[u8]) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "[MCP Server] Unparseable message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    codes::PARSE_ERROR,
                    format!("Invalid JSON: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "[MCP Server] Invalid request");
                return Some(JsonRpcResponse::error(
                    id,
                    codes::INVALID_REQUEST,
                    format!("Invalid Request: {e}"),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return request.id.map(|id| {
                JsonRpcResponse::error(id, codes::INVALID_REQUEST, "Invalid JSON-RPC version")
            });
        }

        let response = self.handle_request(&request).await;
        if request.is_notification() {
            return None;
        }
        response
    }

    async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone().unwrap_or(Value::Null);
        debug!(method = %request.method, "[MCP Server] Request");

        match request.method.as_str() {
            "initialize" => Some(handle_initialize(id, &request.params)),
            "notifications/initialized" | "initialized" => {
                if self.config.verbose() {
                    info!("[MCP Server] Client initialized");
                }
                None
            }
            "notifications/cancelled" => {
                debug!(params = %request.params, "[MCP Server] Request cancelled");
                None
            }
            "ping" => Some(JsonRpcResponse::success(id, json!({}))),
            "tools/list" => Some(JsonRpcResponse::success(
                id,
                json!({ "tools": [PokeTool::definition()] }),
            )),
            "tools/call" => Some(self.handle_tools_call(id, &request.params).await),
            _ => Some(JsonRpcResponse::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Unknown method: {}", request.method),
            )),
        }
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing tool name in params");
        };

        if name != PokeTool::NAME {
            return JsonRpcResponse::error(id, codes::INVALID_PARAMS, format!("Unknown tool: {name}"));
        }

        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        tool_call_response(id, self.poke.call(arguments).await)
    }
}

/// Wrap a tool outcome: per-call failures are tool errors, anything else is internal
fn tool_call_response(id: Value, outcome: Result<String>) -> JsonRpcResponse {
    let result = match outcome {
        Ok(text) => ToolResult::text(text),
        Err(e) if e.is_call_error() => ToolResult::error(e.to_string()),
        Err(e) => {
            error!(error = %e, "[MCP Server] Tool call failed");
            return JsonRpcResponse::error(id, codes::INTERNAL_ERROR, e.to_string());
        }
    };

    match serde_json::to_value(&result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, codes::INTERNAL_ERROR, e.to_string()),
    }
}

fn handle_initialize(id: Value, params: &Value) -> JsonRpcResponse {
    let requested = params.get("protocolVersion").and_then(Value::as_str);
    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": negotiate_version(requested),
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &JsonRpcResponse) -> Result<()> {
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::notifier::test_support::{FailingBackend, RecordingBackend};
    use pretty_assertions::assert_eq;

    fn server_with(config: Config, backend: Arc<dyn crate::notifier::NotificationBackend>) -> McpServer {
        let config = Arc::new(config);
        let notifier = Notifier::with_backend(config.clone(), backend).unwrap();
        McpServer::new(config, Arc::new(notifier))
    }

    fn server() -> (McpServer, Arc<RecordingBackend>) {
        let backend = Arc::new(RecordingBackend::default());
        (server_with(Config::default(), backend.clone()), backend)
    }

    async fn call(server: &McpServer, line: &str) -> JsonRpcResponse {
        server.handle_line(line).await.expect("expected a response")
    }

    #[tokio::test]
    async fn test_initialize() {
        let (server, _) = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
        )
        .await;

        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "mcp-poke");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let (server, _) = server();
        for line in [
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":3}}"#,
            r#"{"jsonrpc":"2.0","method":"something/else"}"#,
        ] {
            assert!(server.handle_line(line).await.is_none(), "{line}");
        }
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (server, _) = server();
        let resp = call(&server, r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#).await;

        assert_eq!(resp.id, json!("a"));
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "poke");
        assert!(tools[0]["inputSchema"]["properties"]["message"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let (server, backend) = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"poke","arguments":{"message":"Build complete"}}}"#,
        )
        .await;

        let result: ToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(
            result,
            ToolResult::text("Notification sent: Notification - Build complete [info]")
        );
        assert_eq!(backend.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_tools_call_invalid_argument_is_tool_error() {
        let (server, backend) = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"poke","arguments":{"message":"Oops","level":"critical"}}}"#,
        )
        .await;

        assert!(resp.error.is_none());
        let result: ToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(result, ToolResult::error("invalid level: critical"));
        assert!(backend.sent().is_empty());
    }

    #[tokio::test]
    async fn test_tools_call_delivery_failure_is_tool_error() {
        let server = server_with(Config::default(), Arc::new(FailingBackend));
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"poke","arguments":{"message":"hi"}}}"#,
        )
        .await;

        let result: ToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_tools_call_missing_arguments() {
        let (server, _) = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"poke"}}"#,
        )
        .await;

        let result: ToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let (server, _) = server();
        let resp = call(
            &server,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"shove","arguments":{}}}"#,
        )
        .await;
        assert_eq!(resp.error.unwrap().code, codes::INVALID_PARAMS);

        let resp = call(&server, r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{}}"#).await;
        assert_eq!(resp.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (server, _) = server();
        let resp = call(&server, r#"{"jsonrpc":"2.0","id":8,"method":"resources/list"}"#).await;
        assert_eq!(resp.error.unwrap().code, codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let (server, _) = server();
        let resp = call(&server, "{not json").await;
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.error.unwrap().code, codes::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_valid_json_that_is_not_a_request() {
        let (server, _) = server();
        for line in [r#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#, r#""hello""#, "42"] {
            let resp = call(&server, line).await;
            assert_eq!(resp.id, Value::Null, "{line}");
            assert_eq!(resp.error.unwrap().code, codes::INVALID_REQUEST, "{line}");
        }

        let resp = call(&server, r#"{"jsonrpc":"2.0","id":11}"#).await;
        assert_eq!(resp.id, json!(11));
        assert_eq!(resp.error.unwrap().code, codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_null_id_is_a_request() {
        let (server, _) = server();
        let resp = call(&server, r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).await;
        assert_eq!(resp.id, Value::Null);
        assert_eq!(resp.result, Some(json!({})));
    }

    #[test]
    fn test_tool_call_response_routing() {
        let resp = tool_call_response(json!(1), Ok("done".to_string()));
        assert_eq!(resp.result, Some(serde_json::to_value(ToolResult::text("done")).unwrap()));

        let resp = tool_call_response(json!(2), Err(Error::invalid_argument("bad")));
        let result: ToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(result, ToolResult::error("bad"));

        let resp = tool_call_response(json!(3), Err(Error::UnsupportedMode("command".to_string())));
        assert!(resp.result.is_none());
        assert_eq!(resp.id, json!(3));
        assert_eq!(resp.error.unwrap().code, codes::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let (server, _) = server();
        let resp = call(&server, r#"{"jsonrpc":"1.0","id":9,"method":"ping"}"#).await;
        assert_eq!(resp.error.unwrap().code, codes::INVALID_REQUEST);

        assert!(server
            .handle_line(r#"{"jsonrpc":"1.0","method":"ping"}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_serve_answers_in_order_and_skips_blank_lines() {
        let (server, _) = server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();

        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let responses: Vec<JsonRpcResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, json!(1));
        assert_eq!(responses[1].id, json!(2));
    }

    #[tokio::test]
    async fn test_serve_survives_invalid_utf8_line() {
        let (server, _) = server();
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n");
        input.extend_from_slice(b"{\"x\":\"\xff\xfe\"}\n");
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");
        let mut output = Vec::new();

        server.serve(input.as_slice(), &mut output).await.unwrap();

        let responses: Vec<JsonRpcResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, json!(1));
        assert_eq!(responses[1].id, Value::Null);
        assert_eq!(responses[1].error.as_ref().unwrap().code, codes::PARSE_ERROR);
        assert_eq!(responses[2].id, json!(2));
        assert!(responses[2].error.is_none());
    }
}
