//! Integration tests for MCP protocol handling
//!
//! Drives the line-delimited JSON-RPC transport end to end over in-memory
//! pipes, backed by a file database in a temporary directory.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};

use jdx_tech_hub::config::{Config, DatabaseConfig};
use jdx_tech_hub::server::{AppState, McpServer};
use jdx_tech_hub::storage::{BlueprintStore, SqliteStorage};

/// Verify JSON-RPC 2.0 response structure
fn assert_valid_jsonrpc_response(response: &Value) {
    assert_eq!(response["jsonrpc"], "2.0", "Invalid JSON-RPC version");
    assert!(
        response.get("result").is_some() || response.get("error").is_some(),
        "Response must have result or error"
    );
}

fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.database = DatabaseConfig {
        path: dir.path().join("hub.db"),
        max_connections: 2,
    };
    // Long enough that only the shutdown flush writes during a test
    config.blueprint.autosave_delay_ms = 60_000;
    config
}

/// Client half of a running server.
struct Client {
    writer: DuplexStream,
    lines: Lines<BufReader<DuplexStream>>,
    next_id: i64,
}

impl Client {
    async fn send_raw(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = self.lines.next_line().await.unwrap().expect("response line");
        let response: Value = serde_json::from_str(&line).unwrap();
        assert_valid_jsonrpc_response(&response);
        response
    }

    async fn request(&mut self, method: &str, params: Value) -> Value {
        self.next_id += 1;
        let request = json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": method,
            "params": params,
        });
        self.send_raw(&request.to_string()).await;
        let response = self.recv().await;
        assert_eq!(response["id"], self.next_id);
        response
    }

    /// Call a tool, returning the decoded payload and the isError flag.
    async fn tool(&mut self, name: &str, arguments: Value) -> (Value, bool) {
        let response = self
            .request("tools/call", json!({"name": name, "arguments": arguments}))
            .await;
        let result = &response["result"];
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.into()));
        (payload, result["isError"] == true)
    }
}

/// Run `script` against a server over `config`, then close stdin.
async fn with_server<F, Fut>(config: Config, script: F)
where
    F: FnOnce(Client) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let storage = SqliteStorage::new(&config.database).await.unwrap();
    let server = McpServer::new(Arc::new(AppState::new(config, storage)));

    let (client_out, server_in) = tokio::io::duplex(64 * 1024);
    let (server_out, client_in) = tokio::io::duplex(64 * 1024);

    let client = Client {
        writer: client_out,
        lines: BufReader::new(client_in).lines(),
        next_id: 0,
    };

    let (served, ()) = tokio::join!(server.serve(BufReader::new(server_in), server_out), script(client));
    served.unwrap();
}

#[cfg(test)]
mod initialize_tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_handshake() {
        let dir = TempDir::new().unwrap();
        with_server(test_config(&dir), |mut client| async move {
            let response = client
                .request(
                    "initialize",
                    json!({
                        "protocolVersion": "2024-11-05",
                        "capabilities": {},
                        "clientInfo": {"name": "test-client", "version": "1.0.0"}
                    }),
                )
                .await;
            assert_eq!(response["result"]["serverInfo"]["name"], "jdx-tech-hub");

            client
                .send_raw(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .await;

            let tools = client.request("tools/list", json!({})).await;
            assert_eq!(tools["result"]["tools"].as_array().unwrap().len(), 20);
        })
        .await;
    }
}

#[cfg(test)]
mod error_handling_tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let dir = TempDir::new().unwrap();
        with_server(test_config(&dir), |mut client| async move {
            client.send_raw("{not json").await;
            let response = client.recv().await;
            assert_eq!(response["id"], Value::Null);
            assert_eq!(response["error"]["code"], -32700);

            // The server keeps serving after a bad line
            let pong = client.request("ping", json!({})).await;
            assert_eq!(pong["result"], json!({}));
        })
        .await;
    }

    #[tokio::test]
    async fn test_method_not_found() {
        let dir = TempDir::new().unwrap();
        with_server(test_config(&dir), |mut client| async move {
            let response = client.request("prompts/list", json!({})).await;
            assert_eq!(response["error"]["code"], -32601);
        })
        .await;
    }

    #[tokio::test]
    async fn test_invalid_tool_params_are_tool_errors() {
        let dir = TempDir::new().unwrap();
        with_server(test_config(&dir), |mut client| async move {
            let (payload, is_error) = client
                .tool("blueprint_toggle_checklist", json!({"project_id": "p"}))
                .await;
            assert!(is_error);
            assert!(payload.as_str().unwrap().contains("Invalid parameters"));
        })
        .await;
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_flushes_open_blueprints() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let project_id = Arc::new(std::sync::Mutex::new(String::new()));

        let shared = Arc::clone(&project_id);
        with_server(config.clone(), |mut client| async move {
            let (project, _) = client
                .tool("project_create", json!({"name": "Hub", "tech_stack": ["Rust"]}))
                .await;
            let id = project["id"].as_str().unwrap().to_string();
            *shared.lock().unwrap() = id.clone();

            let (opened, _) = client
                .tool("blueprint_open", json!({"project_id": id}))
                .await;
            assert_eq!(opened["seeded"], true);
            assert_eq!(opened["templateId"], "jdx-tech-hub");

            let (toggled, is_error) = client
                .tool(
                    "blueprint_toggle_checklist",
                    json!({"project_id": id, "task_id": "project-structure", "index": 3}),
                )
                .await;
            assert!(!is_error);
            assert_eq!(toggled["state"]["completed"], true);

            client
                .tool(
                    "blueprint_timer_start",
                    json!({"project_id": id, "task_id": "database-setup"}),
                )
                .await;
            client
                .tool(
                    "blueprint_set_credential",
                    json!({"project_id": id, "key": "awsRegion", "value": "us-east-1"}),
                )
                .await;

            let (stats, _) = client.tool("blueprint_stats", json!({"project_id": id})).await;
            assert_eq!(stats["stats"]["completedTasks"], 6);
            assert_eq!(stats["sessionsToday"], 1);
            assert_eq!(stats["activeTimer"]["taskId"], "database-setup");
        })
        .await;

        let id = project_id.lock().unwrap().clone();
        let storage = SqliteStorage::new(&config.database).await.unwrap();
        let saved = storage.load_blueprint(&id).await.unwrap().unwrap();

        assert!(saved.task("project-structure").unwrap().completed);
        assert!(saved.task_states["project-structure"].completed);
        assert_eq!(saved.credentials["awsRegion"], "us-east-1");
        assert_eq!(saved.progress, 60);
        assert_eq!(saved.sessions.len(), 1);
        assert!(saved.time_spent.contains_key("database-setup"));
    }

    #[tokio::test]
    async fn test_reopen_after_restart_keeps_progress() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let project_id = Arc::new(std::sync::Mutex::new(String::new()));

        let shared = Arc::clone(&project_id);
        with_server(config.clone(), |mut client| async move {
            let (project, _) = client.tool("project_create", json!({"name": "Site"})).await;
            let id = project["id"].as_str().unwrap().to_string();
            *shared.lock().unwrap() = id.clone();

            client
                .tool("blueprint_open", json!({"project_id": id, "template": "website"}))
                .await;
            let (saved, _) = client.tool("blueprint_save", json!({"project_id": id})).await;
            assert_eq!(saved["outcome"], "saved");

            let (again, _) = client.tool("blueprint_save", json!({"project_id": id})).await;
            assert_eq!(again["outcome"], "clean");
        })
        .await;

        let id = project_id.lock().unwrap().clone();
        with_server(config, |mut client| async move {
            let (opened, _) = client
                .tool("blueprint_open", json!({"project_id": id, "template": "saas"}))
                .await;
            assert_eq!(opened["seeded"], false);
            assert_eq!(opened["templateId"], "website");

            let (view, _) = client.tool("blueprint_get", json!({"project_id": id})).await;
            assert_eq!(view["blueprint"]["sessions"].as_array().unwrap().len(), 2);
        })
        .await;
    }
}
