//! MCP server driven over in-memory streams

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use platform_context::mcp::{McpServer, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};
use platform_context_core::catalog::{
    CatalogSource, ElementIter, MemoryCatalog, MethodElement, PropertyElement, Signature,
    TypeElement,
};
use platform_context_core::{CatalogResult, PlatformApi};
use serde_json::{json, Value};

fn catalog() -> MemoryCatalog {
    MemoryCatalog::new()
        .with_method(MethodElement::new("НайтиПоСсылке"))
        .with_type(
            TypeElement::new("ТаблицаЗначений")
                .method(MethodElement::new("Добавить"))
                .property(PropertyElement::new("Колонки").readonly()),
        )
        .with_type(TypeElement::new("Массив").constructor(Signature::new("По умолчанию")))
}

fn server(source: Arc<dyn CatalogSource>, timeout: Duration) -> McpServer {
    McpServer::new(Arc::new(PlatformApi::new(source)), timeout)
}

async fn exchange(server: &McpServer, requests: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for request in requests {
        input.push_str(&request.to_string());
        input.push('\n');
    }
    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_handshake_and_tool_list() {
    let server = server(Arc::new(catalog()), Duration::from_secs(5));
    let responses = exchange(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}),
        ],
    )
    .await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "platform-context");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 5);
    assert_eq!(tools[2]["name"], "getMember");
    assert_eq!(
        tools[2]["inputSchema"]["required"],
        json!(["typeName", "memberName"])
    );

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"], json!({}));
}

#[tokio::test]
async fn test_tool_calls_render_markdown() {
    let server = server(Arc::new(catalog()), Duration::from_secs(5));
    let responses = exchange(
        &server,
        &[
            call(1, "search", json!({"query": "таблица значений"})),
            call(2, "getMember", json!({"typeName": "таблицазначений", "memberName": "колонки"})),
            call(3, "getConstructors", json!({"typeName": "Массив"})),
            call(4, "info", json!({"name": "НайтиПоСсылке", "type": "метод"})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 4);
    assert!(tool_text(&responses[0]).contains("## 📦 ТаблицаЗначений"));
    assert!(tool_text(&responses[1]).contains("*Member of `ТаблицаЗначений`*"));
    assert!(tool_text(&responses[2]).starts_with("# 🔨 Constructors: Массив (1)"));
    assert!(tool_text(&responses[3]).starts_with("# 🔧 НайтиПоСсылке"));
    for response in &responses {
        assert!(response["result"].get("isError").is_none());
    }
}

#[tokio::test]
async fn test_api_errors_are_tool_errors() {
    let server = server(Arc::new(catalog()), Duration::from_secs(5));
    let responses = exchange(
        &server,
        &[
            call(1, "getConstructors", json!({"typeName": "ТаблицаЗначений"})),
            call(2, "search", json!({"query": "  "})),
        ],
    )
    .await;

    assert_eq!(responses[0]["result"]["isError"], true);
    assert_eq!(
        tool_text(&responses[0]),
        "❌ **Not found:** no constructors for type ТаблицаЗначений"
    );
    assert_eq!(responses[1]["result"]["isError"], true);
    assert_eq!(tool_text(&responses[1]), "❌ **Error:** query must not be empty");
}

#[tokio::test]
async fn test_protocol_errors() {
    let server = server(Arc::new(catalog()), Duration::from_secs(5));

    let response = server.handle_line("{not json").await.unwrap();
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"]["code"], PARSE_ERROR);
    assert_eq!(value["id"], Value::Null);

    let responses = exchange(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
            call(2, "reload", json!({})),
            call(3, "getMember", json!({"typeName": "Массив"})),
        ],
    )
    .await;

    assert_eq!(responses[0]["error"]["code"], METHOD_NOT_FOUND);
    assert_eq!(responses[1]["error"]["code"], INVALID_PARAMS);
    assert_eq!(responses[1]["error"]["message"], "unknown tool: reload");
    assert_eq!(responses[2]["error"]["code"], INVALID_PARAMS);
    assert_eq!(responses[2]["id"], 3);
}

/// Source whose first read blocks long enough to trip the call timeout.
struct SlowSource {
    inner: MemoryCatalog,
    delay: Duration,
}

impl CatalogSource for SlowSource {
    fn global_methods(&self) -> CatalogResult<ElementIter<'_, MethodElement>> {
        thread::sleep(self.delay);
        self.inner.global_methods()
    }

    fn global_properties(&self) -> CatalogResult<ElementIter<'_, PropertyElement>> {
        self.inner.global_properties()
    }

    fn types(&self) -> CatalogResult<ElementIter<'_, TypeElement>> {
        self.inner.types()
    }
}

#[tokio::test]
async fn test_slow_call_times_out() {
    let source = SlowSource {
        inner: catalog(),
        delay: Duration::from_millis(300),
    };
    let server = server(Arc::new(source), Duration::from_millis(20));

    let responses = exchange(&server, &[call(1, "search", json!({"query": "массив"}))]).await;

    assert_eq!(responses[0]["result"]["isError"], true);
    assert_eq!(
        tool_text(&responses[0]),
        "❌ **Error:** search timed out after 20 ms"
    );
}
