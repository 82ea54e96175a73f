//! End-to-end tool calls through the MCP server with the metric tools

use fin_mcp::{McpServer, PROTOCOL_VERSION};
use fin_metrics::{MetricsConfig, build_registry};
use serde_json::{Value, json};
use std::sync::Arc;

fn server() -> McpServer {
    let config = MetricsConfig::builder()
        .enable_market_data(false)
        .build()
        .unwrap();
    let registry = build_registry(&config).unwrap();
    McpServer::new(Arc::new(registry), "finmetrics", "0.0.0-test")
}

async fn request(server: &McpServer, id: u64, method: &str, params: Value) -> Value {
    let line = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string();
    let response = server.handle_line(&line).await.unwrap();
    serde_json::to_value(response).unwrap()
}

async fn call_tool(server: &McpServer, name: &str, arguments: Value) -> Value {
    let response = request(server, 1, "tools/call", json!({"name": name, "arguments": arguments})).await;
    response["result"].clone()
}

fn text_payload(result: &Value) -> Value {
    let text = result["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_initialize_handshake() {
    let server = server();
    let response = request(&server, 1, "initialize", json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {"name": "test", "version": "1"}
    }))
    .await;

    let result = &response["result"];
    assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(result["serverInfo"]["name"], "finmetrics");
    assert_eq!(result["capabilities"]["tools"]["listChanged"], false);

    let initialized = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
    assert!(server.handle_line(&initialized).await.is_none());
}

#[tokio::test]
async fn test_tools_list() {
    let server = server();
    let response = request(&server, 2, "tools/list", json!({})).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        [
            "mcp_calculate_financial_metrics",
            "mcp_calculate_growth_rates",
            "mcp_calculate_technical_indicators"
        ]
    );
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
}

#[tokio::test]
async fn test_growth_rates_call() {
    let server = server();
    let result = call_tool(&server, "mcp_calculate_growth_rates", json!({"series": [100, 150, 120]})).await;

    assert_eq!(result["isError"], false);
    let payload = text_payload(&result);
    let rates = payload["period_growth_rates"].as_array().unwrap();
    assert_eq!(rates.len(), 2);
    assert!((rates[0].as_f64().unwrap() - 0.5).abs() < 1e-12);
    assert!((rates[1].as_f64().unwrap() + 0.2).abs() < 1e-12);
}

#[tokio::test]
async fn test_sma_call() {
    let server = server();
    let result = call_tool(
        &server,
        "mcp_calculate_technical_indicators",
        json!({"price_data": [1, 2, 3, 4, 5], "indicator": "sma", "window": 3}),
    )
    .await;

    assert_eq!(text_payload(&result), json!({"sma": [2.0, 3.0, 4.0]}));
}

#[tokio::test]
async fn test_gross_margin_call() {
    let server = server();
    let result = call_tool(
        &server,
        "mcp_calculate_financial_metrics",
        json!({"financial_data": {"revenue": 100, "cogs": 40}, "indicator": "gross_margin"}),
    )
    .await;

    assert_eq!(text_payload(&result), json!({"gross_margin": 0.6}));
}

#[tokio::test]
async fn test_domain_error_is_tool_error() {
    let server = server();
    let result = call_tool(
        &server,
        "mcp_calculate_financial_metrics",
        json!({"financial_data": {"current_assets": 10, "current_liabilities": 0}, "indicator": "current_ratio"}),
    )
    .await;

    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Domain error"));
}

#[tokio::test]
async fn test_unknown_tool() {
    let server = server();
    let response = request(&server, 9, "tools/call", json!({"name": "get_weather", "arguments": {}})).await;

    assert_eq!(response["id"], 9);
    assert_eq!(response["error"]["code"], -32602);
    assert!(response.get("result").is_none());
}
