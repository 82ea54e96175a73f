//! Command-line interface for finmetrics-rs
//!
//! # Usage
//!
//! ```bash
//! # Serve every tool to an MCP client over stdio
//! finmetrics serve
//!
//! # List registered tools
//! finmetrics tools
//!
//! # Invoke one tool directly
//! finmetrics call mcp_calculate_growth_rates '{"series": [100, 110, 121]}'
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use fin_mcp::McpServer;
use fin_metrics::{MetricsConfig, build_registry};
use fin_tools::ToolRegistry;
use fin_utils::Config;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "finmetrics")]
#[command(version, about = "Financial metrics and market data tools over MCP", long_about = None)]
struct Args {
    /// Register only the calculation tools
    #[arg(long, global = true)]
    no_market_data: bool,

    /// Window used when a call omits one
    #[arg(long, global = true)]
    window: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server on stdin/stdout
    Serve,

    /// List registered tools
    Tools {
        /// Print full definitions, including input schemas, as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call a tool with JSON arguments and print its result
    Call {
        /// Tool name, e.g. mcp_calculate_technical_indicators
        tool: String,

        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },
}

fn metrics_config(args: &Args) -> anyhow::Result<MetricsConfig> {
    let mut builder = MetricsConfig::builder().with_env();
    if args.no_market_data {
        builder = builder.enable_market_data(false);
    }
    if let Some(window) = args.window {
        builder = builder.default_window(window);
    }
    Ok(builder.build()?)
}

fn print_tools(registry: &ToolRegistry, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
        return Ok(());
    }

    for tool in registry.list_tools() {
        println!("{:<36} {}", tool.name(), tool.description());
    }
    Ok(())
}

async fn call(registry: &ToolRegistry, tool: &str, arguments: &str) -> anyhow::Result<()> {
    let arguments: Value =
        serde_json::from_str(arguments).context("arguments must be a JSON object")?;
    debug!("Calling {} with {}", tool, arguments);

    let result = registry
        .call(tool, arguments)
        .await
        .with_context(|| format!("tool {tool} failed"))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries MCP frames and results
    fin_utils::init_tracing();

    let args = Args::parse();
    let app = Config::from_env();
    let config = metrics_config(&args)?;
    let registry = build_registry(&config)?;

    info!("Starting {} ({})", app.app_name, app.environment);

    match args.command {
        Command::Serve => {
            let server = McpServer::new(Arc::new(registry), app.app_name, app.version);
            server.serve_stdio().await?;
        }
        Command::Tools { json } => print_tools(&registry, json)?,
        Command::Call { tool, arguments } => call(&registry, &tool, &arguments).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_call() {
        let args = Args::parse_from([
            "finmetrics",
            "--no-market-data",
            "call",
            "mcp_calculate_growth_rates",
            r#"{"series": [1, 2]}"#,
        ]);
        assert!(args.no_market_data);
        match args.command {
            Command::Call { tool, arguments } => {
                assert_eq!(tool, "mcp_calculate_growth_rates");
                assert!(arguments.contains("series"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_metrics_config_overrides() {
        let args = Args::parse_from(["finmetrics", "tools", "--window", "20", "--no-market-data"]);
        let config = metrics_config(&args).unwrap();
        assert_eq!(config.default_window, 20);
        assert!(!config.enable_market_data);
    }

    #[tokio::test]
    async fn test_call_rejects_malformed_arguments() {
        let registry = ToolRegistry::new();
        let err = call(&registry, "mcp_calculate_growth_rates", "{series")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }
}
