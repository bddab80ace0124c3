use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod gateway;
mod requirements;
mod tools;

use config::Config;
use gateway::McpServer;
use requirements::RequirementStore;
use tools::ToolContext;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    // stdout carries protocol frames, env_logger writes to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("🚀 启动AI需求分析和设计助手");
    log::info!("Storage directory: {}", config.storage_dir.display());

    let store = match RequirementStore::open(&config.storage_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to open requirement store: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Initializing tool registry");
    let tool_registry = Arc::new(tools::create_default_registry());
    log::info!("Registered {} tools", tool_registry.len());

    let context = ToolContext::new().with_requirement_store(store);
    let server = McpServer::new(tool_registry, context, config.server_name);

    server.run_stdio().await
}
