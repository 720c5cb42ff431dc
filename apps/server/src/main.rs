use anyhow::Context;
use dynast::kernel::config::load;
use dynast_logger::Logger;
use dynast_server::Server;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Thin CLI glue: the root path is the only argument, defaulting to the
    // working directory.
    let root = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };

    let cfg = load(&root).context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logs).init()?;
    tracing::info!(badge = %dynast::framework::banner(), "Starting Application");

    Server::builder().root(root).config(cfg).build()?.run().await
}
