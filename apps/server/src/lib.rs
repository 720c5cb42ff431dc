//! # Dynast Server
//!
//! The lifecycle orchestrator: sequences the startup phases (config load and
//! merge, resource management, module check, node scan and resolution) and
//! runs the assembled axum server.
//!
//! ## Example
//! ```no_run
//! use dynast_server::Server;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .root(PathBuf::from("/srv/my-app"))
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result, anyhow};
use axum_server::Handle;
use dynast::domain::config::AppConfig;
use dynast::domain::constants::MODULES_FILE;
use dynast::kernel::config;
use dynast::kernel::context::SharedContext;
use dynast::kernel::modules::ModuleMap;
use dynast::kernel::nodes::{ModuleProvider, NodeResolver, NodeScanner, Resolution};
use dynast::kernel::resources::ResourceManager;
use dynast::kernel::server::AppAssembly;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    app_name: Option<String>,
    root: Option<PathBuf>,
    cfg: Option<AppConfig>,
    port: Option<u16>,
    providers: Vec<ModuleProvider>,
}

impl ServerBuilder {
    /// Sets the application name used for logging and state labelling.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Sets the application root path the configuration and module layout are
    /// resolved against. Defaults to the current working directory.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Supplies an already-merged configuration, skipping the file load.
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Registers a discoverable module. Only modules selected by the
    /// `dynastnodes` config section will have their entry points invoked.
    pub fn module(mut self, provider: ModuleProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Consumes the builder and runs the startup phases.
    ///
    /// # Process
    /// 1. Loads and merges the layered configuration (fatal on a missing or
    ///    malformed base file)
    /// 2. Runs resource management when `application.manage_resources` is set
    /// 3. Loads the module map cache, reconstructing it from the filesystem
    ///    layout when absent
    /// 4. Verifies mapped modules when `application.compile_files` is set
    /// 5. Scans configured modules and resolves node priority; a failing
    ///    Entry node aborts startup
    ///
    /// # Errors
    /// Returns an error when configuration cannot be loaded or the Entry node
    /// fails to initialize.
    pub fn build(self) -> Result<Server> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to determine working directory")?,
        };
        let app_name =
            self.app_name.unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned());

        let context = SharedContext::new(app_name, &root);
        info!(
            root = %root.display(),
            boot_id = context.boot_id(),
            "Initializing application"
        );

        // 1. Configuration: load + merge + override detect
        let mut cfg = match self.cfg {
            Some(cfg) => cfg,
            None => config::load(&root).context("Critical: Configuration is malformed")?,
        };
        if let Some(port) = self.port {
            cfg.application.port = port;
        }
        context.set_config(cfg.clone());

        // 2. Resource management (config-flag-gated, never fatal)
        if cfg.application.manage_resources {
            let loaded = ResourceManager::new(context.clone()).perform();
            info!(loaded, "Resource management complete");
        } else {
            warn!("Resource management is disabled in the application");
        }

        // 3. Module map: cache file or on-the-fly reconstruction
        let modules = load_module_map(&context, &cfg);
        context.set_modules(modules.clone());

        // 4. Module integrity check (config-flag-gated)
        if cfg.application.compile_files {
            check_modules(&modules, &context);
        }

        // 5. Node scan and priority resolution
        let mut assembly = AppAssembly::new(context.clone());
        let mut resolver = NodeResolver::new(NodeScanner::new(self.providers));
        let resolution = resolver
            .resolve(&context, &mut assembly)
            .map_err(|e| anyhow!("Node initialization failed: {e}"))?;
        info!(?resolution, "Node resolution complete");

        Ok(Server { context, assembly, resolution })
    }
}

/// A fully initialized server instance ready to run.
///
/// This struct is returned by [`ServerBuilder::build`] and contains
/// all necessary runtime state.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    context: SharedContext,
    assembly: AppAssembly,
    resolution: Resolution,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    ///
    /// This is the recommended way to initialize the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns a reference to the shared context.
    #[must_use]
    pub const fn context(&self) -> &SharedContext {
        &self.context
    }

    /// The outcome of the node resolution pass.
    #[must_use]
    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let cfg = self.context.config();

        // Pre-serve re-check when change monitoring is requested.
        if cfg.application.monitor_change {
            if let Some(modules) = self.context.modules()
                && cfg.application.compile_files
            {
                info!("Checking for changes in watched modules");
                check_modules(&modules, &self.context);
            }
            for watched in &cfg.application.watch_files {
                if !self.context.root_path().join(watched).exists() {
                    warn!(path = %watched.display(), "Watched file does not exist");
                }
            }
        }

        let address: SocketAddr = format!("{}:{}", cfg.application.host, cfg.application.port)
            .parse()
            .with_context(|| {
                format!(
                    "Invalid host/port configuration: {}:{}",
                    cfg.application.host, cfg.application.port
                )
            })?;

        info!(%address, "App will start at the configured endpoint");
        if cfg.application.debug {
            warn!("App will run in debug mode");
        }

        let app = router::init(self.assembly, &self.context);

        // Set up graceful shutdown
        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        // Spawn shutdown signal listener
        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(30)));
        });

        info!("Starting HTTP server on http://{address}");
        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }
}

fn load_module_map(context: &SharedContext, cfg: &AppConfig) -> ModuleMap {
    let path = context.root_path().join(MODULES_FILE);
    if path.exists() {
        match ModuleMap::load(&path) {
            Ok(modules) => return modules,
            Err(error) => {
                warn!(%error, "Error loading modules file, reconstructing from the filesystem layout");
            }
        }
    } else {
        warn!(
            file = MODULES_FILE,
            "Modules file not found in the root path, reconstructing from the filesystem layout"
        );
    }

    match ModuleMap::reconstruct(context.root_path(), &cfg.services.root, &cfg.services.main) {
        Ok(modules) => modules,
        Err(error) => {
            warn!(%error, "Module map reconstruction failed, skipping module check");
            ModuleMap::default()
        }
    }
}

fn check_modules(modules: &ModuleMap, context: &SharedContext) {
    let missing = modules.verify(context.root_path());
    if missing.is_empty() {
        info!(count = modules.len(), "All mapped modules are present");
    } else {
        for (key, path) in missing {
            warn!(key = key.as_str(), path = path.as_str(), "Mapped module directory is missing");
        }
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
///
/// This function waits for either:
/// * SIGINT (Ctrl+C)
/// * SIGTERM (sent by process managers like systemd)
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
