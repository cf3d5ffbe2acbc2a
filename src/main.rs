//! SiteShare binary: startup sequence.
//!
//! Wires the collaborators together: CLI parsing, site selection, backend
//! detection, bind-with-retry, then hands the listener to the HTTP server.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siteshare::cli::{self, Cli};
use siteshare::config::loader::{finalize_config, load_config};
use siteshare::config::{ServeMode, ShareConfig};
use siteshare::detect;
use siteshare::net::{bind_listener, ipinfo, BindError};
use siteshare::HttpServer;

/// Attempts allowed when the requested port is already in use.
const MAX_BIND_RETRIES: u32 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "siteshare=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::print_banner();

    let args = Cli::parse();
    match run(args).await {
        Ok(()) => {
            println!("\nServer stopped.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file; CLI flags take precedence.
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ShareConfig::default(),
    };
    args.apply_overrides(&mut config);

    // Directory: explicit flag, else the config file, else interactive
    // selection from well-known web roots.
    let root_dir = match args.dir {
        Some(dir) => dir,
        None if config.root_dir != std::path::PathBuf::from(".") => config.root_dir.clone(),
        None => {
            let sites = cli::discover_sites(&cli::web_server_roots());
            if sites.is_empty() {
                return Err("no websites found in common web server directories; \
                     specify a directory with --dir"
                    .into());
            }
            match cli::select_site(&sites)? {
                Some(site) => site.path(),
                None => {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    };
    config.root_dir = root_dir.canonicalize().map_err(|e| {
        format!("directory not found: {} ({e})", root_dir.display())
    })?;

    // PHP mode only holds if a backend is actually running; otherwise the
    // invariant from the config layer degrades us to static serving.
    if args.php {
        tracing::info!("PHP mode enabled, checking for a local PHP server...");
        match detect::find_php_backend(&config.timeouts).await {
            Some(port) => {
                config.mode = ServeMode::PhpProxy;
                config.backend_port = Some(port);
                tracing::info!(port, "Using PHP proxy mode");
            }
            None => {
                tracing::warn!(
                    "No PHP server found; PHP files will not be processed. \
                     Make sure MAMP, XAMPP, or another PHP server is running. \
                     Falling back to static file mode."
                );
                config.mode = ServeMode::Static;
                config.backend_port = None;
            }
        }
    }

    let config = finalize_config(config)?;

    cli::print_exposure_warning(&config.root_dir);

    let listener = bind_with_retry(config.port).await?;
    let port = listener.local_addr()?.port();

    let lan_ip = ipinfo::local_ip();
    println!("Serving website from directory: {}", config.root_dir.display());
    println!("  - Access locally (on this machine): http://localhost:{port}");
    println!("  - Access on network (other devices): http://{lan_ip}:{port}");
    println!("\nImportant:");
    println!("  - 'localhost' only works on the computer running this tool.");
    println!("  - Other devices MUST use the network IP address.");
    println!("  - Ensure your firewall allows incoming connections on port {port}.");
    println!("\nPress Ctrl+C to stop the server.");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    Ok(())
}

/// Bind the requested port, prompting for a replacement on address-in-use
/// up to the retry budget. Permission errors are terminal.
async fn bind_with_retry(
    mut port: u16,
) -> Result<tokio::net::TcpListener, Box<dyn std::error::Error>> {
    let mut attempts = 0;
    loop {
        match bind_listener(port).await {
            Ok(listener) => return Ok(listener),
            Err(e @ BindError::AddressInUse(_)) => {
                attempts += 1;
                println!("\nError: Port {port} is already in use.");
                if attempts >= MAX_BIND_RETRIES {
                    return Err(format!("{e}; maximum retry attempts reached").into());
                }
                match cli::prompt_new_port(attempts, MAX_BIND_RETRIES - 1)? {
                    Some(new_port) => port = new_port,
                    None => return Err("exiting at user request".into()),
                }
            }
            Err(e @ BindError::PermissionDenied(_)) => {
                return Err(format!(
                    "{e}; try a port number above 1024 or run with administrator/root privileges"
                )
                .into());
            }
            Err(e) => return Err(e.into()),
        }
    }
}
