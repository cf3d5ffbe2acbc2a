//! Command-line interface, banner, and interactive site selection.
//!
//! # Responsibilities
//! - Parse CLI arguments
//! - Discover candidate sites in well-known local web roots
//! - Prompt for a site when no directory was given
//! - Prompt for a replacement port when the requested one is taken
//!
//! Everything here talks to a human on stdin/stdout; the serving core never
//! does.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::config::ShareConfig;
use crate::VERSION;

/// Easily share a local website directory on your network.
#[derive(Debug, Parser)]
#[command(name = "siteshare", version, about)]
pub struct Cli {
    /// Port number to serve the website on (default 8000).
    #[arg(long)]
    pub port: Option<u16>,

    /// Specific directory to serve (skips site selection).
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Enable PHP processing by proxying to a local PHP server (MAMP/XAMPP).
    #[arg(long)]
    pub php: bool,

    /// Optional TOML config file; CLI flags override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// A shareable site found in a well-known web root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// The web root it lives in (e.g. `/opt/lampp/htdocs`).
    pub parent: PathBuf,
    /// The site directory name.
    pub name: String,
}

impl Cli {
    /// Fold explicitly given flags into a loaded config. Values the user
    /// did not pass keep whatever the config file (or its default) set.
    pub fn apply_overrides(&self, config: &mut ShareConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

impl Site {
    pub fn path(&self) -> PathBuf {
        self.parent.join(&self.name)
    }
}

/// Well-known web server document roots for the current platform.
pub fn web_server_roots() -> Vec<PathBuf> {
    let roots: &[&str] = if cfg!(target_os = "windows") {
        &[
            "c:/MAMP/htdocs",
            "c:/xampp/htdocs",
            "c:/wamp/www",
            "c:/wamp64/www",
        ]
    } else if cfg!(target_os = "macos") {
        &["/Applications/MAMP/htdocs", "/opt/lampp/htdocs"]
    } else {
        &["/opt/lampp/htdocs", "/var/www/html"]
    };
    roots.iter().map(PathBuf::from).collect()
}

/// Scan the given web roots for shareable site directories. Unreadable
/// roots are skipped silently.
pub fn discover_sites(roots: &[PathBuf]) -> Vec<Site> {
    let mut sites = Vec::new();
    for root in roots {
        let Ok(entries) = std::fs::read_dir(root) else {
            continue;
        };
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                sites.push(Site {
                    parent: root.clone(),
                    name: entry.file_name().to_string_lossy().into_owned(),
                });
            }
        }
    }
    sites
}

/// Print the numbered site list and ask for a selection.
///
/// Returns `Ok(None)` when the user cancels with 'x'.
pub fn select_site(sites: &[Site]) -> io::Result<Option<Site>> {
    println!("\nAvailable websites:");
    for (i, site) in sites.iter().enumerate() {
        println!("{}. {} (in {})", i + 1, site.name, site.parent.display());
    }

    let input = prompt("\nEnter site number (or 'x' to cancel): ")?;
    if input.eq_ignore_ascii_case("x") {
        return Ok(None);
    }

    let selected = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| sites.get(i));
    match selected {
        Some(site) => Ok(Some(site.clone())),
        None => Err(io::Error::new(io::ErrorKind::InvalidInput, "invalid selection")),
    }
}

/// Ask for a replacement port after an address-in-use failure.
///
/// Returns `None` when the user gives up (empty input).
pub fn prompt_new_port(attempt: u32, max_attempts: u32) -> io::Result<Option<u16>> {
    loop {
        let input = prompt(&format!(
            "Enter a different port (attempt {attempt}/{max_attempts}) or press Enter to exit: "
        ))?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<u16>() {
            Ok(port) if port >= 1 => return Ok(Some(port)),
            _ => println!("Invalid port number. Must be between 1 and 65535."),
        }
    }
}

/// Startup banner.
pub fn print_banner() {
    println!(
        r"
╔═══════════════════════════════════════════╗
║                                           ║
║   SiteShare v{VERSION}                        ║
║   Local Website Sharing Tool              ║
║                                           ║
╚═══════════════════════════════════════════╝
"
    );
}

/// Network-exposure warning shown before serving starts.
pub fn print_exposure_warning(dir: &std::path::Path) {
    println!("\n############################################");
    println!("#         WARNING: NETWORK EXPOSURE        #");
    println!("############################################");
    println!("# This tool makes the specified directory:");
    println!("#  '{}'", dir.display());
    println!("# accessible to ALL devices on your local network.");
    println!("#");
    println!("# - Ensure you trust your network environment.");
    println!("# - Do NOT serve directories containing sensitive data.");
    println!("# - Stop the server (Ctrl+C) when finished.");
    println!("############################################\n");
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
