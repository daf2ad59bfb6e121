//! Domainly - local domain manager for nginx virtual hosts
//!
//! This is the main entry point for the Domainly CLI.

use clap::{Parser, Subcommand};
use domainly_config::ConfigOptions;
use domainly_core::{DomainForm, DomainStore, HierarchyIndex, Settings};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Domainly - manage local domains and their nginx virtual hosts
#[derive(Parser)]
#[command(name = "domainly")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Domain store file; defaults to the platform data directory
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List managed domains as a tree
    List,

    /// Add a managed domain
    Add {
        /// Fully qualified hostname (e.g. myapp.local)
        name: String,

        /// Port the local service listens on
        #[arg(short, long)]
        port: Option<u16>,

        /// Parent domain id (makes this a subdomain)
        #[arg(long)]
        parent: Option<i64>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,

        /// Create the domain inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Remove a domain and all of its subdomains
    Remove {
        /// Domain id
        id: i64,
    },

    /// Toggle a domain's active state
    Toggle {
        /// Domain id
        id: i64,
    },

    /// Parse an nginx configuration and show its virtual hosts
    Parse {
        /// Path to the configuration file
        config: PathBuf,
    },

    /// Generate nginx configuration from the managed domains
    Generate {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit a flat include file instead of a full http block
        #[arg(long)]
        include: bool,

        /// Synthesize upstream pools from parent/child groups
        #[arg(long)]
        upstreams: bool,

        /// Fallback proxy port for records without one
        #[arg(long)]
        default_proxy_port: Option<u16>,
    },

    /// Diff the managed domains against an nginx configuration
    Diff {
        /// Path to the configuration file
        config: PathBuf,
    },

    /// Render or apply the managed hosts-file block
    Hosts {
        /// Splice the block into the hosts file (requires privileges)
        #[arg(long)]
        apply: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let settings = match &cli.settings {
        Some(path) => match Settings::load(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to load settings: {}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    match cli.command {
        Commands::List => {
            let store = open_store(&cli.store, &settings);
            let records = store.list();
            if records.is_empty() {
                println!("No managed domains yet. Add one with `domainly add <name>`.");
                return Ok(());
            }

            let index = HierarchyIndex::build(records);
            println!("Managed domains ({}):", records.len());
            for root in index.roots() {
                print_domain(root, 0);
                for child in index.descendants(root.id) {
                    // Depth from the chain of parents within the index
                    let mut depth = 1;
                    let mut current = child.parent_id;
                    while let Some(pid) = current {
                        if pid == root.id {
                            break;
                        }
                        current = index.get(pid).and_then(|r| r.parent_id);
                        depth += 1;
                    }
                    print_domain(child, depth);
                }
            }
        }

        Commands::Add {
            name,
            port,
            parent,
            description,
            category,
            tags,
            inactive,
        } => {
            if !domainly_config::is_valid_server_name(&name) {
                eprintln!("❌ '{}' is not a valid domain name", name);
                std::process::exit(1);
            }

            let mut store = open_store(&cli.store, &settings);
            if let Some(parent_id) = parent {
                if store.get(parent_id).is_none() {
                    eprintln!("❌ Parent domain {} does not exist", parent_id);
                    std::process::exit(1);
                }
            }

            let form = DomainForm {
                name,
                port,
                parent_id: parent,
                description,
                category,
                tags,
                is_active: !inactive,
                ..Default::default()
            };

            match store.create(form) {
                Ok(record) => {
                    println!("✅ Added '{}' (id {})", record.name, record.id);
                }
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Remove { id } => {
            let mut store = open_store(&cli.store, &settings);
            match store.delete(id) {
                Ok(removed) if removed.len() > 1 => {
                    println!("✅ Removed domain {} and {} subdomain(s)", id, removed.len() - 1);
                }
                Ok(_) => println!("✅ Removed domain {}", id),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Toggle { id } => {
            let mut store = open_store(&cli.store, &settings);
            match store.toggle(id) {
                Ok(record) => {
                    let state = if record.is_active { "active" } else { "inactive" };
                    println!("✅ '{}' is now {}", record.name, state);
                }
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Parse { config } => {
            let source = match std::fs::read_to_string(&config) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("❌ Failed to read {}: {}", config.display(), e);
                    std::process::exit(1);
                }
            };

            let parsed = domainly_config::parse(&source);
            println!(
                "Parsed {}: {} server block(s), {} upstream(s)",
                config.display(),
                parsed.servers.len(),
                parsed.upstreams.len()
            );

            for upstream in &parsed.upstreams {
                println!("  upstream {} -> [{}]", upstream.name, upstream.servers.join(", "));
            }

            let hosts = domainly_config::extract_virtual_hosts(&parsed);
            if hosts.is_empty() {
                println!("No concrete virtual hosts found.");
            }
            for host in hosts {
                let scheme = if host.ssl { "https" } else { "http" };
                let target = host
                    .upstream
                    .map(|u| format!(" -> {}", u))
                    .or_else(|| host.root.map(|r| format!(" (root {})", r)))
                    .unwrap_or_default();
                println!("  {}://{}:{}{}", scheme, host.name, host.port, target);
            }
        }

        Commands::Generate {
            output,
            include,
            upstreams,
            default_proxy_port,
        } => {
            let store = open_store(&cli.store, &settings);

            let text = if include {
                let stamp = chrono::Utc::now().to_rfc3339();
                domainly_config::generate_include(store.list(), Some(&stamp))
            } else {
                let options = ConfigOptions {
                    include_upstreams: upstreams,
                    default_proxy_port: default_proxy_port.or(Some(settings.default_proxy_port)),
                };
                domainly_config::generate_config(store.list(), &options)
            };

            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(&path, &text) {
                        eprintln!("❌ Failed to write {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                    println!("✅ Wrote configuration to {}", path.display());
                }
                None => println!("{}", text),
            }
        }

        Commands::Diff { config } => {
            let source = match std::fs::read_to_string(&config) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("❌ Failed to read {}: {}", config.display(), e);
                    std::process::exit(1);
                }
            };

            let store = open_store(&cli.store, &settings);
            let parsed = domainly_config::parse(&source);
            let result = domainly_config::compare(store.list(), &parsed.servers);

            println!("Reconciliation against {}:", config.display());
            println!("  ✅ matched: {}", result.matched.len());
            for (record, _) in &result.matched {
                println!("     {}", record.name);
            }

            println!("  📦 only in manager: {}", result.manager_only.len());
            for record in &result.manager_only {
                println!("     {}", record.name);
            }

            println!("  📄 only in file: {}", result.file_only.len());
            for server in &result.file_only {
                println!("     {}", server.primary_name().unwrap_or("<unnamed>"));
            }

            if !result.port_mismatches.is_empty() {
                println!("  ⚠️ port mismatches:");
                for m in &result.port_mismatches {
                    println!(
                        "     {}: manager says {}, file says {}",
                        m.name, m.managed_port, m.file_port
                    );
                }
            }
        }

        Commands::Hosts { apply } => {
            let store = open_store(&cli.store, &settings);
            let block = domainly_core::hosts::render_managed_block(store.list());

            if !apply {
                println!("{}", block);
                return Ok(());
            }

            let path = &settings.hosts_path;
            let existing = match domainly_core::hosts::read_hosts(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };

            let spliced = domainly_core::hosts::splice_managed_block(&existing, &block);
            match domainly_core::hosts::write_hosts(path, &spliced) {
                Ok(()) => println!("✅ Updated {}", path.display()),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn print_domain(record: &domainly_core::DomainRecord, depth: usize) {
    let marker = if record.is_active { "●" } else { "○" };
    println!(
        "  {}{} {} (id {}, port {})",
        "  ".repeat(depth),
        marker,
        record.name,
        record.id,
        record.effective_port()
    );
}

fn store_path(cli_store: &Option<PathBuf>, settings: &Settings) -> Option<PathBuf> {
    cli_store.clone().or_else(|| settings.store_path.clone())
}

fn open_store(cli_store: &Option<PathBuf>, settings: &Settings) -> DomainStore {
    let result = match store_path(cli_store, settings) {
        Some(path) => DomainStore::open(path),
        None => DomainStore::open_default(),
    };
    match result {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to open domain store: {}", e);
            std::process::exit(1);
        }
    }
}
