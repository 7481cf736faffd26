//! dnsq
//!
//! A small DNS lookup client: builds one query, sends it over UDP or a raw
//! IPv4 socket, and prints the decoded answer.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use console::style;
use dnsq::output::{self, OutputFormat};
use dnsq::tracing_setup::{init_tracing, LogConfig};
use dnsq::{build_question, lookup, transport};
use dnsq_config::{Config, TransportKind};
use dnsq_proto::RecordType;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tracing::debug;

/// dnsq - query a DNS server and print the answer
#[derive(Parser, Debug)]
#[command(name = "dnsq")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("target").required(true).args(["host", "host_flag"])))]
struct Cli {
    /// Host name or address to look up
    #[arg(value_name = "HOST")]
    host: Option<String>,

    /// Host name or address to look up
    #[arg(short = 'H', long = "host", value_name = "HOST")]
    host_flag: Option<String>,

    /// Record type (a, aaaa, ptr, cname, ns, soa)
    #[arg(short, long, value_name = "TYPE", default_value = "a", value_parser = parse_qtype)]
    qtype: RecordType,

    /// Server to query
    #[arg(short, long, value_name = "ADDR")]
    server: Option<IpAddr>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    timeout: Option<u64>,

    /// Print the full response and debug logs
    #[arg(short, long)]
    verbose: bool,

    /// Reverse lookup of an address literal
    #[arg(short = 'x', long)]
    reverse: bool,

    /// Clear the recursion desired bit
    #[arg(long)]
    no_recurse: bool,

    /// Transaction ID (random if omitted)
    #[arg(long)]
    id: Option<u16>,

    /// Send through a raw IPv4 socket (needs CAP_NET_RAW)
    #[arg(long)]
    raw: bool,

    /// Source address for raw datagrams
    #[arg(long, value_name = "ADDR")]
    source: Option<Ipv4Addr>,

    /// Print the response as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn target(&self) -> &str {
        self.host
            .as_deref()
            .or(self.host_flag.as_deref())
            .unwrap_or_default()
    }

    /// Applies command-line flags over file values.
    fn apply_overrides(&self, config: &mut Config) {
        let resolver = &mut config.resolver;
        if let Some(server) = self.server {
            resolver.server = server;
        }
        if let Some(port) = self.port {
            resolver.port = port;
        }
        if let Some(timeout) = self.timeout {
            resolver.timeout_ms = timeout;
        }
        if self.no_recurse {
            resolver.recursion_desired = false;
        }
        if self.raw {
            resolver.transport = TransportKind::Raw;
        }
        if self.source.is_some() {
            resolver.source_address = self.source;
        }
    }
}

fn parse_qtype(s: &str) -> std::result::Result<RecordType, String> {
    RecordType::from_mnemonic(s).ok_or_else(|| {
        let known: Vec<String> = RecordType::all()
            .map(|t| t.name().to_ascii_lowercase())
            .collect();
        format!("unknown record type {s:?} (expected one of {})", known.join(", "))
    })
}

/// Find the configuration file in standard locations
fn find_config_file(explicit_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path);
    }

    let search_paths = [
        PathBuf::from("./dnsq.yaml"),
        PathBuf::from("./dnsq.yml"),
        PathBuf::from("./dnsq.toml"),
        PathBuf::from("./dnsq.json"),
        dirs::config_dir()
            .map(|p| p.join("dnsq/config.yaml"))
            .unwrap_or_default(),
    ];

    search_paths.into_iter().find(|path| path.is_file())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match find_config_file(cli.config.clone()) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_tracing(&LogConfig::from_settings(
        &config.logging,
        cli.log_level.as_deref(),
        cli.verbose,
    ));
    debug!(?config, "configuration loaded");

    let question = build_question(cli.target(), cli.qtype, cli.reverse)?;
    let transport =
        transport::from_config(&config.resolver).context("Failed to set up transport")?;
    let id = cli.id.unwrap_or_else(rand::random);

    let reply = lookup(
        transport.as_ref(),
        id,
        &question,
        config.resolver.recursion_desired,
    )
    .await?;

    let format = OutputFormat::from_flags(cli.verbose, cli.json);
    let rendered =
        output::render(&reply.message, format, reply.size).context("Failed to render response")?;
    print!("{rendered}");

    if format == OutputFormat::Short && reply.message.answers().is_empty() {
        eprintln!(
            "{}",
            style(format!(
                ";; no answers for {} ({})",
                question,
                reply.message.rcode()
            ))
            .yellow()
        );
    }

    Ok(())
}
