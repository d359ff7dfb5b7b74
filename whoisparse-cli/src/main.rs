use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use whoisparse_core::colors::CatppuccinExt;
use whoisparse_core::output::{get_formatter, OutputFormat};
use whoisparse_core::{ParseOptions, ParseOutcome, PatternTable, WhoisParser, BUILTIN_PATTERNS};

#[derive(Parser)]
#[command(name = "whoisparse")]
#[command(about = "Parse raw WHOIS responses into structured registration fields")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (human or json)
    #[arg(short, long, default_value = "human", global = true)]
    format: String,

    /// JSON pattern table to use instead of the built-in one
    #[arg(long, global = true)]
    patterns: Option<PathBuf>,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Args)]
struct OptionArgs {
    /// Return degraded results instead of failing on quota or unparseable responses
    #[arg(long, global = true)]
    lenient: bool,

    /// Drop lines starting with '%'
    #[arg(long, global = true)]
    strip_comments: bool,

    /// Keep "REDACTED FOR PRIVACY" lines
    #[arg(long, global = true)]
    keep_redacted: bool,

    /// Log each parsing decision
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl OptionArgs {
    fn to_options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_lenient(self.lenient)
            .with_strip_comments(self.strip_comments)
            .with_keep_redacted(self.keep_redacted)
            .with_verbose(self.verbose)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one WHOIS response
    Parse {
        /// Response file, or - for stdin
        file: String,
        /// Domain the response belongs to
        #[arg(short, long, conflicts_with = "tld", required_unless_present = "tld")]
        domain: Option<String>,
        /// TLD whose patterns to apply
        #[arg(short, long)]
        tld: Option<String>,
    },
    /// Parse many response files; each file is named after its domain
    Bulk {
        /// Response files such as example.com.txt
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// TLD to use for every file instead of deriving it from the name
        #[arg(short, long)]
        tld: Option<String>,
    },
    /// List the TLDs of the active pattern table
    Tlds,
}

#[derive(Serialize)]
struct BulkEntry {
    file: String,
    #[serde(flatten)]
    outcome: Option<ParseOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.options.verbose {
        EnvFilter::new("warn,whoisparse_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".ctp_red(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format: OutputFormat = cli.format.parse().unwrap_or_default();
    let formatter = get_formatter(output_format);

    let custom;
    let table: &PatternTable = match cli.patterns {
        Some(ref path) => {
            custom = PatternTable::from_json_file(path)
                .with_context(|| format!("loading patterns from {}", path.display()))?;
            &custom
        }
        None => &BUILTIN_PATTERNS,
    };
    debug!(tlds = table.len(), "Pattern table ready");

    match cli.command {
        Commands::Parse { file, domain, tld } => {
            let raw = read_input(&file)?;
            let parser = WhoisParser::new(table).with_options(cli.options.to_options());
            let outcome = match (domain.as_deref(), tld.as_deref()) {
                (Some(domain), _) => parser.parse_domain(&raw, domain)?,
                (None, Some(tld)) => parser.parse(&raw, tld)?,
                (None, None) => anyhow::bail!("either --domain or --tld is required"),
            };
            println!("{}", formatter.format_outcome(domain.as_deref(), &outcome));
        }
        Commands::Bulk { files, tld } => {
            let options = cli.options.to_options().with_lenient(true);
            let parser = WhoisParser::new(table).with_options(options);

            let entries: Vec<BulkEntry> = files
                .iter()
                .map(|path| {
                    let result = std::fs::read_to_string(path)
                        .map_err(anyhow::Error::from)
                        .and_then(|raw| {
                            let outcome = match tld.as_deref() {
                                Some(tld) => parser.parse(&raw, tld)?,
                                None => parser.parse_domain(&raw, &domain_from_path(path))?,
                            };
                            Ok(outcome)
                        });
                    match result {
                        Ok(outcome) => BulkEntry {
                            file: path.display().to_string(),
                            outcome: Some(outcome),
                            error: None,
                        },
                        Err(e) => BulkEntry {
                            file: path.display().to_string(),
                            outcome: None,
                            error: Some(format!("{:#}", e)),
                        },
                    }
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Commands::Tlds => {
            println!("{}", formatter.format_table(table));
        }
    }

    Ok(())
}

fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("reading stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file))
    }
}

/// `responses/example.co.uk.txt` -> `example.co.uk`
fn domain_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    [".txt", ".whois", ".out"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .map(str::to_string)
        .unwrap_or(name)
}
