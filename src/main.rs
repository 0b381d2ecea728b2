//! regcache command line.
//!
//! # Usage
//! ```text
//! regcache [--config regcache.toml] [-p PARAM]... <COMMAND>
//!
//!   match   <PATTERN> <INPUT>                 exit status 1 when nothing matches
//!   replace <PATTERN> <INPUT> <TEMPLATE>      `$N` / `${N}` expanded unless --literal
//!   split   <PATTERN> <INPUT>                 JSON array of segments
//!   escape  <TEXT>
//!   check   <PATTERN>                         canonical form, or the compile error
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use regcache::config::{load_config, RegcacheConfig};
use regcache::observability::logging::init_logging;
use regcache::{escape, PatternCache, SystemMemory};

#[derive(Parser)]
#[command(name = "regcache")]
#[command(about = "Cached regex patterns with parameters and capture-aware replace/split", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Positional parameter for %1, %2, ... (repeatable).
    #[arg(short, long = "param", global = true)]
    params: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test whether the input contains a match
    Match { pattern: String, input: String },
    /// Replace every match
    Replace {
        pattern: String,
        input: String,
        template: String,
        /// Insert the replacement verbatim
        #[arg(long)]
        literal: bool,
    },
    /// Split the input, keeping capture groups
    Split { pattern: String, input: String },
    /// Escape regex metacharacters
    Escape { text: String },
    /// Validate a pattern and print its canonical form
    Check { pattern: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RegcacheConfig::default(),
    };
    init_logging(&config.observability);

    tracing::debug!(
        ttl_secs = config.cache.ttl_secs,
        low_memory_mb = config.cache.low_memory_mb,
        "Configuration loaded"
    );

    let (cache, eviction) = PatternCache::start(config.cache, Arc::new(SystemMemory));
    let status = run(&cache, &cli);
    eviction.stop().await;

    status
}

fn run(cache: &PatternCache, cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let params = &cli.params;

    match &cli.command {
        Commands::Match { pattern, input } => {
            let matched = cache.try_compile(pattern, params)?.is_match(input.as_bytes());
            println!("{}", matched);
            return Ok(if matched { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Commands::Replace {
            pattern,
            input,
            template,
            literal,
        } => {
            let re = cache.try_compile(pattern, params)?;
            let out = if *literal {
                re.replace_literal(input.as_bytes(), template.as_bytes())
            } else {
                re.replace_template(input.as_bytes(), template.as_bytes())
            };
            println!("{}", String::from_utf8_lossy(&out));
        }
        Commands::Split { pattern, input } => {
            let re = cache.try_compile(pattern, params)?;
            let segments: Vec<_> = re
                .split(input.as_bytes())
                .into_iter()
                .map(String::from_utf8_lossy)
                .collect();
            println!("{}", serde_json::to_string_pretty(&segments)?);
        }
        Commands::Escape { text } => {
            println!("{}", escape(text));
        }
        Commands::Check { pattern } => match cache.try_compile(pattern, params) {
            Ok(re) => println!("{}", re.as_str()),
            Err(e) => {
                eprintln!("{}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
