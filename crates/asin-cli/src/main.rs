//! ASIN redirector CLI
//!
//! CLI tool for checking product URLs and managing the redirect ruleset.

mod bench;
mod check;
mod logging;

use std::fs;
use std::io::Write;
use std::time::Instant;

use clap::{Parser, Subcommand};

use asin_compiler::{build_ruleset, build_update, parse_ruleset, verify_ruleset};
use asin_core::shape::{all_shapes, ShapeId};
use asin_core::{QueryPolicy, RedirectConfig, Redirector};

use crate::bench::{run_bench, BenchOptions};
use crate::check::{run_check, CheckOptions};

#[derive(Parser)]
#[command(name = "asin-cli")]
#[command(about = "Amazon JP canonical product URL tools")]
struct Cli {
    /// Redirector config (JSON)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide what the redirector does with each URL
    Check {
        /// URLs to check
        urls: Vec<String>,

        /// File with one URL per line
        #[arg(short, long)]
        input: Option<String>,

        /// Emit one JSON object per URL
        #[arg(long)]
        json: bool,
    },

    /// Generate the declarativeNetRequest ruleset
    Rules {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Wrap the rules in an updateDynamicRules payload
        #[arg(long)]
        update: bool,
    },

    /// Verify a ruleset file against the built-in shapes
    Verify {
        /// Ruleset file to verify
        #[arg(short, long)]
        input: String,
    },

    /// List the legacy URL shapes and the rules built from them
    Shapes,

    /// Run decision latency benchmark
    Bench {
        /// Passes over the sample corpus
        #[arg(short = 'n', long, default_value_t = 1000)]
        iterations: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Check { urls, input, json } => {
            run_check(CheckOptions { urls, input, json }, &Redirector::new(config))
        }
        Commands::Rules { output, update } => cmd_rules(&config, output.as_deref(), update),
        Commands::Verify { input } => cmd_verify(&config, &input),
        Commands::Shapes => cmd_shapes(&config),
        Commands::Bench { iterations } => run_bench(BenchOptions { iterations }, &config),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<RedirectConfig, String> {
    let Some(path) = path else {
        return Ok(RedirectConfig::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    let config = RedirectConfig::from_json(&content)
        .map_err(|e| format!("Invalid config '{}': {}", path, e))?;

    log::debug!("loaded config from {}: {:?}", path, config);
    Ok(config)
}

fn cmd_rules(config: &RedirectConfig, output: Option<&str>, update: bool) -> Result<(), String> {
    let json = if update {
        serde_json::to_string_pretty(&build_update(config))
    } else {
        serde_json::to_string_pretty(&build_ruleset(config))
    }
    .map_err(|e| format!("Failed to serialize rules: {}", e))?;

    match output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .map_err(|e| format!("Failed to create '{}': {}", path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
            file.write_all(b"\n")
                .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
            eprintln!("Wrote {} rules to {}", build_ruleset(config).len(), path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_verify(config: &RedirectConfig, input: &str) -> Result<(), String> {
    let start = Instant::now();

    let content = fs::read_to_string(input)
        .map_err(|e| format!("Failed to read '{}': {}", input, e))?;
    let rules = parse_ruleset(&content)
        .map_err(|e| format!("Invalid ruleset '{}': {}", input, e))?;
    let report = verify_ruleset(&rules, config)
        .map_err(|e| format!("Verification failed: {}", e))?;

    println!("Ruleset: {}", input);
    println!("  Rules:     {}", report.rules);
    println!("  Samples:   {}", report.samples);
    println!("  Redirects: {}", report.redirects);
    println!("  Time:      {:.2?}", start.elapsed());
    println!();
    println!("Ruleset is valid!");

    Ok(())
}

fn cmd_shapes(config: &RedirectConfig) -> Result<(), String> {
    let json = serde_json::to_string(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    println!("Config: {}", json);
    println!();
    for line in shape_table(config) {
        println!("{}", line);
    }

    Ok(())
}

/// One line per shape in priority order, with the declarative rule id it
/// compiles to (`-` when the shape has no rule of its own).
fn shape_table(config: &RedirectConfig) -> Vec<String> {
    let mut rule_id = 0u32;

    all_shapes()
        .map(|shape| {
            let has_rule = shape.declarative
                || (shape.id == ShapeId::DpFallback && config.query_policy == QueryPolicy::Strip);
            let rule = if has_rule {
                rule_id += 1;
                rule_id.to_string()
            } else {
                "-".to_string()
            };
            let pattern = if shape.id == ShapeId::DpFallback && has_rule {
                format!("{}?<query>", shape.pattern())
            } else {
                shape.pattern()
            };
            format!("{:>4}  {:<24} {}", rule, shape.id.as_str(), pattern)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use asin_core::{QueryPolicy, RedirectConfig};

    use super::shape_table;

    #[test]
    fn shape_table_lists_rule_ids() {
        let table = shape_table(&RedirectConfig::default());
        assert_eq!(table.len(), 15);
        assert_eq!(table[0], "   1  exec-obidos-asin         /exec/obidos/ASIN/<id>");
        assert_eq!(table[13], "   -  slug-dp-trailing         /<anything>/dp/<id>/");
        assert_eq!(table[14], "  14  dp                       /dp/<id>?<query>");

        let keep = shape_table(&RedirectConfig {
            query_policy: QueryPolicy::Keep,
            ..RedirectConfig::default()
        });
        assert_eq!(keep[14], "   -  dp                       /dp/<id>");
    }
}
