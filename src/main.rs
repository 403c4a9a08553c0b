//! smt CLI - Command line interface for sparse_trie
//!
//! Builds a trie from values given as arguments and/or a newline-separated values file,
//! then prints its root, the root after every insert, proofs, or its leaves.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sparse_trie::{Config, Error, OutputFormat, PathKey, SparseMerkleTrie};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smt")]
#[command(about = "An authenticated sparse Merkle trie over content-addressed leaves")]
#[command(version)]
struct Cli {
    /// Output format (json or text); overrides the config file
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Newline-separated values inserted before those given as arguments
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the root hash after inserting every value
    Root {
        /// Values to insert
        values: Vec<String>,
    },

    /// Print the initial root and the root after each insert
    History {
        /// Values to insert, in order
        values: Vec<String>,
    },

    /// Prove that a value is in the trie
    Prove {
        /// The value to prove
        target: String,
        /// Values to insert
        values: Vec<String>,
        /// Print sibling entries instead of the packed encoding
        #[arg(long)]
        raw: bool,
    },

    /// Prove that a value is absent and name the leaves around its gap
    Exclude {
        /// The absent value
        target: String,
        /// Values to insert
        values: Vec<String>,
        /// Print sibling entries instead of the packed encoding
        #[arg(long)]
        raw: bool,
    },

    /// List every leaf in key order, boundary leaves included
    Leaves {
        /// Values to insert
        values: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    init_tracing(&config.log);

    let format = cli.format.unwrap_or(config.format);
    let values_file = cli.file.or(config.values_file);
    let mut preset = match &values_file {
        Some(path) => read_values(path)?,
        None => Vec::new(),
    };

    match cli.command {
        Commands::Root { values } => {
            preset.extend(values);
            let trie = build_trie(&preset)?;
            output(
                format,
                &serde_json::json!({
                    "root": trie.root_hash(),
                    "leaves": trie.len()
                }),
            )?;
        }

        Commands::History { values } => {
            preset.extend(values);
            let mut trie = SparseMerkleTrie::new();
            let mut roots = vec![trie.root_hash()];
            for value in &preset {
                trie.insert(value)?;
                roots.push(trie.root_hash());
            }
            output(format, &serde_json::json!({ "roots": roots }))?;
        }

        Commands::Prove {
            target,
            values,
            raw,
        } => {
            preset.extend(values);
            let trie = build_trie(&preset)?;
            match trie.prove_membership(&target) {
                Ok(proof) => {
                    let proof = if raw {
                        serde_json::to_value(&proof)?
                    } else {
                        serde_json::to_value(proof.encode())?
                    };
                    output(
                        format,
                        &serde_json::json!({
                            "root": trie.root_hash(),
                            "value": target,
                            "key": PathKey::from_value(target.as_bytes()),
                            "proof": proof
                        }),
                    )?;
                }
                Err(err @ Error::InvalidQuery(_)) => fail(format, &err)?,
                Err(err) => return Err(err.into()),
            }
        }

        Commands::Exclude {
            target,
            values,
            raw,
        } => {
            preset.extend(values);
            let trie = build_trie(&preset)?;
            match trie.prove_modification(&target) {
                Ok(proof) => {
                    let proof = if raw {
                        serde_json::to_value(&proof)?
                    } else {
                        serde_json::to_value(proof.encode())?
                    };
                    output(
                        format,
                        &serde_json::json!({
                            "root": trie.root_hash(),
                            "value": target,
                            "key": PathKey::from_value(target.as_bytes()),
                            "proof": proof
                        }),
                    )?;
                }
                Err(err @ Error::InvalidQuery(_)) => fail(format, &err)?,
                Err(err) => return Err(err.into()),
            }
        }

        Commands::Leaves { values } => {
            preset.extend(values);
            let trie = build_trie(&preset)?;
            let leaves: Vec<serde_json::Value> = trie
                .leaves()
                .into_iter()
                .map(|leaf| {
                    serde_json::json!({
                        "key": leaf.key,
                        "hash": leaf.hash,
                        "content": String::from_utf8_lossy(&leaf.content),
                        "boundary": leaf.is_boundary()
                    })
                })
                .collect();
            output(
                format,
                &serde_json::json!({
                    "root": trie.root_hash(),
                    "count": leaves.len(),
                    "leaves": leaves
                }),
            )?;
        }
    }

    Ok(())
}

/// `SMT_LOG` and the config's `log` directive have already been merged into `directive`
fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid log directive {:?}: {}", directive, err);
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One value per line; blank lines are skipped
fn read_values(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read values file {}", path.display()))?;
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn build_trie(values: &[String]) -> anyhow::Result<SparseMerkleTrie> {
    let mut trie = SparseMerkleTrie::new();
    trie.insert_all(values)?;
    tracing::info!(leaves = trie.len(), root = %trie.root_hash(), "built trie");
    Ok(trie)
}

fn output(format: OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value)?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}

fn fail(format: OutputFormat, err: &Error) -> anyhow::Result<()> {
    output(
        format,
        &serde_json::json!({
            "status": "error",
            "message": err.to_string()
        }),
    )?;
    std::process::exit(1);
}
