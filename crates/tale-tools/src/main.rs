//! `tale` command line
//!
//! Runs the tool server, single tool calls, and trait catalog lookups.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use serde_json::Value;
use std::path::PathBuf;
use tale_schema::ValidationConfig;
use tale_tools::{descriptors, serve, ToolName, ToolRegistry};
use tale_traits::TraitCatalog;
use tokio::io::{AsyncReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("tale")
        .version(tale_tools::VERSION)
        .about("Story payload validation and trait normalization")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML file overriding validation limits"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log filter when RUST_LOG is unset"),
        )
        .subcommand(Command::new("serve").about("Serve tool requests over stdin/stdout"))
        .subcommand(
            Command::new("call")
                .about("Invoke one tool with a JSON arguments object")
                .arg(
                    Arg::new("tool")
                        .required(true)
                        .value_parser(ToolName::ALL.map(ToolName::as_str))
                        .help("Tool name"),
                )
                .arg(
                    Arg::new("input")
                        .long("input")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Arguments file (stdin when omitted)"),
                ),
        )
        .subcommand(Command::new("tools").about("Print tool descriptors"))
        .subcommand(Command::new("traits").about("List canonical traits and their aliases"))
        .subcommand(
            Command::new("resolve")
                .about("Resolve a trait name to its canonical identifier")
                .arg(Arg::new("name").required(true).help("Trait name in any spelling")),
        )
}

fn init_logging(matches: &ArgMatches) {
    let level = matches
        .get_one::<String>("log-level")
        .map_or("warn", String::as_str);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<ValidationConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => ValidationConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ValidationConfig::default()),
    }
}

async fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("reading stdin")?;
            Ok(raw)
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(&matches);
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("serve", _)) => {
            let registry = ToolRegistry::new(config);
            let stdin = BufReader::new(tokio::io::stdin());
            serve(&registry, stdin, tokio::io::stdout()).await?;
        }
        Some(("call", args)) => {
            let tool = args
                .get_one::<String>("tool")
                .context("tool name is required")?;
            let raw = read_input(args.get_one::<PathBuf>("input")).await?;
            let arguments: Value = serde_json::from_str(&raw).context("arguments are not valid JSON")?;

            let result = ToolRegistry::new(config).call(tool, arguments)?;
            print_json(&result)?;
        }
        Some(("tools", _)) => print_json(&descriptors())?,
        Some(("traits", _)) => {
            let catalog = TraitCatalog::new();
            for id in catalog.canonical() {
                println!("{:<24} {}", id.as_str(), catalog.aliases_for(id).join(", "));
            }
        }
        Some(("resolve", args)) => {
            let name = args
                .get_one::<String>("name")
                .context("trait name is required")?;
            match TraitCatalog::new().resolve(name) {
                Some(id) => println!("{id}"),
                None => bail!("no trait matches '{name}'"),
            }
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn call_rejects_unknown_tool_names() {
        let parsed = cli().try_get_matches_from(["tale", "call", "validate_everything"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let matches = cli()
            .try_get_matches_from(["tale", "tools", "--config", "limits.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("limits.toml"))
        );
    }
}
