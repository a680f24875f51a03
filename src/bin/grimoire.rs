//! Command-line interface for grimoire highlighting
//! Classifies grimoire source and prints the result in one of the registered formats.
//!
//! Usage:
//!   grimoire highlight [`<path>`] [--format `<format>`] [--variant v1|v2] [--config `<file>`]
//!   grimoire list-formats                        - List available output formats
//!   grimoire rules [--variant v1|v2]             - Print the rule table
//!
//! Without a path, `highlight` reads stdin. Logs go to stderr; set RUST_LOG or pass --verbose.

use clap::{Arg, ArgAction, ArgMatches, Command};
use config::ConfigError;
use grimoire::highlight::config::Loader;
use grimoire::highlight::formats::{FormatError, FormatRegistry, HtmlFormatter};
use grimoire::highlight::LanguageVariant;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Optional per-directory configuration picked up when --config is not given.
const LOCAL_CONFIG: &str = "grimoire.toml";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

fn main() {
    let matches = Command::new("grimoire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Syntax highlighting rules for grimoire source")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("highlight")
                .about("Classify a grimoire file (or stdin) and print the spans")
                .arg(
                    Arg::new("path")
                        .help("Path to the grimoire file; reads stdin when omitted")
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'html', 'json', 'treeviz')"),
                )
                .arg(variant_arg())
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .subcommand(
            Command::new("rules")
                .about("Print the rule table in priority order")
                .arg(variant_arg()),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("highlight", highlight_matches)) => handle_highlight_command(highlight_matches),
        Some(("list-formats", _)) => {
            handle_list_formats_command();
            Ok(())
        }
        Some(("rules", rules_matches)) => {
            handle_rules_command(rules_matches);
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn variant_arg() -> Arg {
    Arg::new("variant")
        .long("variant")
        .help("Rule table variant")
        .value_parser(["v1", "v2"])
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

/// Handle the highlight command
fn handle_highlight_command(matches: &ArgMatches) -> Result<(), CliError> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(variant) = matches.get_one::<String>("variant") {
        loader = loader.set_override("highlight.variant", variant.as_str())?;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    let config = loader.build()?;
    debug!(?config, "loaded configuration");

    let path = matches.get_one::<String>("path").map(PathBuf::from);
    let source = read_source(path.as_ref())?;

    let spans: Vec<_> = config.highlight.variant.table().classify(&source).collect();

    let mut registry = FormatRegistry::with_defaults();
    registry.register(HtmlFormatter::with_class_prefix(config.html.class_prefix));
    let output = registry.serialize(&source, &spans, &config.output.format)?;

    print!("{}", output);
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn read_source(path: Option<&PathBuf>) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|source| CliError::Read {
                    path: "stdin".to_string(),
                    source,
                })?;
            Ok(source)
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let description = registry
            .get(&name)
            .map(|formatter| formatter.description())
            .unwrap_or_default();
        println!("  {:<10} {}", name, description);
    }
}

/// Handle the rules command
fn handle_rules_command(matches: &ArgMatches) {
    let variant = matches
        .get_one::<String>("variant")
        .and_then(|v| v.parse::<LanguageVariant>().ok())
        .unwrap_or_default();

    println!("grimoire {} rule table:\n", variant);
    for rule in variant.table().rules() {
        let mut flags = Vec::new();
        if rule.is_lookbehind() {
            flags.push("lookbehind");
        }
        if rule.is_greedy() {
            flags.push("greedy");
        }
        if rule.is_case_insensitive() {
            flags.push("nocase");
        }
        if rule.nested().is_some() {
            flags.push("nested");
        }
        let pattern = match rule.closing_pattern() {
            Some(close) => format!("{} ... {}", rule.pattern(), close),
            None => rule.pattern().to_string(),
        };
        println!(
            "  {:<12} {:<28} {}",
            rule.category(),
            flags.join(","),
            pattern
        );
        if let Some(nested) = rule.nested() {
            for inner in nested.rules() {
                println!("    {:<10} {:<28} {}", inner.category(), "", inner.pattern());
            }
        }
    }
}
