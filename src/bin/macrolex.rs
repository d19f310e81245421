//! Command-line interface for macrolex
//!
//! Usage:
//!   macrolex tokenize `<path|->` [--format `<format>`] [--config `<file>`] [--recovery skip|abort]
//!   macrolex modes                                  - Print the built-in mode table
//!   macrolex formats                                - List available output formats
//!
//! Settings come from the built-in defaults, then `./macrolex.toml` if present, then `--config`,
//! then the individual flags.
//!
//! Exit codes: 0 on a clean lex, 2 when lexical errors were reported, 1 when the input or the
//! configuration could not be loaded. Set `MACROLEX_LOG` (e.g. `debug`) to see engine logs on
//! stderr.

use std::io::Read;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use macrolex::macrolex::config::{Loader, MacroLexConfig, LOCAL_CONFIG_FILE};
use macrolex::macrolex::formats::FormatRegistry;
use macrolex::{macro_grammar, Lexer};

const LOG_ENV: &str = "MACROLEX_LOG";

fn main() -> ExitCode {
    init_logging();

    let matches = Command::new("macrolex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize text containing {{macro}} templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokenize")
                .about("Tokenize a file and print the token report")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'tag', 'json', 'yaml')"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("TOML file layered over the built-in defaults"),
                )
                .arg(
                    Arg::new("recovery")
                        .long("recovery")
                        .help("What to do when no token matches")
                        .value_parser(["skip", "abort"]),
                )
                .arg(
                    Arg::new("no-positions")
                        .long("no-positions")
                        .help("Leave line/column positions out of the report")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("modes").about("Print the modes of the built-in grammar"))
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("tokenize", tokenize_matches)) => handle_tokenize_command(tokenize_matches),
        Some(("modes", _)) => {
            print!("{}", macro_grammar().describe());
            ExitCode::SUCCESS
        }
        Some(("formats", _)) => {
            handle_formats_command();
            ExitCode::SUCCESS
        }
        _ => unreachable!(),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second subscriber can only come from an embedding test harness
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

fn load_config(matches: &ArgMatches) -> Result<MacroLexConfig, String> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader
            .set_override("output.format", format.as_str())
            .map_err(|e| e.to_string())?;
    }
    if let Some(recovery) = matches.get_one::<String>("recovery") {
        loader = loader
            .set_override("lexer.recovery", recovery.as_str())
            .map_err(|e| e.to_string())?;
    }
    if matches.get_flag("no-positions") {
        loader = loader
            .set_override("lexer.track-positions", false)
            .map_err(|e| e.to_string())?;
    }
    loader.build().map_err(|e| e.to_string())
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Handle the tokenize command
fn handle_tokenize_command(matches: &ArgMatches) -> ExitCode {
    let config = match load_config(matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    let registry = FormatRegistry::with_defaults();
    if !registry.has(&config.output.format) {
        eprintln!(
            "Error: unknown format '{}' (available: {})",
            config.output.format,
            registry.list_formats().join(", ")
        );
        return ExitCode::from(1);
    }

    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("-");
    let source = match read_input(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            return ExitCode::from(1);
        }
    };

    let result = Lexer::with_options(macro_grammar(), config.lexer).tokenize(&source);
    match registry.serialize(&result, &config.output.format) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    }

    if result.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let description = registry.get(&name).map_or("", |f| f.description());
        println!("  {}", name);
        println!("    {}", description);
    }
}
