//! rdict CLI
//!
//! Command-line driver for exercising a `Dict<String, String>` in-process:
//! supports a one-shot exec mode and an interactive REPL.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use rdict::config::DictConfig;
use rdict::{Dict, LoggingHandle};

#[derive(Parser)]
#[command(name = "rdict")]
#[command(author, version, about = "rdict - incrementally-rehashing dictionary CLI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand to run; defaults to interactive mode.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive REPL (default).
    #[command(alias = "i")]
    Interactive,
    /// Execute a single command and exit, e.g. `rdict exec SET a 1`.
    #[command(alias = "e")]
    Exec {
        #[arg(required = true)]
        args: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_handle = init_logging(cli.verbose)?;

    let config = DictConfig::load().unwrap_or_default();
    config.apply().map_err(|e| anyhow::anyhow!(e))?;

    let mut dict: Dict<String, String> = Dict::with_capacity(config.initial_capacity);

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => repl(&mut dict),
        Commands::Exec { args } => {
            let line = args.join(" ");
            let output = run_line(&mut dict, &line);
            println!("{output}");
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<LoggingHandle> {
    let mut config = rdict::logging::config::LoggingConfig::default();
    if verbose {
        config.level = "debug".to_string();
    }
    rdict::init_logging(config).map_err(|e| anyhow::anyhow!(e.to_string()))
}

fn repl(dict: &mut Dict<String, String>) -> anyhow::Result<()> {
    println!("rdict {} - type HELP for commands, QUIT to exit", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("rdict> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        println!("{}", run_line(dict, line));
    }
    Ok(())
}

fn run_line(
    dict: &mut Dict<String, String>,
    line: &str,
) -> String {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((cmd, args)) = parts.split_first() else {
        return String::new();
    };

    match cmd.to_uppercase().as_str() {
        "HELP" => {
            "commands: GET k | SET k v | DEL k | EXISTS k | LEN | SCAN | RANDOMKEY | STATS | QUIT"
                .to_string()
        }
        "GET" => match args {
            [key] => match dict.get(*key) {
                Some(v) => v.clone(),
                None => "(nil)".to_string(),
            },
            _ => "usage: GET <key>".to_string(),
        },
        "SET" => match args {
            [key, value] => {
                dict.insert(key.to_string(), value.to_string());
                "OK".to_string()
            }
            _ => "usage: SET <key> <value>".to_string(),
        },
        "DEL" => match args {
            [key] => match dict.remove(*key) {
                Some(_) => "1".to_string(),
                None => "0".to_string(),
            },
            _ => "usage: DEL <key>".to_string(),
        },
        "EXISTS" => match args {
            [key] => {
                if dict.contains_key(*key) {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            _ => "usage: EXISTS <key>".to_string(),
        },
        "LEN" => dict.len().to_string(),
        "SCAN" => {
            let mut keys = Vec::new();
            let mut cursor = 0u64;
            loop {
                cursor = dict.scan(cursor, |k, _| keys.push(k.clone()));
                if cursor == 0 {
                    break;
                }
            }
            keys.join(", ")
        }
        "RANDOMKEY" => match dict.random_entry() {
            Some((k, _)) => k.clone(),
            None => "(nil)".to_string(),
        },
        "STATS" => dict.stats(),
        other => format!("unknown command: {other}, try HELP"),
    }
}
