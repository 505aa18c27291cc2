use std::{fs::File, path::PathBuf, sync::Mutex};

use alphatrie::{render_json, render_text, Outcome};
use clap::{Parser, Subcommand};
use tracing::{debug, info, level_filters::LevelFilter};

mod demo;
mod run;

use demo::DemoArgs;
use run::RunArgs;

/// Insert, search, and delete lowercase keys in a prefix tree.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Replay insert/search/delete scripts against a lowercase prefix tree."
)]
struct Cli {
    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Print outcomes as JSON.
    #[arg(long, global = true)]
    json: bool,
    /// Raise the log level, once for info, twice for debug, three times for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay the built-in reference sequence.
    Demo(DemoArgs),
    /// Run a script file, or a script piped on stdin.
    Run(RunArgs),
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = log_level(cli.verbose);
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

fn print_outcomes(outcomes: &[Outcome], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", render_json(outcomes)?);
    } else {
        print!("{}", render_text(outcomes));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    info!("alphatrie {}", env!("CARGO_PKG_VERSION"));
    debug!("Parsed arguments: {:?}", cli);

    match cli.command {
        Commands::Demo(args) => demo::execute_demo(args, cli.json).await,
        Commands::Run(args) => run::execute_run(args, cli.json).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo() {
        let cli = Cli::try_parse_from(["alphatrie", "--json", "demo"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Demo(_)));
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "alphatrie",
            "run",
            "script.txt",
            "--keep-going",
            "-p",
            "cat",
            "-p",
            "car",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(log_level(cli.verbose), LevelFilter::DEBUG);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["alphatrie"]).is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), LevelFilter::WARN);
        assert_eq!(log_level(1), LevelFilter::INFO);
        assert_eq!(log_level(7), LevelFilter::TRACE);
    }
}
