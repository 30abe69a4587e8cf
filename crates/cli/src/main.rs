use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use platelunch_cli::commands::{self, Context};
use platelunch_cli::exit_codes::EXIT_SUCCESS;
use platelunch_cli::{tracing_setup, CliError};
use platelunch_config::Settings;

#[derive(Parser)]
#[command(name = "platelunch")]
#[command(about = "Clean restaurant contact sheets: drop duplicates, tidy phones, add Instagram search links")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settings file (default: <config dir>/platelunch/config.toml)
    #[arg(long, global = true, env = "PLATELUNCH_CONFIG")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply cleaning steps and write the result (no prompts)
    #[command(after_help = "\
Examples:
  platelunch run leads.xlsx -o cleaned.xlsx
  platelunch run leads.csv --steps dedup,phones -o cleaned.csv
  platelunch run --json > report.json")]
    Run {
        /// Source sheet (default: [files] input)
        input: Option<PathBuf>,

        /// Destination (.xlsx, .csv or .tsv; default: [files] output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Steps in order, comma separated: dedup, links, phones (default: all)
        #[arg(long)]
        steps: Vec<String>,

        /// Print a JSON report to stdout
        #[arg(long)]
        json: bool,
    },

    /// Report exact and partial duplicates without writing anything
    Inspect {
        /// Source sheet (default: [files] input)
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective settings, or write a default settings file
    Config {
        /// Write default settings to the settings path
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,

        /// Print the settings path and exit
        #[arg(long, conflicts_with = "init")]
        path: bool,
    },

    /// Interactive menu (the default without a subcommand)
    Menu {
        /// Source sheet (default: [files] input)
        input: Option<PathBuf>,

        /// Destination (default: [files] output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_setup::init_tracing(cli.verbose, cli.quiet);

    let result = dispatch(cli);

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    // Writing or locating the settings file must work even when it is broken.
    let needs_settings = !matches!(
        cli.command,
        Some(Commands::Config { init: true, .. }) | Some(Commands::Config { path: true, .. })
    );
    let settings = if needs_settings {
        Settings::load(cli.config.as_deref()).map_err(|e| {
            CliError::config(e).with_hint("run `platelunch config --init` to write a fresh settings file")
        })?
    } else {
        Settings::default()
    };
    let ctx = Context { settings, quiet: cli.quiet };

    match cli.command {
        None => commands::cmd_menu(&ctx, None, None),
        Some(Commands::Menu { input, output }) => commands::cmd_menu(&ctx, input, output),
        Some(Commands::Run { input, output, steps, json }) => {
            let steps = commands::parse_steps(&steps)?;
            commands::cmd_run(&ctx, input, output, steps, json)
        }
        Some(Commands::Inspect { input, json }) => commands::cmd_inspect(&ctx, input, json),
        Some(Commands::Config { init, force, path }) => {
            commands::cmd_config(&ctx, cli.config, init, force, path)
        }
    }
}
