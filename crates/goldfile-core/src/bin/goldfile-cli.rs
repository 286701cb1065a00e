use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use goldfile_core::{
    GoldConfig, Outcome, UpdateMode,
    diagnostics::{init_stderr_tracing, init_tracing_with_config},
};

#[derive(Debug, Parser)]
#[command(name = "goldfile-cli")]
#[command(about = "Inspect, check and update gold files from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gold directory; overrides goldfile.config.toml and GOLDFILE_DIR.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Also write JSON logs into this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the resolved path of a gold file.
    Path { name: String },
    /// Print the stored content of a gold file.
    Cat { name: String },
    /// Compare input with a gold file, updating it first with --update.
    Check {
        name: String,

        /// Read actual content from this file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        update: bool,
    },
    /// Overwrite a gold file with the input.
    Update {
        name: String,

        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// List every gold file under the directory.
    List,
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<Vec<u8>> {
    match input {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read input: {}", path.display()))
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = GoldConfig::load()?;
    if let Some(dir) = cli.dir {
        config.gold_dir = dir;
    }

    let _telemetry = match &cli.log_dir {
        Some(log_dir) => Some(init_tracing_with_config(log_dir, &config.diagnostics)?),
        None => {
            init_stderr_tracing(&config.diagnostics.log_filter);
            None
        }
    };

    let store = config.store();
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Path { name } => {
            writeln!(stdout, "{}", store.resolve_path(&name).display())?;
        }
        Commands::Cat { name } => {
            stdout.write_all(&store.read_bytes(&name)?)?;
        }
        Commands::Check {
            name,
            input,
            update,
        } => {
            let actual = read_input(input.as_ref())?;
            let mode = if update {
                UpdateMode::Update
            } else {
                config.update_mode()
            };
            let gold = config.into_gold().with_mode(mode);

            if let Outcome::Fail(mismatch) = gold.try_check_bytes(&actual, &name)? {
                eprint!("{mismatch}");
                return Ok(ExitCode::FAILURE);
            }
            tracing::info!(%name, "gold file check passed");
        }
        Commands::Update { name, input } => {
            let actual = read_input(input.as_ref())?;
            config.into_gold().try_force_update_bytes(&actual, &name)?;
        }
        Commands::List => {
            for name in store.list()? {
                writeln!(stdout, "{name}")?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
