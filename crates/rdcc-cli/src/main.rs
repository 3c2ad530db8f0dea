mod commands;

use clap::{Parser, Subcommand};
use commands::exit_code_for;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "rdcc",
    version,
    about = "Developer-container component manifest tool"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a component manifest and write its build-file header.
    Init {
        /// Path to the dev container manifest file.
        #[arg(short = 'i', long)]
        manifest: PathBuf,
        /// Path of the generated build file.
        #[arg(short = 'o', long, default_value = "Dockerfile")]
        output: PathBuf,
    },
    /// Show a manifest's image reference, classification, and contents.
    Inspect {
        /// Path to the manifest JSON file.
        manifest: PathBuf,
    },
    /// Rewrite a manifest in canonical form.
    Fmt {
        /// Path to the manifest JSON file.
        manifest: PathBuf,
        /// Indentation width in spaces.
        #[arg(long, default_value_t = commands::fmt::DEFAULT_INDENT)]
        indent: usize,
        /// Write to this file instead of stdout.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Exit non-zero if the manifest is not already canonical; writes nothing.
        #[arg(long, default_value_t = false, conflicts_with = "output")]
        check: bool,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RDCC_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let result = match cli.command {
        Commands::Init { manifest, output } => {
            commands::init::run(&manifest, &output, json_output)
        }
        Commands::Inspect { manifest } => commands::inspect::run(&manifest, json_output),
        Commands::Fmt {
            manifest,
            indent,
            output,
            check,
        } => commands::fmt::run(&manifest, indent, output.as_deref(), check, json_output),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}
