//! Lect CLI - builds an annotation graph from text notes and code comments

mod commands;

use clap::{Args, Parser, Subcommand};
use lect::config::Overrides;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lect")]
#[command(version)]
#[command(about = "Annotation graph extractor - links text notes and code comments")]
#[command(long_about = r#"
Lect collects two kinds of annotations and links them into one graph:
  • Text annotations: `.an` files with a `# Title` line and a body
  • Code annotations: `// $id Title` comments right above a declaration
Bodies reference other annotations with `$id`.

Example usage:
  lect init
  lect check --text docs --source src --language c++
  lect build --output site/data
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "lect.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, validate and write the annotation document
    Build {
        #[command(flatten)]
        run: RunArgs,

        /// Write the document to stdout instead of the output directory
        #[arg(long)]
        stdout: bool,

        /// Pretty-print JSON written to stdout
        #[arg(long, requires = "stdout")]
        pretty: bool,
    },

    /// Extract and validate without writing anything
    Check {
        #[command(flatten)]
        run: RunArgs,

        /// List every annotation found
        #[arg(long)]
        list: bool,
    },

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// List the supported languages
    Languages,
}

/// Options shared by `build` and `check`; each overrides the config file
#[derive(Args)]
struct RunArgs {
    /// Directory (or single file) holding `.an` text annotations
    #[arg(short, long)]
    text: Option<PathBuf>,

    /// Directory (or single file) holding annotated source code
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Source language name or alias
    #[arg(short, long)]
    language: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gitignore-style pattern to skip (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Also honour `.gitignore` at each root
    #[arg(long)]
    gitignore: bool,

    /// Required suffix of every code annotation id
    #[arg(long)]
    code_suffix: Option<String>,

    /// Layout direction: UD, DU, LR or RL
    #[arg(long)]
    direction: Option<String>,

    /// Lineup strategy: hubsize or directed
    #[arg(long)]
    lineup: Option<String>,

    /// Shorten code annotation content to its first and last line
    #[arg(long)]
    truncate_code: bool,
}

impl From<RunArgs> for Overrides {
    fn from(args: RunArgs) -> Self {
        Overrides {
            text: args.text,
            source: args.source,
            language: args.language,
            output: args.output,
            exclude: args.exclude,
            gitignore: args.gitignore,
            code_suffix: args.code_suffix,
            direction: args.direction,
            lineup: args.lineup,
            truncate_code: args.truncate_code,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout may carry the document
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = run(cli) {
        commands::report_failure(&err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Build { run, stdout, pretty } => {
            let settings = commands::resolve_settings(&cli.config, run.into())?;
            commands::run_build(&settings, stdout, pretty)
        }
        Commands::Check { run, list } => {
            let settings = commands::resolve_settings(&cli.config, run.into())?;
            commands::run_check(&settings, list)
        }
        Commands::Init { force } => commands::run_init(&cli.config, force),
        Commands::Languages => commands::run_languages(),
    }
}
