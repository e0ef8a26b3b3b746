mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kernel-tools")]
#[command(author, version, about = "Build and packaging tools for GPU kernel extensions", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed a compiled Metal library into a C++ header
    Embed(commands::embed::EmbedArgs),

    /// Create a new kernel project from the ReLU example
    Init(commands::init::InitArgs),

    /// Generate API documentation for a kernel project
    Docs(commands::docs::DocsArgs),

    /// Print the dependency graph of a directory of packages as JSON
    Metadata(commands::metadata::MetadataArgs),

    /// Run operator conformance checks of an extension module
    CheckOps(commands::check_ops::CheckOpsArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),

    /// Show version information
    Version,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // help and version go to stdout and are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        },
    };

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Embed(args) => commands::embed::execute(args),
        Commands::Init(args) => commands::init::execute(args),
        Commands::Docs(args) => commands::docs::execute(args),
        Commands::Metadata(args) => commands::metadata::execute(args),
        Commands::CheckOps(args) => commands::check_ops::execute(args),
        Commands::Completions(args) => commands::completions::execute::<Cli>(args),
        Commands::Version => commands::version::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
