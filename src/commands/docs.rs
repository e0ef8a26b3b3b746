//! Docs command - generate API documentation for a kernel project

use clap::{ArgAction, Args};
use kernel_tools::docs::{self, DocsFormat, GenerateOptions, RenderOptions};
use kernel_tools::output;
use std::path::PathBuf;

#[derive(Args)]
pub struct DocsArgs {
    /// Kernel project directory
    pub project_path: PathBuf,

    /// Output directory, relative to the project
    #[arg(short, long, default_value = "docs")]
    pub output: PathBuf,

    /// Include a table of contents
    #[arg(short = 't', long, default_value_t = true, action = ArgAction::Set)]
    pub toc: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = DocsFormat::Markdown)]
    pub format: DocsFormat,
}

pub fn execute(args: DocsArgs) -> Result<(), Box<dyn std::error::Error>> {
    output::scanning(&args.project_path.display().to_string());

    let options = GenerateOptions {
        output: args.output,
        format: args.format,
        render: RenderOptions {
            include_toc: args.toc,
            ..RenderOptions::today()
        },
    };
    let generated = docs::generate(&args.project_path, &options)?;

    output::writing(&format!(
        "{} ({})",
        generated.path.display(),
        output::format_size(generated.bytes)
    ));
    output::finished(&format!(
        "{} functions from {} files",
        generated.functions, generated.files
    ));
    println!("Documentation generated at {}", generated.path.display());
    Ok(())
}
