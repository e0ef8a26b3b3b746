//! Metadata command - dependency graph of a directory of packages

use clap::Args;
use kernel_tools::metadata;
use kernel_tools::output;
use std::path::PathBuf;

#[derive(Args)]
pub struct MetadataArgs {
    /// Directory whose subdirectories are packages
    pub directory: PathBuf,
}

pub fn execute(args: MetadataArgs) -> Result<(), Box<dyn std::error::Error>> {
    output::parsing(&format!("packages in {}", args.directory.display()));

    let graph = metadata::collect(&args.directory)?;
    println!("{}", metadata::to_json(&graph)?);
    Ok(())
}
