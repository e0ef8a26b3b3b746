//! Embed command - turn a compiled Metal library into a C++ header

use clap::Args;
use kernel_tools::embed;
use kernel_tools::output;
use std::path::PathBuf;

#[derive(Args)]
pub struct EmbedArgs {
    /// Compiled Metal library (.metallib)
    pub metallib_path: PathBuf,

    /// Header file to generate
    pub header_path: PathBuf,

    /// Target name, used for the `<target>_metal` namespace
    pub target_name: String,
}

pub fn execute(args: EmbedArgs) -> Result<(), Box<dyn std::error::Error>> {
    output::generating(&format!(
        "{} from {}",
        args.header_path.display(),
        args.metallib_path.display()
    ));

    let embedded = embed::embed_file(&args.metallib_path, &args.header_path, &args.target_name)?;

    println!("Generated {} ({} bytes)", embedded.header_path.display(), embedded.len);
    Ok(())
}
