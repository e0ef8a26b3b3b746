//! Standalone header generator invoked from generated build scripts
//!
//! Usage: metallib-to-header <metallib_path> <header_path> <target_name>

use kernel_tools::embed;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: metallib-to-header <metallib_path> <header_path> <target_name>";

fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [metallib, header, target] = args.as_slice() else {
        println!("{USAGE}");
        std::process::exit(1);
    };

    match embed::embed_file(Path::new(metallib), Path::new(header), target) {
        Ok(embedded) => println!("Generated {} ({} bytes)", embedded.header_path.display(), embedded.len),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        },
    }
}
