//! Init command - create a new kernel project

use clap::Args;
use kernel_tools::output::{self, Style};
use kernel_tools::scaffold::{self, ExistingFiles, TreeStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to create the project in
    pub target_dir: PathBuf,

    /// Overwrite skeleton files that already exist
    #[arg(short, long)]
    pub force: bool,
}

pub fn execute(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let target = args.target_dir.display().to_string();
    let existing = if args.force {
        ExistingFiles::Overwrite
    } else {
        ExistingFiles::Refuse
    };

    output::generating(&format!("{} example in {}", scaffold::EXAMPLE_NAME, target));
    let scaffolded = scaffold::scaffold(&args.target_dir, existing)?;
    if scaffolded.created_root {
        output::created(&format!("directory {target}"));
    }
    for file in &scaffolded.files {
        tracing::debug!(path = %file.display(), "created");
    }

    let style = TreeStyle::detect();
    let color = style == TreeStyle::Colored;

    println!();
    print!("{}", scaffold::render_tree(&args.target_dir, &target, style)?);
    println!();
    println!(
        "{} All files for the ReLU example have been created successfully.",
        Style::Success.paint("Success!", color)
    );
    println!();
    println!("{}", Style::Info.paint("Next steps:", color));
    println!(
        "  {} Build the kernel: {}",
        Style::Step.paint("1.", color),
        Style::Emphasis.paint(&format!("cd {target} && git add . && nix develop -L"), color)
    );
    println!(
        "  {} Run the tests: {}",
        Style::Step.paint("2.", color),
        Style::Emphasis.paint("pytest -vv tests/", color)
    );
    println!();

    Ok(())
}
