//! Completions command - print a shell completion script for kernel-tools

use clap::{Args, CommandFactory};
use clap_complete::Shell;

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn execute<C: CommandFactory>(args: CompletionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = C::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, bin_name, &mut std::io::stdout());
    tracing::debug!(shell = %args.shell, "wrote completion script");
    Ok(())
}
