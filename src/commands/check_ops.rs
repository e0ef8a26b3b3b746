//! Check-ops command - run operator conformance checks

use clap::Args;
use kernel_tools::opcheck::{self, python, CheckOutcome, PythonHost};
use kernel_tools::output;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckOpsArgs {
    /// Importable name of the extension module
    pub module_name: String,

    /// Python interpreter with the framework installed
    #[arg(long, env = "KERNEL_TOOLS_PYTHON", default_value = python::DEFAULT_INTERPRETER)]
    pub python: PathBuf,

    /// Directory searched for the module before PYTHONPATH (repeatable)
    #[arg(short = 'I', long = "import-path", value_name = "DIR")]
    pub import_paths: Vec<PathBuf>,
}

pub fn execute(args: CheckOpsArgs) -> Result<(), Box<dyn std::error::Error>> {
    output::checking(&format!("module {}", args.module_name));

    let mut host = PythonHost::spawn_with_paths(&args.python, &args.module_name, &args.import_paths)?;
    let outcome = opcheck::check_ops(&mut host)?;
    host.shutdown()?;

    match outcome {
        CheckOutcome::Unsupported => {
            output::skipping("schema listing is not available in this framework build");
        },
        CheckOutcome::NoChecks => {},
        CheckOutcome::Completed(report) => {
            output::finished(&format!(
                "{} cases across {} operators, {} without checks",
                report.cases(),
                report.checked.len(),
                report.missing.len()
            ));
        },
    }
    Ok(())
}
