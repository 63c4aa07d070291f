//! Init - Write a Default Configuration
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use radpinn_train::RunConfig;

use super::utils::{print_info, print_success};
use crate::cli::InitArgs;
use crate::error::{CliError, CliResult};

/// Execute the `init` command
pub fn execute(args: InitArgs) -> CliResult<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::AlreadyExists(args.path.display().to_string()));
    }
    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    RunConfig::with_seed(args.seed).save(&args.path)?;

    print_success(&format!("Wrote {}", args.path.display()));
    print_info("Get started with:");
    println!("  radpinn train --config {}", args.path.display());
    Ok(())
}
