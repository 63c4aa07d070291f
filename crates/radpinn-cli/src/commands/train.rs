//! Train - PINN Training Command
//!
//! Loads a `RunConfig`, applies command line overrides, trains with a
//! progress bar and writes `report.json` into the output directory.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::path::PathBuf;

use radpinn_train::{train_with_progress, RunConfig, TrainReport};

use super::utils::{
    format_sci, print_header, print_info, print_kv, print_success, training_progress_bar,
};
use crate::cli::TrainArgs;
use crate::error::{CliError, CliResult};

/// Config picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "radpinn.toml";

// =============================================================================
// Execute Command
// =============================================================================

/// Execute the `train` command
pub fn execute(args: TrainArgs, quiet: bool) -> CliResult<()> {
    let config = load_config(&args)?;
    config.validate()?;

    if !quiet {
        print_header("radpinn Training");
        print_training_info(&config);
        println!();
    }

    let pb = training_progress_bar(config.training.max_steps as u64, quiet);
    let result = train_with_progress(&config, |_| pb.inc(1));
    pb.finish_and_clear();
    let report = result?;

    let report_path = config.project.output_dir.join("report.json");
    report.save(&report_path)?;

    if !quiet {
        print_summary(&report);
        print_success(&format!("Report written to {}", report_path.display()));
    }
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

fn load_config(args: &TrainArgs) -> CliResult<RunConfig> {
    let path = match &args.config {
        Some(path) if !path.exists() => {
            return Err(CliError::Config(format!(
                "config file not found: {}",
                path.display()
            )))
        }
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(DEFAULT_CONFIG)).filter(|p| p.exists()),
    };

    let mut config = match (path, args.seed) {
        (Some(path), _) => {
            tracing::debug!(path = %path.display(), "Loading configuration");
            RunConfig::load(&path)?
        }
        (None, Some(seed)) => RunConfig::with_seed(seed),
        (None, None) => {
            return Err(CliError::InvalidArgument(format!(
                "--seed is required without --config or ./{DEFAULT_CONFIG}"
            )))
        }
    };

    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut RunConfig, args: &TrainArgs) {
    if let Some(seed) = args.seed {
        config.training.seed = seed;
    }
    if let Some(steps) = args.steps {
        config.training.max_steps = steps;
    }
    if let Some(kind) = args.sampler {
        config.sampler.sampler_name = kind;
    }
    if let Some(every) = args.resample_every {
        config.sampler.resample_every_steps = every;
    }
    if let Some(output) = &args.output {
        config.project.output_dir.clone_from(output);
    }
    if args.plot {
        config.sampler.plot_rad = true;
        config.sampler.plot_batch = true;
    }
}

// =============================================================================
// Output
// =============================================================================

fn print_training_info(config: &RunConfig) {
    print_kv("Run", &config.project.name);
    print_kv("Sampler", config.sampler.sampler_name.as_str());
    print_kv("Steps", &config.training.max_steps.to_string());
    print_kv(
        "Batch",
        &format!(
            "{} x {} lanes",
            config.training.batch_size_per_device, config.training.num_lanes
        ),
    );
    print_kv("Seed", &config.training.seed.to_string());
    if config.sampler.sampler_name.is_adaptive() {
        print_kv(
            "Resample every",
            &format!("{} steps", config.sampler.resample_every_steps),
        );
    }
    print_kv("Output", &config.project.output_dir.display().to_string());
}

fn print_summary(report: &TrainReport) {
    print_header("Results");
    print_kv("Final loss", &format_sci(report.final_loss));
    print_kv("inner_bcs", &format_sci(report.final_losses.inner_bcs));
    print_kv("outer_bcs", &format_sci(report.final_losses.outer_bcs));
    print_kv("res", &format_sci(report.final_losses.res));
    print_kv("Relative L2", &format_sci(report.l2_error));
    print_kv("Resamples", &report.resample_events.len().to_string());
    print_info(&format!("Finished in {:.2}s", report.elapsed_secs));
}
