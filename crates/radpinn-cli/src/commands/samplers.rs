//! Samplers - List Collocation Samplers
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use radpinn_data::SamplerKind;

use super::utils::{print_header, print_kv};
use crate::error::CliResult;

/// Execute the `samplers` command
pub fn execute() -> CliResult<()> {
    print_header("Samplers");
    for kind in SamplerKind::ALL {
        print_kv(kind.as_str(), describe(kind));
    }
    println!();
    Ok(())
}

fn describe(kind: SamplerKind) -> &'static str {
    match kind {
        SamplerKind::Uniform => "uniform over the domain box",
        SamplerKind::Space => "uniform rows of the reference coordinates",
        SamplerKind::TimeSpace => "uniform time joined with reference coordinates",
        SamplerKind::RadV1 => "adaptive, |residual| + floor on a fixed grid",
        SamplerKind::RadV2 => "adaptive, |residual|^k / mean + c on the previous batch",
    }
}
