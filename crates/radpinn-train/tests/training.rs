//! End-to-end training tests.
//! These run short training jobs the way the CLI does.

use radpinn_train::prelude::*;

fn quick_config(sampler: SamplerKind, dir: &std::path::Path) -> RunConfig {
    let mut config = RunConfig::with_seed(1234);
    config.project.output_dir = dir.to_path_buf();
    config.project.name = "test-run".to_string();
    config.training.max_steps = 400;
    config.training.batch_size_per_device = 64;
    config.training.num_lanes = 2;
    config.training.learning_rate = 1e-2;
    config.sampler.sampler_name = sampler;
    config.sampler.resample_every_steps = 10;
    config.sampler.grid_points = 1000;
    config.problem.n_r = 256;
    config.model.degree = 3;
    config.logging.log_every_steps = 50;
    config
}

/// Test 1: adaptive sampler swaps at every boundary but never at step 0
#[test]
fn test_resample_boundaries() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = quick_config(SamplerKind::RadV1, dir.path());
    config.training.max_steps = 35;

    let report = train_and_evaluate(&config).unwrap();
    let steps: Vec<usize> = report.resample_events.iter().map(|e| e.step).collect();
    assert_eq!(steps, vec![10, 20, 30]);
    assert!(report
        .resample_events
        .iter()
        .all(|e| e.kind == SamplerKind::RadV1));

    println!("✓ Resample boundaries at {steps:?}");
}

/// Test 2: training reduces the loss and the L2 error
#[test]
fn test_training_reduces_loss() {
    let dir = tempfile::tempdir().unwrap();
    let report = train_and_evaluate(&quick_config(SamplerKind::RadV1, dir.path())).unwrap();

    let first = report.history.first().unwrap();
    let last = report.history.last().unwrap();
    assert!(last.loss < first.loss, "{} -> {}", first.loss, last.loss);
    assert!(last.l2_error.unwrap() < first.l2_error.unwrap());
    assert!(report.final_loss.is_finite());

    println!("✓ Loss {:.3e} -> {:.3e}", first.loss, last.loss);
}

/// Test 3: a fixed seed reproduces the run
#[test]
fn test_runs_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = quick_config(SamplerKind::RadV2, dir.path());
    config.training.max_steps = 60;
    config.sampler.c = 0.1;
    config.sampler.k = 2.0;

    let a = train_and_evaluate(&config).unwrap();
    let b = train_and_evaluate(&config).unwrap();
    assert_eq!(a.params, b.params);
    assert_eq!(a.resample_events, b.resample_events);

    config.training.seed = 4321;
    let c = train_and_evaluate(&config).unwrap();
    assert_ne!(a.params, c.params);

    println!("✓ Runs are reproducible");
}

/// Test 4: every sampler kind with 1-D points trains
#[test]
fn test_all_one_dimensional_samplers_train() {
    let dir = tempfile::tempdir().unwrap();
    for kind in [
        SamplerKind::Uniform,
        SamplerKind::Space,
        SamplerKind::RadV1,
        SamplerKind::RadV2,
    ] {
        let mut config = quick_config(kind, dir.path());
        config.training.max_steps = 30;
        let report = train_and_evaluate(&config).unwrap();
        assert_eq!(report.sampler, kind);
        assert_eq!(report.resample_events.is_empty(), !kind.is_adaptive());
    }

    println!("✓ All 1-D samplers train");
}

/// Test 5: diagnostics land under output_dir/figures/<run>
#[test]
fn test_diagnostics_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = quick_config(SamplerKind::RadV1, dir.path());
    config.training.max_steps = 21;
    config.sampler.plot_rad = true;
    config.sampler.plot_batch = true;

    train_and_evaluate(&config).unwrap();
    let figures = dir.path().join("figures").join("test-run");
    for step in [10, 20] {
        assert!(figures.join(format!("rad_step_{step}.json")).exists());
        assert!(figures.join(format!("batch_step_{step}.json")).exists());
    }
    assert!(!figures.join("rad_step_0.json").exists());

    println!("✓ Diagnostics written");
}

/// Test 6: the report round-trips through JSON on disk
#[test]
fn test_report_saved() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = quick_config(SamplerKind::Uniform, dir.path());
    config.training.max_steps = 5;

    let report = train_and_evaluate(&config).unwrap();
    let path = dir.path().join("report.json");
    report.save(&path).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["sampler"], "uniform");
    assert_eq!(saved["steps"], 5);

    println!("✓ Report saved");
}
