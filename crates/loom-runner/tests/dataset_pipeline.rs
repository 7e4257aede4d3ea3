mod common;

use std::fs;

use common::StubEngine;
use loom_core::errors::LoomError;
use loom_core::ArtifactArg;
use loom_datasets::{
    ArtifactLocator, CleanupGuard, DatasetConfig, DatasetFixtures, DatasetRegistry,
};
use loom_runner::{BinLayout, InferJob, Orchestrator, PosteriorEnumJob};
use tempfile::tempdir;

fn populate(locator: &ArtifactLocator, name: &str) {
    let set = locator.resolve(name);
    fs::create_dir_all(set.groups.clone()).unwrap();
    fs::create_dir_all(set.rows_csv.clone()).unwrap();
    for path in [&set.init, &set.rows, &set.model, &set.schema, &set.encoding] {
        fs::write(path, b"fixture").unwrap();
    }
}

#[test]
fn every_small_dataset_runs_infer_then_posterior_enum() {
    let data = tempdir().unwrap();
    let scratch = tempdir().unwrap();
    let fixtures = DatasetFixtures::new(
        DatasetRegistry::new([
            DatasetConfig::new("dd-10-10", 10, 10),
            DatasetConfig::new("nich-10-10", 10, 10),
            DatasetConfig::new("dd-100-1000", 1000, 100),
        ])
        .unwrap(),
        ArtifactLocator::new(data.path()),
    );
    populate(fixtures.locator(), "dd-10-10");
    populate(fixtures.locator(), "nich-10-10");

    let mut loom = Orchestrator::new(BinLayout::new("/opt/loom"), StubEngine::succeeding());
    let count = fixtures
        .for_each_dataset(|files| {
            let out = scratch.path().join(&files.name);
            let mut guard = CleanupGuard::new(true);
            guard.track(&out);
            guard.run(|| -> Result<(), LoomError> {
                let mut infer = InferJob::new(&files.artifacts.model, out.join("groups"));
                infer.groups_in = ArtifactArg::from(files.artifacts.groups.as_path());
                infer.rows_in = ArtifactArg::from(files.artifacts.rows.as_path());
                loom.infer(infer)?;
                let samples = out.join("samples.pbs.gz");
                fs::write(&samples, b"draws").unwrap();
                loom.posterior_enum(PosteriorEnumJob::new(
                    &files.artifacts.model,
                    files.artifacts.rows.as_path(),
                    samples.as_path(),
                ))?;
                Ok(())
            })
        })
        .expect("pipeline");

    assert_eq!(count, 2);
    let calls = &loom.launcher().calls;
    assert_eq!(calls.len(), 4);
    assert!(calls[0].program().ends_with("infer"));
    assert!(calls[1].program().ends_with("posterior_enum"));
    assert!(calls[0].args()[0].to_string_lossy().contains("dd-10-10"));
    assert!(calls[2].args()[0].to_string_lossy().contains("nich-10-10"));
    assert!(scratch.path().join("dd-10-10").join("groups").is_dir());
}

#[test]
fn failed_dataset_test_cleans_its_scratch_dir() {
    let data = tempdir().unwrap();
    let scratch = tempdir().unwrap();
    let fixtures = DatasetFixtures::new(
        DatasetRegistry::new([DatasetConfig::new("dd-10-10", 10, 10)]).unwrap(),
        ArtifactLocator::new(data.path()),
    );
    populate(fixtures.locator(), "dd-10-10");

    let mut loom = Orchestrator::new(BinLayout::new("/opt/loom"), StubEngine::succeeding());
    let out = scratch.path().join("dd-10-10");
    let err = fixtures
        .for_each_dataset(|files| {
            let mut guard = CleanupGuard::new(true);
            guard.track(&out);
            guard.run(|| {
                let mut infer = InferJob::new(&files.artifacts.model, out.join("groups"));
                infer.assign_out = ArtifactArg::from(out.join("assign.pbs.gz"));
                loom.infer(infer).map(|_| ())
            })
        })
        .unwrap_err();
    assert!(matches!(err, LoomError::MissingOutputArtifact(_)));
    assert!(!out.exists());
}
