use std::error::Error;

use clap::Args;
use loom_core::LoomConfig;
use loom_datasets::DatasetFixtures;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Emit only JSON without additional context.
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct DatasetCheck {
    name: String,
    ok: bool,
    missing: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    status: String,
    datasets: Vec<DatasetCheck>,
}

pub fn run(args: &CheckArgs, config: &LoomConfig) -> Result<(), Box<dyn Error>> {
    let fixtures = DatasetFixtures::from_config(config)?;
    let mut datasets = Vec::new();
    for name in fixtures.registry().eligible() {
        let missing: Vec<String> = fixtures
            .missing(&name)?
            .into_iter()
            .map(|(role, path)| format!("{role}: {}", path.display()))
            .collect();
        datasets.push(DatasetCheck {
            ok: missing.is_empty(),
            name,
            missing,
        });
    }
    let status = if datasets.iter().all(|check| check.ok) {
        "ok"
    } else {
        "needs-init"
    };
    let report = CheckReport {
        status: status.into(),
        datasets,
    };
    let rendered = serde_json::to_string_pretty(&report)?;
    if !args.quiet {
        println!("loom check status: {}", report.status);
    }
    println!("{rendered}");
    if report.status != "ok" {
        return Err("test datasets are missing artifacts; initialize them first".into());
    }
    Ok(())
}
