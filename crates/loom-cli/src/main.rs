use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use loom_core::{init_tracing, LoomConfig};

use commands::{
    check::{self, CheckArgs},
    datasets::{self, DatasetsArgs},
    infer::{self, InferArgs},
    posterior_enum::{self, PosteriorEnumArgs},
    predict::{self, PredictArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "loom", about = "Runner for the loom cross-categorization engine")]
struct Cli {
    /// TOML configuration file; environment variables override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one inference checkpoint.
    Infer(InferArgs),
    /// Generate samples for posterior enumeration tests.
    PosteriorEnum(PosteriorEnumArgs),
    /// Run the prediction server.
    Predict(PredictArgs),
    /// List known datasets and their sizes.
    Datasets(DatasetsArgs),
    /// Report missing artifacts of test-sized datasets.
    Check(CheckArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    let config = LoomConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Infer(args) => infer::run(&args, &config),
        Command::PosteriorEnum(args) => posterior_enum::run(&args, &config),
        Command::Predict(args) => predict::run(&args, &config),
        Command::Datasets(args) => datasets::run(&args, &config),
        Command::Check(args) => check::run(&args, &config),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use loom_core::ArtifactArg;
    use loom_runner::{BuildVariant, EngineJob};

    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("loom").chain(args.iter().copied()))
            .expect("valid arguments")
            .command
    }

    #[test]
    fn infer_defaults_follow_engine_conventions() {
        let Command::Infer(args) = parse(&["infer", "--model-in", "m.pb.gz", "--groups-out", "g"])
        else {
            panic!("expected infer");
        };
        let job = args.job();
        assert_eq!(job.rows_in, ArtifactArg::STDIO);
        assert_eq!(job.variant, BuildVariant::Release);
        assert_eq!(job.args(), ["m.pb.gz", "--none", "--none", "-", "g", "--none", "0.0", "0", "32"]);
    }

    #[test]
    fn infer_accepts_sentinel_values() {
        let Command::Infer(args) = parse(&[
            "infer",
            "--model-in",
            "m",
            "--groups-in",
            "--none",
            "--rows-in",
            "-.gz",
            "--groups-out",
            "g",
            "--assign-out",
            "a.pbs.gz",
            "--extra-passes",
            "1.5",
            "--kind-count",
            "4",
            "--debug",
        ]) else {
            panic!("expected infer");
        };
        let job = args.job();
        assert_eq!(job.groups_in, ArtifactArg::NONE);
        assert_eq!(job.rows_in, ArtifactArg::GZ_STDIO);
        assert_eq!(job.assign_out.as_path(), Some(Path::new("a.pbs.gz")));
        assert_eq!(job.extra_passes, 1.5);
        assert_eq!(job.kind_count, 4);
        assert_eq!(job.variant, BuildVariant::Debug);
    }

    #[test]
    fn posterior_enum_and_predict_defaults() {
        let Command::PosteriorEnum(args) = parse(&[
            "posterior-enum",
            "--model-in",
            "m",
            "--rows-in",
            "r",
            "--samples-out",
            "s",
        ]) else {
            panic!("expected posterior-enum");
        };
        assert_eq!(args.job().args(), ["m", "r", "s", "100", "0", "32"]);

        let Command::Predict(args) = parse(&["predict", "--model-in", "m", "--groups-in", "g"])
        else {
            panic!("expected predict");
        };
        assert_eq!(args.job().args(), ["m", "g", "-", "-"]);
    }
}
