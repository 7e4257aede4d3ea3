//! Typed descriptions of the three engine invocations.
//!
//! Each job knows its executable name, the positional argument vector the
//! engine expects, and which paths must exist before and after the run.
//! Argument order is the engine's calling convention and must not change.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use loom_core::errors::{ErrorInfo, LoomError};
use loom_core::ArtifactArg;
use serde::{Deserialize, Serialize};

use crate::command::{format_real, CommandLine};
use crate::variant::{BinLayout, BuildVariant};

/// Kind structure is not inferred by default.
pub const DEFAULT_KIND_COUNT: usize = 0;
/// Inner iterations of the kind-structure search.
pub const DEFAULT_KIND_ITERS: usize = 32;
/// Posterior draws produced by `posterior_enum`.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;
/// Additional full passes over the data after the first.
pub const DEFAULT_EXTRA_PASSES: f64 = 0.0;

/// One engine invocation.
pub trait EngineJob {
    /// File name of the executable inside the build directory.
    const BINARY: &'static str;

    /// Build variant to run.
    fn variant(&self) -> BuildVariant;

    /// Parameter checks performed before touching the filesystem.
    fn validate(&self) -> Result<(), LoomError> {
        Ok(())
    }

    /// Paths that must exist before dispatch. Sentinels are never listed.
    fn required_inputs(&self) -> Vec<&Path>;

    /// Paths that must exist after a zero exit. Sentinels are never listed.
    fn required_outputs(&self) -> Vec<&Path>;

    /// Directories created ahead of dispatch.
    fn output_dirs(&self) -> Vec<PathBuf>;

    /// Positional arguments in engine order.
    fn args(&self) -> Vec<OsString>;

    /// Full command for `layout`.
    fn command(&self, layout: &BinLayout) -> CommandLine {
        CommandLine::new(layout.executable(self.variant(), Self::BINARY), self.args())
    }
}

/// One inference checkpoint: `infer MODEL_IN GROUPS_IN ASSIGN_IN ROWS_IN
/// GROUPS_OUT ASSIGN_OUT EXTRA_PASSES KIND_COUNT KIND_ITERS`.
///
/// `assign_out` is only required to exist afterwards when it names a real
/// path. Requesting `--none` skips the check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferJob {
    /// Model to fit.
    pub model_in: PathBuf,
    /// Group state to resume from, or `--none`.
    pub groups_in: ArtifactArg,
    /// Row assignments to resume from, or `--none`.
    pub assign_in: ArtifactArg,
    /// Encoded rows; `-` or `-.gz` to stream them on stdin.
    pub rows_in: ArtifactArg,
    /// Directory receiving the learned groups.
    pub groups_out: PathBuf,
    /// Where to write row assignments, or `--none`.
    pub assign_out: ArtifactArg,
    /// Additional passes over the data, `>= 0`.
    pub extra_passes: f64,
    /// Kind proposals per iteration; `0` disables kind inference.
    pub kind_count: usize,
    /// Inner iterations of the kind search, `> 0`.
    pub kind_iters: usize,
    /// Engine build to run.
    pub variant: BuildVariant,
}

impl InferJob {
    /// Job reading rows from stdin with default search parameters.
    pub fn new(model_in: impl Into<PathBuf>, groups_out: impl Into<PathBuf>) -> Self {
        Self {
            model_in: model_in.into(),
            groups_in: ArtifactArg::NONE,
            assign_in: ArtifactArg::NONE,
            rows_in: ArtifactArg::STDIO,
            groups_out: groups_out.into(),
            assign_out: ArtifactArg::NONE,
            extra_passes: DEFAULT_EXTRA_PASSES,
            kind_count: DEFAULT_KIND_COUNT,
            kind_iters: DEFAULT_KIND_ITERS,
            variant: BuildVariant::default(),
        }
    }
}

impl EngineJob for InferJob {
    const BINARY: &'static str = "infer";

    fn variant(&self) -> BuildVariant {
        self.variant
    }

    fn validate(&self) -> Result<(), LoomError> {
        if !self.extra_passes.is_finite() || self.extra_passes < 0.0 {
            return Err(invalid_parameter(
                "extra_passes",
                format_real(self.extra_passes),
                "must be a finite number >= 0",
            ));
        }
        check_kind_iters(self.kind_iters)
    }

    fn required_inputs(&self) -> Vec<&Path> {
        real_paths([
            Some(self.model_in.as_path()),
            self.groups_in.as_path(),
            self.assign_in.as_path(),
            self.rows_in.as_path(),
        ])
    }

    fn required_outputs(&self) -> Vec<&Path> {
        real_paths([Some(self.groups_out.as_path()), self.assign_out.as_path()])
    }

    fn output_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.groups_out.clone()];
        dirs.extend(parent_dir(&self.assign_out));
        dirs
    }

    fn args(&self) -> Vec<OsString> {
        vec![
            self.model_in.clone().into_os_string(),
            self.groups_in.to_arg(),
            self.assign_in.to_arg(),
            self.rows_in.to_arg(),
            self.groups_out.clone().into_os_string(),
            self.assign_out.to_arg(),
            format_real(self.extra_passes).into(),
            self.kind_count.to_string().into(),
            self.kind_iters.to_string().into(),
        ]
    }
}

/// Posterior draws for enumeration tests: `posterior_enum MODEL_IN ROWS_IN
/// SAMPLES_OUT SAMPLE_COUNT KIND_COUNT KIND_ITERS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosteriorEnumJob {
    /// Model to sample from.
    pub model_in: PathBuf,
    /// Encoded rows, or a stdin stream token.
    pub rows_in: ArtifactArg,
    /// Destination of the samples; a real path must exist after the run.
    pub samples_out: ArtifactArg,
    /// Number of posterior draws, `> 0`.
    pub sample_count: usize,
    /// Kind proposals per iteration; `0` disables kind inference.
    pub kind_count: usize,
    /// Inner iterations of the kind search, `> 0`.
    pub kind_iters: usize,
    /// Engine build to run.
    pub variant: BuildVariant,
}

impl PosteriorEnumJob {
    /// Job with the default sample count and search parameters.
    pub fn new(
        model_in: impl Into<PathBuf>,
        rows_in: impl Into<ArtifactArg>,
        samples_out: impl Into<ArtifactArg>,
    ) -> Self {
        Self {
            model_in: model_in.into(),
            rows_in: rows_in.into(),
            samples_out: samples_out.into(),
            sample_count: DEFAULT_SAMPLE_COUNT,
            kind_count: DEFAULT_KIND_COUNT,
            kind_iters: DEFAULT_KIND_ITERS,
            variant: BuildVariant::default(),
        }
    }
}

impl EngineJob for PosteriorEnumJob {
    const BINARY: &'static str = "posterior_enum";

    fn variant(&self) -> BuildVariant {
        self.variant
    }

    fn validate(&self) -> Result<(), LoomError> {
        if self.sample_count == 0 {
            return Err(invalid_parameter("sample_count", "0", "must be > 0"));
        }
        check_kind_iters(self.kind_iters)
    }

    fn required_inputs(&self) -> Vec<&Path> {
        real_paths([Some(self.model_in.as_path()), self.rows_in.as_path()])
    }

    fn required_outputs(&self) -> Vec<&Path> {
        real_paths([self.samples_out.as_path()])
    }

    fn output_dirs(&self) -> Vec<PathBuf> {
        parent_dir(&self.samples_out).into_iter().collect()
    }

    fn args(&self) -> Vec<OsString> {
        vec![
            self.model_in.clone().into_os_string(),
            self.rows_in.to_arg(),
            self.samples_out.to_arg(),
            self.sample_count.to_string().into(),
            self.kind_count.to_string().into(),
            self.kind_iters.to_string().into(),
        ]
    }
}

/// Prediction server: `predict MODEL_IN GROUPS_IN QUERIES_IN RESULTS_OUT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictJob {
    /// Fitted model.
    pub model_in: PathBuf,
    /// Learned groups from a previous `infer`.
    pub groups_in: PathBuf,
    /// Query stream or file.
    pub queries_in: ArtifactArg,
    /// Result stream or file.
    pub results_out: ArtifactArg,
    /// Engine build to run.
    pub variant: BuildVariant,
}

impl PredictJob {
    /// Job reading queries from stdin and writing results to stdout.
    pub fn new(model_in: impl Into<PathBuf>, groups_in: impl Into<PathBuf>) -> Self {
        Self {
            model_in: model_in.into(),
            groups_in: groups_in.into(),
            queries_in: ArtifactArg::STDIO,
            results_out: ArtifactArg::STDIO,
            variant: BuildVariant::default(),
        }
    }
}

impl EngineJob for PredictJob {
    const BINARY: &'static str = "predict";

    fn variant(&self) -> BuildVariant {
        self.variant
    }

    fn required_inputs(&self) -> Vec<&Path> {
        real_paths([
            Some(self.model_in.as_path()),
            Some(self.groups_in.as_path()),
            self.queries_in.as_path(),
        ])
    }

    fn required_outputs(&self) -> Vec<&Path> {
        real_paths([self.results_out.as_path()])
    }

    fn output_dirs(&self) -> Vec<PathBuf> {
        parent_dir(&self.results_out).into_iter().collect()
    }

    fn args(&self) -> Vec<OsString> {
        vec![
            self.model_in.clone().into_os_string(),
            self.groups_in.clone().into_os_string(),
            self.queries_in.to_arg(),
            self.results_out.to_arg(),
        ]
    }
}

fn real_paths<'a, const N: usize>(paths: [Option<&'a Path>; N]) -> Vec<&'a Path> {
    paths.into_iter().flatten().collect()
}

fn parent_dir(arg: &ArtifactArg) -> Option<PathBuf> {
    arg.as_path()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn check_kind_iters(kind_iters: usize) -> Result<(), LoomError> {
    if kind_iters == 0 {
        return Err(invalid_parameter("kind_iters", "0", "must be > 0"));
    }
    Ok(())
}

fn invalid_parameter(name: &str, value: impl Into<String>, rule: &str) -> LoomError {
    LoomError::Configuration(
        ErrorInfo::new("loom.invalid_parameter", format!("{name} {rule}"))
            .with_context("parameter", name)
            .with_context("value", value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_defaults() {
        let job = InferJob::new("model.pb.gz", "groups");
        assert_eq!(job.rows_in, ArtifactArg::STDIO);
        assert_eq!(job.groups_in, ArtifactArg::NONE);
        assert_eq!(job.assign_out, ArtifactArg::NONE);
        assert_eq!(job.extra_passes, 0.0);
        assert_eq!(job.kind_count, 0);
        assert_eq!(job.kind_iters, 32);
        assert_eq!(job.variant, BuildVariant::Release);
        assert_eq!(job.required_inputs(), [Path::new("model.pb.gz")]);
        assert_eq!(job.required_outputs(), [Path::new("groups")]);
    }

    #[test]
    fn none_assign_out_is_not_a_postcondition() {
        let mut job = InferJob::new("m", "out/groups");
        assert_eq!(job.required_outputs().len(), 1);
        job.assign_out = ArtifactArg::parse("out/assign.pbs.gz");
        assert_eq!(
            job.required_outputs(),
            [Path::new("out/groups"), Path::new("out/assign.pbs.gz")]
        );
        assert_eq!(
            job.output_dirs(),
            [PathBuf::from("out/groups"), PathBuf::from("out")]
        );
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut job = InferJob::new("m", "g");
        job.extra_passes = -1.0;
        assert_eq!(job.validate().unwrap_err().info().code, "loom.invalid_parameter");
        job.extra_passes = f64::NAN;
        assert!(job.validate().is_err());
        job.extra_passes = 1.5;
        job.kind_iters = 0;
        assert!(job.validate().is_err());

        let mut job = PosteriorEnumJob::new("m", ArtifactArg::STDIO, PathBuf::from("s"));
        assert!(job.validate().is_ok());
        job.sample_count = 0;
        assert!(job.validate().is_err());
    }

    #[test]
    fn predict_stdout_has_no_outputs() {
        let job = PredictJob::new("m", "g");
        assert!(job.required_outputs().is_empty());
        assert!(job.output_dirs().is_empty());
        assert_eq!(job.args(), ["m", "g", "-", "-"]);
    }
}
