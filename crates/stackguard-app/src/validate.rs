//! The validation use case: run every registered pack over a construct tree
//! and flush reports.

use camino::{Utf8Path, Utf8PathBuf};
use stackguard_domain::{Engine, RulePack, RunSummary};
use stackguard_render::{AnnotationSink, CsvSink, JsonSink};
use stackguard_tree::Stack;

/// Report file formats the validation can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

/// Configuration for one validation run.
#[derive(Clone, Debug)]
pub struct ValidateOptions {
    /// Directory report files are written into, created if absent.
    pub output_dir: Utf8PathBuf,
    /// Report files to emit per template unit.
    pub formats: Vec<ReportFormat>,
    /// Also record NOT_APPLICABLE evaluations in report files.
    pub verbose: bool,
    /// Also surface suppressed findings as info annotations.
    pub log_ignores: bool,
}

impl ValidateOptions {
    pub fn new<P: Into<Utf8PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            formats: vec![ReportFormat::Csv, ReportFormat::Json],
            verbose: false,
            log_ignores: false,
        }
    }

    pub fn formats(mut self, formats: Vec<ReportFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn log_ignores(mut self, log_ignores: bool) -> Self {
        self.log_ignores = log_ignores;
        self
    }
}

/// Evaluate `packs` over the tree rooted at `root`.
///
/// Annotations land on the offending nodes; one report file per (pack, unit)
/// and format lands in the output directory. On a fail-on-error halt the
/// reports are still flushed before the error propagates.
pub fn run_validation(
    root: &mut Stack,
    packs: Vec<RulePack>,
    options: &ValidateOptions,
) -> anyhow::Result<RunSummary> {
    let pack_names: Vec<String> = packs.iter().map(|p| p.name().to_string()).collect();

    let mut engine = Engine::new()
        .with_sink(Box::new(AnnotationSink::new().log_ignores(options.log_ignores)));
    for format in &options.formats {
        engine = engine.with_sink(file_sink(
            *format,
            &options.output_dir,
            pack_names.clone(),
            options.verbose,
        ));
    }
    for pack in packs {
        engine = engine.with_pack(pack);
    }

    engine.run(root)
}

fn file_sink(
    format: ReportFormat,
    out_dir: &Utf8Path,
    pack_names: Vec<String>,
    verbose: bool,
) -> Box<dyn stackguard_domain::Sink> {
    match format {
        ReportFormat::Csv => Box::new(CsvSink::new(out_dir, pack_names, verbose)),
        ReportFormat::Json => Box::new(JsonSink::new(out_dir, pack_names, verbose)),
    }
}
