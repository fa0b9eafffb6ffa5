//! Forward build pipeline: collect → convert → splice → write → PDF.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use rtfweave_convert::{Converter, RtfOptions, footnotes, markers};
use rtfweave_shared::{AppConfig, Result, RtfweaveError};

use crate::{collector, pdf, template};

/// Result of a forward build.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Path to the merged RTF document.
    pub output_rtf: PathBuf,
    /// Path to the compiled PDF, when the PDF step ran.
    pub pdf: Option<PathBuf>,
    /// Number of fragments merged.
    pub fragment_count: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called per fragment or section processed.
    fn item(&self, name: &str, current: usize, total: usize);
    /// Called when the run completes.
    fn finish(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn item(&self, _name: &str, _current: usize, _total: usize) {}
    fn finish(&self) {}
}

/// Run the forward build.
///
/// 1. Collect fragments in file-name order
/// 2. Convert each to RTF, resize footnotes, wrap in section markers
/// 3. Concatenate and splice into the official template
/// 4. Write the merged RTF atomically
/// 5. Optionally run the configured PDF compile command
///
/// Any fragment conversion failure aborts before anything is written, so a
/// failed run never leaves a partial output document behind.
#[instrument(skip_all, fields(input = %config.input_dir.display()))]
pub fn build(
    config: &AppConfig,
    converter: &dyn Converter,
    progress: &dyn ProgressReporter,
    skip_pdf: bool,
) -> Result<BuildOutcome> {
    let start = Instant::now();
    config.validate_for_build()?;

    progress.phase("Collecting fragments");
    let fragments = collector::collect_fragments(&config.input_dir)?;

    let template_text = std::fs::read_to_string(&config.official_template)
        .map_err(|e| RtfweaveError::io(&config.official_template, e))?;
    // Fail before any conversion work if the anchor is missing.
    if template::placeholder_span(&template_text, &config.placeholder).is_none() {
        return Err(RtfweaveError::template(format!(
            "placeholder '{}' not found inside an RTF group in {}",
            config.placeholder,
            config.official_template.display()
        )));
    }

    progress.phase("Converting fragments");
    let opts = RtfOptions {
        citation_style: config.citation_style.clone(),
        resource_paths: config.resource_paths.clone(),
        suppress_bibliography: config.suppress_bibliography,
    };

    let total = fragments.len();
    let mut merged = String::new();
    for fragment in &fragments {
        progress.item(&fragment.name, fragment.ordinal + 1, total);
        info!(fragment = %fragment.name, "converting fragment");

        let rtf = converter.to_rtf(&fragment.path, &opts)?;
        let rtf = footnotes::resize_footnotes(&rtf, config.footnote_size);
        merged.push_str(&markers::wrap(&rtf, &config.marker_tag, &fragment.name));
        merged.push('\n');
    }

    progress.phase("Splicing template");
    let document = template::splice(
        &template_text,
        &config.placeholder,
        &merged,
        &config.official_template,
    )?;

    let file_name = config
        .official_template
        .file_name()
        .ok_or_else(|| {
            RtfweaveError::config(format!(
                "official_template '{}' has no file name",
                config.official_template.display()
            ))
        })?
        .to_owned();

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| RtfweaveError::io(&config.output_dir, e))?;
    let output_rtf = config.output_dir.join(&file_name);
    write_atomic(&output_rtf, &document)?;

    info!(
        path = %output_rtf.display(),
        fragments = total,
        "merged document written"
    );

    let pdf = if skip_pdf {
        debug!("PDF step skipped by flag");
        None
    } else {
        match &config.pdf_command {
            Some(command) => {
                progress.phase("Compiling PDF");
                Some(pdf::compile(command, &output_rtf)?)
            }
            None => {
                debug!("no pdf_command configured; skipping PDF step");
                None
            }
        }
    };

    progress.finish();

    let outcome = BuildOutcome {
        output_rtf,
        pdf,
        fragment_count: total,
        elapsed: start.elapsed(),
    };

    info!(
        fragments = outcome.fragment_count,
        elapsed_ms = outcome.elapsed.as_millis(),
        "build complete"
    );

    Ok(outcome)
}

/// Write a file via a temp name in the same directory, then rename.
fn write_atomic(path: &std::path::Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let temp = dir.join(format!(".rtfweave-{}.tmp", Uuid::now_v7()));

    std::fs::write(&temp, content).map_err(|e| RtfweaveError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| RtfweaveError::io(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
