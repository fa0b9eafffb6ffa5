//! Reverse path: split a merged RTF and convert sections back to markup.
//!
//! Citations come back as the plain text the converter rendered on the way
//! in; structure round-trips, citation formatting does not.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use rtfweave_convert::{Converter, markers};
use rtfweave_shared::{AppConfig, Result, RtfweaveError};

/// Result of an extraction run.
#[derive(Debug)]
pub struct ExtractOutcome {
    /// The markup files written, in section order.
    pub files: Vec<PathBuf>,
    /// Number of sections detected and converted.
    pub section_count: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Split `rtf_path` by its section markers and convert each section back to
/// `fragment_format`, writing one file per section into the output
/// directory, named after the original fragment.
///
/// No markers found is a warning, not an error: the run succeeds with zero
/// outputs. Any reverse conversion failure aborts the run.
#[instrument(skip_all, fields(source = %rtf_path.display()))]
pub fn extract(
    config: &AppConfig,
    converter: &dyn Converter,
    rtf_path: &Path,
    progress: &dyn crate::pipeline::ProgressReporter,
) -> Result<ExtractOutcome> {
    let start = Instant::now();
    config.validate_for_extract()?;

    let content =
        std::fs::read_to_string(rtf_path).map_err(|e| RtfweaveError::io(rtf_path, e))?;

    progress.phase("Locating sections");
    let sections = markers::split(&content, &config.marker_tag);
    if sections.is_empty() {
        warn!(
            tag = %config.marker_tag,
            path = %rtf_path.display(),
            "no section markers found; nothing to extract"
        );
        return Ok(ExtractOutcome {
            files: Vec::new(),
            section_count: 0,
            elapsed: start.elapsed(),
        });
    }

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| RtfweaveError::io(&config.output_dir, e))?;

    progress.phase("Converting sections");
    let total = sections.len();
    let mut files = Vec::with_capacity(total);

    for (i, section) in sections.iter().enumerate() {
        progress.item(&section.name, i + 1, total);
        info!(section = %section.name, "extracting section");

        // The converter wants a file, so the section body goes through a
        // hidden scratch file next to the outputs.
        let scratch = config
            .output_dir
            .join(format!(".{}.{}.rtf", section.name, Uuid::now_v7()));
        std::fs::write(&scratch, &section.rtf).map_err(|e| RtfweaveError::io(&scratch, e))?;

        let markup = converter.to_markup(&scratch, &config.fragment_format);
        if let Err(e) = std::fs::remove_file(&scratch) {
            warn!(path = %scratch.display(), error = %e, "could not remove scratch file");
        }
        let markup = markup?;

        let out_path = config.output_dir.join(&section.name);
        std::fs::write(&out_path, markup).map_err(|e| RtfweaveError::io(&out_path, e))?;
        files.push(out_path);
    }

    progress.finish();
    info!(sections = total, "extraction complete");

    Ok(ExtractOutcome {
        files,
        section_count: total,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SilentProgress;
    use rtfweave_convert::RtfOptions;

    /// Reverse stub: tags the scratch file's content with the format.
    struct StubConverter;

    impl Converter for StubConverter {
        fn to_rtf(&self, _source: &Path, _opts: &RtfOptions) -> Result<String> {
            unreachable!("forward conversion not used in extraction tests")
        }

        fn to_markup(&self, rtf: &Path, format: &str) -> Result<String> {
            let body = std::fs::read_to_string(rtf).map_err(|e| RtfweaveError::io(rtf, e))?;
            Ok(format!("{format}<<{body}>>"))
        }
    }

    struct FailingConverter;

    impl Converter for FailingConverter {
        fn to_rtf(&self, _source: &Path, _opts: &RtfOptions) -> Result<String> {
            Err(RtfweaveError::Conversion("stub failure".into()))
        }

        fn to_markup(&self, _rtf: &Path, _format: &str) -> Result<String> {
            Err(RtfweaveError::Conversion("stub failure".into()))
        }
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rtfweave-extract-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_config(root: &Path) -> AppConfig {
        AppConfig {
            output_dir: root.join("out"),
            fragment_format: "markdown".into(),
            ..AppConfig::default()
        }
    }

    fn fixture_merged_rtf() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/rtf/merged.rtf")
    }

    #[test]
    fn two_section_document_yields_two_files_in_order() {
        let root = temp_dir();
        let config = make_config(&root);

        let outcome = extract(
            &config,
            &StubConverter,
            &fixture_merged_rtf(),
            &SilentProgress,
        )
        .unwrap();

        assert_eq!(outcome.section_count, 2);
        assert_eq!(
            outcome.files,
            vec![root.join("out/01.intro.md"), root.join("out/02.methods.md")]
        );

        let intro = std::fs::read_to_string(&outcome.files[0]).unwrap();
        assert!(intro.starts_with("markdown<<"));
        assert!(intro.contains("Intro paragraph"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn no_markers_warns_and_yields_nothing() {
        let root = temp_dir();
        let config = make_config(&root);

        let plain = root.join("plain.rtf");
        std::fs::write(&plain, "{\\rtf1 no markers at all}").unwrap();

        let outcome = extract(&config, &StubConverter, &plain, &SilentProgress).unwrap();
        assert_eq!(outcome.section_count, 0);
        assert!(outcome.files.is_empty());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn converter_failure_aborts() {
        let root = temp_dir();
        let config = make_config(&root);

        let err = extract(
            &config,
            &FailingConverter,
            &fixture_merged_rtf(),
            &SilentProgress,
        )
        .unwrap_err();
        assert!(err.to_string().contains("stub failure"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn scratch_files_are_removed() {
        let root = temp_dir();
        let config = make_config(&root);

        extract(
            &config,
            &StubConverter,
            &fixture_merged_rtf(),
            &SilentProgress,
        )
        .unwrap();

        for entry in std::fs::read_dir(root.join("out")).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".rtf"), "scratch file left behind: {name}");
        }

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_source_file_is_an_io_error() {
        let root = temp_dir();
        let config = make_config(&root);

        let err = extract(
            &config,
            &StubConverter,
            Path::new("/nonexistent/merged.rtf"),
            &SilentProgress,
        )
        .unwrap_err();
        assert!(matches!(err, RtfweaveError::Io { .. }));

        let _ = std::fs::remove_dir_all(&root);
    }
}
