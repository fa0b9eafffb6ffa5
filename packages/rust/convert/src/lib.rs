//! External converter integration and RTF post-processing.
//!
//! All real format knowledge lives in pandoc; this crate owns the subprocess
//! seam ([`Converter`] / [`PandocConverter`]), the footnote size pass, and
//! the section markers used to split a merged document apart again.

pub mod footnotes;
pub mod markers;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use rtfweave_shared::{Result, RtfweaveError};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Options for a forward (markup → RTF) conversion.
#[derive(Debug, Clone)]
pub struct RtfOptions {
    /// CSL citation style file.
    pub citation_style: PathBuf,
    /// Extra directories for asset resolution; the working directory is
    /// always searched first.
    pub resource_paths: Vec<PathBuf>,
    /// Suppress the per-fragment bibliography block.
    pub suppress_bibliography: bool,
}

/// The conversion seam between the pipelines and the external tool.
///
/// The pipelines only ever talk to this trait, so tests can substitute a
/// stub and a converter failure can be exercised without pandoc installed.
pub trait Converter {
    /// Convert a markup fragment to RTF, returning the RTF text.
    fn to_rtf(&self, source: &Path, opts: &RtfOptions) -> Result<String>;

    /// Convert an RTF file back to markup in the given pandoc output format.
    /// Citations come back as the plain text pandoc rendered forward.
    fn to_markup(&self, rtf: &Path, format: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Pandoc
// ---------------------------------------------------------------------------

/// [`Converter`] backed by a pandoc subprocess.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
}

impl PandocConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Probe that the converter executable is runnable.
    pub fn check(&self) -> Result<()> {
        let output = Command::new(&self.program).arg("--version").output();

        match output {
            Ok(out) if out.status.success() => {
                let version = String::from_utf8_lossy(&out.stdout);
                debug!(
                    program = %self.program,
                    version = %version.lines().next().unwrap_or(""),
                    "converter found"
                );
                Ok(())
            }
            _ => Err(RtfweaveError::config(format!(
                "'{}' is not runnable; is pandoc installed?",
                self.program
            ))),
        }
    }

    /// Run the converter with the given arguments and return its stdout.
    fn run(&self, args: &[OsString]) -> Result<String> {
        debug!(
            program = %self.program,
            args = %render_args(args),
            "invoking converter"
        );

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| RtfweaveError::Conversion(format!("failed to spawn '{}': {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RtfweaveError::Conversion(format!(
                "'{}' exited with status {}: {}",
                self.program,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Converter for PandocConverter {
    fn to_rtf(&self, source: &Path, opts: &RtfOptions) -> Result<String> {
        self.run(&rtf_args(source, opts))
    }

    fn to_markup(&self, rtf: &Path, format: &str) -> Result<String> {
        self.run(&markup_args(rtf, format))
    }
}

// ---------------------------------------------------------------------------
// Argument construction
// ---------------------------------------------------------------------------

/// Build the pandoc argv for a markup → RTF conversion.
fn rtf_args(source: &Path, opts: &RtfOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        source.into(),
        "--citeproc".into(),
        {
            let mut arg = OsString::from("--csl=");
            arg.push(opts.citation_style.as_os_str());
            arg
        },
        "--to=rtf".into(),
        format!(
            "--metadata=suppress-bibliography:{}",
            opts.suppress_bibliography
        )
        .into(),
    ];

    if !opts.resource_paths.is_empty() {
        let mut arg = OsString::from("--resource-path=.");
        for dir in &opts.resource_paths {
            arg.push(search_path_separator());
            arg.push(dir.as_os_str());
        }
        args.push(arg);
    }

    args
}

/// Build the pandoc argv for an RTF → markup conversion.
///
/// No `--citeproc`/`--csl` in this direction: citations were already
/// flattened to text on the way in, and pandoc cannot reconstruct them.
fn markup_args(rtf: &Path, format: &str) -> Vec<OsString> {
    vec![
        rtf.into(),
        "--from=rtf".into(),
        format!("--to={format}").into(),
    ]
}

/// The platform search-path list separator pandoc expects.
fn search_path_separator() -> &'static str {
    if cfg!(windows) { ";" } else { ":" }
}

fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> RtfOptions {
        RtfOptions {
            citation_style: "styles/chicago.csl".into(),
            resource_paths: vec![],
            suppress_bibliography: false,
        }
    }

    #[test]
    fn rtf_args_include_citation_options() {
        let args = rtf_args(Path::new("fragments/01.intro.md"), &opts());
        let s = render_args(&args);
        assert!(s.contains("--citeproc"));
        assert!(s.contains("--csl=styles/chicago.csl"));
        assert!(s.contains("--to=rtf"));
        assert!(s.contains("--metadata=suppress-bibliography:false"));
    }

    #[test]
    fn rtf_args_respect_suppress_flag() {
        let mut o = opts();
        o.suppress_bibliography = true;
        let s = render_args(&rtf_args(Path::new("a.tex"), &o));
        assert!(s.contains("--metadata=suppress-bibliography:true"));
    }

    #[test]
    fn rtf_args_omit_resource_path_when_empty() {
        let s = render_args(&rtf_args(Path::new("a.tex"), &opts()));
        assert!(!s.contains("--resource-path"));
    }

    #[test]
    fn rtf_args_join_resource_paths_after_dot() {
        let mut o = opts();
        o.resource_paths = vec!["figures".into(), "bib".into()];
        let s = render_args(&rtf_args(Path::new("a.tex"), &o));
        let sep = search_path_separator();
        assert!(s.contains(&format!("--resource-path=.{sep}figures{sep}bib")));
    }

    #[test]
    fn markup_args_have_explicit_rtf_reader() {
        let s = render_args(&markup_args(Path::new("out/.scratch.rtf"), "latex"));
        assert!(s.contains("--from=rtf"));
        assert!(s.contains("--to=latex"));
        assert!(!s.contains("--citeproc"));
    }

    #[test]
    fn missing_program_is_a_conversion_error() {
        let converter = PandocConverter::new("rtfweave-test-no-such-binary");
        let err = converter
            .to_markup(Path::new("x.rtf"), "latex")
            .unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[test]
    fn check_reports_missing_program() {
        let converter = PandocConverter::new("rtfweave-test-no-such-binary");
        let err = converter.check().unwrap_err();
        assert!(err.to_string().contains("is not runnable"));
    }
}
