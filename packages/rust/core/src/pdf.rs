//! Optional PDF compile step.
//!
//! The command is a user-configured template split on whitespace; `%f` is
//! replaced with the produced RTF path and `%o` with the target PDF path.
//! The child inherits stdio so the compiler's own output reaches the user.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use rtfweave_shared::{Result, RtfweaveError};

/// Run the configured PDF compile command against `rtf_path`.
///
/// Returns the target PDF path (the RTF path with a `.pdf` extension). A
/// non-zero exit status is surfaced as a fatal error.
pub fn compile(command_template: &str, rtf_path: &Path) -> Result<PathBuf> {
    let pdf_path = rtf_path.with_extension("pdf");

    let mut parts = command_template.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| RtfweaveError::Pdf("pdf_command is empty".into()))?;
    let args: Vec<String> = parts
        .map(|arg| substitute_tokens(arg, rtf_path, &pdf_path))
        .collect();

    info!(program, args = %args.join(" "), "compiling PDF");

    let status = Command::new(program)
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| RtfweaveError::Pdf(format!("failed to spawn '{program}': {e}")))?;

    if !status.success() {
        return Err(RtfweaveError::Pdf(format!(
            "'{program}' exited with status {}",
            status.code().unwrap_or(-1)
        )));
    }

    Ok(pdf_path)
}

/// Replace `%f` (RTF path) and `%o` (PDF path) in a single argument.
fn substitute_tokens(arg: &str, rtf: &Path, pdf: &Path) -> String {
    arg.replace("%f", &rtf.to_string_lossy())
        .replace("%o", &pdf.to_string_lossy())
}
