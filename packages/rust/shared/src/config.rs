//! Application configuration for rtfweave.
//!
//! Project config lives at `./rtfweave.toml`, with a per-user fallback at
//! `~/.rtfweave/rtfweave.toml`. An explicit `--config` path overrides both.
//! The config is loaded once per invocation and never mutated afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RtfweaveError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "rtfweave.toml";

/// Per-user config directory name under the home directory.
const CONFIG_DIR_NAME: &str = ".rtfweave";

// ---------------------------------------------------------------------------
// Config struct (matching rtfweave.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
///
/// Relative paths are resolved against the working directory of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the fragment source files.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory all outputs are written to (created if absent).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// The official RTF template the fragments are spliced into.
    #[serde(default = "default_official_template")]
    pub official_template: PathBuf,

    /// Insertion anchor inside the official template.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// CSL citation style file handed to the converter.
    #[serde(default = "default_citation_style")]
    pub citation_style: PathBuf,

    /// Extra directories for converter asset resolution (images, bibliographies).
    #[serde(default)]
    pub resource_paths: Vec<PathBuf>,

    /// Suppress the bibliography block at the end of each fragment.
    #[serde(default)]
    pub suppress_bibliography: bool,

    /// Footnote font size in points.
    #[serde(default = "default_footnote_size")]
    pub footnote_size: f32,

    /// Markup format produced on extraction (a pandoc output format name).
    #[serde(default = "default_fragment_format")]
    pub fragment_format: String,

    /// Namespace for the section markers written into the merged RTF.
    #[serde(default = "default_marker_tag")]
    pub marker_tag: String,

    /// Converter executable to invoke.
    #[serde(default = "default_pandoc_program")]
    pub pandoc_program: String,

    /// Optional PDF compile command. `%f` is replaced with the produced RTF
    /// path and `%o` with the target PDF path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_command: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            official_template: default_official_template(),
            placeholder: default_placeholder(),
            citation_style: default_citation_style(),
            resource_paths: Vec::new(),
            suppress_bibliography: false,
            footnote_size: default_footnote_size(),
            fragment_format: default_fragment_format(),
            marker_tag: default_marker_tag(),
            pandoc_program: default_pandoc_program(),
            pdf_command: None,
        }
    }
}

fn default_input_dir() -> PathBuf {
    "fragments".into()
}
fn default_output_dir() -> PathBuf {
    "out".into()
}
fn default_official_template() -> PathBuf {
    "template/official.rtf".into()
}
fn default_placeholder() -> String {
    "FRAGMENTS-GO-HERE".into()
}
fn default_citation_style() -> PathBuf {
    "styles/citations.csl".into()
}
fn default_footnote_size() -> f32 {
    10.0
}
fn default_fragment_format() -> String {
    "latex".into()
}
fn default_marker_tag() -> String {
    "rtfweave".into()
}
fn default_pandoc_program() -> String {
    "pandoc".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the per-user config directory (`~/.rtfweave/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RtfweaveError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the per-user config file (`~/.rtfweave/rtfweave.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config.
///
/// Lookup order: the explicit path (missing file is fatal), then
/// `./rtfweave.toml`, then the per-user file. No config anywhere is fatal:
/// the tool cannot guess where a document project lives.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(RtfweaveError::config(format!(
                "config file '{}' does not exist",
                path.display()
            )));
        }
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    let user = config_file_path()?;
    if user.exists() {
        tracing::debug!(path = %user.display(), "using per-user config");
        return load_config_from(&user);
    }

    Err(RtfweaveError::config(format!(
        "no {CONFIG_FILE_NAME} found here or in ~/{CONFIG_DIR_NAME}/. \
         Run `rtfweave config init` to create one."
    )))
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RtfweaveError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| RtfweaveError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into the working directory.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(RtfweaveError::config(format!(
            "{} already exists, refusing to overwrite",
            path.display()
        )));
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| RtfweaveError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RtfweaveError::io(&path, e))?;
    tracing::info!(path = %path.display(), "created default config file");

    Ok(path)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Check the paths a forward build depends on. Fatal at startup.
    pub fn validate_for_build(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(RtfweaveError::config(format!(
                "input_dir '{}' is not a directory",
                self.input_dir.display()
            )));
        }
        if !self.official_template.is_file() {
            return Err(RtfweaveError::config(format!(
                "official_template '{}' does not exist",
                self.official_template.display()
            )));
        }
        if !self.citation_style.is_file() {
            return Err(RtfweaveError::config(format!(
                "citation_style '{}' does not exist",
                self.citation_style.display()
            )));
        }
        Ok(())
    }

    /// Check the settings extraction depends on. Fatal at startup.
    pub fn validate_for_extract(&self) -> Result<()> {
        if self.fragment_format.trim().is_empty() {
            return Err(RtfweaveError::config("fragment_format must not be empty"));
        }
        if self.marker_tag.trim().is_empty() {
            return Err(RtfweaveError::config("marker_tag must not be empty"));
        }
        Ok(())
    }
}
