//! Fragment collection from the input directory.
//!
//! Fragments are plain files; their lexicographic file-name order is the
//! document order, so authors number them (`01.intro.tex`, `02.method.tex`).

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use rtfweave_shared::{Fragment, Result, RtfweaveError};

/// File extensions recognized as fragments.
const FRAGMENT_EXTENSIONS: &[&str] = &["tex", "latex", "md", "markdown"];

/// Enumerate the eligible fragment files under `input_dir`, sorted
/// lexicographically by file name.
///
/// Hidden files and unknown extensions are ignored. A missing directory is
/// fatal; an empty result is a warning, not an error. Fragment names that do
/// not carry a two-digit ordering prefix get a warning because their
/// position in the merged document is then an accident of naming.
pub fn collect_fragments(input_dir: &Path) -> Result<Vec<Fragment>> {
    if !input_dir.is_dir() {
        return Err(RtfweaveError::config(format!(
            "input directory '{}' does not exist",
            input_dir.display()
        )));
    }

    let entries = std::fs::read_dir(input_dir).map_err(|e| RtfweaveError::io(input_dir, e))?;

    let mut fragments = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RtfweaveError::io(input_dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping file with non-UTF-8 name");
            continue;
        };
        if name.starts_with('.') || !has_fragment_extension(&path) {
            continue;
        }

        check_ordering_prefix(name);
        fragments.push((name.to_string(), path));
    }

    fragments.sort_by(|(a, _), (b, _)| a.cmp(b));

    if fragments.is_empty() {
        warn!(dir = %input_dir.display(), "no eligible fragments found");
    }

    Ok(fragments
        .into_iter()
        .enumerate()
        .map(|(ordinal, (name, path))| Fragment {
            path,
            name,
            ordinal,
        })
        .collect())
}

fn has_fragment_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            FRAGMENT_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Warn when a fragment name (dots stripped) lacks a two-digit prefix.
fn check_ordering_prefix(name: &str) {
    static ORDINAL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d{2}").expect("valid regex"));

    let squashed: String = name.chars().filter(|c| *c != '.').collect();
    if !ORDINAL_RE.is_match(&squashed) {
        warn!(
            file = %name,
            "fragment name does not start with a two-digit ordering prefix"
        );
    }
}
