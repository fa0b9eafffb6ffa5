//! Footnote size pass over converted RTF.
//!
//! Pandoc emits footnotes at the body text size and leaves a `\par` at the
//! end of the footnote group, which readers render as a stray blank line.
//! This pass sets the footnote anchor and body to the configured size and
//! drops that trailing `\par`. Malformed footnotes degrade to a warning and
//! are left untouched.

use tracing::warn;

/// Apply the footnote pass to a converted RTF string.
///
/// `footnote_size` is in points; the RTF `\fs` control word takes
/// half-points.
pub fn resize_footnotes(rtf: &str, footnote_size: f32) -> String {
    let half_points = (footnote_size * 2.0).round() as u32;
    let size_marker = format!("\\fs{half_points}");

    let mut content = rtf.to_string();
    let mut search_from = 0;

    while let Some(rel) = content[search_from..].find("\\footnote") {
        let fn_start = search_from + rel;

        // Footnote number: the size goes right before the `\chftn` anchor.
        let Some(anchor_rel) = content[fn_start..].find("\\chftn") else {
            warn!("`\\chftn` missing after `\\footnote`; footnote left untouched");
            search_from = fn_start + "\\footnote".len();
            continue;
        };
        let anchor = fn_start + anchor_rel;
        content.insert_str(anchor, &size_marker);
        let after_anchor = anchor + size_marker.len();

        // Footnote text: the size goes after the `\pard` that follows the
        // first group opened after the anchor.
        let Some(open_rel) = content[after_anchor..].find('{') else {
            warn!("no group follows the footnote anchor; body size not set");
            search_from = after_anchor;
            continue;
        };
        let body_open = after_anchor + open_rel;
        let Some(pard_rel) = content[body_open + 1..].find("\\pard") else {
            warn!("`\\pard` missing in footnote body; body size not set");
            search_from = body_open + 1;
            continue;
        };
        let body_start = body_open + 1 + pard_rel + "\\pard".len();
        content.insert_str(body_start, &size_marker);
        let scan_from = body_start + size_marker.len();

        // Walk to the brace that closes the footnote group.
        let Some(close) = matching_close(&content, scan_from) else {
            warn!("unbalanced braces in footnote; trailing `\\par` kept");
            search_from = scan_from;
            continue;
        };

        match last_par(&content[scan_from..close]) {
            Some(par_rel) => {
                let par = scan_from + par_rel;
                content.replace_range(par..par + "\\par".len(), "");
                search_from = close - "\\par".len();
            }
            None => {
                warn!("no trailing `\\par` in footnote body");
                search_from = close;
            }
        }
    }

    content
}

/// Index of the `}` that closes the group open at `from` (depth 1 on entry).
fn matching_close(content: &str, from: usize) -> Option<usize> {
    let mut depth: usize = 1;
    for (i, c) in content[from..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte offset of the last `\par` control word in `region`, skipping `\pard`.
fn last_par(region: &str) -> Option<usize> {
    let mut last = None;
    let mut from = 0;
    while let Some(p) = region[from..].find("\\par") {
        let abs = from + p;
        if region.as_bytes().get(abs + 4) != Some(&b'd') {
            last = Some(abs);
        }
        from = abs + 1;
    }
    last
}
