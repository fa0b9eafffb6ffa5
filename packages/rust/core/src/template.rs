//! Placeholder location and splicing in the official template.

use std::ops::Range;
use std::path::Path;

use rtfweave_shared::{Result, RtfweaveError};

/// Locate the RTF group enclosing `placeholder` in `template`.
///
/// The whole group is replaced, not just the bare string, so the template's
/// wrapping paragraph formatting does not leak into the spliced content.
pub fn placeholder_span(template: &str, placeholder: &str) -> Option<Range<usize>> {
    let at = template.find(placeholder)?;
    let open = template[..at].rfind('{')?;
    let close = at + template[at..].find('}')?;
    Some(open..close + 1)
}

/// Replace the placeholder's enclosing group with `content`.
///
/// The placeholder must appear inside a group; a template without it is a
/// fatal error naming both the placeholder and the template path.
pub fn splice(
    template: &str,
    placeholder: &str,
    content: &str,
    template_path: &Path,
) -> Result<String> {
    let span = placeholder_span(template, placeholder).ok_or_else(|| {
        RtfweaveError::template(format!(
            "placeholder '{placeholder}' not found inside an RTF group in {}",
            template_path.display()
        ))
    })?;

    let mut out = String::with_capacity(template.len() + content.len());
    out.push_str(&template[..span.start]);
    out.push_str(content);
    out.push_str(&template[span.end..]);
    Ok(out)
}
