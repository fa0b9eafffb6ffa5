//! Section markers for round-tripping a merged RTF document.
//!
//! Each converted fragment is wrapped in a pair of RTF comment groups
//! carrying the fragment's file name. RTF readers ignore the groups, and
//! the extractor uses them to split the merged document back into the
//! original sections. The namespace (`tag`) is configurable so documents
//! produced by differently-configured setups can still be taken apart.

use regex::Regex;
use tracing::warn;

use rtfweave_shared::Section;

/// Wrap a converted fragment in begin/end markers.
pub fn wrap(rtf: &str, tag: &str, name: &str) -> String {
    format!(
        "{{\\comment {tag}/begin: {name}}}\n{rtf}\n{{\\comment {tag}/end: {name}}}"
    )
}

/// Split a merged RTF document into its marked sections, in document order.
///
/// Begin and end markers are paired by name with a plain search rather than
/// a regex backreference (the `regex` crate has none). A begin marker with
/// no matching end is skipped with a warning; extraction is best-effort.
pub fn split(content: &str, tag: &str) -> Vec<Section> {
    let begin_re = Regex::new(&format!(
        r"\{{\\comment {}/begin: ([^}}]*)\}}",
        regex::escape(tag)
    ))
    .expect("valid regex");

    let mut sections = Vec::new();

    for caps in begin_re.captures_iter(content) {
        let whole = caps.get(0).expect("whole match");
        let name = caps[1].trim().to_string();

        let end_token = format!("{{\\comment {tag}/end: {name}}}");
        match content[whole.end()..].find(&end_token) {
            Some(rel) => {
                let body = content[whole.end()..whole.end() + rel].trim();
                sections.push(Section {
                    name,
                    rtf: body.to_string(),
                });
            }
            None => {
                warn!(section = %name, "begin marker without matching end; section skipped");
            }
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_then_split_roundtrips() {
        let wrapped = wrap("\\pard Intro.\\par", "rtfweave", "01.intro.md");
        let sections = split(&wrapped, "rtfweave");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "01.intro.md");
        assert_eq!(sections[0].rtf, "\\pard Intro.\\par");
    }

    #[test]
    fn split_preserves_document_order() {
        let merged = format!(
            "{}\n{}",
            wrap("first", "rtfweave", "01.intro.md"),
            wrap("second", "rtfweave", "02.methods.md")
        );
        let sections = split(&merged, "rtfweave");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "01.intro.md");
        assert_eq!(sections[1].name, "02.methods.md");
    }

    #[test]
    fn unmatched_begin_is_skipped() {
        let merged = format!(
            "{{\\comment rtfweave/begin: lost.md}}\norphan\n{}",
            wrap("kept", "rtfweave", "02.ok.md")
        );
        let sections = split(&merged, "rtfweave");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "02.ok.md");
    }

    #[test]
    fn foreign_tag_finds_nothing() {
        let wrapped = wrap("body", "rtfweave", "01.intro.md");
        assert!(split(&wrapped, "otherproject").is_empty());
    }

    #[test]
    fn tag_with_regex_metacharacters_is_escaped() {
        let wrapped = wrap("body", "my.thesis(v2)", "01.intro.md");
        let sections = split(&wrapped, "my.thesis(v2)");
        assert_eq!(sections.len(), 1);
    }
}
