use regex::Regex;
use std::fmt;

/// An insertion that did not apply because its anchor was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorWarning {
    /// The literal sentinel did not occur in the document.
    MissingSentinel { sentinel: String, work: String },
    /// The anchor pattern matched nothing.
    PatternNoMatch { anchor: String, work: String },
}

impl fmt::Display for AnchorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorWarning::MissingSentinel { sentinel, work } => {
                write!(f, "{work}: sentinel {sentinel:?} not found; skipped")
            }
            AnchorWarning::PatternNoMatch { anchor, work } => {
                write!(f, "{work}: anchor {anchor} matched nothing; skipped")
            }
        }
    }
}

/// Array-valued keys the patcher splices identifiers into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Children,
    Files,
    PackageProductDependencies,
}

impl ListKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKey::Children => "children",
            ListKey::Files => "files",
            ListKey::PackageProductDependencies => "packageProductDependencies",
        }
    }
}

/// Insert `new_text` right before the first occurrence of `sentinel`.
///
/// Returns `None` when the sentinel is absent; the caller keeps the original
/// content in that case.
pub fn insert_at_sentinel(content: &str, sentinel: &str, new_text: &str) -> Option<String> {
    let at = content.find(sentinel)?;
    let mut out = String::with_capacity(content.len() + new_text.len());
    out.push_str(&content[..at]);
    out.push_str(new_text);
    out.push_str(&content[at..]);
    Some(out)
}

/// Replace the first match's capture group 1 with `transform(captured)`.
///
/// Patterns without a capture group fall back to the whole match.
pub fn insert_at_pattern<F>(content: &str, pattern: &Regex, transform: F) -> Option<String>
where
    F: FnOnce(&str) -> String,
{
    let caps = pattern.captures(content)?;
    let span = caps.get(1).or_else(|| caps.get(0))?;
    let replacement = transform(span.as_str());
    let mut out = String::with_capacity(content.len() + replacement.len());
    out.push_str(&content[..span.start()]);
    out.push_str(&replacement);
    out.push_str(&content[span.end()..]);
    Some(out)
}

/// Append `new_text` directly after the first match of `pattern`.
pub fn insert_after_pattern(content: &str, pattern: &Regex, new_text: &str) -> Option<String> {
    insert_at_pattern(content, pattern, |captured| format!("{captured}{new_text}"))
}

/// Pattern capturing an array-valued key through its last entry line.
///
/// Entries are whole lines ending in `,`, so a `)` inside an entry's comment
/// never ends the capture; the closing `);` line is left outside it.
///
/// With an owner, only the list inside the record keyed by that identifier
/// matches; otherwise the first such list in the document.
pub fn list_splice_pattern(owner_id: Option<&str>, key: ListKey) -> Regex {
    let pattern = match owner_id {
        Some(id) => format!(
            r"({} /\*.*?\*/ = \{{[^}}]*\b{} = \((?:\n[^\n]*,)*)",
            regex::escape(id),
            key.as_str()
        ),
        None => format!(r"(\b{} = \((?:\n[^\n]*,)*)", key.as_str()),
    };
    Regex::new(&pattern).expect("escaped list splice pattern")
}

/// Pattern matching one whole `<id> /* ... */ = { ... };` record.
pub(crate) fn record_pattern(id: &str) -> Regex {
    let pattern = format!(r"({} /\*.*?\*/ = \{{[^}}]*\}};)", regex::escape(id));
    Regex::new(&pattern).expect("escaped record pattern")
}

/// Append list entries, one per line, to a captured `key = ( ...` span.
pub(crate) fn splice_into_list(captured: &str, entries: &[String]) -> String {
    let mut out = captured.trim_end().to_string();
    for entry in entries {
        out.push('\n');
        out.push_str(entry);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP: &str = "\t\tAAAAAAAAAAAAAAAAAAAAAAAA /* App */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\tBBBBBBBBBBBBBBBBBBBBBBBB /* main.swift */,\n\t\t\t);\n\t\t\tpath = App;\n\t\t};\n";

    #[test]
    fn sentinel_insert_lands_before_first_occurrence() {
        let doc = "a\n/* End X section */\nb\n";
        let out = insert_at_sentinel(doc, "/* End X section */", "new\n").expect("applied");
        assert_eq!(out, "a\nnew\n/* End X section */\nb\n");
    }

    #[test]
    fn sentinel_insert_reports_missing_anchor() {
        assert_eq!(insert_at_sentinel("abc", "/* End X section */", "new"), None);
    }

    #[test]
    fn list_splice_targets_owner_record_only() {
        let doc = format!(
            "{GROUP}\t\tCCCCCCCCCCCCCCCCCCCCCCCC /* Other */ = {{\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t);\n\t\t}};\n"
        );
        let pattern = list_splice_pattern(Some("CCCCCCCCCCCCCCCCCCCCCCCC"), ListKey::Children);
        let out = insert_at_pattern(&doc, &pattern, |captured| {
            splice_into_list(captured, &["\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,".to_string()])
        })
        .expect("applied");

        assert!(out.starts_with(GROUP));
        assert!(out.contains(
            "/* Other */ = {\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,\n\t\t\t);"
        ));
    }

    #[test]
    fn list_splice_appends_after_existing_entries() {
        let pattern = list_splice_pattern(Some("AAAAAAAAAAAAAAAAAAAAAAAA"), ListKey::Children);
        let out = insert_at_pattern(GROUP, &pattern, |captured| {
            splice_into_list(captured, &["\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,".to_string()])
        })
        .expect("applied");
        assert!(out.contains(
            "BBBBBBBBBBBBBBBBBBBBBBBB /* main.swift */,\n\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,\n\t\t\t);"
        ));
    }

    #[test]
    fn list_splice_skips_parentheses_inside_entry_comments() {
        let doc = GROUP.replace("/* main.swift */", "/* main (Legacy).swift */");
        let pattern = list_splice_pattern(Some("AAAAAAAAAAAAAAAAAAAAAAAA"), ListKey::Children);
        let out = insert_at_pattern(&doc, &pattern, |captured| {
            splice_into_list(captured, &["\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,".to_string()])
        })
        .expect("applied");
        assert!(out.contains(
            "BBBBBBBBBBBBBBBBBBBBBBBB /* main (Legacy).swift */,\n\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,\n\t\t\t);"
        ));
    }

    #[test]
    fn list_splice_fills_empty_list() {
        let doc = "\t\tAAAAAAAAAAAAAAAAAAAAAAAA /* Frameworks */ = {\n\t\t\tisa = PBXFrameworksBuildPhase;\n\t\t\tfiles = (\n\t\t\t);\n\t\t};\n";
        let pattern = list_splice_pattern(Some("AAAAAAAAAAAAAAAAAAAAAAAA"), ListKey::Files);
        let out = insert_at_pattern(doc, &pattern, |captured| {
            splice_into_list(captured, &["\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,".to_string()])
        })
        .expect("applied");
        assert!(out.contains(
            "files = (\n\t\t\t\tDDDDDDDDDDDDDDDDDDDDDDDD /* New */,\n\t\t\t);\n"
        ));
    }

    #[test]
    fn pattern_without_match_returns_none() {
        let pattern = list_splice_pattern(Some("EEEEEEEEEEEEEEEEEEEEEEEE"), ListKey::Files);
        assert!(insert_at_pattern(GROUP, &pattern, |c| c.to_string()).is_none());
    }

    #[test]
    fn insert_after_record_keeps_record_intact() {
        let doc = "\t\tAAAAAAAAAAAAAAAAAAAAAAAA /* Storage */ = {\n\t\t\tisa = XCSwiftPackageProductDependency;\n\t\t};\n\t\tnext\n";
        let out = insert_after_pattern(doc, &record_pattern("AAAAAAAAAAAAAAAAAAAAAAAA"), "\n\t\tADDED")
            .expect("applied");
        assert!(out.contains("\t\t};\n\t\tADDED\n\t\tnext"));
    }
}
