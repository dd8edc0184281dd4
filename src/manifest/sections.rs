//! Read-only index of `/* Begin X section */` blocks.
//!
//! Used to report on a manifest and to check patch results; edits never go
//! through this index.
use super::ids::IdAllocator;
use regex::Regex;
use serde::Serialize;

/// Sections the patcher writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    BuildFile,
    FileReference,
    FrameworksBuildPhase,
    Group,
    SourcesBuildPhase,
    PackageProductDependency,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::BuildFile,
        SectionKind::FileReference,
        SectionKind::FrameworksBuildPhase,
        SectionKind::Group,
        SectionKind::SourcesBuildPhase,
        SectionKind::PackageProductDependency,
    ];

    /// The `isa` value that names the section.
    pub fn isa(self) -> &'static str {
        match self {
            SectionKind::BuildFile => "PBXBuildFile",
            SectionKind::FileReference => "PBXFileReference",
            SectionKind::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            SectionKind::Group => "PBXGroup",
            SectionKind::SourcesBuildPhase => "PBXSourcesBuildPhase",
            SectionKind::PackageProductDependency => "XCSwiftPackageProductDependency",
        }
    }

    /// Default sentinel closing the section.
    pub fn terminator(self) -> String {
        format!("/* End {} section */", self.isa())
    }
}

/// One `Begin`/`End` delimited block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub records: usize,
    /// False when the `Begin` marker has no matching `End`.
    pub closed: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SectionScan {
    pub sections: Vec<Section>,
    pub identifier_count: usize,
    #[serde(skip)]
    terminators: Vec<(String, usize)>,
}

impl SectionScan {
    #[cfg(test)]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Number of records in the named section, zero when absent.
    #[cfg(test)]
    pub fn records_in(&self, name: &str) -> usize {
        self.section(name).map(|section| section.records).unwrap_or(0)
    }

    /// How many times `/* End <name> section */` occurs in the document.
    pub fn terminator_count(&self, name: &str) -> usize {
        self.terminators
            .iter()
            .find(|(section, _)| section == name)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Index every section, its record count, and the distinct identifiers in
/// `content`.
pub fn scan_sections(content: &str) -> SectionScan {
    let begin = Regex::new(r"/\* Begin (\w+) section \*/").expect("regex for section begin");
    let end = Regex::new(r"/\* End (\w+) section \*/").expect("regex for section end");
    let record = Regex::new(r"(?m)^\s*[0-9A-F]{24}(?: /\*.*?\*/)? = \{")
        .expect("regex for record heads");

    let mut sections = Vec::new();
    for caps in begin.captures_iter(content) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let rest = &content[whole.end()..];
        let terminator = format!("/* End {name} section */");
        let (body, closed) = match rest.find(&terminator) {
            Some(at) => (&rest[..at], true),
            None => (rest, false),
        };
        sections.push(Section {
            name: name.to_string(),
            records: record.find_iter(body).count(),
            closed,
        });
    }

    let mut terminators: Vec<(String, usize)> = Vec::new();
    for caps in end.captures_iter(content) {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        match terminators.iter_mut().find(|(section, _)| section == name) {
            Some((_, count)) => *count += 1,
            None => terminators.push((name.to_string(), 1)),
        }
    }

    SectionScan {
        sections,
        identifier_count: IdAllocator::from_document(content).len(),
        terminators,
    }
}
