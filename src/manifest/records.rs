//! Rendering of the record kinds the patcher writes.
//!
//! Layout follows what the IDE itself emits: single-line records for file
//! references and build files, multi-line blocks for groups and package
//! products, tab indentation throughout.

/// Build phase a build-file record belongs to; shows up in its comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Sources,
    Frameworks,
}

impl BuildPhase {
    pub fn label(self) -> &'static str {
        match self {
            BuildPhase::Sources => "Sources",
            BuildPhase::Frameworks => "Frameworks",
        }
    }
}

/// `lastKnownFileType` for a file name, by extension.
pub fn last_known_file_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "swift" => "sourcecode.swift",
        "m" => "sourcecode.c.objc",
        "mm" => "sourcecode.cpp.objcpp",
        "h" => "sourcecode.c.h",
        "c" => "sourcecode.c.c",
        "cpp" | "cc" | "cxx" => "sourcecode.cpp.cpp",
        "metal" => "sourcecode.metal",
        "storyboard" => "file.storyboard",
        "xib" => "file.xib",
        "plist" => "text.plist.xml",
        "json" => "text.json",
        "strings" => "text.plist.strings",
        "xcassets" => "folder.assetcatalog",
        "framework" => "wrapper.framework",
        _ => "text",
    }
}

/// Quote a value when it contains characters the manifest grammar does not
/// allow bare.
pub fn quote_value(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '/'));
    if bare {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

pub fn file_reference_record(id: &str, file_name: &str) -> String {
    format!(
        "\t\t{id} /* {file_name} */ = {{isa = PBXFileReference; lastKnownFileType = {}; path = {}; sourceTree = \"<group>\"; }};\n",
        last_known_file_type(file_name),
        quote_value(file_name),
    )
}

pub fn framework_reference_record(id: &str, name: &str, path: &str) -> String {
    format!(
        "\t\t{id} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = wrapper.framework; name = {}; path = {}; sourceTree = SDKROOT; }};\n",
        quote_value(name),
        quote_value(path),
    )
}

pub fn build_file_record(id: &str, file_ref_id: &str, file_name: &str, phase: BuildPhase) -> String {
    format!(
        "\t\t{id} /* {file_name} in {} */ = {{isa = PBXBuildFile; fileRef = {file_ref_id} /* {file_name} */; }};\n",
        phase.label()
    )
}

/// Multi-line `PBXGroup` block; `children` is `(id, label)` pairs.
pub fn group_record(id: &str, name: &str, path: &str, children: &[(String, String)]) -> String {
    let mut out = format!("\t\t{id} /* {name} */ = {{\n\t\t\tisa = PBXGroup;\n\t\t\tchildren = (\n");
    for (child_id, label) in children {
        out.push_str(&list_entry(child_id, label));
        out.push('\n');
    }
    out.push_str("\t\t\t);\n");
    out.push_str(&format!("\t\t\tpath = {};\n", quote_value(path)));
    out.push_str("\t\t\tsourceTree = \"<group>\";\n\t\t};\n");
    out
}

pub fn package_product_record(id: &str, product: &str, package_id: &str, package_label: &str) -> String {
    format!(
        "\t\t{id} /* {product} */ = {{\n\t\t\tisa = XCSwiftPackageProductDependency;\n\t\t\tpackage = {package_id} /* {package_label} */;\n\t\t\tproductName = {};\n\t\t}};\n",
        quote_value(product)
    )
}

/// One element of an array-valued key, without trailing newline.
pub fn list_entry(id: &str, label: &str) -> String {
    format!("\t\t\t\t{id} /* {label} */,")
}
