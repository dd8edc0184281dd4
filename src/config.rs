//! Patch plan loading and validation.
//!
//! A plan carries everything tied to one project: which manifest to edit,
//! which existing records anchor the edits, and what to add.
use crate::manifest::{is_identifier, SectionKind};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PLAN_SCHEMA_VERSION: u32 = 1;

/// A manifest plus the ordered work items to apply to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchPlan {
    pub schema_version: u32,
    /// Manifest path; relative paths resolve against the plan's directory.
    pub manifest: PathBuf,
    #[serde(default)]
    pub anchors: Anchors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_group: Option<SourceGroup>,
    #[serde(default)]
    pub frameworks: Vec<Framework>,
    #[serde(default)]
    pub package_products: Vec<PackageProduct>,
}

/// Identifiers of the existing records the patcher splices into.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Anchors {
    /// Group whose `children` receives the new source group.
    #[serde(default)]
    pub parent_group_id: Option<String>,
    /// `PBXSourcesBuildPhase` whose `files` receives new build files.
    #[serde(default)]
    pub sources_phase_id: Option<String>,
    /// `PBXFrameworksBuildPhase` whose `files` receives framework build files.
    #[serde(default)]
    pub frameworks_phase_id: Option<String>,
    /// Target whose `packageProductDependencies` receives new products;
    /// the first such list in the manifest when unset.
    #[serde(default)]
    pub package_target_id: Option<String>,
    #[serde(default)]
    pub sentinels: Sentinels,
}

/// Literal section terminators that new records are inserted before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sentinels {
    pub build_file: String,
    pub file_reference: String,
    pub group: String,
    pub package_product_dependency: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            build_file: SectionKind::BuildFile.terminator(),
            file_reference: SectionKind::FileReference.terminator(),
            group: SectionKind::Group.terminator(),
            package_product_dependency: SectionKind::PackageProductDependency.terminator(),
        }
    }
}

/// Source files registered together under one new group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceGroup {
    pub name: String,
    /// Group path on disk; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub files: Vec<String>,
}

impl SourceGroup {
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }
}

/// A system framework linked through the frameworks build phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Framework {
    /// Bundle name, e.g. `LocalAuthentication.framework`.
    pub name: String,
    /// SDK-relative path; defaults to `System/Library/Frameworks/<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Framework {
    pub fn path(&self) -> String {
        self.path
            .clone()
            .unwrap_or_else(|| format!("System/Library/Frameworks/{}", self.name))
    }
}

/// A product of an already-referenced Swift package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageProduct {
    pub product: String,
    /// Identifier of the package reference record.
    pub package_id: String,
    /// Comment shown next to the package reference.
    #[serde(default = "default_package_label")]
    pub package_label: String,
    /// Existing product dependency record to insert after; when unset the
    /// record goes before the section terminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_record_id: Option<String>,
}

fn default_package_label() -> String {
    "XCRemoteSwiftPackageReference".to_string()
}

/// Load a patch plan from JSON.
pub fn load_plan(path: &Path) -> Result<PatchPlan> {
    let bytes = fs::read(path).with_context(|| format!("read plan {}", path.display()))?;
    let plan: PatchPlan = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse plan JSON {}", path.display()))?;
    Ok(plan)
}

/// Persist a plan in a stable JSON format.
pub fn write_plan(path: &Path, plan: &PatchPlan) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut text = serde_json::to_string_pretty(plan).context("serialize plan")?;
    text.push('\n');
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Starter plan written by `init`.
pub fn plan_stub() -> PatchPlan {
    PatchPlan {
        schema_version: PLAN_SCHEMA_VERSION,
        manifest: PathBuf::from("App.xcodeproj/project.pbxproj"),
        anchors: Anchors {
            parent_group_id: Some("000000000000000000000001".to_string()),
            sources_phase_id: Some("000000000000000000000002".to_string()),
            frameworks_phase_id: Some("000000000000000000000003".to_string()),
            package_target_id: None,
            sentinels: Sentinels::default(),
        },
        source_group: Some(SourceGroup {
            name: "Security".to_string(),
            path: None,
            files: vec!["CertificatePinner.swift".to_string()],
        }),
        frameworks: vec![Framework {
            name: "LocalAuthentication.framework".to_string(),
            path: None,
        }],
        package_products: Vec::new(),
    }
}

/// Resolve the manifest to patch: an explicit override wins, otherwise the
/// plan's path relative to the plan file.
pub fn resolve_manifest_path(plan: &PatchPlan, plan_path: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(explicit) = explicit {
        return explicit.to_path_buf();
    }
    if plan.manifest.is_absolute() {
        return plan.manifest.clone();
    }
    plan_path
        .parent()
        .map(|dir| dir.join(&plan.manifest))
        .unwrap_or_else(|| plan.manifest.clone())
}

/// Reject plans the patcher cannot apply meaningfully.
pub fn validate_plan(plan: &PatchPlan) -> Result<()> {
    if plan.schema_version != PLAN_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported plan schema_version {} (expected {PLAN_SCHEMA_VERSION})",
            plan.schema_version
        ));
    }
    if plan.manifest.as_os_str().is_empty() {
        return Err(anyhow!("manifest must be non-empty"));
    }
    let anchors = &plan.anchors;
    validate_optional_id(anchors.parent_group_id.as_deref(), "anchors.parent_group_id")?;
    validate_optional_id(anchors.sources_phase_id.as_deref(), "anchors.sources_phase_id")?;
    validate_optional_id(anchors.frameworks_phase_id.as_deref(), "anchors.frameworks_phase_id")?;
    validate_optional_id(anchors.package_target_id.as_deref(), "anchors.package_target_id")?;
    for (label, sentinel) in [
        ("build_file", &anchors.sentinels.build_file),
        ("file_reference", &anchors.sentinels.file_reference),
        ("group", &anchors.sentinels.group),
        ("package_product_dependency", &anchors.sentinels.package_product_dependency),
    ] {
        if sentinel.trim().is_empty() {
            return Err(anyhow!("anchors.sentinels.{label} must be non-empty"));
        }
    }

    if let Some(group) = &plan.source_group {
        require_name(&group.name, "source_group.name")?;
        require_id(anchors.parent_group_id.as_deref(), "anchors.parent_group_id", "source_group")?;
        require_id(anchors.sources_phase_id.as_deref(), "anchors.sources_phase_id", "source_group")?;
        for file in &group.files {
            require_name(file, "source_group.files")?;
            if file.contains('/') {
                return Err(anyhow!(
                    "source_group.files entries must be bare file names (got {file:?})"
                ));
            }
        }
    }
    if !plan.frameworks.is_empty() {
        require_id(anchors.frameworks_phase_id.as_deref(), "anchors.frameworks_phase_id", "frameworks")?;
    }
    for framework in &plan.frameworks {
        require_name(&framework.name, "frameworks.name")?;
    }
    for product in &plan.package_products {
        require_name(&product.product, "package_products.product")?;
        require_name(&product.package_label, "package_products.package_label")?;
        validate_id(&product.package_id, "package_products.package_id")?;
        validate_optional_id(product.after_record_id.as_deref(), "package_products.after_record_id")?;
    }
    Ok(())
}

/// Names end up inside `/* ... */` comments, so they must not close one.
fn require_name(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{label} must be non-empty"));
    }
    if value.contains("*/") {
        return Err(anyhow!("{label} must not contain \"*/\" (got {value:?})"));
    }
    Ok(())
}

fn require_id(value: Option<&str>, label: &str, work: &str) -> Result<()> {
    match value {
        Some(_) => Ok(()),
        None => Err(anyhow!("{label} is required when {work} is set")),
    }
}

fn validate_optional_id(value: Option<&str>, label: &str) -> Result<()> {
    match value {
        Some(id) => validate_id(id, label),
        None => Ok(()),
    }
}

fn validate_id(value: &str, label: &str) -> Result<()> {
    if !is_identifier(value) {
        return Err(anyhow!(
            "{label} must be 24 uppercase hex characters (got {value:?})"
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
