//! Plan-driven edits of a manifest held in memory.
//!
//! Every insertion is anchored on a literal sentinel or a regex capture. A
//! missing anchor leaves the document untouched for that step and records an
//! [`AnchorWarning`]; nothing here fails on document shape.
use crate::config::{Anchors, Framework, PackageProduct, PatchPlan, SourceGroup};
use crate::manifest::{
    build_file_record, file_reference_record, framework_reference_record, group_record,
    insert_after_pattern, insert_at_pattern, insert_at_sentinel, list_entry, list_splice_pattern,
    package_product_record, record_pattern, splice_into_list, AnchorWarning, BuildPhase,
    IdAllocator, ListKey,
};
use regex::Regex;

/// What a patch run changed, skipped, or could not anchor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub added_files: Vec<String>,
    /// Files already registered under the same name.
    pub skipped_files: Vec<String>,
    pub added_group: Option<String>,
    pub added_frameworks: Vec<String>,
    pub present_frameworks: Vec<String>,
    pub added_packages: Vec<String>,
    pub present_packages: Vec<String>,
    pub warnings: Vec<AnchorWarning>,
}

impl PatchReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Owns the document for the duration of one run.
#[derive(Debug)]
pub struct ManifestPatcher {
    content: String,
    ids: IdAllocator,
    report: PatchReport,
}

impl ManifestPatcher {
    pub fn new(content: String) -> Self {
        let ids = IdAllocator::from_document(&content);
        if ids.is_empty() {
            tracing::debug!("manifest carries no identifiers");
        }
        Self {
            content,
            ids,
            report: PatchReport::default(),
        }
    }

    pub fn finish(self) -> (String, PatchReport) {
        (self.content, self.report)
    }

    /// Register `group.files` as new file references, build files in the
    /// sources phase, and children of one new group under the parent group.
    pub fn add_source_files(&mut self, group: &SourceGroup, anchors: &Anchors) {
        let mut files: Vec<(String, String, String)> = Vec::new();
        for file in &group.files {
            if self.has_file_reference(file) {
                tracing::info!(file = %file, "file reference already present; skipping");
                self.report.skipped_files.push(file.clone());
                continue;
            }
            if files.iter().any(|(queued, _, _)| queued == file) {
                tracing::info!(file = %file, "file listed twice; skipping repeat");
                self.report.skipped_files.push(file.clone());
                continue;
            }
            let file_ref = self.ids.allocate();
            let build_ref = self.ids.allocate();
            files.push((file.clone(), file_ref, build_ref));
        }
        if files.is_empty() {
            tracing::debug!(group = %group.name, "no new source files to register");
            return;
        }
        let work = format!("source group {}", group.name);
        let group_id = self.ids.allocate();

        let file_refs: String = files
            .iter()
            .map(|(file, file_ref, _)| file_reference_record(file_ref, file))
            .collect();
        self.insert_before(&anchors.sentinels.file_reference, &file_refs, &work);

        let children: Vec<(String, String)> = files
            .iter()
            .map(|(file, file_ref, _)| (file_ref.clone(), file.clone()))
            .collect();
        let group_text = group_record(&group_id, &group.name, group.path(), &children);
        self.insert_before(&anchors.sentinels.group, &group_text, &work);

        let build_files: String = files
            .iter()
            .map(|(file, file_ref, build_ref)| {
                build_file_record(build_ref, file_ref, file, BuildPhase::Sources)
            })
            .collect();
        self.insert_before(&anchors.sentinels.build_file, &build_files, &work);

        let phase_entries: Vec<String> = files
            .iter()
            .map(|(file, _, build_ref)| {
                list_entry(build_ref, &format!("{file} in {}", BuildPhase::Sources.label()))
            })
            .collect();
        self.splice_list(
            anchors.sources_phase_id.as_deref(),
            ListKey::Files,
            &phase_entries,
            &work,
        );

        let group_entry = vec![list_entry(&group_id, &group.name)];
        self.splice_list(
            anchors.parent_group_id.as_deref(),
            ListKey::Children,
            &group_entry,
            &work,
        );

        tracing::info!(group = %group.name, files = files.len(), "registered source files");
        self.report
            .added_files
            .extend(files.into_iter().map(|(file, _, _)| file));
        self.report.added_group = Some(group.name.clone());
    }

    /// Link a system framework unless its name already occurs anywhere in
    /// the document.
    ///
    /// The presence test is a plain substring match, so a comment mentioning
    /// the framework also counts as present.
    pub fn add_framework_if_absent(&mut self, framework: &Framework, anchors: &Anchors) {
        if self.content.contains(framework.name.as_str()) {
            tracing::info!(framework = %framework.name, "framework already referenced");
            self.report.present_frameworks.push(framework.name.clone());
            return;
        }
        let work = format!("framework {}", framework.name);
        let file_ref = self.ids.allocate();
        let build_ref = self.ids.allocate();

        let reference = framework_reference_record(&file_ref, &framework.name, &framework.path());
        self.insert_before(&anchors.sentinels.file_reference, &reference, &work);

        let build_file = build_file_record(&build_ref, &file_ref, &framework.name, BuildPhase::Frameworks);
        self.insert_before(&anchors.sentinels.build_file, &build_file, &work);

        let entry = vec![list_entry(
            &build_ref,
            &format!("{} in {}", framework.name, BuildPhase::Frameworks.label()),
        )];
        self.splice_list(
            anchors.frameworks_phase_id.as_deref(),
            ListKey::Files,
            &entry,
            &work,
        );

        tracing::info!(framework = %framework.name, "linked framework");
        self.report.added_frameworks.push(framework.name.clone());
    }

    /// Add a package product dependency unless the product name already
    /// occurs anywhere in the document.
    ///
    /// With `after_record_id` the record is appended right after that
    /// existing record; otherwise it goes before the section terminator.
    pub fn add_package_dependency_if_absent(&mut self, product: &PackageProduct, anchors: &Anchors) {
        if self.content.contains(product.product.as_str()) {
            tracing::info!(product = %product.product, "package product already referenced");
            self.report.present_packages.push(product.product.clone());
            return;
        }
        let work = format!("package product {}", product.product);
        let dep_id = self.ids.allocate();
        let record = package_product_record(
            &dep_id,
            &product.product,
            &product.package_id,
            &product.package_label,
        );

        match product.after_record_id.as_deref() {
            Some(after) => {
                let anchor = record_pattern(after);
                let appended = format!("\n{}", record.trim_end_matches('\n'));
                self.insert_after(&anchor, &appended, &format!("record {after}"), &work);
            }
            None => {
                self.insert_before(&anchors.sentinels.package_product_dependency, &record, &work);
            }
        }

        let entry = vec![list_entry(&dep_id, &product.product)];
        self.splice_list(
            anchors.package_target_id.as_deref(),
            ListKey::PackageProductDependencies,
            &entry,
            &work,
        );

        tracing::info!(product = %product.product, "added package product dependency");
        self.report.added_packages.push(product.product.clone());
    }

    fn has_file_reference(&self, file: &str) -> bool {
        self.content
            .contains(&format!("/* {file} */ = {{isa = PBXFileReference;"))
    }

    fn insert_before(&mut self, sentinel: &str, text: &str, work: &str) {
        match insert_at_sentinel(&self.content, sentinel, text) {
            Some(updated) => self.content = updated,
            None => self.warn(AnchorWarning::MissingSentinel {
                sentinel: sentinel.to_string(),
                work: work.to_string(),
            }),
        }
    }

    fn insert_after(&mut self, pattern: &Regex, text: &str, anchor: &str, work: &str) {
        match insert_after_pattern(&self.content, pattern, text) {
            Some(updated) => self.content = updated,
            None => self.warn(AnchorWarning::PatternNoMatch {
                anchor: anchor.to_string(),
                work: work.to_string(),
            }),
        }
    }

    fn splice_list(&mut self, owner: Option<&str>, key: ListKey, entries: &[String], work: &str) {
        let pattern = list_splice_pattern(owner, key);
        let updated = insert_at_pattern(&self.content, &pattern, |captured| {
            splice_into_list(captured, entries)
        });
        match updated {
            Some(updated) => self.content = updated,
            None => {
                let anchor = match owner {
                    Some(id) => format!("{} of {id}", key.as_str()),
                    None => format!("first {} list", key.as_str()),
                };
                self.warn(AnchorWarning::PatternNoMatch {
                    anchor,
                    work: work.to_string(),
                });
            }
        }
    }

    fn warn(&mut self, warning: AnchorWarning) {
        tracing::warn!(%warning, "anchor not found");
        self.report.warnings.push(warning);
    }
}

/// Apply every work item of `plan`, in order: source group, frameworks,
/// package products.
pub fn apply_plan(content: String, plan: &PatchPlan) -> (String, PatchReport) {
    let mut patcher = ManifestPatcher::new(content);
    if let Some(group) = &plan.source_group {
        patcher.add_source_files(group, &plan.anchors);
    }
    for framework in &plan.frameworks {
        patcher.add_framework_if_absent(framework, &plan.anchors);
    }
    for product in &plan.package_products {
        patcher.add_package_dependency_if_absent(product, &plan.anchors);
    }
    patcher.finish()
}
