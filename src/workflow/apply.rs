//! Workflow apply step.
//!
//! Apply loads and validates a plan, patches the manifest in memory, and only
//! then touches disk: backup first, atomic replace second.
use crate::cli::ApplyArgs;
use crate::config::{self, PatchPlan};
use crate::manifest;
use crate::patch::{apply_plan, PatchReport};
use crate::util::display_path;
use anyhow::{anyhow, Context, Result};
use std::path::Path;

/// Run the apply step for one plan.
pub fn run_apply(args: &ApplyArgs) -> Result<()> {
    let plan = config::load_plan(&args.plan)?;
    config::validate_plan(&plan)
        .with_context(|| format!("validate plan {}", args.plan.display()))?;
    let manifest_path = config::resolve_manifest_path(&plan, &args.plan, args.manifest.as_deref());

    let original = manifest::load_document(&manifest_path)?;
    tracing::debug!(manifest = %manifest_path.display(), bytes = original.len(), "loaded manifest");
    let (patched, report) = apply_plan(original.clone(), &plan);

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if args.strict && report.has_warnings() {
        return Err(anyhow!(
            "{} anchor(s) missing; manifest not written (--strict)",
            report.warnings.len()
        ));
    }

    print_summary(&plan, &report);
    let cwd = std::env::current_dir().ok();
    let display = display_path(&manifest_path, cwd.as_deref());
    if args.dry_run {
        println!("Dry run: {display} not written");
        return Ok(());
    }
    if patched == original {
        println!("No changes to {display}");
        return Ok(());
    }

    if !args.no_backup {
        let backup = manifest::backup(&manifest_path)?;
        println!("Created backup at {}", display_path(&backup, cwd.as_deref()));
    }
    manifest::write_document(&manifest_path, &patched)?;
    println!("Updated {display}");
    Ok(())
}

fn print_summary(plan: &PatchPlan, report: &PatchReport) {
    if let Some(group) = &report.added_group {
        println!("Added files to group {group}:");
        for file in &report.added_files {
            println!("  - {}", group_file_path(plan, file));
        }
    }
    for file in &report.skipped_files {
        println!("{file} already present");
    }
    for framework in &report.added_frameworks {
        println!("Added framework {framework}");
    }
    for framework in &report.present_frameworks {
        println!("{framework} already present");
    }
    for product in &report.added_packages {
        println!("Added package product {product}");
    }
    for product in &report.present_packages {
        println!("{product} already present");
    }
}

fn group_file_path(plan: &PatchPlan, file: &str) -> String {
    match &plan.source_group {
        Some(group) => Path::new(group.path()).join(file).display().to_string(),
        None => file.to_string(),
    }
}
