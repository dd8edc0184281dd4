//! Workflow check step.
//!
//! Check never mutates anything and never fails: missing files and an
//! unreadable plan are reported, not raised.
use crate::cli::CheckArgs;
use crate::config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// One expected file and whether it exists under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: PathBuf,
    pub exists: bool,
}

/// Run the check step.
pub fn run_check(args: &CheckArgs) -> Result<()> {
    let mut expected = args.files.clone();
    if let Some(plan_path) = &args.plan {
        match config::load_plan(plan_path)
            .with_context(|| format!("load plan for check {}", plan_path.display()))
        {
            Ok(plan) => expected.extend(plan_source_paths(&plan)),
            Err(err) => eprintln!("warning: {err:#}; checking FILES only"),
        }
    }
    if expected.is_empty() {
        eprintln!("warning: no files to check (pass FILES or --plan)");
    }

    let statuses = check_files(&args.root, &expected);
    for status in &statuses {
        if status.exists {
            println!("File exists: {}", status.path.display());
        } else {
            println!("File NOT found: {}", status.path.display());
        }
    }
    let missing = statuses.iter().filter(|status| !status.exists).count();
    if missing > 0 {
        println!("{missing} of {} files missing", statuses.len());
    }
    println!();
    print!("{}", manual_instructions(&args.target, &statuses));
    Ok(())
}

/// Check `files` relative to `root`, preserving order.
pub fn check_files(root: &Path, files: &[PathBuf]) -> Vec<FileStatus> {
    files
        .iter()
        .map(|path| FileStatus {
            path: path.clone(),
            exists: root.join(path).is_file(),
        })
        .collect()
}

/// Source group files as `<group path>/<file>`.
fn plan_source_paths(plan: &config::PatchPlan) -> Vec<PathBuf> {
    plan.source_group
        .iter()
        .flat_map(|group| {
            group
                .files
                .iter()
                .map(move |file| Path::new(group.path()).join(file))
        })
        .collect()
}

/// Steps for adding the files through the IDE.
pub fn manual_instructions(target: &str, statuses: &[FileStatus]) -> String {
    let mut text = String::from("To add these files to the project:\n");
    text.push_str("1. Open the project in Xcode\n");
    text.push_str("2. Drag the following files into the project navigator:\n");
    for status in statuses {
        text.push_str(&format!("   - {}\n", status.path.display()));
    }
    text.push_str(&format!(
        "3. Make sure the '{target}' target is selected when adding\n"
    ));
    text.push_str("4. Build the project (Cmd+B)\n");
    text
}
