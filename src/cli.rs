//! CLI argument parsing for the manifest patch workflow.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Target name shown in the manual instructions printed by `check`.
pub const DEFAULT_TARGET: &str = "App";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "pbxpatch",
    version,
    about = "Plan-driven patcher for Xcode project manifests",
    after_help = "Commands:\n  init --plan <file>              Write a starter patch plan\n  apply --plan <file>             Patch the manifest named by the plan\n  check [--plan <file>] [FILES]   Report which source files exist on disk\n  inspect <manifest>              Summarize manifest sections\n\nExamples:\n  pbxpatch init --plan patch.json\n  pbxpatch apply --plan patch.json --dry-run\n  pbxpatch apply --plan patch.json --strict\n  pbxpatch check --root . OmniAI/Services/MoodManager.swift\n  pbxpatch inspect OmniAI.xcodeproj/project.pbxproj --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Apply(ApplyArgs),
    Check(CheckArgs),
    Inspect(InspectArgs),
}

/// Init command inputs.
#[derive(Parser, Debug)]
#[command(about = "Write a starter patch plan")]
pub struct InitArgs {
    /// Where to write the plan JSON
    #[arg(long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Overwrite an existing plan
    #[arg(long)]
    pub force: bool,
}

/// Apply command inputs.
#[derive(Parser, Debug)]
#[command(about = "Apply a patch plan to a project manifest")]
pub struct ApplyArgs {
    /// Patch plan JSON
    #[arg(long, value_name = "FILE")]
    pub plan: PathBuf,

    /// Manifest to patch, overriding the plan's `manifest`
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Fail without writing when any anchor is missing
    #[arg(long)]
    pub strict: bool,

    /// Skip writing `<manifest>.backup`
    #[arg(long)]
    pub no_backup: bool,
}

/// Check command inputs.
#[derive(Parser, Debug)]
#[command(about = "Report which expected source files exist on disk")]
pub struct CheckArgs {
    /// Directory the file paths are relative to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Also check the plan's source group files (under the group path)
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,

    /// Target name used in the printed instructions
    #[arg(long, value_name = "NAME", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Paths to check
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

/// Inspect command inputs.
#[derive(Parser, Debug)]
#[command(about = "Summarize the sections of a project manifest")]
pub struct InspectArgs {
    /// Manifest to read
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}
