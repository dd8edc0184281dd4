//! Shared test infrastructure for integration tests.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const FIXTURE: &str = include_str!("../fixtures/minimal.pbxproj");

pub const PARENT_GROUP_ID: &str = "1D1A1A282C8F123400123456";
pub const SOURCES_PHASE_ID: &str = "1D1A1A222C8F123400123456";
pub const FRAMEWORKS_PHASE_ID: &str = "1D1A1A232C8F123400123456";
pub const PACKAGE_ID: &str = "888E26FE2E553E3E00609191";
pub const STORAGE_DEPENDENCY_ID: &str = "888E270B2E553E3E00609191";

/// A temp project holding the fixture manifest and a plan next to it.
pub struct Project {
    pub dir: TempDir,
    pub manifest: PathBuf,
    pub plan: PathBuf,
}

impl Project {
    pub fn new(plan: &Value) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let manifest = dir.path().join("OmniAI.xcodeproj/project.pbxproj");
        fs::create_dir_all(manifest.parent().expect("manifest dir")).expect("create project dir");
        fs::write(&manifest, FIXTURE).expect("write manifest");
        let plan_path = dir.path().join("patch.json");
        fs::write(
            &plan_path,
            serde_json::to_vec_pretty(plan).expect("serialize plan"),
        )
        .expect("write plan");
        Self {
            dir,
            manifest,
            plan: plan_path,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    #[allow(dead_code)]
    pub fn manifest_text(&self) -> String {
        fs::read_to_string(&self.manifest).expect("read manifest")
    }

    #[allow(dead_code)]
    pub fn backup(&self) -> PathBuf {
        let mut raw = self.manifest.clone().into_os_string();
        raw.push(".backup");
        PathBuf::from(raw)
    }
}

/// Plan targeting the fixture: one source group, one framework, one package
/// product.
pub fn full_plan() -> Value {
    json!({
        "schema_version": 1,
        "manifest": "OmniAI.xcodeproj/project.pbxproj",
        "anchors": {
            "parent_group_id": PARENT_GROUP_ID,
            "sources_phase_id": SOURCES_PHASE_ID,
            "frameworks_phase_id": FRAMEWORKS_PHASE_ID
        },
        "source_group": {
            "name": "Security",
            "files": ["CertificatePinner.swift", "AuditLogger.swift"]
        },
        "frameworks": [{ "name": "LocalAuthentication.framework" }],
        "package_products": [{
            "product": "FirebaseAppCheck",
            "package_id": PACKAGE_ID,
            "package_label": "XCRemoteSwiftPackageReference \"firebase-ios-sdk\"",
            "after_record_id": STORAGE_DEPENDENCY_ID
        }]
    })
}

pub fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pbxpatch"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("run pbxpatch")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
