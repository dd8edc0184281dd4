//! Workflow inspect step.
use crate::cli::InspectArgs;
use crate::manifest::{self, scan_sections, SectionKind, SectionScan};
use anyhow::{Context, Result};

/// Run the inspect step, printing a section summary or JSON.
pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let content = manifest::load_document(&args.manifest)?;
    let scan = scan_sections(&content);
    if args.json {
        let text = serde_json::to_string_pretty(&scan).context("serialize section scan")?;
        println!("{text}");
        return Ok(());
    }
    print!("{}", render_scan(&scan));
    Ok(())
}

/// Text table of sections; sections the patcher writes into are starred.
fn render_scan(scan: &SectionScan) -> String {
    let width = scan
        .sections
        .iter()
        .map(|section| section.name.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for section in &scan.sections {
        let marker = if SectionKind::ALL.iter().any(|kind| kind.isa() == section.name) {
            '*'
        } else {
            ' '
        };
        let unclosed = if section.closed { "" } else { "  (unclosed)" };
        out.push_str(&format!(
            "{marker} {:<width$}  {:>5}{unclosed}\n",
            section.name, section.records
        ));
    }
    out.push_str(&format!("identifiers: {}\n", scan.identifier_count));
    for kind in SectionKind::ALL {
        match scan.terminator_count(kind.isa()) {
            0 => out.push_str(&format!("missing sentinel: {}\n", kind.terminator())),
            1 => {}
            count => out.push_str(&format!(
                "duplicate sentinel: {} ({count} occurrences, first is used)\n",
                kind.terminator()
            )),
        }
    }
    out
}
