//! Workflow init step.
//!
//! Init writes a starter plan whose placeholder identifiers must be replaced
//! with ones from the target manifest (see `pbxpatch inspect`).
use crate::cli::InitArgs;
use crate::config;
use anyhow::{anyhow, Result};

/// Run the init step.
pub fn run_init(args: &InitArgs) -> Result<()> {
    if args.plan.exists() && !args.force {
        return Err(anyhow!(
            "plan already exists at {} (use --force to overwrite)",
            args.plan.display()
        ));
    }
    config::write_plan(&args.plan, &config::plan_stub())?;
    println!("Wrote plan stub to {}", args.plan.display());
    Ok(())
}
