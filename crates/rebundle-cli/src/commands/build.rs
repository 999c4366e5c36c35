//! Build command - run the gated build

use super::{list_paths, pipeline};
use anyhow::{Context, Result};
use colored::Colorize;
use rebundle_build::Outcome;
use rebundle_config::Config;

/// Build command arguments
#[derive(Default)]
pub struct BuildArgs {
    /// Rebuild even if inputs are unchanged
    pub force: bool,
    /// JSON output
    pub json: bool,
}

/// Run the build command
pub fn run(project: &Config, args: BuildArgs) -> Result<()> {
    let mut pipeline = pipeline(project)?.with_force(args.force);
    let outcome = pipeline.run().context("Build failed")?;
    let plan = pipeline.plan();

    if args.json {
        let mut value = serde_json::to_value(&outcome).context("Failed to encode outcome")?;
        if let Outcome::Rebuilt { elapsed, .. } = &outcome {
            value["elapsed_secs"] = serde_json::json!(elapsed.as_secs_f64());
        }
        value["bundle"] = serde_json::json!(plan.name);
        println!("{value}");
        return Ok(());
    }

    match &outcome {
        Outcome::SourcesMissing { missing } => {
            println!(
                "{} {}: sources missing ({}); keeping prebuilt artifact",
                "skipped".yellow().bold(),
                plan.name,
                list_paths(missing, &plan.project_root)
            );
        }
        Outcome::UpToDate { fingerprint } => {
            println!(
                "{} {} ({})",
                "up to date".green().bold(),
                plan.name,
                fingerprint.short(12)
            );
        }
        Outcome::Rebuilt {
            fingerprint,
            reason,
            steps_run,
            elapsed,
        } => {
            println!(
                "{} {} in {:.2}s ({} step{}, {})",
                "rebuilt".green().bold(),
                plan.name,
                elapsed.as_secs_f64(),
                steps_run,
                if *steps_run == 1 { "" } else { "s" },
                reason
            );
            println!("  fingerprint: {}", fingerprint.short(12).dimmed());
        }
    }

    Ok(())
}
