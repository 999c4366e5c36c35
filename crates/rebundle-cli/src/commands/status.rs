//! Status command - report the gate decision without building

use super::{list_paths, pipeline};
use anyhow::{Context, Result};
use colored::Colorize;
use rebundle_build::{Decision, Status};
use rebundle_config::Config;

pub fn run(project: &Config, json: bool) -> Result<()> {
    let pipeline = pipeline(project)?;
    let status = pipeline.status().context("Failed to check inputs")?;
    let plan = pipeline.plan();

    if json {
        let mut value = serde_json::to_value(&status).context("Failed to encode status")?;
        value["bundle"] = serde_json::json!(plan.name);
        println!("{value}");
        return Ok(());
    }

    match &status {
        Status::SourcesMissing {
            missing,
            artifact_present,
        } => {
            let verdict = if *artifact_present {
                "keeping prebuilt artifact".yellow()
            } else {
                "build would fail".red()
            };
            println!(
                "{}: sources missing ({}); {}",
                plan.name,
                list_paths(missing, &plan.project_root),
                verdict
            );
        }
        Status::Checked {
            fingerprint,
            recorded,
            decision,
        } => {
            let verdict = match decision {
                Decision::Skip => "up to date".green().bold(),
                Decision::Rebuild(reason) => {
                    format!("needs rebuild ({reason})").as_str().yellow().bold()
                }
            };
            println!("{}: {}", plan.name, verdict);
            println!("  current:  {}", fingerprint.short(12));
            match recorded {
                Some(recorded) => println!("  recorded: {}", recorded.short(12)),
                None => println!("  recorded: {}", "none".dimmed()),
            }
        }
    }

    Ok(())
}
