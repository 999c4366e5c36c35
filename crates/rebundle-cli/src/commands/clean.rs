//! Clean command - forget the recorded fingerprint

use super::{pipeline, relative};
use anyhow::{Context, Result};
use rebundle_build::DigestStore;
use rebundle_config::Config;

pub fn run(project: &Config) -> Result<()> {
    let pipeline = pipeline(project)?;
    let root = pipeline.plan().project_root.clone();
    let (mut record, _) = pipeline.into_parts();
    record
        .clear()
        .with_context(|| format!("Failed to remove {}", record.path().display()))?;
    println!("Removed {}", relative(record.path(), &root));
    Ok(())
}
