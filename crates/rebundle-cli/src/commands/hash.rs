//! Hash command - print the current input fingerprint

use super::pipeline;
use anyhow::{Context, Result};
use rebundle_config::Config;

pub fn run(project: &Config) -> Result<()> {
    let fingerprint = pipeline(project)?
        .fingerprint()
        .context("Failed to fingerprint inputs")?;
    println!("{fingerprint}");
    Ok(())
}
