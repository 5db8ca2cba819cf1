//! `artifetch check <manifest>` – list what a fetch would download.

use anyhow::Result;
use artifetch_core::artifact::load_manifest;
use artifetch_core::filter::check_files;
use artifetch_core::log::TracingLogger;
use std::path::Path;

pub async fn run_check(manifest: &Path) -> Result<()> {
    let artifacts = load_manifest(manifest)?;
    let needed = check_files(&artifacts, &TracingLogger).await?;
    if needed.is_empty() {
        println!("All {} file(s) present and verified.", artifacts.len());
        return Ok(());
    }
    for artifact in &needed {
        println!("{}", artifact.destination().display());
    }
    println!("{} of {} file(s) need downloading.", needed.len(), artifacts.len());
    Ok(())
}
