//! Existence and integrity check: which artifacts must be (re)downloaded.
//!
//! Purely observational: no network, no filesystem writes.

use crate::artifact::Artifact;
use crate::checksum;
use crate::error::PipelineError;
use crate::log::Logger;

/// Returns the artifacts whose destination is missing or fails verification,
/// in input order.
///
/// An existing file with no expected checksum counts as present.
pub async fn check_files(
    artifacts: &[Artifact],
    log: &dyn Logger,
) -> Result<Vec<Artifact>, PipelineError> {
    let mut needed = Vec::new();
    for artifact in artifacts {
        let destination = artifact.destination();
        let exists = tokio::fs::try_exists(&destination)
            .await
            .map_err(|e| PipelineError::io("stat", &destination, e))?;
        if !exists {
            log.error(&format!("Not existing {}", destination.display()));
            needed.push(artifact.clone());
            continue;
        }
        let verification =
            checksum::verify_async(artifact.path(), artifact.filename(), artifact.checksum())
                .await?;
        if verification.matches {
            log.info(&format!("Exists {}", destination.display()));
        } else {
            log.info(&format!("Checksum no match {}", destination.display()));
            needed.push(artifact.clone());
        }
    }
    Ok(needed)
}
