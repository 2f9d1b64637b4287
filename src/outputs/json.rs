//! JSON output of normalized feed items.
//!
//! The binary hands its final item list to the feed-assembly step as JSON,
//! either through a file or on stdout.

use crate::models::FeedItem;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument};

/// Serialize items as pretty-printed JSON.
pub fn items_to_json(items: &[FeedItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items)
}

/// Write `items` as pretty JSON to a file or to stdout.
///
/// Parent directories of `path` are created when missing.
///
/// # Arguments
///
/// * `items` - The final item list, in output order
/// * `path` - Destination file, or `None` for stdout
///
/// # Returns
///
/// `Ok(())` on success, or an error if serialization, directory creation
/// or writing fails.
#[instrument(level = "info", skip_all, fields(path = ?path, count = items.len()))]
pub async fn write_items(items: &[FeedItem], path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let json = items_to_json(items)?;

    let Some(path) = path else {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        return Ok(());
    };

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(parent = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(%path, "Wrote JSON items");
    Ok(())
}
