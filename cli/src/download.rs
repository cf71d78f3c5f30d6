//! Raw source downloads.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Downloads `url` to `dest`. Non-2xx responses are errors and leave no file.
pub fn run_download(url: &str, dest: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let written = runtime.block_on(download(url, dest))?;

    println!(
        "{} Downloaded {} bytes to {}",
        "✓".green().bold(),
        written,
        dest.display()
    );
    Ok(())
}

async fn download(url: &str, dest: &Path) -> Result<u64, Box<dyn std::error::Error>> {
    tracing::info!(url, dest = %dest.display(), "downloading");

    let mut response = reqwest::get(url).await?.error_for_status()?;

    let pb = match response.content_length() {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.blue} {bytes}/{total_bytes} {msg}")?,
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }
    file.flush().await?;
    pb.finish_and_clear();

    Ok(written)
}
