//! Retrying byte-stream downloader with progress reporting
use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

const MAX_RETRIES: u32 = 3;

/// Downloads talk videos and subtitles into a base directory
pub struct Downloader {
    client: Client,
    base_dir: PathBuf,
    max_retries: u32,
}

impl Downloader {
    /// Create a downloader rooted at `base_dir`, creating the directory
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)
            .await
            .with_context(|| format!("failed to create base directory {}", base_dir.display()))?;

        Ok(Self {
            client: Client::new(),
            base_dir,
            max_retries: MAX_RETRIES,
        })
    }

    /// Full path for a download: `<base>/<sanitized name>/<file>`
    pub fn download_path(&self, talk_name: &str, file: &str) -> PathBuf {
        self.base_dir.join(sanitize_filename(talk_name)).join(file)
    }

    /// Download a video file with a progress bar
    pub async fn download_video(&self, url: &str, path: &Path) -> Result<()> {
        self.download(url, path, "Downloading video").await
    }

    /// Download a subtitle file with a progress bar
    pub async fn download_subtitle(&self, url: &str, path: &Path) -> Result<()> {
        self.download(url, path, "Downloading subtitle").await
    }

    /// Stream a URL to `path`, retrying on transport, status, or write errors
    ///
    /// Each attempt truncates whatever partial file the previous one left.
    async fn download(&self, url: &str, path: &Path, label: &str) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }

        let mut last_err = anyhow!("download failed: {}", url);
        for attempt in 1..=self.max_retries {
            match self.try_download(url, path, label).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("Download attempt {}/{} failed: {}", attempt, self.max_retries, e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }

    async fn try_download(&self, url: &str, path: &Path, label: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("bad status: {}", response.status()));
        }

        let total_size = response.content_length().unwrap_or(0);
        let bar = ProgressBar::new(total_size);
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} [{elapsed_precise}] [{bar:40.green/blue}] {bytes}/{total_bytes} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());

        let mut file = fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            bar.inc(chunk.len() as u64);
        }
        file.flush().await?;
        bar.finish();
        Ok(())
    }
}

/// Replace filesystem-hostile characters with underscores
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_filename("plain_slug"), "plain_slug");
    }

    #[tokio::test]
    async fn test_new_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("downloads");
        let downloader = Downloader::new(&base).await.unwrap();

        assert!(base.is_dir());
        let path = downloader.download_path("my_talk", "720p.mp4");
        assert_eq!(path, base.join("my_talk").join("720p.mp4"));
    }

    #[tokio::test]
    async fn test_download_path_sanitizes_name() {
        let temp_dir = TempDir::new().unwrap();
        let downloader = Downloader::new(temp_dir.path()).await.unwrap();
        let path = downloader.download_path("what: a talk?", "en.srt");
        assert_eq!(path, temp_dir.path().join("what_ a talk_").join("en.srt"));
    }
}
