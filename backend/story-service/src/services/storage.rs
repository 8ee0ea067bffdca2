//! Media storage for uploaded story files
//!
//! Files land under `images/` or `videos/` depending on media type, with
//! unique `story-` prefixed names. [`StorageBackend`] is the seam where an
//! object-storage integration would plug in; the shipped backend writes to
//! local disk.

use crate::error::{AppError, Result};
use crate::models::MediaType;
use async_trait::async_trait;
use rand::Rng;
use std::path::PathBuf;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persist the file and return its public URL
    async fn save(
        &self,
        media_type: MediaType,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String>;
}

/// Local-disk backend serving out of `{root}/images` and `{root}/videos`
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn directory_for(media_type: MediaType) -> &'static str {
        match media_type {
            MediaType::Video => "videos",
            MediaType::Image => "images",
        }
    }

    fn unique_filename(original_name: &str) -> String {
        let extension = original_name
            .rsplit('.')
            .next()
            .filter(|ext| !ext.is_empty() && ext.len() <= 8 && !ext.contains('/'))
            .unwrap_or("bin");
        let suffix = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            rand::thread_rng().gen_range(0..1_000_000_000u64)
        );
        format!("story-{}.{}", suffix, extension.to_lowercase())
    }
}

#[async_trait]
impl StorageBackend for LocalDiskStorage {
    async fn save(
        &self,
        media_type: MediaType,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }

        let directory = Self::directory_for(media_type);
        let target_directory = self.root.join(directory);
        tokio::fs::create_dir_all(&target_directory).await?;

        let filename = Self::unique_filename(original_name);
        let filepath = target_directory.join(&filename);
        tokio::fs::write(&filepath, bytes).await?;

        tracing::debug!(path = %filepath.display(), "Stored uploaded media");
        Ok(format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            directory,
            filename
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_videos_and_images_to_their_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(dir.path(), "");

        let video_url = storage
            .save(MediaType::Video, "clip.MP4", b"fake video".to_vec())
            .await
            .unwrap();
        let image_url = storage
            .save(MediaType::Image, "selfie.jpg", b"fake image".to_vec())
            .await
            .unwrap();

        assert!(video_url.starts_with("/videos/story-"));
        assert!(video_url.ends_with(".mp4"));
        assert!(image_url.starts_with("/images/story-"));
        assert!(image_url.ends_with(".jpg"));

        let on_disk = dir
            .path()
            .join("videos")
            .join(video_url.rsplit('/').next().unwrap());
        assert_eq!(tokio::fs::read(on_disk).await.unwrap(), b"fake video");
    }

    #[tokio::test]
    async fn rejects_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDiskStorage::new(dir.path(), "");
        let err = storage
            .save(MediaType::Image, "empty.png", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn filename_extension_fallback() {
        let name = LocalDiskStorage::unique_filename("no-extension");
        assert!(name.ends_with(".bin"));
        let name = LocalDiskStorage::unique_filename("archive.tar.gz");
        assert!(name.ends_with(".gz"));
    }
}
