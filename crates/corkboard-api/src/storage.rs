use anyhow::Result;
use rand::Rng;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Base-36 token charset keeps object names short and URL-safe.
const TOKEN_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 7;

/// Prefix inside the store for found-item photos.
const FOUND_ITEMS_PREFIX: &str = "found-items";

/// On-disk object store for uploaded photos. Each object is a flat file at
/// `{dir}/{prefix}/{name}`, served read-only under `/uploads/`.
#[derive(Clone)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(dir.join(FOUND_ITEMS_PREFIX)).await?;
        info!("Photo storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Collision-resistant object name: epoch millis plus a random token,
    /// keeping the original file's extension.
    fn object_name(original_file_name: &str) -> String {
        let extension = original_file_name
            .rsplit('.')
            .next()
            .unwrap_or("dat")
            .to_lowercase();
        let mut rng = rand::rng();
        let token: String = (0..TOKEN_LEN)
            .map(|_| {
                let idx = rng.random_range(0..TOKEN_CHARSET.len());
                TOKEN_CHARSET[idx] as char
            })
            .collect();
        format!(
            "{}-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            token,
            extension
        )
    }

    /// Store a found-item photo. Returns (stored file name, public URL).
    pub async fn store_found_item_photo(
        &self,
        original_file_name: &str,
        data: &[u8],
    ) -> Result<(String, String)> {
        let name = Self::object_name(original_file_name);
        let key = format!("{}/{}", FOUND_ITEMS_PREFIX, name);
        fs::write(self.dir.join(&key), data).await?;
        Ok((name, format!("/uploads/{}", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_dir() -> PathBuf {
        std::env::temp_dir().join(format!("corkboard-photos-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn object_names_keep_the_extension_and_never_collide() {
        let a = PhotoStore::object_name("wallet photo.JPG");
        let b = PhotoStore::object_name("wallet photo.JPG");
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn stores_bytes_under_the_found_items_prefix() {
        let store = PhotoStore::new(temp_store_dir()).await.expect("store");
        let (name, url) = store
            .store_found_item_photo("wallet.png", b"not really a png")
            .await
            .expect("write");

        assert_eq!(url, format!("/uploads/found-items/{}", name));
        let on_disk = tokio::fs::read(store.dir().join("found-items").join(&name))
            .await
            .expect("read back");
        assert_eq!(on_disk, b"not really a png");
    }
}
