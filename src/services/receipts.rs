use std::path::{Path, PathBuf};

use anyhow::Context;
use uuid::Uuid;

/// Stores an uploaded receipt under `uploads_dir` with a fresh uuid name,
/// keeping the original extension when it looks sane. Returns the relative
/// path recorded on the booking. Storage only; receipts are never served or
/// processed.
pub async fn store_receipt(
    uploads_dir: &str,
    original_name: Option<&str>,
    bytes: &[u8],
) -> anyhow::Result<String> {
    let ext = original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin");

    let filename = format!("{}.{ext}", Uuid::new_v4());
    let path: PathBuf = [uploads_dir, &filename].iter().collect();

    tokio::fs::create_dir_all(uploads_dir)
        .await
        .context("failed to create uploads directory")?;
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("failed to store receipt: {filename}"))?;

    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_receipt_keeps_extension() {
        let dir = std::env::temp_dir().join(format!("receipts-{}", Uuid::new_v4()));
        let dir = dir.to_string_lossy().to_string();

        let name = store_receipt(&dir, Some("proof.png"), b"fake image")
            .await
            .unwrap();
        assert!(name.ends_with(".png"));

        let stored = tokio::fs::read(Path::new(&dir).join(&name)).await.unwrap();
        assert_eq!(stored, b"fake image");
    }

    #[tokio::test]
    async fn test_store_receipt_rejects_odd_extension() {
        let dir = std::env::temp_dir().join(format!("receipts-{}", Uuid::new_v4()));
        let dir = dir.to_string_lossy().to_string();

        let name = store_receipt(&dir, Some("weird.name/../x"), b"data")
            .await
            .unwrap();
        assert!(name.ends_with(".bin"));
    }
}
