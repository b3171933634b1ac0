use anyhow::Result;
use std::path::Path;

/// File name used when the user does not pick one.
pub const DEFAULT_PPTX_FILENAME: &str = "Graduation-Project-Presentation.pptx";

/// Ensure the output directory exists
pub async fn ensure_output_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let path = dir.as_ref();
    if !path.exists() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

/// Lower-cased extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("notes.MD")).as_deref(), Some("md"));
        assert_eq!(extension_of(Path::new("README")), None);
    }

    #[tokio::test]
    async fn test_ensure_output_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");
        ensure_output_dir(&dir).await.unwrap();
        assert!(dir.is_dir());
        // Existing directories are left alone.
        ensure_output_dir(&dir).await.unwrap();
    }
}
