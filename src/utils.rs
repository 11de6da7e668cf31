use crate::error::DataStoryError;
use log::info;
use std::path::Path;

/// Decodes raw file bytes as UTF-8, falling back to Latin-1 when the bytes are not valid UTF-8.
///
/// Latin-1 maps every byte to the code point of the same value, so the fallback never fails.
pub(crate) fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

pub fn ensure_dir_exists(path: &Path) -> Result<(), DataStoryError> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(DataStoryError::OutputDirCreation(
            path.to_path_buf(),
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "output path exists but is not a directory",
            ),
        )),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| DataStoryError::OutputDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(DataStoryError::OutputDirCreation(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_keeps_utf8() {
        let text = decode_text("Zürich,1.0".as_bytes().to_vec());
        assert_eq!(text, "Zürich,1.0");
    }

    #[test]
    fn test_decode_text_falls_back_to_latin1() {
        // 0xFC is 'ü' in Latin-1 and an invalid lone byte in UTF-8
        let text = decode_text(vec![b'Z', 0xFC, b'r', b'i', b'c', b'h']);
        assert_eq!(text, "Zürich");
    }

    #[test]
    fn test_ensure_dir_exists_creates_nested() -> Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let nested = root.path().join("charts").join("traffic");
        ensure_dir_exists(&nested)?;
        assert!(nested.is_dir());
        // Second call is a no-op
        ensure_dir_exists(&nested)?;
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() -> Result<(), Box<dyn std::error::Error>> {
        let file = tempfile::NamedTempFile::new()?;
        let result = ensure_dir_exists(file.path());
        assert!(matches!(result, Err(DataStoryError::OutputDirCreation(..))));
        Ok(())
    }
}
