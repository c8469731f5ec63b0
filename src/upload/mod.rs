//! 파일 업로드 모듈
//!
//! 로컬 파일 또는 메모리 바이트를 추출기에 넘길 업로드 단위로 만듭니다.
//! 확장자로 형식을 결정하며, 지원하지 않는 형식은 바이트를 읽기 전에 거부합니다.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::extractor::{self, DocumentFormat, ExtractError, ExtractedContent};

// ============================================================================
// Upload Config
// ============================================================================

/// 업로드 설정
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// 최대 파일 크기 (바이트, 0이면 제한 없음)
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

// ============================================================================
// Upload
// ============================================================================

/// 업로드된 파일
#[derive(Debug, Clone)]
pub struct Upload {
    /// 파일 이름 (경로 제외)
    pub file_name: String,
    /// 원본 경로 (메모리 업로드는 None)
    pub path: Option<PathBuf>,
    /// 확장자로 결정된 형식
    pub format: DocumentFormat,
    /// 원본 바이트
    pub bytes: Vec<u8>,
}

impl Upload {
    /// 메모리 바이트로 생성
    ///
    /// `file_name`의 확장자로 형식을 결정합니다.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ExtractError> {
        let file_name = file_name.into();
        let format = DocumentFormat::from_path(Path::new(&file_name))?;

        Ok(Self {
            file_name,
            path: None,
            format,
            bytes,
        })
    }

    /// 로컬 파일에서 생성
    pub fn from_path(path: &Path, config: &UploadConfig) -> Result<Self> {
        let abs_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !abs_path.exists() {
            anyhow::bail!("File not found: {:?}", abs_path);
        }

        // 메타데이터 읽기
        let metadata = std::fs::metadata(&abs_path)
            .with_context(|| format!("Failed to read metadata: {:?}", abs_path))?;

        if !metadata.is_file() {
            anyhow::bail!("Not a file: {:?}", abs_path);
        }

        // 형식 확인 (바이트 읽기 전)
        let format = DocumentFormat::from_path(&abs_path)?;

        // 파일 크기 제한
        if config.max_file_size > 0 && metadata.len() > config.max_file_size {
            anyhow::bail!(
                "File too large: {:?} ({} bytes, limit {} bytes)",
                abs_path,
                metadata.len(),
                config.max_file_size
            );
        }

        let bytes = std::fs::read(&abs_path)
            .with_context(|| format!("Failed to read file: {:?}", abs_path))?;

        let file_name = abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        tracing::info!("Uploaded {} ({} bytes, {})", file_name, bytes.len(), format);

        Ok(Self {
            file_name,
            path: Some(abs_path),
            format,
            bytes,
        })
    }

    /// 크기 (바이트)
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// 텍스트 추출
    pub fn extract(&self) -> Result<ExtractedContent, ExtractError> {
        extractor::extract(&self.bytes, self.format)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_upload_config_default() {
        let config = UploadConfig::default();
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_from_bytes_resolves_format() {
        let upload = Upload::from_bytes("Report.PDF", vec![1, 2, 3]).unwrap();
        assert_eq!(upload.format, DocumentFormat::Pdf);
        assert_eq!(upload.size(), 3);
        assert!(upload.path.is_none());
    }

    #[test]
    fn test_from_bytes_unsupported() {
        let result = Upload::from_bytes("data.xyz", b"hello".to_vec());
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_from_path_txt_and_extract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "Cats are mammals. Dogs are mammals.").unwrap();

        let upload = Upload::from_path(&path, &UploadConfig::default()).unwrap();
        assert_eq!(upload.file_name, "notes.txt");
        assert_eq!(upload.format, DocumentFormat::Txt);

        let content = upload.extract().unwrap();
        assert_eq!(content.document.as_str(), "Cats are mammals. Dogs are mammals.");
    }

    #[test]
    fn test_from_path_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.xyz");
        std::fs::write(&path, b"irrelevant").unwrap();

        let err = Upload::from_path(&path, &UploadConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractError>(),
            Some(ExtractError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_path_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, "x".repeat(64)).unwrap();

        let config = UploadConfig { max_file_size: 16 };
        let err = Upload::from_path(&path, &config).unwrap_err();
        assert!(err.to_string().contains("File too large"));

        let unlimited = UploadConfig { max_file_size: 0 };
        assert!(Upload::from_path(&path, &unlimited).is_ok());
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Upload::from_path(&dir.path().join("missing.txt"), &UploadConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = Upload::from_path(dir.path(), &UploadConfig::default());
        assert!(result.unwrap_err().to_string().contains("Not a file"));
    }
}
