//! 콘텐츠 추출 모듈
//!
//! 업로드된 파일 바이트를 평문 텍스트(`Document`)로 변환합니다.
//! - TXT: UTF-8 디코딩 (실패 시 에러 전파)
//! - PDF: pdf-extract로 페이지별 추출 후 줄바꿈으로 결합
//! - DOCX: docx-rs로 문단별 추출 후 줄바꿈으로 결합
//!
//! 파서 라이브러리 실패는 에러로 전파하지 않고 빈 문서로 강등합니다.
//! 호출자는 `Document::is_empty()`로 추출 실패를 확인해야 합니다.

pub mod docx;
pub mod pdf;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

// ============================================================================
// Document Format
// ============================================================================

/// 지원하는 문서 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// PDF 문서
    Pdf,
    /// UTF-8 텍스트
    Txt,
    /// Word 문서 (Office Open XML)
    Docx,
}

impl DocumentFormat {
    /// 지원 형식 전체 (표시 순서)
    pub const ALL: [DocumentFormat; 3] = [Self::Pdf, Self::Txt, Self::Docx];

    /// 확장자로 형식 결정
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// 파일 경로(이름)의 확장자로 형식 결정
    ///
    /// 확장자가 없거나 지원하지 않으면 `UnsupportedFormat`을 반환합니다.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        Self::from_extension(ext).ok_or_else(|| {
            ExtractError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                ext.to_string()
            })
        })
    }

    /// 형식 태그 (소문자 확장자)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().trim_start_matches('.');
        Self::from_extension(tag).ok_or_else(|| ExtractError::UnsupportedFormat(s.to_string()))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// 추출 에러
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 지원하지 않는 확장자 (재시도 없음)
    #[error("Unsupported file format: {0} (supported: pdf, txt, docx)")]
    UnsupportedFormat(String),

    /// 텍스트 인코딩 오류 (재시도 없음)
    #[error("Failed to decode text as UTF-8: {0}")]
    Decoding(#[from] std::str::Utf8Error),

    /// 파서 라이브러리 실패 (빈 문서로 강등됨)
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        format: DocumentFormat,
        message: String,
    },
}

// ============================================================================
// Document
// ============================================================================

/// 추출된 문서 텍스트 (불변)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 빈 문서 (추출 실패)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 추출 실패 여부 (공백만 있어도 비어있는 것으로 간주)
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// 문자 수
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

// ============================================================================
// Extracted Content
// ============================================================================

/// 추출된 콘텐츠
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// 추출된 문서
    pub document: Document,
    /// 원본 파일 형식
    pub source_format: DocumentFormat,
    /// 메타데이터
    pub metadata: ContentMetadata,
}

/// 콘텐츠 메타데이터
#[derive(Debug, Clone, Default)]
pub struct ContentMetadata {
    /// 총 페이지 수 (PDF)
    pub total_pages: Option<usize>,
    /// 총 문단 수 (DOCX)
    pub total_paragraphs: Option<usize>,
    /// 파서 실패 메시지 (빈 문서로 강등된 경우)
    pub parse_error: Option<String>,
}

impl ExtractedContent {
    fn degraded(format: DocumentFormat, error: ExtractError) -> Self {
        tracing::warn!("{} extraction degraded to empty document: {}", format, error);
        Self {
            document: Document::empty(),
            source_format: format,
            metadata: ContentMetadata {
                parse_error: Some(error.to_string()),
                ..Default::default()
            },
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// 파일 바이트에서 텍스트 추출
///
/// `UnsupportedFormat`, `Decoding`만 에러로 반환합니다.
/// PDF/DOCX 파서 실패는 빈 문서 + `metadata.parse_error`로 반환됩니다.
pub fn extract(bytes: &[u8], format: DocumentFormat) -> Result<ExtractedContent, ExtractError> {
    let content = match format {
        DocumentFormat::Txt => {
            let text = std::str::from_utf8(bytes)?;
            ExtractedContent {
                document: Document::new(text),
                source_format: format,
                metadata: ContentMetadata::default(),
            }
        }
        DocumentFormat::Pdf => match pdf::extract_pages(bytes) {
            Ok(pages) => ExtractedContent {
                document: Document::new(pages.join("\n")),
                source_format: format,
                metadata: ContentMetadata {
                    total_pages: Some(pages.len()),
                    ..Default::default()
                },
            },
            Err(e) => ExtractedContent::degraded(format, e),
        },
        DocumentFormat::Docx => match docx::extract_paragraphs(bytes) {
            Ok(paragraphs) => ExtractedContent {
                document: Document::new(paragraphs.join("\n")),
                source_format: format,
                metadata: ContentMetadata {
                    total_paragraphs: Some(paragraphs.len()),
                    ..Default::default()
                },
            },
            Err(e) => ExtractedContent::degraded(format, e),
        },
    };

    tracing::debug!(
        "Extracted {} chars from {} document",
        content.document.char_count(),
        format
    );

    Ok(content)
}

/// 형식 태그 문자열로 추출 (`"pdf" | "txt" | "docx"`)
pub fn extract_declared(bytes: &[u8], declared_format: &str) -> Result<ExtractedContent, ExtractError> {
    let format: DocumentFormat = declared_format.parse()?;
    extract(bytes, format)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("TXT"), Some(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_extension("Docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("doc"), None);
        assert_eq!(DocumentFormat::from_extension("md"), None);
    }

    #[test]
    fn test_format_from_path_unsupported() {
        let err = DocumentFormat::from_path(Path::new("notes.xyz")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ref ext) if ext == "xyz"));

        let err = DocumentFormat::from_path(Path::new("README")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("pdf".parse::<DocumentFormat>().unwrap(), DocumentFormat::Pdf);
        assert_eq!(".docx".parse::<DocumentFormat>().unwrap(), DocumentFormat::Docx);
        assert!("xyz".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_extract_txt() {
        let content = extract("The sky is blue.".as_bytes(), DocumentFormat::Txt).unwrap();
        assert_eq!(content.document.as_str(), "The sky is blue.");
        assert_eq!(content.source_format, DocumentFormat::Txt);
        assert!(content.metadata.parse_error.is_none());
    }

    #[test]
    fn test_extract_txt_invalid_utf8() {
        let result = extract(&[0x66, 0x6f, 0xff, 0xfe], DocumentFormat::Txt);
        assert!(matches!(result, Err(ExtractError::Decoding(_))));
    }

    #[test]
    fn test_extract_declared_unsupported() {
        let result = extract_declared(b"whatever", "xyz");
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extract_corrupt_pdf_degrades_to_empty() {
        let content = extract(b"definitely not a pdf", DocumentFormat::Pdf).unwrap();
        assert!(content.document.is_empty());
        assert!(content.metadata.parse_error.is_some());
    }

    #[test]
    fn test_extract_corrupt_docx_degrades_to_empty() {
        let content = extract(b"definitely not a zip", DocumentFormat::Docx).unwrap();
        assert!(content.document.is_empty());
        let message = content.metadata.parse_error.unwrap();
        assert!(message.contains("docx"));
    }

    #[test]
    fn test_document_is_empty() {
        assert!(Document::empty().is_empty());
        assert!(Document::new("  \n\t").is_empty());
        assert!(!Document::new("x").is_empty());
    }
}
