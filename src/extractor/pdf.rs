//! PDF 텍스트 추출 모듈
//!
//! pdf-extract 크레이트를 사용하여 메모리 상의 PDF에서 텍스트를 추출합니다.

use super::{DocumentFormat, ExtractError};

/// PDF에서 페이지별 텍스트 추출
///
/// 페이지 순서대로 텍스트 벡터를 반환합니다.
/// 텍스트가 없는 페이지는 빈 문자열로 남습니다 (에러 아님).
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Parse {
        format: DocumentFormat::Pdf,
        message: e.to_string(),
    })?;

    // 텍스트가 비어있으면 경고
    if text.trim().is_empty() {
        tracing::warn!("No text extracted from PDF. It might be a scanned document.");
        return Ok(vec![String::new()]);
    }

    let pages = split_pdf_pages(&text);
    tracing::debug!("PDF split into {} pages", pages.len());
    Ok(pages)
}

/// PDF 텍스트를 페이지별로 분리
///
/// 폼피드 문자(`\x0c`)만 페이지 경계로 취급합니다.
/// 빈 페이지는 빈 문자열로 유지하고, 구분자가 없으면 전체가 한 페이지입니다.
fn split_pdf_pages(text: &str) -> Vec<String> {
    // 마지막 페이지 뒤의 폼피드는 페이지 구분자가 아님
    text.trim_end()
        .split('\x0c')
        .map(|s| s.trim().to_string())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
