//! DOCX 텍스트 추출 모듈
//!
//! docx-rs 크레이트로 문서 트리를 순회하며 문단 텍스트를 추출합니다.
//!
//! 트리 구조: Document → Paragraph → Run → Text

use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};

use super::{DocumentFormat, ExtractError};

/// DOCX에서 문단별 텍스트 추출
///
/// 문서 순서대로 문단 텍스트를 반환합니다. 빈 문단도 그대로 유지합니다.
/// 표, 이미지 등 문단이 아닌 노드는 건너뜁니다.
pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let docx = read_docx(bytes).map_err(|e| ExtractError::Parse {
        format: DocumentFormat::Docx,
        message: format!("{:?}", e),
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    tracing::debug!("DOCX contains {} paragraphs", paragraphs.len());
    Ok(paragraphs)
}

/// 문단 하나의 텍스트 (Run 사이에는 구분자 없음)
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();

    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }

    text
}

// ============================================================================
// Tests
// ============================================================================
