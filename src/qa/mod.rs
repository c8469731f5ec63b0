//! QA 모듈 - 문서 기반 질의응답
//!
//! - Tokenizer: 문장 분리 + 단어 토큰화
//! - Scorer: 키워드 겹침으로 문장 순위화
//! - Composer: 상위 문장으로 답변 조합
//! - Answerer: 답변 전략 트레이트 (키워드 / LLM)

mod composer;
mod scorer;
mod tokenizer;

use anyhow::Result;
use async_trait::async_trait;

use crate::extractor::Document;

// Re-exports
pub use composer::{
    compose, Answer, AnswerComposer, AnswerConfig, DEFAULT_MAX_SENTENCES, MISSING_INPUT_MESSAGE,
    NO_MATCH_MESSAGE,
};
pub use scorer::{score, RelevanceScorer, ScoredSentence};
pub use tokenizer::{
    split_sentences, PunctuationTrimTokenizer, SentenceUnit, Tokenizer, WhitespaceTokenizer,
};

// ============================================================================
// Answerer Trait
// ============================================================================

/// 답변 전략 트레이트
///
/// 문서와 질문을 받아 답변을 돌려주는 인터페이스입니다.
/// 구현체는 호출 간 상태를 갖지 않습니다.
#[async_trait]
pub trait Answerer: Send + Sync {
    /// 질문에 대한 답변 생성
    async fn answer<'a>(&self, document: &'a Document, question: &str) -> Result<Answer<'a>>;

    /// 전략 이름
    fn name(&self) -> &str;
}

// ============================================================================
// KeywordAnswerer
// ============================================================================

/// 키워드 겹침 기반 답변기 (오프라인, 실패하지 않음)
#[derive(Debug, Clone, Default)]
pub struct KeywordAnswerer<T: Tokenizer = WhitespaceTokenizer> {
    composer: AnswerComposer<T>,
}

impl KeywordAnswerer<WhitespaceTokenizer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Tokenizer> KeywordAnswerer<T> {
    pub fn with_composer(composer: AnswerComposer<T>) -> Self {
        Self { composer }
    }

    /// 동기 버전 (런타임 없이 호출 가능)
    pub fn answer_sync<'a>(&self, document: &'a Document, question: &str) -> Answer<'a> {
        self.composer.compose_answer(document.as_str(), question)
    }
}

#[async_trait]
impl<T: Tokenizer> Answerer for KeywordAnswerer<T> {
    async fn answer<'a>(&self, document: &'a Document, question: &str) -> Result<Answer<'a>> {
        Ok(self.answer_sync(document, question))
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_answerer() {
        let answerer = KeywordAnswerer::new();
        let doc = Document::new("Cats are mammals. Dogs are mammals.");

        let answer = answerer.answer(&doc, "mammals").await.unwrap();
        assert_eq!(answer.text(), "Cats are mammals. Dogs are mammals.");
        assert_eq!(answerer.name(), "keyword");
    }

    #[tokio::test]
    async fn test_keyword_answerer_as_trait_object() {
        let answerer: Box<dyn Answerer> = Box::new(KeywordAnswerer::with_composer(
            AnswerComposer::with_parts(
                RelevanceScorer::with_tokenizer(PunctuationTrimTokenizer),
                AnswerConfig::default(),
            ),
        ));
        let doc = Document::new("The sky is blue. Grass is green. Water is wet.");

        let answer = answerer.answer(&doc, "What color is grass?").await.unwrap();
        assert_eq!(answer.sources()[0].text(), "Grass is green");
    }

    #[tokio::test]
    async fn test_keyword_answerer_empty_document() {
        let doc = Document::empty();
        let answer = KeywordAnswerer::new()
            .answer(&doc, "anything")
            .await
            .unwrap();
        assert_eq!(answer, Answer::MissingInput);
        assert!(!answer.is_found());
    }
}
