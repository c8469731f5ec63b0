//! 답변 조합기
//!
//! 상위 문장을 골라 최종 답변 문자열을 만듭니다.

use std::fmt;

use super::scorer::{RelevanceScorer, ScoredSentence};
use super::tokenizer::{Tokenizer, WhitespaceTokenizer};

/// 문서 또는 질문이 비어있을 때의 안내 문구
pub const MISSING_INPUT_MESSAGE: &str = "Please upload a document and ask a question.";

/// 관련 문장이 없을 때의 안내 문구
pub const NO_MATCH_MESSAGE: &str = "I couldn't find specific information related to your question in the document. Try rephrasing your question or check if the document contains the information you're looking for.";

/// 답변에 포함할 기본 최대 문장 수
pub const DEFAULT_MAX_SENTENCES: usize = 3;

// ============================================================================
// Answer
// ============================================================================

/// 질의 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Answer<'a> {
    /// 키워드 매칭으로 선택된 문장들 (점수 순)
    Sentences(Vec<ScoredSentence<'a>>),
    /// 외부 전략(LLM)이 생성한 답변
    Generated(String),
    /// 겹치는 문장 없음
    NoMatch,
    /// 문서 또는 질문 누락
    MissingInput,
}

impl Answer<'_> {
    /// 사용자에게 보여줄 답변 텍스트
    pub fn text(&self) -> String {
        match self {
            Answer::Sentences(sentences) => {
                let joined = sentences
                    .iter()
                    .map(|s| s.text())
                    .collect::<Vec<_>>()
                    .join(". ");
                format!("{}.", joined)
            }
            Answer::Generated(text) => text.clone(),
            Answer::NoMatch => NO_MATCH_MESSAGE.to_string(),
            Answer::MissingInput => MISSING_INPUT_MESSAGE.to_string(),
        }
    }

    /// 근거 문장 (키워드 매칭일 때만)
    pub fn sources(&self) -> &[ScoredSentence<'_>] {
        match self {
            Answer::Sentences(sentences) => sentences,
            _ => &[],
        }
    }

    /// 실제 답변을 찾았는지 여부
    pub fn is_found(&self) -> bool {
        matches!(self, Answer::Sentences(_) | Answer::Generated(_))
    }
}

impl fmt::Display for Answer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

// ============================================================================
// Composer
// ============================================================================

/// 답변 조합 설정
#[derive(Debug, Clone)]
pub struct AnswerConfig {
    /// 답변에 포함할 최대 문장 수 (0은 1로 취급)
    pub max_sentences: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_MAX_SENTENCES,
        }
    }
}

/// 답변 조합기
#[derive(Debug, Clone, Default)]
pub struct AnswerComposer<T: Tokenizer = WhitespaceTokenizer> {
    scorer: RelevanceScorer<T>,
    config: AnswerConfig,
}

impl AnswerComposer<WhitespaceTokenizer> {
    /// 기본 설정으로 생성
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Tokenizer> AnswerComposer<T> {
    pub fn with_parts(scorer: RelevanceScorer<T>, config: AnswerConfig) -> Self {
        Self { scorer, config }
    }

    pub fn config(&self) -> &AnswerConfig {
        &self.config
    }

    pub fn tokenizer_name(&self) -> &'static str {
        self.scorer.tokenizer_name()
    }

    /// 문서와 질문으로 답변 생성
    pub fn compose_answer<'a>(&self, document: &'a str, question: &str) -> Answer<'a> {
        if document.is_empty() || question.trim().is_empty() {
            return Answer::MissingInput;
        }

        let mut scored = self.scorer.score(document, question);
        if scored.is_empty() {
            return Answer::NoMatch;
        }

        // 최소 한 문장은 포함 (0이면 빈 답변이 됨)
        scored.truncate(self.config.max_sentences.max(1));
        Answer::Sentences(scored)
    }

    /// 답변 문자열 생성
    pub fn compose(&self, document: &str, question: &str) -> String {
        self.compose_answer(document, question).text()
    }
}

/// 기본 설정으로 답변 문자열 생성
pub fn compose(document: &str, question: &str) -> String {
    AnswerComposer::new().compose(document, question)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::tokenizer::{split_sentences, PunctuationTrimTokenizer};

    #[test]
    fn test_compose_missing_input() {
        assert_eq!(compose("", "anything"), MISSING_INPUT_MESSAGE);
        assert_eq!(compose("Some document.", ""), MISSING_INPUT_MESSAGE);
        assert_eq!(compose("Some document.", "  \t "), MISSING_INPUT_MESSAGE);
    }

    #[test]
    fn test_compose_no_match() {
        let answer = compose("The sky is blue.", "quantum chromodynamics");
        assert_eq!(answer, NO_MATCH_MESSAGE);
    }

    #[test]
    fn test_compose_tie_break_document_order() {
        let answer = compose("Cats are mammals. Dogs are mammals.", "mammals");
        assert_eq!(answer, "Cats are mammals. Dogs are mammals.");
    }

    #[test]
    fn test_compose_limits_to_three_sentences() {
        let doc = "one fish. two fish. red fish. blue fish. fish fish.";
        let answer = AnswerComposer::new().compose_answer(doc, "fish");
        assert_eq!(answer.sources().len(), 3);
        assert_eq!(answer.text(), "one fish. two fish. red fish.");
    }

    #[test]
    fn test_compose_fewer_than_three() {
        let answer = compose("Apples are red. Bananas are yellow.", "apples");
        assert_eq!(answer, "Apples are red.");
    }

    #[test]
    fn test_compose_without_period() {
        let answer = compose("  a single line about rust  ", "rust");
        assert_eq!(answer, "a single line about rust.");
    }

    #[test]
    fn test_compose_sentences_are_verbatim() {
        let doc = "The sky is blue. Grass is green. Water is wet. Fire is hot.";
        let units: Vec<&str> = split_sentences(doc).iter().map(|u| u.text).collect();
        let answer = AnswerComposer::new().compose_answer(doc, "is grass wet");
        assert!(answer.is_found());
        for source in answer.sources() {
            assert!(units.contains(&source.text()));
        }
    }

    #[test]
    fn test_compose_end_to_end_with_punctuation_trim() {
        let composer = AnswerComposer::with_parts(
            RelevanceScorer::with_tokenizer(PunctuationTrimTokenizer),
            AnswerConfig::default(),
        );
        let doc = "The sky is blue. Grass is green. Water is wet.";
        let answer = composer.compose_answer(doc, "What color is grass?");

        let best = answer.sources()[0];
        assert_eq!(best.text(), "Grass is green");
        assert!((best.score - 0.5).abs() < 1e-9);
        assert!(answer.text().starts_with("Grass is green."));
    }

    #[test]
    fn test_compose_is_idempotent() {
        let doc = "Rust has ownership. Ownership prevents races. Borrowing is checked.";
        let q = "how does ownership work";
        assert_eq!(compose(doc, q), compose(doc, q));
    }

    #[test]
    fn test_compose_custom_max_sentences() {
        let composer = AnswerComposer::with_parts(
            RelevanceScorer::new(),
            AnswerConfig { max_sentences: 1 },
        );
        let answer = composer.compose("Cats are mammals. Dogs are mammals.", "mammals");
        assert_eq!(answer, "Cats are mammals.");
    }

    #[test]
    fn test_compose_zero_max_sentences_keeps_one() {
        let composer = AnswerComposer::with_parts(
            RelevanceScorer::new(),
            AnswerConfig { max_sentences: 0 },
        );
        let answer = composer.compose_answer("Cats are mammals. Dogs are mammals.", "mammals");
        assert!(answer.is_found());
        assert_eq!(answer.sources().len(), 1);
        assert_eq!(answer.text(), "Cats are mammals.");
    }
}
