//! 문장 관련도 스코어러
//!
//! 질문 단어 집합과 문장 단어 집합의 교집합 비율로 문장을 순위화합니다.
//!
//! score = |질문 단어 ∩ 문장 단어| / |질문 단어|

use super::tokenizer::{split_sentences, SentenceUnit, Tokenizer, WhitespaceTokenizer};

/// 점수가 매겨진 문장
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredSentence<'a> {
    pub sentence: SentenceUnit<'a>,
    /// 0 < score <= 1
    pub score: f64,
}

impl<'a> ScoredSentence<'a> {
    pub fn text(&self) -> &'a str {
        self.sentence.text
    }
}

/// 키워드 겹침 스코어러
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer<T: Tokenizer = WhitespaceTokenizer> {
    tokenizer: T,
}

impl RelevanceScorer<WhitespaceTokenizer> {
    /// 기본 토크나이저로 생성
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Tokenizer> RelevanceScorer<T> {
    /// 토크나이저를 지정하여 생성
    pub fn with_tokenizer(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }

    /// 문서의 문장들을 질문과의 겹침 점수로 순위화
    ///
    /// 겹침이 없는 문장은 결과에서 제외됩니다.
    /// 점수 내림차순, 동점은 문서 순서 유지 (안정 정렬).
    pub fn score<'a>(&self, document: &'a str, question: &str) -> Vec<ScoredSentence<'a>> {
        let question_words = self.tokenizer.word_set(question);
        if question_words.is_empty() {
            return Vec::new();
        }
        let total = question_words.len() as f64;

        let mut scored: Vec<ScoredSentence<'a>> = split_sentences(document)
            .into_iter()
            .filter_map(|sentence| {
                let sentence_words = self.tokenizer.word_set(sentence.text);
                let overlap = question_words.intersection(&sentence_words).count();
                (overlap > 0).then(|| ScoredSentence {
                    sentence,
                    score: overlap as f64 / total,
                })
            })
            .collect();

        // sort_by는 안정 정렬
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            "Scored {} matching sentences ({} question words, tokenizer: {})",
            scored.len(),
            question_words.len(),
            self.tokenizer.name()
        );

        scored
    }
}

/// 기본 토크나이저로 문장 순위화
pub fn score<'a>(document: &'a str, question: &str) -> Vec<ScoredSentence<'a>> {
    RelevanceScorer::new().score(document, question)
}

// ============================================================================
// Tests
// ============================================================================
