//! 문장 분리 / 단어 토큰화
//!
//! 문장 분리는 마침표(`.`) 기준의 단순 분리입니다.
//! 약어나 소수점 등 문장 내부의 마침표는 처리하지 않습니다 (알려진 한계).

use std::collections::HashSet;

// ============================================================================
// Sentence Units
// ============================================================================

/// 문서에서 분리된 문장 (위치 기반 식별)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceUnit<'a> {
    /// 문서 내 문장 순번 (0부터, 빈 조각 제외 후 기준)
    pub position: usize,
    /// 앞뒤 공백이 제거된 문장 텍스트
    pub text: &'a str,
}

/// 문서를 문장 단위로 분리
///
/// `.`로 나누고, 각 조각을 trim한 뒤 빈 조각은 버립니다.
/// 마침표가 없으면 trim된 전체 텍스트가 하나의 문장이 됩니다.
pub fn split_sentences(document: &str) -> Vec<SentenceUnit<'_>> {
    document
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(position, text)| SentenceUnit { position, text })
        .collect()
}

// ============================================================================
// Tokenizer Trait
// ============================================================================

/// 단어 토큰화 전략 트레이트
///
/// 스코어러 내부 헬퍼를 교체하기 위한 지점입니다.
/// 어떤 구현이든 스코어러의 계약은 바뀌지 않습니다.
pub trait Tokenizer: Send + Sync {
    /// 텍스트를 고유 단어 집합으로 변환
    fn word_set(&self, text: &str) -> HashSet<String>;

    /// 토크나이저 이름
    fn name(&self) -> &'static str;
}

/// 기본 토크나이저: 소문자화 + 공백 분리
///
/// 구두점은 단어에 붙은 채로 남습니다 (`grass?` ≠ `grass`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn word_set(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

/// 구두점 제거 토크나이저
///
/// 공백 분리 후 각 단어의 앞뒤에서 영숫자가 아닌 문자를 제거합니다.
/// 단어 내부의 구두점(`don't`, `e-mail`)은 유지합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationTrimTokenizer;

impl Tokenizer for PunctuationTrimTokenizer {
    fn word_set(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn name(&self) -> &'static str {
        "punctuation-trim"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let units = split_sentences("  The sky is blue. Grass is green.. Water is wet. ");
        let texts: Vec<&str> = units.iter().map(|u| u.text).collect();
        assert_eq!(texts, vec!["The sky is blue", "Grass is green", "Water is wet"]);
        assert_eq!(units[2].position, 2);
    }

    #[test]
    fn test_split_sentences_without_period() {
        let units = split_sentences("\n  no delimiter at all  \n");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "no delimiter at all");
    }

    #[test]
    fn test_split_sentences_naive_decimal() {
        // 소수점도 문장 경계로 취급됨
        let units = split_sentences("Pi is 3.14");
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].text, "14");
    }

    #[test]
    fn test_split_sentences_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" . .. ").is_empty());
    }

    #[test]
    fn test_whitespace_tokenizer_keeps_punctuation() {
        let words = WhitespaceTokenizer.word_set("What color is Grass?");
        assert!(words.contains("grass?"));
        assert!(!words.contains("grass"));
        assert_eq!(words.len(), 4);
    }

    #[test]
    fn test_whitespace_tokenizer_dedup() {
        let words = WhitespaceTokenizer.word_set("the THE The");
        assert_eq!(words.len(), 1);
        assert!(WhitespaceTokenizer.word_set("   \t\n").is_empty());
    }

    #[test]
    fn test_punctuation_trim_tokenizer() {
        let words = PunctuationTrimTokenizer.word_set("What color is grass? (don't) ...");
        assert!(words.contains("grass"));
        assert!(words.contains("don't"));
        assert!(!words.contains("..."));
        assert!(!words.contains(""));
        assert_eq!(words.len(), 5);
    }
}
