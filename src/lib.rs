//! palank-docqa - 로컬 문서 질의응답
//!
//! PDF / TXT / DOCX 파일에서 텍스트를 추출하고,
//! 키워드 겹침 매칭 또는 Gemini LLM으로 질문에 답합니다.
//!
//! 추출 → 스코어링 → 답변 조합 순서로 동작하며,
//! 각 단계는 호출 간 상태를 갖지 않습니다.

pub mod cli;
pub mod extractor;
pub mod llm;
pub mod logging;
pub mod qa;
pub mod upload;

// Re-exports
pub use extractor::{
    extract, extract_declared, ContentMetadata, Document, DocumentFormat, ExtractError,
    ExtractedContent,
};
pub use llm::{get_api_key, has_api_key, GeminiAnswerer, GeminiConfig};
pub use qa::{
    compose, score, Answer, AnswerComposer, AnswerConfig, Answerer, KeywordAnswerer,
    PunctuationTrimTokenizer, RelevanceScorer, ScoredSentence, SentenceUnit, Tokenizer,
    WhitespaceTokenizer,
};
pub use upload::{Upload, UploadConfig};
