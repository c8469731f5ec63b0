//! LLM 모듈 - Gemini API를 통한 문서 질의응답
//!
//! 키워드 매칭 대신 문서 전체와 질문을 Gemini `generateContent`에 보내
//! 답변을 생성하는 `Answerer` 구현체입니다.
//! API 키가 설정된 경우에만 사용할 수 있습니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let answerer = GeminiAnswerer::from_env()?;
//! let answer = answerer.answer(&document, "What is this document about?").await?;
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::extractor::Document;
use crate::qa::{Answer, Answerer};

// ============================================================================
// Configuration
// ============================================================================

/// Gemini API 베이스 URL
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// 기본 모델
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// 일시적 에러 시 최대 재시도 횟수
const MAX_RETRIES: u32 = 3;
/// 재시도 시 초기 백오프 (ms)
const INITIAL_BACKOFF_MS: u64 = 2000;

/// Gemini 답변기 설정
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API 베이스 URL (모델 경로 앞부분)
    pub api_base: String,
    /// 모델 이름 (예: gemini-2.0-flash)
    pub model: String,
    /// 프롬프트에 넣을 문서 최대 문자 수
    pub max_document_chars: usize,
    /// 요청 타임아웃
    pub timeout: Duration,
    /// 샘플링 온도
    pub temperature: f32,
    /// 최대 출력 토큰
    pub max_output_tokens: u32,
    /// 첫 재시도 전 대기 시간 (시도마다 2배)
    pub initial_backoff: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_document_chars: 200_000,
            timeout: Duration::from_secs(60),
            temperature: 0.1,
            max_output_tokens: 2048,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }
}

// ============================================================================
// Gemini Answerer
// ============================================================================

/// Gemini 기반 답변기
#[derive(Debug)]
pub struct GeminiAnswerer {
    api_key: String,
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAnswerer {
    /// API 키와 설정으로 생성
    pub fn new(api_key: String, config: GeminiConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            anyhow::bail!("Model name must not be empty");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            client,
            config,
        })
    }

    /// 환경변수에서 API 키를 읽어 기본 설정으로 생성
    ///
    /// 우선순위: GEMINI_API_KEY > GOOGLE_AI_API_KEY
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_config(GeminiConfig::default())
    }

    /// 환경변수에서 API 키를 읽어 설정 지정하여 생성
    pub fn from_env_with_config(config: GeminiConfig) -> Result<Self> {
        let api_key = get_api_key()?;
        Self::new(api_key, config)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// 요청 본문 구성
    fn build_request(&self, document: &str, question: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![GeneratePart {
                    text: build_prompt(document, question, self.config.max_document_chars),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }

    /// generateContent 호출 (일시적 에러 시 지수 백오프 재시도)
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let url = self.endpoint();
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 0..=MAX_RETRIES {
            let backoff = self.config.initial_backoff * 2u32.pow(attempt);
            let can_retry = attempt < MAX_RETRIES;

            // API 키는 URL이 아닌 헤더로 전송
            let response = match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(request)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = Some(anyhow::anyhow!("Failed to send generate request: {}", e));
                    if can_retry {
                        tracing::warn!(
                            "Request failed, retrying in {:?} (attempt {}/{})",
                            backoff,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }
                    break;
                }
            };

            let status = response.status();
            let body = response
                .text()
                .await
                .context("Failed to read response body")?;

            match classify_response(status, &body) {
                ResponseAction::Success => {
                    let parsed: GenerateResponse = serde_json::from_str(&body)
                        .context("Failed to parse generate response")?;
                    return Ok(parsed.into_text());
                }
                ResponseAction::Retry => {
                    last_error = Some(anyhow::anyhow!("Gemini API error ({})", status));
                    if can_retry {
                        tracing::warn!(
                            "Gemini returned {}, backing off {:?} (attempt {}/{})",
                            status,
                            backoff,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(backoff).await;
                    }
                }
                ResponseAction::Fail(message) => anyhow::bail!(message),
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow::anyhow!("Generation failed after {} retries", MAX_RETRIES)))
    }
}

/// HTTP 응답 처리 방식
#[derive(Debug, PartialEq, Eq)]
enum ResponseAction {
    Success,
    /// 429 / 5xx
    Retry,
    /// 그 외 - 즉시 실패 (에러 메시지 포함)
    Fail(String),
}

/// 상태 코드와 본문으로 처리 방식 결정
fn classify_response(status: reqwest::StatusCode, body: &str) -> ResponseAction {
    if status.is_success() {
        return ResponseAction::Success;
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return ResponseAction::Retry;
    }

    let message = match serde_json::from_str::<GeminiError>(body) {
        Ok(GeminiError { error }) if !error.status.is_empty() => {
            format!("Gemini API error ({}): {}", error.status, error.message)
        }
        Ok(GeminiError { error }) => format!("Gemini API error ({}): {}", status, error.message),
        Err(_) => format!("Gemini API error ({}): {}", status, body),
    };
    ResponseAction::Fail(message)
}

#[async_trait]
impl Answerer for GeminiAnswerer {
    async fn answer<'a>(&self, document: &'a Document, question: &str) -> Result<Answer<'a>> {
        // 키워드 답변기와 동일한 입력 검증
        if document.as_str().is_empty() || question.trim().is_empty() {
            return Ok(Answer::MissingInput);
        }

        let request = self.build_request(document.as_str(), question);
        tracing::info!(
            "Querying {} ({} document chars)",
            self.config.model,
            document.char_count()
        );

        let text = self.generate(&request).await?;
        let text = text.trim();

        if text.is_empty() {
            tracing::warn!("Gemini returned an empty answer");
            return Ok(Answer::NoMatch);
        }

        if text.starts_with(NOT_FOUND_REPLY) {
            return Ok(Answer::NoMatch);
        }

        Ok(Answer::Generated(text.to_string()))
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// Prompt
// ============================================================================

/// 문서와 질문으로 프롬프트 구성
///
/// 문서가 `max_chars`를 넘으면 문자 단위로 잘라냅니다 (UTF-8 안전).
fn build_prompt(document: &str, question: &str, max_chars: usize) -> String {
    let excerpt: String = document.chars().take(max_chars).collect();
    let truncated = excerpt.len() < document.len();
    if truncated {
        tracing::debug!("Document truncated to {} chars for prompt", max_chars);
    }

    format!(
        "{}\n\n<document{}>\n{}\n</document>\n\nQuestion: {}\nAnswer:",
        ANSWER_INSTRUCTIONS,
        if truncated { " truncated=\"true\"" } else { "" },
        excerpt,
        question.trim()
    )
}

/// 답변 지시문
const ANSWER_INSTRUCTIONS: &str = r#"Answer the question using only the document below.

Rules:
1. Base the answer strictly on the document content
2. Quote or paraphrase the relevant passages concisely
3. If the document does not contain the answer, reply exactly: "I couldn't find specific information related to your question in the document.""#;

/// 문서에 답이 없을 때 모델이 돌려주도록 지시한 문구
const NOT_FOUND_REPLY: &str = "I couldn't find specific information";

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<GenerateContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerateContent {
    parts: Vec<GeneratePart>,
}

#[derive(Debug, Serialize)]
struct GeneratePart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// 첫 번째 후보의 텍스트 파트를 이어붙임
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: Option<String>,
}

/// Gemini API 에러 응답
#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: String,
}

// ============================================================================
// API Key Management
// ============================================================================

/// API 키 로드 (환경변수에서)
///
/// 우선순위:
/// 1. `GEMINI_API_KEY` 환경변수
/// 2. `GOOGLE_AI_API_KEY` 환경변수
pub fn get_api_key() -> Result<String> {
    for var in ["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                tracing::debug!("Using API key from {}", var);
                return Ok(key);
            }
        }
    }

    anyhow::bail!(
        "API key not found. Set GEMINI_API_KEY or GOOGLE_AI_API_KEY environment variable.\n\
         Get your API key at: https://aistudio.google.com/app/apikey"
    )
}

/// API 키 존재 여부 확인
pub fn has_api_key() -> bool {
    ["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"]
        .iter()
        .any(|var| std::env::var(var).map(|k| !k.is_empty()).unwrap_or(false))
}

// ============================================================================
// Tests
// ============================================================================
