//! CLI 모듈
//!
//! palank-docqa CLI 명령어 정의 및 구현

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::extractor::{DocumentFormat, ExtractedContent};
use crate::llm::{has_api_key, GeminiAnswerer, GeminiConfig, DEFAULT_MODEL};
use crate::qa::{
    Answer, AnswerComposer, AnswerConfig, Answerer, KeywordAnswerer, PunctuationTrimTokenizer,
    RelevanceScorer, DEFAULT_MAX_SENTENCES,
};
use crate::upload::{Upload, UploadConfig};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "palank-docqa")]
#[command(version, about = "로컬 문서 질의응답 (PDF / TXT / DOCX)", long_about = None)]
pub struct Cli {
    /// 로그 파일 디렉토리 (실행 시각 이름의 .log 파일 생성)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 문서에 대해 질문하기
    Ask {
        /// 문서 파일 경로 (pdf, txt, docx)
        #[arg(short, long)]
        file: PathBuf,

        /// 질문
        question: String,

        /// 답변 전략
        #[arg(short, long, value_enum, default_value = "auto")]
        strategy: Strategy,

        /// Gemini 모델 이름
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// 근거 문장 표시 (키워드 전략)
        #[arg(long)]
        sources: bool,

        /// 단어 앞뒤 구두점 제거 후 매칭 (키워드 전략)
        #[arg(long)]
        trim_punctuation: bool,

        /// 답변에 포함할 최대 문장 수 (키워드 전략)
        #[arg(long, default_value_t = DEFAULT_MAX_SENTENCES, value_parser = parse_max_sentences)]
        max_sentences: usize,

        /// 최대 파일 크기 (MB, 0이면 제한 없음)
        #[arg(long, default_value = "10")]
        max_file_mb: u64,
    },

    /// 문서 텍스트 추출 결과 확인
    Extract {
        /// 문서 파일 경로 (pdf, txt, docx)
        #[arg(short, long)]
        file: PathBuf,

        /// 전체 텍스트 출력 (기본: 미리보기)
        #[arg(long)]
        full: bool,
    },

    /// 상태 확인
    Status,
}

/// 답변 전략
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// API 키가 있으면 Gemini, 없으면 키워드
    Auto,
    /// 키워드 겹침 (오프라인)
    Keyword,
    /// Gemini LLM
    Gemini,
}

impl Strategy {
    /// 실제 사용할 전략 결정 (`Auto` 해소)
    pub fn resolve(self, api_key_available: bool) -> Strategy {
        match self {
            Strategy::Auto if api_key_available => Strategy::Gemini,
            Strategy::Auto => Strategy::Keyword,
            other => other,
        }
    }
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ask {
            file,
            question,
            strategy,
            model,
            sources,
            trim_punctuation,
            max_sentences,
            max_file_mb,
        } => {
            let options = AskOptions {
                strategy,
                model,
                show_sources: sources,
                trim_punctuation,
                max_sentences,
                upload: UploadConfig {
                    max_file_size: mb_to_bytes(max_file_mb),
                },
            };
            cmd_ask(&file, &question, options).await
        }
        Commands::Extract { file, full } => cmd_extract(&file, full).await,
        Commands::Status => cmd_status(),
    }
}

/// ask 명령어 옵션
struct AskOptions {
    strategy: Strategy,
    model: String,
    show_sources: bool,
    trim_punctuation: bool,
    max_sentences: usize,
    upload: UploadConfig,
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 질문 명령어 (ask)
///
/// 업로드 → 추출 → 답변 순서로 처리합니다.
async fn cmd_ask(file: &Path, question: &str, options: AskOptions) -> Result<()> {
    if question.trim().is_empty() {
        bail!("질문을 입력해야 합니다");
    }

    // 1. 문서 로드 + 추출
    let content = load_document(file, &options.upload).await?;
    if content.document.is_empty() {
        let reason = content
            .metadata
            .parse_error
            .as_deref()
            .unwrap_or("추출된 텍스트가 없습니다");
        bail!("문서 로드 실패: {}", reason);
    }
    let document = content.document;

    // 2. 답변기 선택
    let keyword = keyword_answerer(options.trim_punctuation, options.max_sentences);
    let strategy = options.strategy.resolve(has_api_key());
    let gemini = match strategy {
        Strategy::Gemini => {
            let config = GeminiConfig {
                model: options.model.clone(),
                ..Default::default()
            };
            Some(GeminiAnswerer::from_env_with_config(config).context("Gemini 답변기 생성 실패")?)
        }
        _ => None,
    };

    // 3. 질의
    println!("[*] 질문 처리 중: \"{}\"", question.trim());

    let answer = match gemini {
        Some(ref gemini) => match gemini.answer(&document, question).await {
            Ok(answer) => {
                tracing::info!("Answered with {}", gemini.name());
                answer
            }
            Err(e) => {
                tracing::warn!("Gemini 답변 실패, 키워드 매칭으로 대체: {:#}", e);
                keyword.answer(&document, question).await?
            }
        },
        None => keyword.answer(&document, question).await?,
    };

    // 4. 결과 출력
    print_answer(&answer, options.show_sources);

    Ok(())
}

/// 추출 명령어 (extract)
async fn cmd_extract(file: &Path, full: bool) -> Result<()> {
    let content = load_document(file, &UploadConfig::default()).await?;
    let meta = &content.metadata;

    println!("    형식: {}", content.source_format);
    if let Some(pages) = meta.total_pages {
        println!("    페이지: {}", pages);
    }
    if let Some(paragraphs) = meta.total_paragraphs {
        println!("    문단: {}", paragraphs);
    }

    if content.document.is_empty() {
        println!("[!] 추출된 텍스트가 없습니다.");
        if let Some(ref e) = meta.parse_error {
            println!("    원인: {}", e);
        }
        return Ok(());
    }

    println!("    문자 수: {}", content.document.char_count());
    println!();

    if full {
        println!("{}", content.document.as_str());
    } else {
        println!("{}", truncate_text(content.document.as_str(), 500));
    }

    Ok(())
}

/// 상태 명령어 (status)
fn cmd_status() -> Result<()> {
    println!("palank-docqa v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let formats: Vec<&str> = DocumentFormat::ALL.iter().map(|f| f.as_str()).collect();
    println!("[*] 지원 형식: {}", formats.join(", "));
    println!(
        "[*] 업로드 제한: {}",
        format_bytes(UploadConfig::default().max_file_size as usize)
    );

    // API 키 상태
    if has_api_key() {
        println!("[OK] API 키: 설정됨 (auto 전략 → Gemini {})", DEFAULT_MODEL);
    } else {
        println!("[!] API 키: 미설정 (auto 전략 → 키워드 매칭)");
        println!("    설정: export GEMINI_API_KEY=your-key");
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 파일 업로드 후 텍스트 추출
///
/// 추출은 CPU 바운드이므로 spawn_blocking 사용
async fn load_document(file: &Path, config: &UploadConfig) -> Result<ExtractedContent> {
    let upload = Upload::from_path(file, config)?;
    println!(
        "[OK] File uploaded: {} ({})",
        upload.file_name,
        format_bytes(upload.size())
    );

    let content = tokio::task::spawn_blocking(move || upload.extract())
        .await
        .context("Extraction task failed")??;

    Ok(content)
}

/// `--max-sentences` 파서 (1 이상)
fn parse_max_sentences(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{}", e))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

/// MB → 바이트 (오버플로 시 u64::MAX)
fn mb_to_bytes(mb: u64) -> u64 {
    mb.saturating_mul(1024 * 1024)
}

/// 키워드 답변기 생성
fn keyword_answerer(trim_punctuation: bool, max_sentences: usize) -> Box<dyn Answerer> {
    let config = AnswerConfig { max_sentences };

    if trim_punctuation {
        Box::new(KeywordAnswerer::with_composer(AnswerComposer::with_parts(
            RelevanceScorer::with_tokenizer(PunctuationTrimTokenizer),
            config,
        )))
    } else {
        Box::new(KeywordAnswerer::with_composer(AnswerComposer::with_parts(
            RelevanceScorer::new(),
            config,
        )))
    }
}

/// 답변 출력
fn print_answer(answer: &Answer<'_>, show_sources: bool) {
    println!();
    if answer.is_found() {
        println!("[OK] Answer:");
    } else {
        println!("[!] Answer:");
    }
    println!("{}", answer.text());

    let sources = answer.sources();
    if show_sources && !sources.is_empty() {
        println!();
        println!("[*] Source Information:");
        for (i, source) in sources.iter().enumerate() {
            println!(
                "  {}. [점수: {:.2}] #{} {}",
                i + 1,
                source.score,
                source.sentence.position + 1,
                truncate_text(source.text(), 200)
            );
        }
    }
}

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// 바이트 크기 포맷팅
fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================
