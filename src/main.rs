//! palank-docqa CLI 진입점

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // CLI 파싱 (로그 디렉토리 옵션이 로깅 초기화보다 먼저 필요)
    let cli = palank_docqa::cli::Cli::parse();

    // 로깅 초기화
    palank_docqa::logging::init(cli.log_dir.as_deref())?;

    // CLI 실행
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(palank_docqa::cli::run(cli))
}
