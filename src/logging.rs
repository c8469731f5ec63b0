//! 로깅 초기화
//!
//! 콘솔(stderr) 출력은 항상 켜지고, 로그 디렉토리를 지정하면
//! 실행 시각 이름의 `.log` 파일에도 기록합니다.
//! 진입점(main)에서 한 번만 호출합니다.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 로그 파일 이름 (`%m_%d_%Y_%H_%M_%S.log`)
pub fn log_file_name<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.log", time.format("%m_%d_%Y_%H_%M_%S"))
}

/// `RUST_LOG`가 있으면 그대로, 없거나 잘못되었으면 `info`
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 전역 subscriber 설정
///
/// 파일 로그를 켠 경우 생성된 로그 파일 경로를 반환합니다.
pub fn init(log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let filter = env_filter();

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {:?}", dir))?;

            let path = dir.join(log_file_name(&Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;

            let layer = fmt::layer()
                .with_ansi(false)
                .with_line_number(true)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(ref path) = log_path {
        tracing::debug!("Writing logs to {:?}", path);
    }

    Ok(log_path)
}
