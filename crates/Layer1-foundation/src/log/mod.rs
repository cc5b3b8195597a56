//! Addon Log - 애드온 로그 시스템
//!
//! 애드온마다 자기 origin이 태깅된 로거를 얻을 수 있지만,
//! 모든 기록은 프로세스당 하나뿐인 LogSink를 거칩니다.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

/// 로그 파일 이름
pub const LOG_FILE_NAME: &str = "addons.log";

/// 프로세스 전역 sink
static LOG_SINK: OnceLock<LogSink> = OnceLock::new();

// ============================================================================
// LogLevel
// ============================================================================

/// 로그 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// LogSink - 단일 로그 스트림
// ============================================================================

/// 모든 애드온 로거가 공유하는 단일 sink
///
/// 대상 디렉토리의 addons.log에 append 모드로 기록합니다.
pub struct LogSink {
    /// 로그 파일 경로
    path: PathBuf,

    /// 열린 파일 핸들 (열기에 실패했으면 None)
    file: Mutex<Option<File>>,
}

impl LogSink {
    fn open(dir: &Path) -> Self {
        let path = dir.join(LOG_FILE_NAME);
        let file = std::fs::create_dir_all(dir)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));

        let file = match file {
            Ok(f) => Some(f),
            Err(e) => {
                warn!("Failed to open addon log file {:?}: {}", path, e);
                None
            }
        };

        Self {
            path,
            file: Mutex::new(file),
        }
    }

    /// 프로세스 전역 sink 획득
    ///
    /// 최초 호출이 sink를 생성하며, 이후 호출의 dir은 무시됩니다.
    pub fn obtain(dir: &Path) -> &'static LogSink {
        LOG_SINK.get_or_init(|| LogSink::open(dir))
    }

    /// 로그 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 포맷된 로그 한 줄 기록
    ///
    /// `[timestamp] [LEVEL] [origin] content`
    pub fn write_entry(&self, level: LogLevel, origin: &str, content: &str) {
        let line = format!(
            "[{}] [{}] [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            origin,
            content,
        );

        let mut file = self.file.lock();
        if let Some(f) = file.as_mut() {
            if let Err(e) = writeln!(f, "{}", line) {
                warn!("Failed to write addon log entry: {}", e);
            }
        }
    }
}

// ============================================================================
// AddonLogger - origin별 로거
// ============================================================================

/// 애드온별 로거
///
/// origin 태그만 다를 뿐 기록은 전부 같은 sink를 거칩니다.
/// 기록은 tracing으로도 미러링되므로 호스트 진단에서도 보입니다.
pub struct AddonLogger {
    sink: &'static LogSink,
    origin: String,
}

impl AddonLogger {
    /// 새 로거 생성
    ///
    /// 최초 생성 시 sink가 dir에 만들어집니다.
    pub fn new(dir: &Path, origin: impl Into<String>) -> Self {
        Self {
            sink: LogSink::obtain(dir),
            origin: origin.into(),
        }
    }

    /// origin만 바꾼 로거 반환
    pub fn with_origin(&self, origin: impl Into<String>) -> Self {
        Self {
            sink: self.sink,
            origin: origin.into(),
        }
    }

    /// 로거의 origin 태그
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn info(&self, content: &str) {
        self.log(LogLevel::Info, content);
    }

    pub fn warning(&self, content: &str) {
        self.log(LogLevel::Warning, content);
    }

    pub fn error(&self, content: &str) {
        self.log(LogLevel::Error, content);
    }

    /// 지정한 레벨로 기록
    pub fn log(&self, level: LogLevel, content: &str) {
        match level {
            LogLevel::Info => tracing::info!(origin = %self.origin, "{}", content),
            LogLevel::Warning => tracing::warn!(origin = %self.origin, "{}", content),
            LogLevel::Error => tracing::error!(origin = %self.origin, "{}", content),
        }
        self.sink.write_entry(level, &self.origin, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_log(dir: &Path) -> String {
        std::fs::read_to_string(dir.join(LOG_FILE_NAME)).unwrap()
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Info.to_string(), "INFO");
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_sink_writes_formatted_line() {
        let temp = TempDir::new().unwrap();
        let sink = LogSink::open(temp.path());

        sink.write_entry(LogLevel::Info, "test.addon", "hello from addon");

        let content = read_log(temp.path());
        assert!(content.contains("[INFO] [test.addon] hello from addon"));
        // 타임스탬프가 줄 머리에 와야 함
        assert!(content.starts_with('['));
    }

    #[test]
    fn test_obtain_is_process_wide() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();

        let first = LogSink::obtain(a.path());
        let second = LogSink::obtain(b.path());

        // 두 번째 호출의 디렉토리는 무시됨
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.path(), second.path());
    }

    #[test]
    fn test_logger_origin_tagging() {
        let temp = TempDir::new().unwrap();
        let sink: &'static LogSink = Box::leak(Box::new(LogSink::open(temp.path())));

        let logger = AddonLogger {
            sink,
            origin: "theme.dark".into(),
        };
        logger.info("applied");
        logger.warning("missing color key");
        logger.with_origin("vim.keys").error("bad mapping");

        let content = read_log(temp.path());
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("[INFO] [theme.dark] applied"));
        assert!(lines[1].contains("[WARNING] [theme.dark] missing color key"));
        assert!(lines[2].contains("[ERROR] [vim.keys] bad mapping"));
    }
}
