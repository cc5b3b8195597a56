//! Error types for QuillCode
//!
//! 모든 에러를 중앙에서 관리

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// QuillCode 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 메타데이터 단계
    // ========================================================================
    #[error("Malformed addon metadata: {0}")]
    MalformedMetadata(String),

    #[error("No addon description found in {0:?}")]
    DescriptionNotFound(PathBuf),

    #[error("Incomplete addon description, missing fields: {}", join_fields(.0))]
    IncompleteDescription(BTreeSet<String>),

    // ========================================================================
    // 생성 단계
    // ========================================================================
    #[error("Entry point not found: {0}")]
    EntryPointNotFound(String),

    #[error("Entry point construction failed: {entry_point} - {message}")]
    EntryPointConstruction {
        entry_point: String,
        message: String,
    },

    #[error("Entry point {0} does not implement the addon contract")]
    IncompatibleEntryPoint(String),

    // ========================================================================
    // 가져오기 / 스캔
    // ========================================================================
    #[error("Addon import failed: {0}")]
    ImportIo(String),

    #[error("No addon exists.")]
    NoAddonsPresent,

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

fn join_fields(fields: &BTreeSet<String>) -> String {
    fields.iter().cloned().collect::<Vec<_>>().join(", ")
}

impl Error {
    /// 파이프라인의 어느 단계에서 난 에러인지 (로그 필드용)
    pub fn stage(&self) -> &'static str {
        match self {
            Error::MalformedMetadata(_)
            | Error::DescriptionNotFound(_)
            | Error::IncompleteDescription(_) => "metadata",
            Error::EntryPointNotFound(_)
            | Error::EntryPointConstruction { .. }
            | Error::IncompatibleEntryPoint(_) => "construction",
            Error::ImportIo(_) => "import",
            Error::NoAddonsPresent => "scan",
            Error::Io(_) => "io",
            Error::Internal(_) => "internal",
        }
    }

    /// 생성 단계 에러 헬퍼
    pub fn construction(entry_point: impl Into<String>, message: impl Into<String>) -> Self {
        Error::EntryPointConstruction {
            entry_point: entry_point.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
