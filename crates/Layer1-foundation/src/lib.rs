//! # quill-foundation
//!
//! Foundation layer for QuillCode:
//! - Error: 중앙 에러 타입 (애드온 파이프라인 단계별 분류 포함)
//! - Log: 애드온 로그 시스템 (origin별 로거 + 프로세스당 하나의 LogSink)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  AddonLogger("theme")  AddonLogger("vim-keys")  ...     │
//! │            │                    │                       │
//! │            └─────────┬──────────┘                       │
//! │                      ▼                                  │
//! │             LogSink (프로세스당 1개)                      │
//! │                      │                                  │
//! │                      ▼                                  │
//! │            <log dir>/addons.log                         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod log;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Log
// ============================================================================
pub use log::{AddonLogger, LogLevel, LogSink, LOG_FILE_NAME};
