//! # quill-core
//!
//! Core runtime for QuillCode - 애드온 발견, 검증, 로드, 수명주기 관리
//!
//! 호스트 애플리케이션은 AddonManager 하나로 애드온 시스템 전체를 다룹니다:
//! entry point 등록 → scan_and_load → (실행) → terminate_all.

pub mod addon;

// ============================================================================
// Addon
// ============================================================================
pub use addon::{
    Addon, AddonContext, AddonLoader, AddonManager, AddonManagerConfig, AddonManifest,
    AddonStatus, EntryPointCtor, EntryPointRegistry, EntryPointValue, LoadedAddon, ManifestFile,
    Outcome, OutcomeCode, ADDON_DIR_NAME, MANIFEST_FILE_NAME,
};
