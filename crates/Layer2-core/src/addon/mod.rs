//! # Addon System
//!
//! QuillCode 확장 애드온 시스템
//!
//! ## 개요
//!
//! 애드온 루트 디렉토리를 스캔하고, 각 패키지의 addon.toml 메타데이터를
//! 검증한 뒤, 메타데이터에 이름으로만 선언된 entry point로 구현체를
//! 생성해 수명주기를 관리합니다:
//! - 디렉토리 스캔 + package id 기준 중복 제거
//! - 필수 필드 무결성 검사 (누락 필드 전체를 한 번에 보고)
//! - entry point 테이블을 통한 동적 생성
//! - 수명주기 훅 전파 (on_load / on_app_exit)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       AddonManager                          │
//! │  loaded: package id -> (AddonManifest, Arc<dyn Addon>)      │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                    AddonLoader                        │  │
//! │  │   describe:  addon.toml -> ManifestFile -> Manifest   │  │
//! │  │   instantiate: entry point -> Box<dyn Addon>          │  │
//! │  │  ┌─────────────────────────────────────────────────┐  │  │
//! │  │  │            EntryPointRegistry                   │  │  │
//! │  │  │  "org.quill.theme-dark" -> constructor          │  │  │
//! │  │  └─────────────────────────────────────────────────┘  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 예시
//!
//! ```ignore
//! // 애드온 정의
//! struct DarkTheme;
//!
//! #[async_trait]
//! impl Addon for DarkTheme {
//!     async fn on_load(&self) -> Result<()> { Ok(()) }
//!     async fn on_app_exit(&self) {}
//!     fn as_any(&self) -> &dyn Any { self }
//! }
//!
//! // 호스트 쪽 연결
//! let manager = AddonManager::new(AddonManagerConfig::new(addons_root));
//! manager.entry_points().register("org.quill.theme-dark", |_ctx| Ok(DarkTheme)).await;
//! let outcome = manager.scan_and_load().await;
//! ```

mod entry;
mod loader;
mod manager;
mod manifest;
mod traits;

pub use entry::{EntryPointCtor, EntryPointRegistry, EntryPointValue};
pub use loader::AddonLoader;
pub use manager::{
    AddonManager, AddonManagerConfig, LoadedAddon, Outcome, OutcomeCode, ADDON_DIR_NAME,
};
pub use manifest::{AddonManifest, ManifestFile, MANIFEST_FILE_NAME};
pub use traits::{Addon, AddonContext, AddonStatus};
