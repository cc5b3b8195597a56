//! Addon traits - 애드온 수명주기 계약

use async_trait::async_trait;
use quill_foundation::{AddonLogger, Result};
use std::any::Any;
use std::path::{Path, PathBuf};

// ============================================================================
// AddonContext - 생성자에 전달되는 컨텍스트
// ============================================================================

/// 애드온 생성 시 전달되는 컨텍스트
///
/// 애드온이 로드된 디렉토리와 애드온 루트 디렉토리를 담습니다.
#[derive(Debug, Clone)]
pub struct AddonContext {
    /// 이 애드온 패키지의 디렉토리
    addon_dir: PathBuf,

    /// 애드온 루트 디렉토리
    addons_root: PathBuf,
}

impl AddonContext {
    /// 새 컨텍스트 생성
    pub fn new(addon_dir: impl Into<PathBuf>, addons_root: impl Into<PathBuf>) -> Self {
        Self {
            addon_dir: addon_dir.into(),
            addons_root: addons_root.into(),
        }
    }

    /// 애드온 패키지 디렉토리
    pub fn addon_dir(&self) -> &Path {
        &self.addon_dir
    }

    /// 애드온 루트 디렉토리
    pub fn addons_root(&self) -> &Path {
        &self.addons_root
    }

    /// origin이 태깅된 애드온 로거 획득
    pub fn logger(&self, log_dir: &Path, origin: impl Into<String>) -> AddonLogger {
        AddonLogger::new(log_dir, origin)
    }
}

// ============================================================================
// Addon Trait - 모든 애드온이 구현해야 하는 계약
// ============================================================================

/// 애드온 수명주기 계약
///
/// entry point 생성자가 돌려준 구현체는 이 트레이트를 노출해야 하며,
/// 그렇지 않으면 로드 시점에 IncompatibleEntryPoint로 거부됩니다.
/// 내부 상태는 구현체가 내부 가변성으로 직접 관리합니다.
#[async_trait]
pub trait Addon: Send + Sync {
    /// 생성 직후, 활성화로 취급되기 전에 한 번 호출
    ///
    /// 에러를 돌려주면 해당 스캔 패스 전체가 실패합니다.
    async fn on_load(&self) -> Result<()>;

    /// 앱 종료 시 호출
    async fn on_app_exit(&self) {}

    /// 타입 캐스팅을 위한 헬퍼 (다운캐스팅 지원)
    fn as_any(&self) -> &dyn Any;
}

/// 애드온 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonStatus {
    /// 생성됨 (on_load 완료 전)
    Loading,

    /// 활성화됨
    Active,

    /// 종료 훅까지 호출됨
    Terminated,
}

impl std::fmt::Display for AddonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Active => write!(f, "active"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestAddon {
        greeting: String,
    }

    #[async_trait]
    impl Addon for TestAddon {
        async fn on_load(&self) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[tokio::test]
    async fn test_default_exit_hook_and_downcast() {
        let addon: Box<dyn Addon> = Box::new(TestAddon {
            greeting: "hi".into(),
        });

        addon.on_load().await.unwrap();
        addon.on_app_exit().await;

        let concrete = addon.as_any().downcast_ref::<TestAddon>().unwrap();
        assert_eq!(concrete.greeting, "hi");
    }

    #[test]
    fn test_context_paths() {
        let ctx = AddonContext::new("/data/plugins/theme-dark", "/data/plugins");

        assert_eq!(ctx.addon_dir(), Path::new("/data/plugins/theme-dark"));
        assert_eq!(ctx.addons_root(), Path::new("/data/plugins"));
    }

    #[test]
    fn test_context_logger_is_origin_tagged() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = AddonContext::new("/data/plugins/theme-dark", "/data/plugins");

        let logger = ctx.logger(temp.path(), "org.quillcode.theme-dark");
        assert_eq!(logger.origin(), "org.quillcode.theme-dark");
        logger.info("loaded");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AddonStatus::Loading.to_string(), "loading");
        assert_eq!(AddonStatus::Active.to_string(), "active");
        assert_eq!(AddonStatus::Terminated.to_string(), "terminated");
    }
}
