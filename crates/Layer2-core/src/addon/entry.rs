//! Entry Point Registry - 선언된 entry point와 생성자의 매핑
//!
//! 메타데이터에 이름으로만 선언된 구현체를 생성하기 위한 테이블입니다.
//! 호스트가 시작 시 생성자를 등록해 두면, 로더가 로드 시점에 이름을
//! 해석합니다. 동적 디스패치는 이 테이블 하나로 격리됩니다.

use super::traits::{Addon, AddonContext};
use quill_foundation::Result;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// entry point 생성자가 돌려주는 불투명한 값
///
/// 애드온 생성자는 Box<dyn Addon>을 담아 돌려줍니다. 다른 종류의 컴포넌트
/// 생성자도 같은 테이블을 공유할 수 있으며, 그 경우 애드온 계약 캐스트는
/// 로드 시점에 실패합니다.
pub type EntryPointValue = Box<dyn Any + Send + Sync>;

/// entry point 생성자
pub type EntryPointCtor = dyn Fn(AddonContext) -> Result<EntryPointValue> + Send + Sync;

// ============================================================================
// EntryPointRegistry
// ============================================================================

/// entry point 레지스트리 (이름 -> 생성자)
pub struct EntryPointRegistry {
    ctors: RwLock<HashMap<String, Arc<EntryPointCtor>>>,
}

impl EntryPointRegistry {
    /// 새 레지스트리 생성
    pub fn new() -> Self {
        Self {
            ctors: RwLock::new(HashMap::new()),
        }
    }

    /// 애드온 생성자 등록
    ///
    /// 일반적인 등록 경로입니다. 반환 타입이 Addon을 구현하는 한
    /// 타입 안전하게 감싸 줍니다. 같은 이름이 이미 있으면 덮어쓰지 않고
    /// false를 돌려줍니다.
    pub async fn register<A, F>(&self, name: impl Into<String>, ctor: F) -> bool
    where
        A: Addon + 'static,
        F: Fn(AddonContext) -> Result<A> + Send + Sync + 'static,
    {
        self.register_raw(name, move |ctx| {
            let addon: Box<dyn Addon> = Box::new(ctor(ctx)?);
            Ok(Box::new(addon) as EntryPointValue)
        })
        .await
    }

    /// 불투명 생성자 등록
    ///
    /// 애드온이 아닌 컴포넌트 생성자도 이 테이블을 쓸 수 있게 하는
    /// 저수준 경로입니다.
    pub async fn register_raw<F>(&self, name: impl Into<String>, ctor: F) -> bool
    where
        F: Fn(AddonContext) -> Result<EntryPointValue> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut ctors = self.ctors.write().await;

        if ctors.contains_key(&name) {
            warn!("Entry point {} is already registered", name);
            return false;
        }

        debug!("Registered entry point: {}", name);
        ctors.insert(name, Arc::new(ctor));
        true
    }

    /// 이름으로 생성자 해석
    pub async fn resolve(&self, name: &str) -> Option<Arc<EntryPointCtor>> {
        let ctors = self.ctors.read().await;
        ctors.get(name).cloned()
    }

    /// 등록 여부 확인
    pub async fn contains(&self, name: &str) -> bool {
        let ctors = self.ctors.read().await;
        ctors.contains_key(name)
    }

    /// 등록된 entry point 수
    pub async fn len(&self) -> usize {
        let ctors = self.ctors.read().await;
        ctors.len()
    }

    /// 비어있는지 확인
    pub async fn is_empty(&self) -> bool {
        let ctors = self.ctors.read().await;
        ctors.is_empty()
    }
}

impl Default for EntryPointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::any::Any;

    struct MarkerAddon {
        marker: &'static str,
    }

    #[async_trait]
    impl Addon for MarkerAddon {
        async fn on_load(&self) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn ctx() -> AddonContext {
        AddonContext::new("/tmp/plugins/marker", "/tmp/plugins")
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = EntryPointRegistry::new();

        assert!(registry.is_empty().await);
        assert!(
            registry
                .register("quill.marker", |_ctx| Ok(MarkerAddon { marker: "first" }))
                .await
        );
        assert!(registry.contains("quill.marker").await);
        assert_eq!(registry.len().await, 1);

        let ctor = registry.resolve("quill.marker").await.unwrap();
        let value = ctor(ctx()).unwrap();
        let addon = value.downcast::<Box<dyn Addon>>().unwrap();
        let marker = addon.as_any().downcast_ref::<MarkerAddon>().unwrap();
        assert_eq!(marker.marker, "first");
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first() {
        let registry = EntryPointRegistry::new();

        assert!(
            registry
                .register("quill.marker", |_ctx| Ok(MarkerAddon { marker: "first" }))
                .await
        );
        // 두 번째 등록은 거부됨
        assert!(
            !registry
                .register("quill.marker", |_ctx| Ok(MarkerAddon { marker: "second" }))
                .await
        );

        let ctor = registry.resolve("quill.marker").await.unwrap();
        let value = ctor(ctx()).unwrap();
        let addon = value.downcast::<Box<dyn Addon>>().unwrap();
        let marker = addon.as_any().downcast_ref::<MarkerAddon>().unwrap();
        assert_eq!(marker.marker, "first");
    }

    #[tokio::test]
    async fn test_resolve_unknown_returns_none() {
        let registry = EntryPointRegistry::new();
        assert!(registry.resolve("quill.ghost").await.is_none());
    }
}
