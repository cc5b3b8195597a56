//! Addon Loader - 메타데이터 해석과 동적 생성
//!
//! 디렉토리 항목 하나를 Description으로 바꾸고(describe), 거기에 선언된
//! entry point로 인스턴스를 생성합니다(instantiate). 하위 단계의 실패는
//! 전부 이 경계에서 애드온 에러 분류로 변환됩니다.

use super::entry::EntryPointRegistry;
use super::manifest::{AddonManifest, ManifestFile, MANIFEST_FILE_NAME};
use super::traits::{Addon, AddonContext};
use quill_foundation::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

/// 애드온 로더
pub struct AddonLoader {
    /// entry point 테이블
    entry_points: Arc<EntryPointRegistry>,
}

impl AddonLoader {
    /// 새 로더 생성
    pub fn new() -> Self {
        Self {
            entry_points: Arc::new(EntryPointRegistry::new()),
        }
    }

    /// entry point 레지스트리 접근
    pub fn entry_points(&self) -> &Arc<EntryPointRegistry> {
        &self.entry_points
    }

    // ========================================================================
    // describe - 메타데이터 해석
    // ========================================================================

    /// addon_path 안의 addon.toml을 읽고 검증된 manifest를 돌려줍니다
    pub async fn describe(&self, addon_path: &Path) -> Result<AddonManifest> {
        let manifest_path = addon_path.join(MANIFEST_FILE_NAME);
        if !manifest_path.is_file() {
            return Err(Error::DescriptionNotFound(addon_path.to_path_buf()));
        }

        let bytes = fs::read(&manifest_path).await?;
        let manifest = ManifestFile::parse(&bytes)?.into_manifest()?;

        debug!("Described addon {} at {:?}", manifest.package_id, addon_path);
        Ok(manifest)
    }

    // ========================================================================
    // instantiate - 동적 생성
    // ========================================================================

    /// manifest에 선언된 entry point로 인스턴스를 생성합니다
    ///
    /// 생성자에는 (애드온 디렉토리, 애드온 루트) 컨텍스트가 전달됩니다.
    pub async fn instantiate(
        &self,
        manifest: &AddonManifest,
        addon_path: &Path,
        addons_root: &Path,
    ) -> Result<Arc<dyn Addon>> {
        let entry = &manifest.entry_point;

        let ctor = self
            .entry_points
            .resolve(entry)
            .await
            .ok_or_else(|| Error::EntryPointNotFound(entry.clone()))?;

        let ctx = AddonContext::new(addon_path, addons_root);
        let value = ctor(ctx).map_err(|e| Error::construction(entry, e.to_string()))?;

        // 생성자가 돌려준 값이 애드온 계약을 노출해야 함
        let addon = value
            .downcast::<Box<dyn Addon>>()
            .map_err(|_| Error::IncompatibleEntryPoint(entry.clone()))?;

        debug!(
            "Instantiated addon {} via entry point {}",
            manifest.package_id, entry
        );
        Ok(Arc::from(*addon))
    }
}

impl Default for AddonLoader {
    fn default() -> Self {
        Self::new()
    }
}
