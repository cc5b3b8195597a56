//! Addon Manager - 애드온 수명주기 관리
//!
//! 프로세스 전역 레지스트리입니다. 루트 디렉토리 스캔, package id 기준
//! 중복 제거, 외부 패키지 가져오기, 종료 브로드캐스트를 조율하며
//! 로더를 소유합니다.

use super::entry::EntryPointRegistry;
use super::loader::AddonLoader;
use super::manifest::AddonManifest;
use super::traits::{Addon, AddonStatus};
use quill_foundation::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// 애드온 루트 디렉토리 이름
pub const ADDON_DIR_NAME: &str = "plugins";

/// 글로벌 Addon Manager
static ADDON_MANAGER: OnceLock<Arc<AddonManager>> = OnceLock::new();

// ============================================================================
// AddonManagerConfig
// ============================================================================

/// 애드온 매니저 설정
#[derive(Debug, Clone)]
pub struct AddonManagerConfig {
    /// 애드온 루트 디렉토리
    pub addons_root: PathBuf,
}

impl AddonManagerConfig {
    /// 루트 디렉토리를 지정해 생성
    pub fn new(addons_root: impl Into<PathBuf>) -> Self {
        Self {
            addons_root: addons_root.into(),
        }
    }

    /// 호스트 앱 데이터 디렉토리 기준 기본 루트 (base/plugins)
    pub fn for_app_dir(base: &Path) -> Self {
        Self::new(base.join(ADDON_DIR_NAME))
    }
}

// ============================================================================
// Outcome - 호스트 경계를 넘는 처리 결과
// ============================================================================

/// 처리 결과 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCode {
    Success,
    Failed,
}

/// 코드 + 메시지로 이루어진 처리 결과
///
/// 매니저 경계는 타입이 있는 에러 대신 이 구조체를 돌려줍니다.
/// 호스트는 메시지 한 줄을 그대로 보여주면 됩니다.
#[derive(Debug, Clone)]
pub struct Outcome {
    code: OutcomeCode,
    message: String,
}

impl Outcome {
    /// 성공 결과
    pub fn success() -> Self {
        Self {
            code: OutcomeCode::Success,
            message: "No message".into(),
        }
    }

    /// 실패 결과
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: OutcomeCode::Failed,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == OutcomeCode::Success
    }

    pub fn code(&self) -> OutcomeCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for Outcome {
    fn from(e: Error) -> Self {
        Self::failure(e.to_string())
    }
}

// ============================================================================
// LoadedAddon - 레지스트리 테이블 엔트리
// ============================================================================

/// 로드된 애드온 하나 (description + 인스턴스)
#[derive(Clone)]
pub struct LoadedAddon {
    /// 검증된 메타데이터
    pub manifest: AddonManifest,

    /// 라이브 인스턴스
    pub instance: Arc<dyn Addon>,

    /// 로드된 디렉토리
    pub dir: PathBuf,

    /// 현재 상태
    pub status: AddonStatus,

    /// 로드 순서
    pub load_order: usize,
}

// ============================================================================
// AddonManager
// ============================================================================

/// 애드온 매니저 - 전체 애드온 시스템 관리
pub struct AddonManager {
    /// 애드온 로더 (entry point 테이블 소유)
    loader: AddonLoader,

    /// 로드된 애드온 (package id -> LoadedAddon)
    loaded: RwLock<HashMap<String, LoadedAddon>>,

    /// 로드 카운터
    load_counter: RwLock<usize>,

    /// 설정
    config: AddonManagerConfig,
}

impl AddonManager {
    /// 새 매니저 생성 (의존성 주입과 테스트용)
    pub fn new(config: AddonManagerConfig) -> Self {
        Self {
            loader: AddonLoader::new(),
            loaded: RwLock::new(HashMap::new()),
            load_counter: RwLock::new(0),
            config,
        }
    }

    /// 프로세스 전역 매니저
    ///
    /// 최초 호출이 인스턴스를 생성하며, 동시에 처음 접근해도 하나만
    /// 만들어집니다. 이후 호출이 넘긴 config는 무시됩니다.
    pub fn global(config: AddonManagerConfig) -> Arc<AddonManager> {
        ADDON_MANAGER
            .get_or_init(|| Arc::new(AddonManager::new(config)))
            .clone()
    }

    /// entry point 레지스트리 접근
    pub fn entry_points(&self) -> &Arc<EntryPointRegistry> {
        self.loader.entry_points()
    }

    /// 애드온 루트 디렉토리
    pub fn addons_root(&self) -> &Path {
        &self.config.addons_root
    }

    // ========================================================================
    // 가져오기
    // ========================================================================

    /// 외부 애드온 패키지 파일을 루트 디렉토리로 복사
    ///
    /// 같은 이름의 파일은 덮어씁니다. 내용 검증은 하지 않으며
    /// 다음 scan_and_load로 미뤄집니다.
    pub async fn import_external(&self, source: &Path) -> Outcome {
        match self.copy_into_root(source).await {
            Ok(dest) => {
                info!("Imported addon package {:?} -> {:?}", source, dest);
                Outcome::success()
            }
            Err(e) => {
                error!(stage = e.stage(), "Addon import failed: {}", e);
                Outcome::from(e)
            }
        }
    }

    async fn copy_into_root(&self, source: &Path) -> Result<PathBuf> {
        let file_name = source
            .file_name()
            .ok_or_else(|| Error::ImportIo(format!("invalid source path: {:?}", source)))?;

        fs::create_dir_all(&self.config.addons_root)
            .await
            .map_err(|e| Error::ImportIo(e.to_string()))?;

        let dest = self.config.addons_root.join(file_name);
        fs::copy(source, &dest)
            .await
            .map_err(|e| Error::ImportIo(e.to_string()))?;
        Ok(dest)
    }

    // ========================================================================
    // 스캔 / 로드
    // ========================================================================

    /// 루트 디렉토리를 스캔해 새 애드온을 로드
    ///
    /// 이미 로드된 package id는 조용히 건너뜁니다 (재스캔 멱등).
    /// 항목 하나라도 실패하면 그 에러 메시지를 담아 즉시 실패를 돌려주고
    /// 나머지 항목은 시도하지 않습니다. 이전 패스에서 로드된 애드온은
    /// 영향을 받지 않습니다.
    pub async fn scan_and_load(&self) -> Outcome {
        match self.scan_inner().await {
            Ok(count) => {
                info!("Addon scan complete, {} newly loaded", count);
                Outcome::success()
            }
            Err(e) => {
                error!(stage = e.stage(), "Addon scan failed: {}", e);
                Outcome::from(e)
            }
        }
    }

    async fn scan_inner(&self) -> Result<usize> {
        fs::create_dir_all(&self.config.addons_root).await?;
        let root = fs::canonicalize(&self.config.addons_root).await?;

        // 결정적인 처리 순서를 위해 이름순 정렬
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&root).await?;
        while let Some(entry) = dir.next_entry().await? {
            entries.push(entry.path());
        }
        entries.sort();

        if entries.is_empty() {
            return Err(Error::NoAddonsPresent);
        }

        let mut newly_loaded = 0;
        for path in entries {
            let manifest = self.loader.describe(&path).await?;

            if self.is_loaded(&manifest.package_id).await {
                debug!(
                    "Addon {} already loaded, skipping {:?}",
                    manifest.package_id, path
                );
                continue;
            }

            let instance = self.loader.instantiate(&manifest, &path, &root).await?;
            if let Err(e) = instance.on_load().await {
                error!("Addon {} failed on_load: {}", manifest.package_id, e);
                return Err(e);
            }

            self.insert(manifest, instance, path).await;
            newly_loaded += 1;
        }

        Ok(newly_loaded)
    }

    async fn is_loaded(&self, package_id: &str) -> bool {
        let loaded = self.loaded.read().await;
        loaded.contains_key(package_id)
    }

    async fn insert(&self, manifest: AddonManifest, instance: Arc<dyn Addon>, dir: PathBuf) {
        let mut counter = self.load_counter.write().await;
        *counter += 1;
        let load_order = *counter;

        let mut loaded = self.loaded.write().await;
        info!(
            "Loaded addon: {} (v{})",
            manifest.package_id, manifest.version_name
        );
        loaded.insert(
            manifest.package_id.clone(),
            LoadedAddon {
                manifest,
                instance,
                dir,
                status: AddonStatus::Active,
                load_order,
            },
        );
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 로드된 애드온 수
    pub async fn loaded_count(&self) -> usize {
        let loaded = self.loaded.read().await;
        loaded.len()
    }

    /// 루트 디렉토리에 존재하는 패키지 수 (로드 여부 무관)
    pub async fn imported_count(&self) -> usize {
        match fs::read_dir(&self.config.addons_root).await {
            Ok(mut dir) => {
                let mut count = 0;
                while let Ok(Some(_)) = dir.next_entry().await {
                    count += 1;
                }
                count
            }
            // 읽을 수 없는 루트는 0으로 취급
            Err(_) => 0,
        }
    }

    /// 특정 package id 로드 여부
    pub async fn contains(&self, package_id: &str) -> bool {
        self.is_loaded(package_id).await
    }

    /// 현재 레지스트리 상태의 읽기 전용 뷰
    pub async fn snapshot(&self) -> HashMap<String, LoadedAddon> {
        let loaded = self.loaded.read().await;
        loaded.clone()
    }

    // ========================================================================
    // 종료
    // ========================================================================

    /// 로드된 모든 애드온에 종료 훅을 로드 순서대로 전파
    ///
    /// 테이블에서 엔트리를 제거하지는 않습니다 (프로세스 종료 중).
    pub async fn terminate_all(&self) {
        let mut loaded = self.loaded.write().await;
        let mut ordered: Vec<&mut LoadedAddon> = loaded.values_mut().collect();
        ordered.sort_by_key(|entry| entry.load_order);

        for entry in ordered {
            debug!("Terminating addon: {}", entry.manifest.package_id);
            entry.instance.on_app_exit().await;
            entry.status = AddonStatus::Terminated;
        }

        info!("All addons terminated");
    }
}
