//! Addon Manifest - 애드온 메타데이터 정의
//!
//! addon.toml을 파싱하고 필수 필드 무결성을 검사합니다.

use quill_foundation::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

/// 애드온 디렉토리 안의 메타데이터 파일 이름
pub const MANIFEST_FILE_NAME: &str = "addon.toml";

// ============================================================================
// ManifestFile - addon.toml 파일 구조
// ============================================================================

/// addon.toml 파일 구조
///
/// 파싱 단계에서는 모든 필드가 Option입니다. 필수 필드를 Option이 아닌
/// 타입으로 두면 역직렬화가 첫 누락에서 바로 실패해 버리므로, 누락 검사는
/// missing_fields()가 전체를 한 번에 수행합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestFile {
    /// 표시 이름
    pub name: Option<String>,

    /// 고유 패키지 식별자 (예: "org.quillcode.theme-dark")
    #[serde(rename = "package")]
    pub package_id: Option<String>,

    /// 생성할 구현체를 가리키는 entry point 참조
    pub entry_point: Option<String>,

    /// 작성자
    pub author: Option<String>,

    /// 단조 증가하는 버전 코드
    pub version_code: Option<u64>,

    /// 버전 표시 이름
    pub version_name: Option<String>,

    /// 지원하는 최소 호스트 버전
    pub min_host_version: Option<String>,

    /// 설명
    pub description: Option<String>,

    /// 외부 링크 (홈페이지/저장소)
    pub link: Option<String>,

    /// 구독하는 이벤트 이름 목록 (선택)
    pub events: Option<Vec<String>>,

    /// 테마 참조 (선택)
    pub theme: Option<String>,
}

impl ManifestFile {
    /// 바이트에서 파싱
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| Error::MalformedMetadata(e.to_string()))?;
        toml::from_str(text).map_err(|e| Error::MalformedMetadata(e.to_string()))
    }

    /// 필수 필드 무결성 검사
    ///
    /// 비어 있는 필수 필드의 이름 전체를 반환합니다. 첫 누락에서 중단하지
    /// 않으므로 호출자는 모든 문제를 한 번에 보고할 수 있습니다.
    /// 빈 집합이면 온전한 description입니다.
    pub fn missing_fields(&self) -> BTreeSet<&'static str> {
        let mut missing = BTreeSet::new();

        if is_blank(&self.name) {
            missing.insert("name");
        }
        if is_blank(&self.package_id) {
            missing.insert("package");
        }
        if is_blank(&self.entry_point) {
            missing.insert("entry_point");
        }
        if is_blank(&self.author) {
            missing.insert("author");
        }
        if self.version_code.is_none() {
            missing.insert("version_code");
        }
        if is_blank(&self.version_name) {
            missing.insert("version_name");
        }
        if is_blank(&self.min_host_version) {
            missing.insert("min_host_version");
        }
        if is_blank(&self.description) {
            missing.insert("description");
        }
        if is_blank(&self.link) {
            missing.insert("link");
        }

        missing
    }

    /// 검증된 AddonManifest로 변환
    pub fn into_manifest(self) -> Result<AddonManifest> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(Error::IncompleteDescription(
                missing.into_iter().map(String::from).collect(),
            ));
        }

        Ok(AddonManifest {
            name: self.name.unwrap_or_default(),
            package_id: self.package_id.unwrap_or_default(),
            entry_point: self.entry_point.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            version_code: self.version_code.unwrap_or_default(),
            version_name: self.version_name.unwrap_or_default(),
            min_host_version: self.min_host_version.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            events: self.events.unwrap_or_default(),
            theme: self.theme,
        })
    }
}

/// 필수 문자열 필드는 키가 없어도, 값이 공백이어도 누락으로 취급
fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

// ============================================================================
// AddonManifest - 검증이 끝난 Description Record
// ============================================================================

/// 검증이 끝난 애드온 메타데이터
///
/// 생성 이후 불변이며, 소유한 애드온이 내려갈 때 함께 버려집니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonManifest {
    /// 표시 이름
    pub name: String,

    /// 고유 패키지 식별자 - 로드된 애드온 전체에서 유일해야 하는 키
    pub package_id: String,

    /// 생성할 구현체를 가리키는 entry point 참조
    pub entry_point: String,

    /// 작성자
    pub author: String,

    /// 단조 증가하는 버전 코드
    pub version_code: u64,

    /// 버전 표시 이름
    pub version_name: String,

    /// 지원하는 최소 호스트 버전
    pub min_host_version: String,

    /// 설명
    pub description: String,

    /// 외부 링크
    pub link: String,

    /// 구독하는 이벤트 이름 목록 (비어 있을 수 있음)
    pub events: Vec<String>,

    /// 테마 참조 (선택)
    pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETE: &str = r#"
name = "Dark Theme"
package = "org.quillcode.theme-dark"
entry_point = "quill.theme.dark"
author = "Quill Team"
version_code = 3
version_name = "1.2.0"
min_host_version = "0.1.0"
description = "A dark appearance pack"
link = "https://quillcode.dev/addons/theme-dark"
events = ["editor.opened", "editor.saved"]
theme = "dark"
"#;

    #[test]
    fn test_parse_complete_manifest() {
        let file = ManifestFile::parse(COMPLETE.as_bytes()).unwrap();
        assert!(file.missing_fields().is_empty());

        let manifest = file.into_manifest().unwrap();
        assert_eq!(manifest.package_id, "org.quillcode.theme-dark");
        assert_eq!(manifest.entry_point, "quill.theme.dark");
        assert_eq!(manifest.version_code, 3);
        assert_eq!(manifest.events, vec!["editor.opened", "editor.saved"]);
        assert_eq!(manifest.theme, Some("dark".to_string()));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let toml = r#"
name = "Minimal"
package = "org.quillcode.minimal"
entry_point = "quill.minimal"
author = "Quill Team"
version_code = 1
version_name = "0.1.0"
min_host_version = "0.1.0"
description = "No optional fields"
link = "https://quillcode.dev"
"#;
        let manifest = ManifestFile::parse(toml.as_bytes())
            .unwrap()
            .into_manifest()
            .unwrap();

        assert!(manifest.events.is_empty());
        assert!(manifest.theme.is_none());
    }

    #[test]
    fn test_missing_fields_reports_all_at_once() {
        let toml = r#"
name = "Broken"
package = "org.quillcode.broken"
entry_point = "quill.broken"
version_code = 1
version_name = "0.1.0"
min_host_version = "0.1.0"
description = "author and link are gone"
"#;
        let file = ManifestFile::parse(toml.as_bytes()).unwrap();
        let missing = file.missing_fields();

        // 부분 집합이 아니라 정확히 {author, link}
        assert_eq!(missing, BTreeSet::from(["author", "link"]));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let toml = r#"
name = ""
package = "org.quillcode.blank"
entry_point = "quill.blank"
author = "   "
version_code = 1
version_name = "0.1.0"
min_host_version = "0.1.0"
description = "blank name and author"
link = "https://quillcode.dev"
"#;
        let file = ManifestFile::parse(toml.as_bytes()).unwrap();

        assert_eq!(file.missing_fields(), BTreeSet::from(["author", "name"]));
    }

    #[test]
    fn test_into_manifest_rejects_incomplete() {
        let file = ManifestFile::parse(b"name = \"Only Name\"").unwrap();
        let err = file.into_manifest().unwrap_err();

        match err {
            Error::IncompleteDescription(missing) => {
                assert!(missing.contains("package"));
                assert!(missing.contains("entry_point"));
                assert!(!missing.contains("name"));
            }
            other => panic!("Expected IncompleteDescription, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = ManifestFile::parse(b"name = [unterminated").unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)));
    }

    #[test]
    fn test_empty_file_is_parseable_but_incomplete() {
        // 빈 TOML은 문법적으로 유효함 - 무결성 검사가 잡아야 함
        let file = ManifestFile::parse(b"").unwrap();
        assert_eq!(file.missing_fields().len(), 9);
    }
}
