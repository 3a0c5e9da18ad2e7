//! End-to-end pipeline tests over the in-memory object store: full-catalog
//! generation, idempotent overwrite, generate/delete symmetry, and the
//! fatal-vs-partial failure policy.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use punchcard_assets::planner::{ICON_SIZES, MASKABLE_SIZES, SPLASH_DIMENSIONS};
use punchcard_assets::storage::{MemoryStore, ObjectStore, StorageError, StorageResult};
use punchcard_assets::{plan_deletion, GenerateRequest, Synchronizer};

const PUBLIC_BASE: &str = "https://assets.example.com";

fn catalog_size() -> usize {
    ICON_SIZES.len() + MASKABLE_SIZES.len() + SPLASH_DIMENSIONS.len()
}

fn no_logo_request() -> GenerateRequest {
    GenerateRequest {
        logo_url: None,
        primary_color: Some("#3b82f6".to_string()),
        partial_failure_allowed: false,
    }
}

#[tokio::test]
async fn generate_without_logo_produces_full_catalog() {
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(store.clone(), PUBLIC_BASE);

    let result = sync.generate("org-fallback", &no_logo_request()).await;

    assert!(result.success, "error: {:?}", result.error);
    assert_eq!(
        result.icon_urls.len(),
        ICON_SIZES.len() + MASKABLE_SIZES.len()
    );
    assert_eq!(result.splash_urls.len(), SPLASH_DIMENSIONS.len());
    assert_eq!(store.len(), catalog_size());

    assert_eq!(
        result.icon_urls.get("192x192").map(String::as_str),
        Some("https://assets.example.com/organizations/org-fallback/icons/icon-192x192.png")
    );
    assert!(result.icon_urls.contains_key("maskable-512x512"));
    assert!(result.splash_urls.contains_key("1170-2532"));
}

#[tokio::test]
async fn generated_fallback_icon_decodes_to_requested_size() {
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(store.clone(), PUBLIC_BASE);

    sync.generate("org-px", &no_logo_request()).await;

    let bytes = store
        .get("organizations/org-px/icons/icon-512x512.png")
        .await
        .unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (512, 512));
    // Solid theme-color fill, fully opaque.
    let px = img.to_rgba8().get_pixel(256, 256).0;
    assert_eq!(px, [0x3b, 0x82, 0xf6, 255]);

    let bytes = store
        .get("organizations/org-px/splash/apple-splash-750-1334.jpg")
        .await
        .unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (750, 1334));
}

#[tokio::test]
async fn regenerating_overwrites_in_place() {
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(store.clone(), PUBLIC_BASE);

    let first = sync.generate("org-twice", &no_logo_request()).await;
    let count_after_first = store.len();
    let second = sync.generate("org-twice", &no_logo_request()).await;

    assert!(first.success && second.success);
    assert_eq!(store.len(), count_after_first, "no duplicate objects");

    // Deterministic synthesis: the overwrite is byte-identical.
    let key = "organizations/org-twice/icons/icon-192x192.png";
    let bytes = store.get(key).await.unwrap();
    sync.generate("org-twice", &no_logo_request()).await;
    assert_eq!(store.get(key).await.unwrap(), bytes);
}

#[tokio::test]
async fn delete_after_generate_leaves_no_residue() {
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(store.clone(), PUBLIC_BASE);

    sync.generate("org-gone", &no_logo_request()).await;
    assert_eq!(store.len(), catalog_size());

    let summary = sync.delete("org-gone").await.unwrap();
    assert!(summary.success);
    assert_eq!(
        summary.deleted_icons,
        ICON_SIZES.len() + MASKABLE_SIZES.len()
    );
    assert_eq!(summary.deleted_splash_screens, SPLASH_DIMENSIONS.len());
    assert_eq!(summary.failed_deletions, 0);
    assert!(store.is_empty());

    for path in plan_deletion("org-gone") {
        assert!(!store.exists(&path).await.unwrap(), "residual object {path}");
    }
}

#[tokio::test]
async fn delete_only_touches_the_given_org() {
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(store.clone(), PUBLIC_BASE);

    sync.generate("org-a", &no_logo_request()).await;
    sync.generate("org-b", &no_logo_request()).await;

    sync.delete("org-a").await.unwrap();
    assert_eq!(store.len(), catalog_size());
    assert!(store
        .exists("organizations/org-b/icons/icon-192x192.png")
        .await
        .unwrap());
}

#[tokio::test]
async fn delete_of_absent_org_is_best_effort_success() {
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(store, PUBLIC_BASE);

    let summary = sync.delete("never-generated").await.unwrap();
    assert!(summary.success);
    assert_eq!(summary.failed_deletions, 0);
}

#[tokio::test]
async fn invalid_org_id_is_rejected_before_any_write() {
    let store = Arc::new(MemoryStore::new());
    let sync = Synchronizer::new(store.clone(), PUBLIC_BASE);

    let result = sync.generate("../escape", &no_logo_request()).await;
    assert!(!result.success);
    assert!(store.is_empty());

    assert!(sync.delete("a/b").await.is_err());
}

/// Store wrapper that refuses every splash upload, to exercise the failure
/// policy without faking the image layer.
struct SplashRejectingStore {
    inner: MemoryStore,
}

#[async_trait]
impl ObjectStore for SplashRejectingStore {
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        if key.contains("/splash/") {
            return Err(StorageError::Other("splash uploads disabled".to_string()));
        }
        self.inner.put(key, data).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list(prefix).await
    }
}

#[tokio::test]
async fn upload_failure_is_fatal_by_default() {
    let store = Arc::new(SplashRejectingStore {
        inner: MemoryStore::new(),
    });
    let sync = Synchronizer::new(store, PUBLIC_BASE);

    let result = sync.generate("org-fatal", &no_logo_request()).await;
    assert!(!result.success);
    assert!(result.error.is_some());
    assert!(result.icon_urls.is_empty() && result.splash_urls.is_empty());
}

#[tokio::test]
async fn partial_failure_mode_reports_and_continues() {
    let store = Arc::new(SplashRejectingStore {
        inner: MemoryStore::new(),
    });
    let sync = Synchronizer::new(store, PUBLIC_BASE);

    let mut request = no_logo_request();
    request.partial_failure_allowed = true;
    let result = sync.generate("org-partial", &request).await;

    assert!(result.success);
    assert_eq!(
        result.icon_urls.len(),
        ICON_SIZES.len() + MASKABLE_SIZES.len()
    );
    assert!(result.splash_urls.is_empty());
    assert_eq!(result.failed_artifacts.len(), SPLASH_DIMENSIONS.len());
}
