//! Drives synthesis across the full artifact catalog and keeps the object
//! store in sync, in both directions.
//!
//! Generate: one logo fetch, fan-out synthesis+upload over a bounded pool,
//! batch-fatal by default. Delete: best-effort removal of the same key set,
//! per-item failures logged and counted, never fatal.

use bytes::Bytes;
use futures::{stream, StreamExt};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::color::parse_css_color;
use crate::error::{AssetError, Result};
use crate::fetch::{fetch_logo, logo_client};
use crate::planner::{plan_generation, ArtifactKind, ArtifactSpec, IconPurpose};
use crate::storage::ObjectStore;
use crate::synthesizer::{decode_logo, synthesize_icon, synthesize_splash};

/// Default width of the synthesis/upload worker pool.
pub const DEFAULT_FAN_OUT: usize = 8;

/// One branding-update request from the organization flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    /// When set, a failing artifact is reported and skipped instead of
    /// failing the whole batch.
    #[serde(default)]
    pub partial_failure_allowed: bool,
}

/// Aggregate outcome of a generate operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGenerationResult {
    pub success: bool,
    /// Public URL per icon, keyed by `"192x192"` / `"maskable-192x192"`.
    pub icon_urls: BTreeMap<String, String>,
    /// Public URL per splash screen, keyed by `"1170-2532"`.
    pub splash_urls: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Dimension keys that failed, only populated in partial-failure mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_artifacts: Vec<String>,
}

impl AssetGenerationResult {
    fn failed(error: String) -> Self {
        Self {
            success: false,
            icon_urls: BTreeMap::new(),
            splash_urls: BTreeMap::new(),
            error: Some(error),
            failed_artifacts: Vec::new(),
        }
    }
}

/// Aggregate outcome of a delete operation. Delete is best-effort, so
/// `success` is always true; failures only show up in the count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSummary {
    pub success: bool,
    pub deleted_icons: usize,
    pub deleted_splash_screens: usize,
    pub failed_deletions: usize,
}

pub struct Synchronizer {
    store: Arc<dyn ObjectStore>,
    public_base: String,
    fan_out: usize,
    http: reqwest::Client,
}

impl Synchronizer {
    pub fn new(store: Arc<dyn ObjectStore>, public_base: impl Into<String>) -> Self {
        Self {
            store,
            public_base: public_base.into(),
            fan_out: DEFAULT_FAN_OUT,
            http: logo_client(),
        }
    }

    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out.max(1);
        self
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), path)
    }

    /// Generate and upload the full artifact catalog for one organization.
    ///
    /// A logo that cannot be fetched or decoded downgrades the whole batch
    /// to solid-color fallback rendering; it never aborts the operation.
    pub async fn generate(&self, org_id: &str, request: &GenerateRequest) -> AssetGenerationResult {
        if let Err(e) = validate_org_id(org_id) {
            return AssetGenerationResult::failed(e.to_string());
        }

        let logo = Arc::new(self.resolve_logo(request.logo_url.as_deref()).await);
        let color = parse_css_color(request.primary_color.as_deref().unwrap_or("#ffffff"));

        let outcomes = stream::iter(plan_generation(org_id))
            .map(|spec| {
                let logo = Arc::clone(&logo);
                let store = Arc::clone(&self.store);
                async move {
                    let outcome = synthesize_and_upload(&store, &spec, logo, color).await;
                    (spec, outcome)
                }
            })
            .buffer_unordered(self.fan_out)
            .collect::<Vec<_>>()
            .await;

        let mut result = AssetGenerationResult {
            success: true,
            icon_urls: BTreeMap::new(),
            splash_urls: BTreeMap::new(),
            error: None,
            failed_artifacts: Vec::new(),
        };

        for (spec, outcome) in outcomes {
            match outcome {
                Ok(()) => {
                    let url = self.public_url(&spec.storage_path);
                    match spec.kind {
                        ArtifactKind::Icon => result.icon_urls.insert(spec.dimension_key(), url),
                        ArtifactKind::Splash => result.splash_urls.insert(spec.dimension_key(), url),
                    };
                }
                Err(e) if request.partial_failure_allowed => {
                    warn!(path = %spec.storage_path, error = %e, "artifact failed, continuing");
                    result.failed_artifacts.push(spec.dimension_key());
                }
                Err(e) => {
                    return AssetGenerationResult::failed(format!(
                        "{} failed: {e}",
                        spec.storage_path
                    ));
                }
            }
        }

        if result.icon_urls.is_empty() && result.splash_urls.is_empty() {
            result.success = false;
            result.error = Some("every artifact failed".to_string());
        }

        result
    }

    /// Remove every artifact the generate path could have written for this
    /// organization. Missing objects are not errors.
    pub async fn delete(&self, org_id: &str) -> Result<DeleteSummary> {
        validate_org_id(org_id)?;

        let mut summary = DeleteSummary {
            success: true,
            deleted_icons: 0,
            deleted_splash_screens: 0,
            failed_deletions: 0,
        };

        for spec in plan_generation(org_id) {
            match self.store.delete(&spec.storage_path).await {
                Ok(()) => match spec.kind {
                    ArtifactKind::Icon => summary.deleted_icons += 1,
                    ArtifactKind::Splash => summary.deleted_splash_screens += 1,
                },
                Err(e) => {
                    warn!(path = %spec.storage_path, error = %e, "delete failed, continuing");
                    summary.failed_deletions += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Fetch and decode the logo once for the whole batch. Either step
    /// failing falls back to no-logo rendering.
    async fn resolve_logo(&self, logo_url: Option<&str>) -> Option<DynamicImage> {
        let url = logo_url?;
        let bytes = match fetch_logo(&self.http, url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url, error = %e, "logo fetch failed, using fallback rendering");
                return None;
            }
        };
        match decode_logo(&bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(url, error = %e, "logo is not a decodable image, using fallback rendering");
                None
            }
        }
    }
}

fn validate_org_id(org_id: &str) -> Result<()> {
    if org_id.is_empty() || org_id.contains('/') || org_id.contains("..") {
        return Err(AssetError::InvalidRequest(format!(
            "invalid organization id: {org_id:?}"
        )));
    }
    Ok(())
}

async fn synthesize_and_upload(
    store: &Arc<dyn ObjectStore>,
    spec: &ArtifactSpec,
    logo: Arc<Option<DynamicImage>>,
    color: image::Rgba<u8>,
) -> Result<()> {
    // Raster work is CPU-bound; keep it off the async workers.
    let task_spec = spec.clone();
    let bytes = tokio::task::spawn_blocking(move || synthesize_artifact(&task_spec, logo.as_ref().as_ref(), color))
        .await
        .map_err(|e| AssetError::Internal(e.to_string()))??;

    store.put(&spec.storage_path, Bytes::from(bytes)).await?;
    debug!(path = %spec.storage_path, "uploaded artifact");
    Ok(())
}

/// Synthesize the bytes for one planned artifact.
pub fn synthesize_artifact(
    spec: &ArtifactSpec,
    logo: Option<&DynamicImage>,
    color: image::Rgba<u8>,
) -> Result<Vec<u8>> {
    match spec.kind {
        ArtifactKind::Icon => synthesize_icon(
            logo,
            spec.width,
            spec.purpose == Some(IconPurpose::Maskable),
            color,
        ),
        ArtifactKind::Splash => synthesize_splash(logo, spec.width, spec.height, color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_shaped_org_ids() {
        assert!(validate_org_id("org-1").is_ok());
        assert!(validate_org_id("").is_err());
        assert!(validate_org_id("a/b").is_err());
        assert!(validate_org_id("..").is_err());
    }

    #[test]
    fn generate_request_accepts_camel_case_json() {
        let req: GenerateRequest = serde_json::from_str(
            r##"{"logoUrl":"https://cdn.example.com/logo.png","primaryColor":"#3b82f6"}"##,
        )
        .unwrap();
        assert_eq!(req.logo_url.as_deref(), Some("https://cdn.example.com/logo.png"));
        assert!(!req.partial_failure_allowed);
    }
}
