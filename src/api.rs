//! HTTP surface: organization asset generate/delete plus the admin-only
//! PWA asset generator.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::color::parse_css_color_strict;
use crate::error::{AssetError, Result};
use crate::manifest::{build_html_tags, build_manifest, ManifestConfig, WebManifest};
use crate::planner::{plan_generation, ArtifactKind, ArtifactSpec};
use crate::synchronizer::{
    synthesize_artifact, AssetGenerationResult, DeleteSummary, GenerateRequest, Synchronizer,
};
use crate::synthesizer::decode_logo;

/// Externally-provided identity lookup for the admin generator endpoint.
#[async_trait::async_trait]
pub trait AdminDirectory: Send + Sync {
    async fn is_admin(&self, bearer_token: &str) -> bool;
}

/// Directory backed by a single configured token, for deployments where the
/// admin identity provider is out of process.
pub struct StaticTokenDirectory {
    token: String,
}

impl StaticTokenDirectory {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait::async_trait]
impl AdminDirectory for StaticTokenDirectory {
    async fn is_admin(&self, bearer_token: &str) -> bool {
        !self.token.is_empty() && bearer_token == self.token
    }
}

pub struct AppState {
    pub synchronizer: Synchronizer,
    pub admins: Arc<dyn AdminDirectory>,
}

/// Multipart upload limit; logos beyond this are rejected before synthesis.
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/organizations/:org_id/assets",
            post(generate_assets).delete(delete_assets),
        )
        .route("/api/admin/pwa-assets", post(admin_generate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Run the full generate operation for one organization. Failures surface
/// in the structured result body, never as an unhandled error.
async fn generate_assets(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<String>,
    Json(request): Json<GenerateRequest>,
) -> Json<AssetGenerationResult> {
    Json(state.synchronizer.generate(&org_id, &request).await)
}

async fn delete_assets(
    State(state): State<Arc<AppState>>,
    Path(org_id): Path<String>,
) -> Result<Json<DeleteSummary>> {
    Ok(Json(state.synchronizer.delete(&org_id).await?))
}

/// Response body of the admin generator: everything needed to wire a PWA
/// shell by hand, without touching object storage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminGenerateResponse {
    pub manifest: WebManifest,
    /// Base64-encoded PNG per icon dimension key.
    pub icons: BTreeMap<String, String>,
    /// Base64-encoded JPEG per splash dimension key; empty when splash
    /// generation was not requested.
    pub splash_screens: BTreeMap<String, String>,
    pub html_tags: Vec<String>,
}

#[derive(Default)]
struct AdminForm {
    logo: Option<bytes::Bytes>,
    app_name: String,
    short_name: String,
    description: String,
    background_color: String,
    theme_color: String,
    generate_splash: bool,
}

/// Admin-triggered generator: accepts a multipart logo upload and branding
/// fields, returns base64 assets plus manifest and head tags. Authorization
/// is checked before any synthesis work happens.
async fn admin_generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<AdminGenerateResponse>> {
    let token = bearer_token(&headers).unwrap_or_default();
    if !state.admins.is_admin(token).await {
        return Err(AssetError::Unauthorized);
    }

    let form = read_admin_form(multipart).await?;

    let theme = parse_css_color_strict(&form.theme_color)
        .ok_or_else(|| AssetError::InvalidRequest(format!("bad themeColor: {}", form.theme_color)))?;
    let background = parse_css_color_strict(&form.background_color).ok_or_else(|| {
        AssetError::InvalidRequest(format!("bad backgroundColor: {}", form.background_color))
    })?;

    let logo = match &form.logo {
        Some(bytes) => Some(decode_logo(bytes)?),
        None => None,
    };

    let config = ManifestConfig {
        app_name: form.app_name,
        short_name: form.short_name,
        description: form.description,
        background_color: form.background_color,
        theme_color: form.theme_color,
    };

    let generate_splash = form.generate_splash;
    let response = tokio::task::spawn_blocking(move || -> Result<AdminGenerateResponse> {
        let mut icons = BTreeMap::new();
        let mut splash_screens = BTreeMap::new();
        let mut artifacts: Vec<(ArtifactSpec, String)> = Vec::new();

        for spec in plan_generation("preview") {
            match spec.kind {
                ArtifactKind::Icon => {
                    let bytes = synthesize_artifact(&spec, logo.as_ref(), theme)?;
                    icons.insert(spec.dimension_key(), BASE64.encode(&bytes));
                }
                ArtifactKind::Splash => {
                    if !generate_splash {
                        continue;
                    }
                    let bytes = synthesize_artifact(&spec, logo.as_ref(), background)?;
                    splash_screens.insert(spec.dimension_key(), BASE64.encode(&bytes));
                }
            }
            let href = relative_href(&spec);
            artifacts.push((spec, href));
        }

        let manifest = build_manifest(&config, &artifacts);
        let html_tags = build_html_tags(&config, &artifacts);

        Ok(AdminGenerateResponse {
            manifest,
            icons,
            splash_screens,
            html_tags,
        })
    })
    .await
    .map_err(|e| AssetError::Internal(e.to_string()))??;

    Ok(Json(response))
}

/// Rewrite a storage path to the relative href the admin response embeds:
/// `organizations/preview/icons/icon-192x192.png` -> `/icons/icon-192x192.png`.
fn relative_href(spec: &ArtifactSpec) -> String {
    let file = spec
        .storage_path
        .rsplit('/')
        .next()
        .unwrap_or(&spec.storage_path);
    let dir = match spec.kind {
        ArtifactKind::Icon => "icons",
        ArtifactKind::Splash => "splash",
    };
    format!("/{dir}/{file}")
}

async fn read_admin_form(mut multipart: Multipart) -> Result<AdminForm> {
    let mut form = AdminForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AssetError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "logo" => {
                form.logo = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AssetError::InvalidRequest(e.to_string()))?,
                );
            }
            "appName" => form.app_name = read_text(field).await?,
            "shortName" => form.short_name = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            "backgroundColor" => form.background_color = read_text(field).await?,
            "themeColor" => form.theme_color = read_text(field).await?,
            "generateSplash" => {
                form.generate_splash = read_text(field).await?.trim() == "true";
            }
            _ => {}
        }
    }

    if form.app_name.is_empty() {
        return Err(AssetError::InvalidRequest("appName is required".to_string()));
    }
    if form.background_color.is_empty() {
        form.background_color = "#ffffff".to_string();
    }
    if form.theme_color.is_empty() {
        form.theme_color = "#ffffff".to_string();
    }
    if form.short_name.is_empty() {
        form.short_name = form.app_name.clone();
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AssetError::InvalidRequest(e.to_string()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
