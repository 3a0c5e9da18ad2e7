//! Web app manifest and HTML head-tag generation.
//!
//! This module defines typed structures mirroring the W3C web-app-manifest
//! members this pipeline populates, plus the `<link>`/`<meta>` tag set an
//! organization's PWA shell embeds: favicon links, apple-touch-icon, and
//! one `apple-touch-startup-image` link per splash dimension pair.

use serde::Serialize;

use crate::planner::{ArtifactKind, ArtifactSpec, IconPurpose};

/// Branding inputs for the manifest, supplied by the organization record or
/// the admin generator form.
#[derive(Debug, Clone)]
pub struct ManifestConfig {
    pub app_name: String,
    pub short_name: String,
    pub description: String,
    pub background_color: String,
    pub theme_color: String,
}

/// Root structure of a generated `manifest.json`.
#[derive(Serialize, Debug, Clone)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

/// One entry of the manifest `icons` member.
#[derive(Serialize, Debug, Clone)]
pub struct ManifestIcon {
    /// URL or path of the icon file
    pub src: String,

    /// Space-separated size list; always a single `WxH` token here
    pub sizes: String,

    /// MIME type of the icon
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Icon purpose (`any`, `maskable`); omitted for plain entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Build a manifest from the icon half of a generation plan. `artifacts`
/// pairs each spec with the href the caller wants embedded (public storage
/// URL for the org flow, relative path for the admin generator).
pub fn build_manifest(config: &ManifestConfig, artifacts: &[(ArtifactSpec, String)]) -> WebManifest {
    let icons = artifacts
        .iter()
        .filter(|(spec, _)| spec.kind == ArtifactKind::Icon)
        .map(|(spec, href)| ManifestIcon {
            src: href.clone(),
            sizes: format!("{}x{}", spec.width, spec.height),
            mime_type: spec.format.mime_type().to_string(),
            purpose: spec.purpose.map(|p| match p {
                IconPurpose::Any => "any".to_string(),
                IconPurpose::Maskable => "maskable".to_string(),
            }),
        })
        .collect();

    WebManifest {
        name: config.app_name.clone(),
        short_name: config.short_name.clone(),
        description: config.description.clone(),
        start_url: "/".to_string(),
        display: "standalone".to_string(),
        background_color: config.background_color.clone(),
        theme_color: config.theme_color.clone(),
        icons,
    }
}

/// Render the HTML head tags for the generated asset set.
pub fn build_html_tags(config: &ManifestConfig, artifacts: &[(ArtifactSpec, String)]) -> Vec<String> {
    let mut tags = Vec::new();

    tags.push(format!(
        r#"<meta name="theme-color" content="{}">"#,
        config.theme_color
    ));
    tags.push(r#"<meta name="apple-mobile-web-app-capable" content="yes">"#.to_string());
    tags.push(format!(
        r#"<meta name="apple-mobile-web-app-title" content="{}">"#,
        config.short_name
    ));
    tags.push(r#"<link rel="manifest" href="/manifest.json">"#.to_string());

    for (spec, href) in artifacts {
        match spec.kind {
            ArtifactKind::Icon => {
                // Maskable variants live only in the manifest; the head
                // tags reference the plain-purpose icons.
                if spec.purpose == Some(IconPurpose::Maskable) {
                    continue;
                }
                if spec.width == 180 {
                    tags.push(format!(
                        r#"<link rel="apple-touch-icon" sizes="180x180" href="{href}">"#
                    ));
                } else if spec.width <= 48 {
                    tags.push(format!(
                        r#"<link rel="icon" type="image/png" sizes="{w}x{h}" href="{href}">"#,
                        w = spec.width,
                        h = spec.height,
                    ));
                }
            }
            ArtifactKind::Splash => {
                let orientation = if spec.width < spec.height {
                    "portrait"
                } else {
                    "landscape"
                };
                tags.push(format!(
                    r#"<link rel="apple-touch-startup-image" media="(device-width: {w}px) and (device-height: {h}px) and (orientation: {orientation})" href="{href}">"#,
                    w = spec.width,
                    h = spec.height,
                ));
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan_generation;

    fn config() -> ManifestConfig {
        ManifestConfig {
            app_name: "Brew Rewards".to_string(),
            short_name: "Brew".to_string(),
            description: "Collect stamps, earn coffee.".to_string(),
            background_color: "#ffffff".to_string(),
            theme_color: "#3b82f6".to_string(),
        }
    }

    fn artifacts() -> Vec<(ArtifactSpec, String)> {
        plan_generation("org-1")
            .into_iter()
            .map(|spec| {
                let href = format!("/{}", spec.storage_path);
                (spec, href)
            })
            .collect()
    }

    #[test]
    fn manifest_icons_match_planner_catalog() {
        let artifacts = artifacts();
        let icon_count = artifacts
            .iter()
            .filter(|(s, _)| s.kind == ArtifactKind::Icon)
            .count();
        let manifest = build_manifest(&config(), &artifacts);
        assert_eq!(manifest.icons.len(), icon_count);
        assert_eq!(manifest.display, "standalone");

        let maskable: Vec<_> = manifest
            .icons
            .iter()
            .filter(|i| i.purpose.as_deref() == Some("maskable"))
            .collect();
        assert_eq!(maskable.len(), 2);
        assert!(maskable.iter().all(|i| i.src.contains("icon-maskable-")));
    }

    #[test]
    fn manifest_serializes_with_web_member_names() {
        let manifest = build_manifest(&config(), &artifacts());
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["short_name"], "Brew");
        assert_eq!(json["icons"][0]["type"], "image/png");
        assert!(json["icons"][0].get("purpose").is_some());
    }

    #[test]
    fn html_tags_cover_splash_dimensions() {
        let artifacts = artifacts();
        let tags = build_html_tags(&config(), &artifacts);
        let splash_tags: Vec<_> = tags
            .iter()
            .filter(|t| t.contains("apple-touch-startup-image"))
            .collect();
        assert_eq!(splash_tags.len(), crate::planner::SPLASH_DIMENSIONS.len());
        assert!(splash_tags
            .iter()
            .any(|t| t.contains("device-width: 1170px") && t.contains("portrait")));
        assert!(tags.iter().any(|t| t.contains("apple-touch-icon")));
        assert!(tags.iter().any(|t| t.contains(r#"name="theme-color""#)));
    }
}
