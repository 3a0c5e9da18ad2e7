//! Canonical artifact catalog and deterministic storage paths.
//!
//! Every icon size and splash dimension the pipeline ever produces is listed
//! here, once. Generation and deletion both derive their path sets from the
//! same plan, so a generate followed by a delete always touches exactly the
//! same keys.

use serde::Serialize;

/// PWA icon sizes with purpose `any`, in catalog order.
pub const ICON_SIZES: &[u32] = &[16, 32, 48, 64, 72, 96, 128, 144, 152, 180, 192, 384, 512];

/// Sizes that additionally get a maskable variant (Android adaptive icons).
pub const MASKABLE_SIZES: &[u32] = &[192, 512];

/// Apple splash-screen dimensions, portrait then landscape, one entry per
/// supported device class. The landscape half mirrors the portrait half;
/// both are written out literally so the catalog stays a constant.
pub const SPLASH_DIMENSIONS: &[(u32, u32)] = &[
    // Portrait
    (640, 1136),
    (750, 1334),
    (828, 1792),
    (1080, 2340),
    (1125, 2436),
    (1170, 2532),
    (1179, 2556),
    (1242, 2688),
    (1284, 2778),
    (1290, 2796),
    (1536, 2048),
    (1668, 2388),
    (2048, 2732),
    // Landscape
    (1136, 640),
    (1334, 750),
    (1792, 828),
    (2340, 1080),
    (2436, 1125),
    (2532, 1170),
    (2556, 1179),
    (2688, 1242),
    (2778, 1284),
    (2796, 1290),
    (2048, 1536),
    (2388, 1668),
    (2732, 2048),
];

/// What kind of artifact a spec describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Icon,
    Splash,
}

/// Icon purpose, mirroring the `purpose` member of a web-manifest icon entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconPurpose {
    Any,
    Maskable,
}

/// Encoding applied to a finished artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// One planned output artifact: dimensions, purpose, format and the storage
/// key it will live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<IconPurpose>,
    pub format: OutputFormat,
    pub storage_path: String,
}

impl ArtifactSpec {
    /// Human-readable key used in result maps and manifest entries:
    /// `"192x192"`, `"maskable-192x192"`, `"1170-2532"`.
    pub fn dimension_key(&self) -> String {
        match (self.kind, self.purpose) {
            (ArtifactKind::Icon, Some(IconPurpose::Maskable)) => {
                format!("maskable-{}x{}", self.width, self.height)
            }
            (ArtifactKind::Icon, _) => format!("{}x{}", self.width, self.height),
            (ArtifactKind::Splash, _) => format!("{}-{}", self.width, self.height),
        }
    }
}

fn icon_path(org_id: &str, size: u32, purpose: IconPurpose) -> String {
    match purpose {
        IconPurpose::Any => format!("organizations/{org_id}/icons/icon-{size}x{size}.png"),
        IconPurpose::Maskable => {
            format!("organizations/{org_id}/icons/icon-maskable-{size}x{size}.png")
        }
    }
}

fn splash_path(org_id: &str, width: u32, height: u32) -> String {
    format!("organizations/{org_id}/splash/apple-splash-{width}-{height}.jpg")
}

/// Enumerate the full artifact catalog for one organization, icons first.
pub fn plan_generation(org_id: &str) -> Vec<ArtifactSpec> {
    let mut specs = Vec::with_capacity(
        ICON_SIZES.len() + MASKABLE_SIZES.len() + SPLASH_DIMENSIONS.len(),
    );

    for &size in ICON_SIZES {
        specs.push(ArtifactSpec {
            kind: ArtifactKind::Icon,
            width: size,
            height: size,
            purpose: Some(IconPurpose::Any),
            format: OutputFormat::Png,
            storage_path: icon_path(org_id, size, IconPurpose::Any),
        });
    }

    for &size in MASKABLE_SIZES {
        specs.push(ArtifactSpec {
            kind: ArtifactKind::Icon,
            width: size,
            height: size,
            purpose: Some(IconPurpose::Maskable),
            format: OutputFormat::Png,
            storage_path: icon_path(org_id, size, IconPurpose::Maskable),
        });
    }

    for &(width, height) in SPLASH_DIMENSIONS {
        specs.push(ArtifactSpec {
            kind: ArtifactKind::Splash,
            width,
            height,
            purpose: None,
            format: OutputFormat::Jpeg,
            storage_path: splash_path(org_id, width, height),
        });
    }

    specs
}

/// The exact key set `plan_generation` would write, for the delete path.
/// Always derived from the generation plan, never maintained by hand.
pub fn plan_deletion(org_id: &str) -> Vec<String> {
    plan_generation(org_id)
        .into_iter()
        .map(|spec| spec.storage_path)
        .collect()
}
