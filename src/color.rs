use image::Rgba;
use std::str::FromStr;

/// Opaque white, the canvas fill for icons without an explicit brand color.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Parse a CSS color string (`#3b82f6`, `rgb(...)`, named colors) into an
/// opaque RGBA pixel. Falls back to white on unparseable input so a bad
/// branding record degrades to a neutral canvas instead of failing the batch.
pub fn parse_css_color(color: &str) -> Rgba<u8> {
    css_color::Srgb::from_str(color.trim())
        .map(|c| {
            Rgba([
                (c.red * 255.) as u8,
                (c.green * 255.) as u8,
                (c.blue * 255.) as u8,
                255,
            ])
        })
        .unwrap_or(WHITE)
}

/// Strict variant for the HTTP surface: rejects instead of falling back, so
/// an admin typo in `themeColor` surfaces as a 400 rather than a white icon.
pub fn parse_css_color_strict(color: &str) -> Option<Rgba<u8>> {
    css_color::Srgb::from_str(color.trim()).ok().map(|c| {
        Rgba([
            (c.red * 255.) as u8,
            (c.green * 255.) as u8,
            (c.blue * 255.) as u8,
            255,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_css_color("#3b82f6"), Rgba([0x3b, 0x82, 0xf6, 255]));
        assert_eq!(parse_css_color("#fff"), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_css_color("  #000000 "), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn falls_back_to_white_on_garbage() {
        assert_eq!(parse_css_color("not-a-color"), WHITE);
        assert_eq!(parse_css_color(""), WHITE);
    }

    #[test]
    fn strict_parse_rejects_garbage() {
        assert!(parse_css_color_strict("#3b82f6").is_some());
        assert!(parse_css_color_strict("chartreuse-ish").is_none());
    }
}
