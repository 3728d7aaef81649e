//! Built-in theme value tables.

use super::{CodeTheme, Color, ColorTheme, ThemeSystem};

/// Id of the color theme used when none (or an unknown one) is requested.
pub const DEFAULT_COLOR_THEME: &str = "emerald";
/// Id of the default code theme.
pub const DEFAULT_CODE_THEME: &str = "github-light";
/// Id of the default theme system.
pub const DEFAULT_THEME_SYSTEM: &str = "classic";

// ─────────────────────────────────────────────────────────────────────────────
// Color Themes
// ─────────────────────────────────────────────────────────────────────────────

/// Light palette sharing neutrals across the accent presets.
fn light_palette(id: &str, name: &str, primary: Color) -> ColorTheme {
    ColorTheme {
        id: id.to_string(),
        name: name.to_string(),
        primary,
        text: Color::from_rgb(0x33, 0x33, 0x33),
        text_muted: Color::from_rgb(0x88, 0x88, 0x88),
        background: Color::from_rgb(0xff, 0xff, 0xff),
        border: Color::from_rgb(0xe5, 0xe7, 0xeb),
        surface: Color::from_rgb(0xf7, 0xf8, 0xfa),
        inline_code_bg: Color::from_rgb(0xf3, 0xf4, 0xf6),
        inline_code_text: Color::from_rgb(0xd1, 0x4d, 0x5a),
        highlight: Color::from_rgb(0xff, 0xf3, 0xb0),
    }
}

/// All built-in color themes. The first entry is the default.
pub fn color_themes() -> Vec<ColorTheme> {
    vec![
        light_palette("emerald", "Emerald", Color::from_rgb(0x00, 0xa8, 0x6b)),
        light_palette("ocean", "Ocean", Color::from_rgb(0x1e, 0x88, 0xe5)),
        light_palette("sunset", "Sunset", Color::from_rgb(0xf4, 0x51, 0x1e)),
        light_palette("grape", "Grape", Color::from_rgb(0x8e, 0x24, 0xaa)),
        light_palette("graphite", "Graphite", Color::from_rgb(0x45, 0x5a, 0x64)),
        ColorTheme {
            id: "midnight".to_string(),
            name: "Midnight".to_string(),
            primary: Color::from_rgb(0x64, 0xb5, 0xf6),
            text: Color::from_rgb(0xdd, 0xdd, 0xdd),
            text_muted: Color::from_rgb(0x9e, 0x9e, 0x9e),
            background: Color::from_rgb(0x1e, 0x1e, 0x1e),
            border: Color::from_rgb(0x3c, 0x3c, 0x3c),
            surface: Color::from_rgb(0x25, 0x25, 0x25),
            inline_code_bg: Color::from_rgb(0x2d, 0x2d, 0x2d),
            inline_code_text: Color::from_rgb(0xf7, 0x8c, 0x6c),
            highlight: Color::from_rgb(0x5c, 0x4b, 0x00),
        },
    ]
}

/// The default color theme record.
pub fn default_color_theme() -> ColorTheme {
    light_palette("emerald", "Emerald", Color::from_rgb(0x00, 0xa8, 0x6b))
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Themes
// ─────────────────────────────────────────────────────────────────────────────

/// All built-in code themes. The first entry is the default.
pub fn code_themes() -> Vec<CodeTheme> {
    vec![
        default_code_theme(),
        CodeTheme {
            id: "one-dark".to_string(),
            background: Color::from_rgb(0x28, 0x2c, 0x34),
            foreground: Color::from_rgb(0xab, 0xb2, 0xbf),
            comment: Color::from_rgb(0x5c, 0x63, 0x70),
            keyword: Color::from_rgb(0xc6, 0x78, 0xdd),
            string: Color::from_rgb(0x98, 0xc3, 0x79),
            number: Color::from_rgb(0xd1, 0x9a, 0x66),
            function: Color::from_rgb(0x61, 0xaf, 0xef),
            border: Color::from_rgb(0x21, 0x25, 0x2b),
            show_dots: true,
            show_header: true,
        },
        CodeTheme {
            id: "monokai".to_string(),
            background: Color::from_rgb(0x27, 0x28, 0x22),
            foreground: Color::from_rgb(0xf8, 0xf8, 0xf2),
            comment: Color::from_rgb(0x75, 0x71, 0x5e),
            keyword: Color::from_rgb(0xf9, 0x26, 0x72),
            string: Color::from_rgb(0xe6, 0xdb, 0x74),
            number: Color::from_rgb(0xae, 0x81, 0xff),
            function: Color::from_rgb(0xa6, 0xe2, 0x2e),
            border: Color::from_rgb(0x1e, 0x1f, 0x1c),
            show_dots: true,
            show_header: false,
        },
        CodeTheme {
            id: "solarized-light".to_string(),
            background: Color::from_rgb(0xfd, 0xf6, 0xe3),
            foreground: Color::from_rgb(0x65, 0x7b, 0x83),
            comment: Color::from_rgb(0x93, 0xa1, 0xa1),
            keyword: Color::from_rgb(0x85, 0x99, 0x00),
            string: Color::from_rgb(0x2a, 0xa1, 0x98),
            number: Color::from_rgb(0xd3, 0x36, 0x82),
            function: Color::from_rgb(0x26, 0x8b, 0xd2),
            border: Color::from_rgb(0xee, 0xe8, 0xd5),
            show_dots: false,
            show_header: false,
        },
    ]
}

/// The default code theme record.
pub fn default_code_theme() -> CodeTheme {
    CodeTheme {
        id: "github-light".to_string(),
        background: Color::from_rgb(0xf6, 0xf8, 0xfa),
        foreground: Color::from_rgb(0x24, 0x29, 0x2e),
        comment: Color::from_rgb(0x6a, 0x73, 0x7d),
        keyword: Color::from_rgb(0xd7, 0x3a, 0x49),
        string: Color::from_rgb(0x03, 0x2f, 0x62),
        number: Color::from_rgb(0x00, 0x5c, 0xc5),
        function: Color::from_rgb(0x6f, 0x42, 0xc1),
        border: Color::from_rgb(0xe1, 0xe4, 0xe8),
        show_dots: false,
        show_header: true,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Systems
// ─────────────────────────────────────────────────────────────────────────────

/// All built-in theme systems. The first entry is the default.
pub fn theme_systems() -> Vec<ThemeSystem> {
    vec![
        default_theme_system(),
        ThemeSystem {
            id: "capsule".to_string(),
            name: "Capsule".to_string(),
            paragraph_spacing: 1.2,
            heading_spacing: 1.2,
            justify: false,
        },
        ThemeSystem {
            id: "magazine".to_string(),
            name: "Magazine".to_string(),
            paragraph_spacing: 1.4,
            heading_spacing: 1.4,
            justify: true,
        },
    ]
}

/// The default theme system record.
pub fn default_theme_system() -> ThemeSystem {
    ThemeSystem {
        id: "classic".to_string(),
        name: "Classic".to_string(),
        paragraph_spacing: 1.0,
        heading_spacing: 1.0,
        justify: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_first_entries() {
        assert_eq!(color_themes()[0], default_color_theme());
        assert_eq!(code_themes()[0], default_code_theme());
        assert_eq!(theme_systems()[0], default_theme_system());
        assert_eq!(default_color_theme().id, DEFAULT_COLOR_THEME);
        assert_eq!(default_code_theme().id, DEFAULT_CODE_THEME);
        assert_eq!(default_theme_system().id, DEFAULT_THEME_SYSTEM);
    }

    #[test]
    fn test_preset_ids_are_unique() {
        let mut ids: Vec<String> = color_themes().into_iter().map(|t| t.id).collect();
        let len = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }

    #[test]
    fn test_emerald_primary() {
        assert_eq!(default_color_theme().primary.to_hex(), "#00a86b");
    }
}
