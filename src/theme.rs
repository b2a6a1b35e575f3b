//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" | "sombre" => Some(Self::Dark),
            "light" | "clair" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Sombre",
            Self::Light => "Clair",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub header_subtitle: Style,
    pub stat_value: Style,
    pub stat_label: Style,

    // -- Filter bar --
    pub search_input: Style,
    pub search_active: Style,
    pub filter_label: Style,
    pub filter_value: Style,
    pub result_count: Style,

    // -- Article cards --
    pub card_border: Style,
    pub card_border_selected: Style,
    pub card_category: Style,
    pub card_title: Style,
    pub card_meta: Style,
    pub card_excerpt: Style,
    pub card_images: Style,

    // -- Detail overlay --
    pub detail_border: Style,
    pub detail_title: Style,
    pub detail_meta: Style,
    pub detail_heading: Style,
    pub detail_body: Style,
    pub detail_link: Style,

    // -- Chrome --
    pub loading: Style,
    pub error: Style,
    pub status_bar: Style,
    pub panel_border: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().fg(Color::Gray),
            stat_value: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            stat_label: Style::default().fg(Color::DarkGray),

            search_input: Style::default(),
            search_active: Style::default().fg(Color::Yellow),
            filter_label: Style::default().fg(Color::DarkGray),
            filter_value: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            result_count: Style::default().fg(Color::Gray),

            card_border: Style::default().fg(Color::DarkGray),
            card_border_selected: Style::default().fg(Color::Magenta),
            card_category: Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_meta: Style::default().fg(Color::DarkGray),
            card_excerpt: Style::default().fg(Color::Gray),
            card_images: Style::default().fg(Color::Blue),

            detail_border: Style::default().fg(Color::Magenta),
            detail_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            detail_meta: Style::default().fg(Color::DarkGray),
            detail_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default(),
            detail_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            loading: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().fg(Color::DarkGray),
            stat_value: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            stat_label: Style::default().fg(Color::DarkGray),

            search_input: Style::default().fg(Color::Black),
            search_active: Style::default().fg(Color::Magenta),
            filter_label: Style::default().fg(Color::DarkGray),
            filter_value: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            result_count: Style::default().fg(Color::DarkGray),

            card_border: Style::default().fg(Color::Gray),
            card_border_selected: Style::default().fg(Color::Blue),
            card_category: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_meta: Style::default().fg(Color::DarkGray),
            card_excerpt: Style::default().fg(Color::Black),
            card_images: Style::default().fg(Color::Blue),

            detail_border: Style::default().fg(Color::Blue),
            detail_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            detail_meta: Style::default().fg(Color::DarkGray),
            detail_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default().fg(Color::Black),
            detail_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),

            loading: Style::default().fg(Color::Blue),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup, so render code can ask for `"card_title"`
/// without threading the palette struct around.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 26] = [
    "header_title",
    "header_subtitle",
    "stat_value",
    "stat_label",
    "search_input",
    "search_active",
    "filter_label",
    "filter_value",
    "result_count",
    "card_border",
    "card_border_selected",
    "card_category",
    "card_title",
    "card_meta",
    "card_excerpt",
    "card_images",
    "detail_border",
    "detail_title",
    "detail_meta",
    "detail_heading",
    "detail_body",
    "detail_link",
    "loading",
    "error",
    "status_bar",
    "panel_border",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 26] = [
            p.header_title,
            p.header_subtitle,
            p.stat_value,
            p.stat_label,
            p.search_input,
            p.search_active,
            p.filter_label,
            p.filter_value,
            p.result_count,
            p.card_border,
            p.card_border_selected,
            p.card_category,
            p.card_title,
            p.card_meta,
            p.card_excerpt,
            p.card_images,
            p.detail_border,
            p.detail_title,
            p.detail_meta,
            p.detail_heading,
            p.detail_body,
            p.detail_link,
            p.loading,
            p.error,
            p.status_bar,
            p.panel_border,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_palette_selected_card_is_highlighted() {
        let palette = ThemeVariant::Dark.palette();
        assert_ne!(palette.card_border, palette.card_border_selected);
        assert_eq!(
            palette.card_border_selected,
            Style::default().fg(Color::Magenta)
        );
    }

    #[test]
    fn error_style_is_red_in_both_variants() {
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            assert_eq!(variant.palette().error.fg, Some(Color::Red));
        }
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.status_bar, light.status_bar);
        assert_ne!(dark.card_category, light.card_category);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("dark"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(
            ThemeVariant::from_str_name("Light"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(
            ThemeVariant::from_str_name("clair"),
            Some(ThemeVariant::Light)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);

        assert_eq!(sm.resolve("card_title"), palette.card_title);
        assert_eq!(sm.resolve("detail_heading"), palette.detail_heading);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Dark.palette());
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{}' missing", name);
        }
    }
}
