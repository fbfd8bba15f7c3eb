use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::model::Padding;
use crate::options::MONTH_NAMES_PT;

pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;

/// How radio options sharing a name are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioGrouping {
    /// One standalone widget per option, all carrying the group name.
    #[default]
    Independent,
    /// One parent field per group owning the option widgets as kids.
    Grouped,
}

/// Page geometry and spacing used by the layout phase. Any subset can be
/// overridden from JSON; missing keys keep the A4 defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,

    pub field_height: f32,
    pub paragraph_height: f32,
    /// How far the paragraph box bottom sits below the cursor.
    pub paragraph_drop: f32,
    pub paragraph_advance: f32,
    pub line_spacing: f32,
    pub section_spacing: f32,

    pub title_margin_top: f32,
    pub title_margin_bottom: f32,
    pub label_margin_top: f32,
    pub label_margin_bottom: f32,
    pub label_spacing: f32,
    pub label_line: f32,
    pub help_line: f32,

    pub padding: Padding,

    pub radio_size: f32,
    pub radio_label_offset: f32,
    pub radio_step: f32,
    pub radio_trailing: f32,
    pub radio_grouping: RadioGrouping,

    pub compound_gap: f32,
    pub compound_dropdown_width: f32,

    pub date_widths: [f32; 3],
    pub date_label_offsets: [f32; 3],
    pub date_spacing: f32,
    pub date_labels: [String; 3],
    pub date_year_count: u32,
    pub month_names: [String; 12],

    pub logo_max_width: f32,
    pub logo_max_height: f32,
    pub logo_spacing: f32,
    pub logo_gap_below: f32,

    /// Minimum cursor height for a plain `check_space`.
    pub default_reserve: f32,
    /// Text widgets with an interior taller than this are multiline.
    pub multiline_threshold: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin_left: 50.0,
            margin_right: A4_WIDTH - 50.0,
            margin_top: A4_HEIGHT - 50.0,
            margin_bottom: 50.0,

            field_height: 20.0,
            paragraph_height: 60.0,
            paragraph_drop: 40.0,
            paragraph_advance: 85.0,
            line_spacing: 25.0,
            section_spacing: 35.0,

            title_margin_top: 12.0,
            title_margin_bottom: 8.0,
            label_margin_top: 6.0,
            label_margin_bottom: 4.0,
            label_spacing: 6.0,
            label_line: 20.0,
            help_line: 15.0,

            padding: Padding::new(6.0, 4.0),

            radio_size: 12.0,
            radio_label_offset: 20.0,
            radio_step: 18.0,
            radio_trailing: 10.0,
            radio_grouping: RadioGrouping::Independent,

            compound_gap: 10.0,
            compound_dropdown_width: 80.0,

            date_widths: [60.0, 80.0, 70.0],
            date_label_offsets: [25.0, 30.0, 30.0],
            date_spacing: 15.0,
            date_labels: ["Dia:".into(), "Mês:".into(), "Ano:".into()],
            date_year_count: 5,
            month_names: MONTH_NAMES_PT.map(String::from),

            logo_max_width: 40.0,
            logo_max_height: 40.0,
            logo_spacing: 10.0,
            logo_gap_below: 30.0,

            default_reserve: 200.0,
            multiline_threshold: 30.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.margin_right - self.margin_left
    }
}

/// Where image assets referenced by a template are looked up.
pub fn resolve_asset(base: Option<&Path>, path: &str) -> PathBuf {
    let p = Path::new(path);
    match base {
        Some(dir) if p.is_relative() => dir.join(p),
        _ => p.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LayoutConfig::from_json(r#"{"margin_left": 72, "radio_grouping": "grouped"}"#).unwrap();
        assert_eq!(cfg.margin_left, 72.0);
        assert_eq!(cfg.field_height, 20.0);
        assert_eq!(cfg.radio_grouping, RadioGrouping::Grouped);
    }

    #[test]
    fn default_content_width_matches_a4_margins() {
        let cfg = LayoutConfig::default();
        assert!((cfg.content_width() - (A4_WIDTH - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn malformed_json_is_a_template_error() {
        assert!(matches!(LayoutConfig::from_json("{"), Err(Error::Template(_))));
    }
}
