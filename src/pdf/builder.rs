use std::path::Path;

use chrono::NaiveDate;

use crate::config::LayoutConfig;
use crate::error::Error;
use crate::fonts::FontStyle;
use crate::geometry::split_compound;
use crate::model::{FieldDescriptor, FieldKind, Padding, Rect};
use crate::options::{day_options, month_options, year_options};
use crate::registry::FieldRegistry;

use super::cursor::LayoutCursor;
use super::surface::{BLACK, GREY, Surface};

const LABEL_SIZE: f32 = 10.0;
const HELP_SIZE: f32 = 8.0;
const OPTION_SIZE: f32 = 9.0;
const DATE_SUFFIXES: [&str; 3] = ["dia", "mes", "ano"];

/// Label, marker and per-field overrides shared by every field-drawing call.
#[derive(Clone, Debug, Default)]
pub struct FieldOptions<'a> {
    pub label: &'a str,
    pub required: bool,
    pub help: Option<&'a str>,
    pub padding: Option<Padding>,
}

impl<'a> FieldOptions<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn help(mut self, help: &'a str) -> Self {
        self.help = Some(help).filter(|h| !h.is_empty());
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }
}

/// Output of the layout phase, consumed by widget synthesis.
pub struct FinishedLayout<S> {
    pub config: LayoutConfig,
    pub surface: S,
    pub registry: FieldRegistry,
}

/// Layout context for one document: owns the cursor, the field registry and the
/// drawing surface. Every field routine reserves its full vertical extent first,
/// so a field box never straddles a page break.
pub struct FormBuilder<S: Surface> {
    config: LayoutConfig,
    cursor: LayoutCursor,
    registry: FieldRegistry,
    surface: S,
    reference_date: NaiveDate,
}

impl<S: Surface> FormBuilder<S> {
    pub fn new(config: LayoutConfig, surface: S, reference_date: NaiveDate) -> Self {
        let cursor = LayoutCursor::new(config.margin_top, config.margin_bottom);
        Self {
            config,
            cursor,
            registry: FieldRegistry::new(),
            surface,
            reference_date,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// End of layout: the current page is kept as the last page.
    pub fn finish(self) -> FinishedLayout<S> {
        log::debug!(
            "layout finished: {} pages, {} fields",
            self.surface.page_count(),
            self.registry.len()
        );
        FinishedLayout {
            config: self.config,
            surface: self.surface,
            registry: self.registry,
        }
    }

    pub fn new_page(&mut self) {
        let reason = self.cursor.page_break();
        self.surface.show_page();
        log::debug!("break to page {}: {reason:?}", self.cursor.page_index());
    }

    /// Break the page when the cursor is below `minimum`.
    pub fn require_space(&mut self, minimum: f32) {
        if let Some(reason) = self.cursor.require_space(minimum) {
            self.surface.show_page();
            log::debug!("break to page {}: {reason:?}", self.cursor.page_index());
        }
        debug_assert_eq!(self.cursor.page_index() + 1, self.surface.page_count());
    }

    /// Space check against the configured default reserve.
    pub fn check_space(&mut self) {
        self.require_space(self.config.default_reserve);
    }

    pub fn add_spacing(&mut self, delta: f32) {
        self.cursor.advance(delta);
    }

    fn reserve(&mut self, extent: f32) {
        self.require_space(self.cursor.bottom_margin() + extent);
    }

    pub fn add_title(&mut self, text: &str, size: f32) {
        let (top, bottom) = (self.config.title_margin_top, self.config.title_margin_bottom);
        self.add_title_with_margins(text, size, top, bottom);
    }

    pub fn add_title_with_margins(&mut self, text: &str, size: f32, margin_top: f32, margin_bottom: f32) {
        self.cursor.advance(margin_top);
        self.surface.draw_text(
            self.config.margin_left,
            self.cursor.y(),
            FontStyle::Bold,
            size,
            BLACK,
            text,
        );
        self.cursor
            .advance(margin_bottom + self.config.section_spacing - margin_top);
    }

    /// One free-standing line of text followed by `advance`.
    pub fn add_text_line(&mut self, text: &str, style: FontStyle, size: f32, advance: f32) {
        self.surface
            .draw_text(self.config.margin_left, self.cursor.y(), style, size, BLACK, text);
        self.cursor.advance(advance);
    }

    pub fn add_help_text(&mut self, text: &str) {
        self.surface.draw_text(
            self.config.margin_left + 5.0,
            self.cursor.y(),
            FontStyle::Oblique,
            HELP_SIZE,
            GREY,
            text,
        );
        self.cursor.advance(self.config.help_line);
    }

    /// A row of logos along the top of the current page. Missing files are
    /// skipped with a warning and leave no gap.
    pub fn add_logos(&mut self, paths: &[impl AsRef<Path>]) {
        let cfg = &self.config;
        let (max_w, max_h, spacing) = (cfg.logo_max_width, cfg.logo_max_height, cfg.logo_spacing);
        let base_y = self.cursor.y() - max_h;
        let mut x = cfg.margin_left;
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                log::warn!("Logo not found, skipping: {}", path.display());
                continue;
            }
            if self.surface.draw_image(path, x, base_y, max_w, max_h) {
                x += max_w + spacing;
            }
        }
        self.cursor.set_y(base_y - self.config.logo_gap_below);
    }

    fn label_extent(&self, opts: &FieldOptions) -> f32 {
        let cfg = &self.config;
        let help = if opts.help.is_some() { cfg.help_line } else { 0.0 };
        cfg.label_margin_top + cfg.label_line + help + cfg.label_spacing + cfg.label_margin_bottom
    }

    fn draw_label_line(&mut self, opts: &FieldOptions) {
        let text = if opts.required {
            format!("{} *", opts.label)
        } else {
            opts.label.to_string()
        };
        self.surface.draw_text(
            self.config.margin_left,
            self.cursor.y(),
            FontStyle::Regular,
            LABEL_SIZE,
            BLACK,
            &text,
        );
        self.cursor.advance(self.config.label_line);
        if let Some(help) = opts.help {
            self.add_help_text(help);
        }
    }

    /// Reserve room for label + box, then draw the label. Leaves the cursor at
    /// the bottom edge of the field box.
    fn begin_field(&mut self, opts: &FieldOptions, box_drop: f32) {
        let extent = self.label_extent(opts) + box_drop;
        self.reserve(extent);
        self.cursor.advance(self.config.label_margin_top);
        self.draw_label_line(opts);
        self.cursor
            .advance(self.config.label_spacing + self.config.label_margin_bottom);
    }

    fn register(
        &mut self,
        name: &str,
        kind: FieldKind,
        outer: Rect,
        padding: Padding,
        required: bool,
    ) -> Result<(), Error> {
        let field = FieldDescriptor::new(
            name,
            kind,
            outer,
            padding,
            required,
            self.cursor.page_index(),
        )?;
        self.registry.register(field);
        Ok(())
    }

    pub fn add_text_field(&mut self, name: &str, opts: &FieldOptions) -> Result<(), Error> {
        self.begin_field(opts, 0.0);
        let outer = Rect::new(
            self.config.margin_left,
            self.cursor.y(),
            self.config.content_width(),
            self.config.field_height,
        );
        self.surface.draw_rect(outer.x, outer.y, outer.width, outer.height);
        let padding = opts.padding.unwrap_or(self.config.padding);
        self.register(name, FieldKind::SingleLineText, outer, padding, opts.required)?;
        self.cursor.advance(self.config.line_spacing);
        Ok(())
    }

    pub fn add_paragraph_field(&mut self, name: &str, opts: &FieldOptions) -> Result<(), Error> {
        let drop = self.config.paragraph_drop;
        self.begin_field(opts, drop);
        let outer = Rect::new(
            self.config.margin_left,
            self.cursor.y() - drop,
            self.config.content_width(),
            self.config.paragraph_height,
        );
        self.surface.draw_rect(outer.x, outer.y, outer.width, outer.height);
        let padding = opts.padding.unwrap_or(self.config.padding);
        self.register(name, FieldKind::MultilineText, outer, padding, opts.required)?;
        self.cursor.advance(self.config.paragraph_advance);
        Ok(())
    }

    /// Dropdown box; `width` defaults to the full content width.
    pub fn add_dropdown_field(
        &mut self,
        name: &str,
        opts: &FieldOptions,
        options: Vec<String>,
        width: Option<f32>,
    ) -> Result<(), Error> {
        self.begin_field(opts, 0.0);
        let outer = Rect::new(
            self.config.margin_left,
            self.cursor.y(),
            width.unwrap_or_else(|| self.config.content_width()),
            self.config.field_height,
        );
        self.draw_dropdown_box(outer);
        let padding = opts.padding.unwrap_or(self.config.padding);
        self.register(name, FieldKind::Dropdown { options }, outer, padding, opts.required)?;
        self.cursor.advance(self.config.line_spacing);
        Ok(())
    }

    fn draw_dropdown_box(&mut self, outer: Rect) {
        self.surface.draw_rect(outer.x, outer.y, outer.width, outer.height);
        self.surface
            .draw_dropdown_marker(outer.right() - 15.0, outer.y + 5.0);
    }

    /// One radio widget per option, all named `name`. The label has no top margin.
    pub fn add_radio_group(
        &mut self,
        name: &str,
        opts: &FieldOptions,
        options: &[String],
    ) -> Result<(), Error> {
        let cfg = &self.config;
        let (size, step) = (cfg.radio_size, cfg.radio_step);
        let help = if opts.help.is_some() { cfg.help_line } else { 0.0 };
        let rows = options.len().saturating_sub(1) as f32;
        let extent = cfg.label_line + help + rows * step + 2.0;
        self.reserve(extent);

        self.draw_label_line(opts);
        let x = self.config.margin_left;
        let padding = opts.padding.unwrap_or(Padding::ZERO);
        for option in options {
            let y = self.cursor.y();
            self.surface.draw_circle(x + size / 2.0, y + 4.0, size / 2.0);
            self.surface.draw_text(
                x + self.config.radio_label_offset,
                y,
                FontStyle::Regular,
                OPTION_SIZE,
                BLACK,
                option,
            );
            let outer = Rect::new(x, y - 2.0, size, size);
            let kind = FieldKind::RadioOption {
                value: option.clone(),
            };
            self.register(name, kind, outer, padding, opts.required)?;
            self.cursor.advance(step);
        }
        self.cursor.advance(self.config.radio_trailing);
        Ok(())
    }

    /// Day / month / year dropdowns named `<prefix>_dia`, `<prefix>_mes`, `<prefix>_ano`.
    pub fn add_date_field(&mut self, prefix: &str, opts: &FieldOptions) -> Result<(), Error> {
        self.begin_field(opts, 0.0);
        let y = self.cursor.y();
        let padding = opts.padding.unwrap_or(self.config.padding);
        let option_lists = [
            day_options(),
            month_options(&self.config.month_names),
            year_options(self.reference_date, self.config.date_year_count),
        ];

        let mut x = self.config.margin_left;
        for (i, options) in option_lists.into_iter().enumerate() {
            let width = self.config.date_widths[i];
            let offset = self.config.date_label_offsets[i];
            let label = self.config.date_labels[i].clone();
            self.surface
                .draw_text(x, y + 5.0, FontStyle::Regular, OPTION_SIZE, BLACK, &label);
            let outer = Rect::new(x + offset, y, width, self.config.field_height);
            self.draw_dropdown_box(outer);
            let name = format!("{prefix}_{}", DATE_SUFFIXES[i]);
            self.register(&name, FieldKind::Dropdown { options }, outer, padding, opts.required)?;
            x += offset + width + self.config.date_spacing;
        }
        self.cursor.advance(self.config.line_spacing);
        Ok(())
    }

    /// Full-width box holding a text zone and a dropdown zone side by side.
    pub fn add_text_with_dropdown(
        &mut self,
        name_text: &str,
        name_dropdown: &str,
        opts: &FieldOptions,
        options: Vec<String>,
        dropdown_width: Option<f32>,
    ) -> Result<(), Error> {
        self.begin_field(opts, 0.0);
        let outer = Rect::new(
            self.config.margin_left,
            self.cursor.y(),
            self.config.content_width(),
            self.config.field_height,
        );
        let zones = split_compound(
            outer,
            dropdown_width.unwrap_or(self.config.compound_dropdown_width),
            self.config.compound_gap,
        )?;
        self.surface.draw_rect(outer.x, outer.y, outer.width, outer.height);
        self.surface
            .draw_dropdown_marker(zones.dropdown.right() - 15.0, zones.dropdown.y + 5.0);

        let padding = opts.padding.unwrap_or(self.config.padding);
        self.register(name_text, FieldKind::SingleLineText, zones.text, padding, opts.required)?;
        self.register(
            name_dropdown,
            FieldKind::Dropdown { options },
            zones.dropdown,
            padding,
            opts.required,
        )?;
        self.cursor.advance(self.config.line_spacing);
        Ok(())
    }
}
