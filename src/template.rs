//! JSON description of a form: header, logos and sections of field items.

use std::num::NonZeroU64;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::{LayoutConfig, resolve_asset};
use crate::error::Error;
use crate::fonts::FontStyle;
use crate::model::Padding;
use crate::options::{day_options, month_options, month_year_options, numeric_range, year_options};
use crate::pdf::{FieldOptions, FormBuilder, Surface};

const HEADER_TITLE_SIZE: f32 = 16.0;
const HEADER_TITLE_LINE: f32 = 20.0;
const HEADER_TITLE_GAP: f32 = 30.0;
const INTRO_SIZE: f32 = 10.0;
const INTRO_LINE: f32 = 15.0;

#[derive(Debug, Deserialize)]
pub struct FormTemplate {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub intro: Vec<String>,
    #[serde(default)]
    pub logos: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_section_title_size")]
    pub title_size: f32,
    /// Defaults to true for every section but the first.
    #[serde(default)]
    pub break_before: Option<bool>,
    /// Space check run at the start of each repetition.
    #[serde(default)]
    pub reserve: Option<f32>,
    /// Lay the section out this many times; `{i}` in strings becomes 1..=repeat.
    #[serde(default)]
    pub repeat: Option<u32>,
    #[serde(default)]
    pub items: Vec<Item>,
}

fn default_section_title_size() -> f32 {
    12.0
}

#[derive(Debug, Deserialize)]
pub struct LabelSpec {
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub padding: Option<Padding>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Title {
        text: String,
        #[serde(default)]
        size: Option<f32>,
        #[serde(default)]
        margin_top: Option<f32>,
        #[serde(default)]
        margin_bottom: Option<f32>,
    },
    Text {
        name: String,
        #[serde(flatten)]
        label: LabelSpec,
    },
    Paragraph {
        name: String,
        #[serde(flatten)]
        label: LabelSpec,
    },
    Dropdown {
        name: String,
        #[serde(flatten)]
        label: LabelSpec,
        options: OptionSource,
        #[serde(default)]
        width: Option<f32>,
    },
    Radio {
        name: String,
        #[serde(flatten)]
        label: LabelSpec,
        options: OptionSource,
    },
    Date {
        name: String,
        #[serde(flatten)]
        label: LabelSpec,
    },
    TextWithDropdown {
        name_text: String,
        name_dropdown: String,
        #[serde(flatten)]
        label: LabelSpec,
        options: OptionSource,
        #[serde(default)]
        dropdown_width: Option<f32>,
    },
    Spacing {
        amount: f32,
    },
    CheckSpace {
        #[serde(default)]
        minimum: Option<f32>,
    },
    PageBreak,
}

/// Literal option list or a generator evaluated against the reference date.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionSource {
    List(Vec<String>),
    Generated(Generator),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generator {
    Days,
    Months,
    Years {
        count: u32,
    },
    MonthYear {
        count: u32,
    },
    Range {
        start: i64,
        stop: i64,
        /// Positive; zero and negative steps are rejected when parsing.
        #[serde(default = "default_step")]
        step: NonZeroU64,
        /// Appended after the numeric run.
        #[serde(default)]
        extra: Vec<String>,
    },
}

fn default_step() -> NonZeroU64 {
    NonZeroU64::MIN
}

impl OptionSource {
    pub fn resolve(&self, reference: NaiveDate, config: &LayoutConfig) -> Vec<String> {
        match self {
            OptionSource::List(list) => list.clone(),
            OptionSource::Generated(generator) => match generator {
                Generator::Days => day_options(),
                Generator::Months => month_options(&config.month_names),
                Generator::Years { count } => year_options(reference, *count),
                Generator::MonthYear { count } => {
                    month_year_options(reference, *count, &config.month_names)
                }
                Generator::Range {
                    start,
                    stop,
                    step,
                    extra,
                } => {
                    let mut out = numeric_range(*start, *stop, *step);
                    out.extend(extra.iter().cloned());
                    out
                }
            },
        }
    }
}

/// Repetition index substituted for `{i}`.
struct Fill(Option<u32>);

impl Fill {
    fn apply(&self, s: &str) -> String {
        match self.0 {
            Some(i) => s.replace("{i}", &i.to_string()),
            None => s.to_string(),
        }
    }
}

impl FormTemplate {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Document title for the info dictionary.
    pub fn document_title(&self) -> Option<&str> {
        self.title.first().map(String::as_str)
    }

    /// Drive the builder through the whole template. Relative logo paths are
    /// resolved against `asset_dir`.
    pub fn layout<S: Surface>(
        &self,
        builder: &mut FormBuilder<S>,
        asset_dir: Option<&Path>,
    ) -> Result<(), Error> {
        if !self.logos.is_empty() {
            let paths: Vec<_> = self
                .logos
                .iter()
                .map(|p| resolve_asset(asset_dir, p))
                .collect();
            builder.add_logos(&paths);
        }

        for (i, line) in self.title.iter().enumerate() {
            let advance = if i + 1 == self.title.len() {
                HEADER_TITLE_GAP
            } else {
                HEADER_TITLE_LINE
            };
            builder.add_text_line(line, FontStyle::Bold, HEADER_TITLE_SIZE, advance);
        }
        for (i, line) in self.intro.iter().enumerate() {
            let advance = if i + 1 == self.intro.len() {
                builder.config().section_spacing
            } else {
                INTRO_LINE
            };
            builder.add_text_line(line, FontStyle::Regular, INTRO_SIZE, advance);
        }

        for (idx, section) in self.sections.iter().enumerate() {
            let break_first = section.break_before.unwrap_or(idx > 0);
            match section.repeat {
                Some(n) => {
                    for i in 1..=n {
                        let page_break = break_first || i > 1;
                        section.layout_once(builder, page_break, &Fill(Some(i)))?;
                    }
                }
                None => section.layout_once(builder, break_first, &Fill(None))?,
            }
        }
        Ok(())
    }
}

impl Section {
    fn layout_once<S: Surface>(
        &self,
        builder: &mut FormBuilder<S>,
        page_break: bool,
        fill: &Fill,
    ) -> Result<(), Error> {
        if page_break {
            builder.new_page();
        }
        if let Some(minimum) = self.reserve {
            builder.require_space(minimum);
        }
        if let Some(title) = &self.title {
            builder.add_title(&fill.apply(title), self.title_size);
        }
        for item in &self.items {
            item.layout(builder, fill)?;
        }
        Ok(())
    }
}

impl Item {
    fn layout<S: Surface>(&self, builder: &mut FormBuilder<S>, fill: &Fill) -> Result<(), Error> {
        let reference = builder.reference_date();
        match self {
            Item::Title {
                text,
                size,
                margin_top,
                margin_bottom,
            } => {
                let cfg = builder.config();
                let top = margin_top.unwrap_or(cfg.title_margin_top);
                let bottom = margin_bottom.unwrap_or(cfg.title_margin_bottom);
                builder.add_title_with_margins(&fill.apply(text), size.unwrap_or(12.0), top, bottom);
            }
            Item::Text { name, label } => {
                let (text, help) = (fill.apply(&label.label), label.help.as_deref().map(|h| fill.apply(h)));
                builder.add_text_field(&fill.apply(name), &field_options(label, &text, help.as_deref()))?;
            }
            Item::Paragraph { name, label } => {
                let (text, help) = (fill.apply(&label.label), label.help.as_deref().map(|h| fill.apply(h)));
                builder.add_paragraph_field(&fill.apply(name), &field_options(label, &text, help.as_deref()))?;
            }
            Item::Dropdown {
                name,
                label,
                options,
                width,
            } => {
                let (text, help) = (fill.apply(&label.label), label.help.as_deref().map(|h| fill.apply(h)));
                let options = options.resolve(reference, builder.config());
                builder.add_dropdown_field(
                    &fill.apply(name),
                    &field_options(label, &text, help.as_deref()),
                    options,
                    *width,
                )?;
            }
            Item::Radio {
                name,
                label,
                options,
            } => {
                let (text, help) = (fill.apply(&label.label), label.help.as_deref().map(|h| fill.apply(h)));
                let options = options.resolve(reference, builder.config());
                builder.add_radio_group(
                    &fill.apply(name),
                    &field_options(label, &text, help.as_deref()),
                    &options,
                )?;
            }
            Item::Date { name, label } => {
                let (text, help) = (fill.apply(&label.label), label.help.as_deref().map(|h| fill.apply(h)));
                builder.add_date_field(&fill.apply(name), &field_options(label, &text, help.as_deref()))?;
            }
            Item::TextWithDropdown {
                name_text,
                name_dropdown,
                label,
                options,
                dropdown_width,
            } => {
                let (text, help) = (fill.apply(&label.label), label.help.as_deref().map(|h| fill.apply(h)));
                let options = options.resolve(reference, builder.config());
                builder.add_text_with_dropdown(
                    &fill.apply(name_text),
                    &fill.apply(name_dropdown),
                    &field_options(label, &text, help.as_deref()),
                    options,
                    *dropdown_width,
                )?;
            }
            Item::Spacing { amount } => builder.add_spacing(*amount),
            Item::CheckSpace { minimum } => match minimum {
                Some(m) => builder.require_space(*m),
                None => builder.check_space(),
            },
            Item::PageBreak => builder.new_page(),
        }
        Ok(())
    }
}

fn field_options<'a>(spec: &LabelSpec, label: &'a str, help: Option<&'a str>) -> FieldOptions<'a> {
    let mut opts = FieldOptions::new(label).required(spec.required);
    if let Some(help) = help {
        opts = opts.help(help);
    }
    if let Some(padding) = spec.padding {
        opts = opts.padding(padding);
    }
    opts
}
