use std::collections::HashMap;

use pdf_writer::types::AnnotationType;
use pdf_writer::{Content, Name, Pdf, Ref, Str, TextStr};

use crate::config::RadioGrouping;
use crate::model::{FieldDescriptor, FieldKind};
use crate::registry::FieldRegistry;

/// `/F` bit 3: include the widget when printing.
pub const ANNOT_PRINT: i32 = 1 << 2;
/// `/Ff` bit 13 for text fields.
pub const FF_MULTILINE: i32 = 1 << 12;
/// `/Ff` bits 15 (NoToggleToOff) and 16 (Radio) for button fields.
pub const FF_RADIO: i32 = (1 << 14) | (1 << 15);
/// `/Ff` bit 18 for choice fields.
pub const FF_COMBO: i32 = 1 << 17;

const DEFAULT_APPEARANCE: &[u8] = b"/Helv 10 Tf 0 g";

/// Type-specific part of a widget.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetField {
    Text { multiline: bool },
    Choice { options: Vec<String> },
    /// Starts in the `/Off` state; `value` is shown as the tooltip.
    Radio { value: String },
}

/// One interactive widget ready to be written into a page's `/Annots`.
#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    pub name: String,
    /// `[x, y, x + width, y + height]` of the field interior.
    pub rect: [f32; 4],
    pub page: Ref,
    pub field: WidgetField,
}

impl Widget {
    pub fn field_type(&self) -> &'static [u8] {
        match self.field {
            WidgetField::Text { .. } => b"Tx",
            WidgetField::Choice { .. } => b"Ch",
            WidgetField::Radio { .. } => b"Btn",
        }
    }

    pub fn field_flags(&self) -> Option<i32> {
        match self.field {
            WidgetField::Text { multiline: true } => Some(FF_MULTILINE),
            WidgetField::Text { multiline: false } => None,
            WidgetField::Choice { .. } => Some(FF_COMBO),
            WidgetField::Radio { .. } => Some(FF_RADIO),
        }
    }
}

/// Map one descriptor to its widget. Geometry is taken as laid out.
pub fn synthesize(field: &FieldDescriptor, page: Ref, multiline_threshold: f32) -> Widget {
    let widget_field = match &field.kind {
        FieldKind::SingleLineText | FieldKind::MultilineText => WidgetField::Text {
            multiline: field.interior.height > multiline_threshold,
        },
        FieldKind::Dropdown { options } => WidgetField::Choice {
            options: options.clone(),
        },
        FieldKind::RadioOption { value } => WidgetField::Radio {
            value: value.clone(),
        },
    };
    Widget {
        name: field.name.clone(),
        rect: field.interior.corners(),
        page,
        field: widget_field,
    }
}

/// Result of the synthesis phase: per-page annotation refs in registry order and
/// the top-level fields for the AcroForm.
#[derive(Debug, Default)]
pub struct SynthesizedForm {
    pub page_annotations: Vec<Vec<Ref>>,
    pub fields: Vec<Ref>,
    pub widget_count: usize,
}

struct RadioGroup {
    parent: Ref,
    kids: Vec<Ref>,
    on_states: Vec<String>,
}

/// Write one widget object per registered field and attach it to its page.
pub(crate) fn write_widgets(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    registry: &FieldRegistry,
    page_ids: &[Ref],
    multiline_threshold: f32,
    grouping: RadioGrouping,
) -> SynthesizedForm {
    let mut form = SynthesizedForm {
        page_annotations: vec![Vec::new(); page_ids.len()],
        ..SynthesizedForm::default()
    };
    let mut groups: HashMap<String, RadioGroup> = HashMap::new();
    let mut group_order: Vec<String> = Vec::new();

    for (page_idx, fields) in registry.by_page(page_ids.len()).into_iter().enumerate() {
        let page_ref = page_ids[page_idx];
        for field in fields {
            let widget = synthesize(field, page_ref, multiline_threshold);
            let id = alloc();
            match (&widget.field, grouping) {
                (WidgetField::Radio { value }, RadioGrouping::Grouped) => {
                    let group = groups.entry(widget.name.clone()).or_insert_with(|| {
                        group_order.push(widget.name.clone());
                        RadioGroup {
                            parent: alloc(),
                            kids: Vec::new(),
                            on_states: Vec::new(),
                        }
                    });
                    let on_state = unique_state_name(value, &group.on_states);
                    let (on_ref, off_ref) = write_radio_appearances(pdf, alloc, &widget.rect);
                    write_radio_kid(pdf, id, &widget, group.parent, &on_state, on_ref, off_ref);
                    group.kids.push(id);
                    group.on_states.push(on_state);
                }
                _ => {
                    write_widget(pdf, id, &widget);
                    form.fields.push(id);
                }
            }
            form.page_annotations[page_idx].push(id);
            form.widget_count += 1;
        }
    }

    for name in group_order {
        let Some(group) = groups.remove(&name) else {
            continue;
        };
        let mut parent = pdf.indirect(group.parent).dict();
        parent.pair(Name(b"FT"), Name(b"Btn"));
        parent.pair(Name(b"T"), TextStr(&name));
        parent.pair(Name(b"Ff"), FF_RADIO);
        parent.pair(Name(b"V"), Name(b"Off"));
        parent
            .insert(Name(b"Kids"))
            .array()
            .items(group.kids.iter().copied());
        form.fields.push(group.parent);
    }

    form
}

/// Standalone widget: field and annotation merged into one dictionary.
fn write_widget(pdf: &mut Pdf, id: Ref, widget: &Widget) {
    let [x1, y1, x2, y2] = widget.rect;
    let mut annot = pdf.annotation(id);
    annot
        .subtype(AnnotationType::Widget)
        .rect(pdf_writer::Rect::new(x1, y1, x2, y2));
    annot.pair(Name(b"FT"), Name(widget.field_type()));
    annot.pair(Name(b"T"), TextStr(&widget.name));
    annot.pair(Name(b"P"), widget.page);
    annot.pair(Name(b"F"), ANNOT_PRINT);
    if let Some(flags) = widget.field_flags() {
        annot.pair(Name(b"Ff"), flags);
    }
    match &widget.field {
        WidgetField::Text { .. } => {
            annot.pair(Name(b"DA"), Str(DEFAULT_APPEARANCE));
        }
        WidgetField::Choice { options } => {
            annot.pair(Name(b"DA"), Str(DEFAULT_APPEARANCE));
            annot
                .insert(Name(b"Opt"))
                .array()
                .items(options.iter().map(|o| TextStr(o)));
        }
        WidgetField::Radio { value } => {
            annot.pair(Name(b"AS"), Name(b"Off"));
            annot.pair(Name(b"V"), Name(b"Off"));
            annot.pair(Name(b"TU"), TextStr(value));
        }
    }
}

/// Option widget under a shared radio parent; the parent carries name and value.
fn write_radio_kid(
    pdf: &mut Pdf,
    id: Ref,
    widget: &Widget,
    parent: Ref,
    on_state: &str,
    on_ref: Ref,
    off_ref: Ref,
) {
    let [x1, y1, x2, y2] = widget.rect;
    let mut annot = pdf.annotation(id);
    annot
        .subtype(AnnotationType::Widget)
        .rect(pdf_writer::Rect::new(x1, y1, x2, y2));
    annot.pair(Name(b"Parent"), parent);
    annot.pair(Name(b"P"), widget.page);
    annot.pair(Name(b"F"), ANNOT_PRINT);
    annot.pair(Name(b"AS"), Name(b"Off"));
    if let WidgetField::Radio { value } = &widget.field {
        annot.pair(Name(b"TU"), TextStr(value));
    }
    let mut ap = annot.insert(Name(b"AP")).dict();
    let mut normal = ap.insert(Name(b"N")).dict();
    normal.pair(Name(on_state.as_bytes()), on_ref);
    normal.pair(Name(b"Off"), off_ref);
}

/// Form XObjects for the selected (filled dot) and `/Off` (empty) states.
fn write_radio_appearances(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    rect: &[f32; 4],
) -> (Ref, Ref) {
    let (w, h) = (rect[2] - rect[0], rect[3] - rect[1]);
    let bbox = pdf_writer::Rect::new(0.0, 0.0, w, h);

    let r = w.min(h) / 4.0;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let k = r * 0.552_284_8;
    let mut on = Content::new();
    on.set_fill_gray(0.0);
    on.move_to(cx + r, cy);
    on.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    on.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    on.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    on.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    on.close_path();
    on.fill_nonzero();
    let on_bytes = on.finish();

    let on_ref = alloc();
    pdf.form_xobject(on_ref, on_bytes.as_slice()).bbox(bbox);
    let off_ref = alloc();
    pdf.form_xobject(off_ref, &[]).bbox(bbox);
    (on_ref, off_ref)
}

/// PDF name for an option's "on" appearance state: ASCII alphanumerics only,
/// made unique within its group.
fn unique_state_name(value: &str, taken: &[String]) -> String {
    let mut base: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if base.is_empty() || base == "Off" {
        base = format!("Opt{}", taken.len() + 1);
    }
    let mut name = base.clone();
    let mut n = 2;
    while taken.contains(&name) {
        name = format!("{base}_{n}");
        n += 1;
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Padding, Rect};

    fn descriptor(kind: FieldKind, outer: Rect) -> FieldDescriptor {
        FieldDescriptor::new("f", kind, outer, Padding::new(6.0, 4.0), false, 0).unwrap()
    }

    #[test]
    fn dropdown_keeps_option_order_and_combo_flag() {
        let options = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let field = descriptor(
            FieldKind::Dropdown { options },
            Rect::new(50.0, 700.0, 495.0, 20.0),
        );
        let widget = synthesize(&field, Ref::new(7), 30.0);
        assert_eq!(widget.field_type(), b"Ch");
        assert_eq!(widget.field_flags(), Some(131072));
        assert_eq!(
            widget.field,
            WidgetField::Choice {
                options: vec!["A".into(), "B".into(), "C".into()]
            }
        );
        assert_eq!(widget.rect, [56.0, 704.0, 539.0, 716.0]);
        assert_eq!(widget.page, Ref::new(7));
    }

    #[test]
    fn multiline_follows_interior_height() {
        let short = descriptor(FieldKind::SingleLineText, Rect::new(50.0, 500.0, 495.0, 20.0));
        let tall = descriptor(FieldKind::MultilineText, Rect::new(50.0, 400.0, 495.0, 60.0));
        assert_eq!(synthesize(&short, Ref::new(1), 30.0).field_flags(), None);
        let w = synthesize(&tall, Ref::new(1), 30.0);
        assert_eq!(w.field_type(), b"Tx");
        assert_eq!(w.field_flags(), Some(4096));
    }

    #[test]
    fn radio_option_starts_off_with_value() {
        let field = FieldDescriptor::new(
            "g",
            FieldKind::RadioOption {
                value: "Sim".into(),
            },
            Rect::new(50.0, 300.0, 12.0, 12.0),
            Padding::ZERO,
            false,
            0,
        )
        .unwrap();
        let w = synthesize(&field, Ref::new(3), 30.0);
        assert_eq!(w.field_type(), b"Btn");
        assert_eq!(w.field_flags(), Some(49152));
        assert_eq!(w.field, WidgetField::Radio { value: "Sim".into() });
        assert_eq!(w.rect, [50.0, 300.0, 62.0, 312.0]);
    }

    #[test]
    fn state_names_are_sanitized_and_unique() {
        let taken = vec!["Sim".to_string()];
        assert_eq!(unique_state_name("Sim", &taken), "Sim_2");
        assert_eq!(unique_state_name("Não sei", &[]), "N_o_sei");
        assert_eq!(unique_state_name("", &taken), "Opt2");
    }
}
