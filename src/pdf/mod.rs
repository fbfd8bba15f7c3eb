mod builder;
mod cursor;
mod surface;
mod widgets;

use std::path::Path;

use chrono::NaiveDate;
use pdf_writer::{Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::LayoutConfig;
use crate::error::Error;
use crate::fonts::{FORM_FONT_NAME, register_fonts};
use crate::template::FormTemplate;

pub use builder::{FieldOptions, FinishedLayout, FormBuilder};
pub use cursor::{BreakReason, LayoutCursor};
pub use surface::{DrawOp, PdfSurface, RecordingSurface, Surface};
pub use widgets::{
    ANNOT_PRINT, FF_COMBO, FF_MULTILINE, FF_RADIO, SynthesizedForm, Widget, WidgetField, synthesize,
};

use widgets::write_widgets;

/// A finished document plus a few numbers worth logging.
#[derive(Debug)]
pub struct RenderedForm {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub widget_count: usize,
}

/// Lay out `template` and synthesize its widgets into a complete PDF.
pub fn render(
    template: &FormTemplate,
    config: LayoutConfig,
    reference_date: NaiveDate,
    asset_dir: Option<&Path>,
) -> Result<RenderedForm, Error> {
    let t0 = std::time::Instant::now();
    let mut builder = FormBuilder::new(config, PdfSurface::new(), reference_date);
    template.layout(&mut builder, asset_dir)?;
    let t_layout = t0.elapsed();

    let rendered = assemble(builder.finish(), template.document_title());
    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: layout={:.1}ms, widgets+assembly={:.1}ms",
        t_layout.as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
    );
    Ok(rendered)
}

/// Synthesis phase: write pages, then one widget per registered field attached
/// to the page it was drawn on.
pub fn assemble(layout: FinishedLayout<PdfSurface>, title: Option<&str>) -> RenderedForm {
    let FinishedLayout {
        config,
        surface,
        registry,
    } = layout;

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let fonts = register_fonts(&mut pdf, &mut alloc);
    let (contents, images) = surface.finish();
    let image_xobjects = images.write(&mut pdf, &mut alloc);

    let n = contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    let form = write_widgets(
        &mut pdf,
        &mut alloc,
        &registry,
        &page_ids,
        config.multiline_threshold,
        config.radio_grouping,
    );
    debug_assert_eq!(form.widget_count, registry.len());

    for (i, c) in contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    {
        let mut catalog = pdf.catalog(catalog_id);
        catalog.pages(pages_id);
        if !form.fields.is_empty() {
            let mut acro = catalog.insert(Name(b"AcroForm")).dict();
            acro.insert(Name(b"Fields"))
                .array()
                .items(form.fields.iter().copied());
            acro.pair(Name(b"NeedAppearances"), true);
            acro.pair(Name(b"DA"), Str(b"/Helv 0 Tf 0 g"));
            if let Some(regular) = fonts.first() {
                acro.insert(Name(b"DR"))
                    .dict()
                    .insert(Name(b"Font"))
                    .dict()
                    .pair(Name(FORM_FONT_NAME), regular.font_ref);
            }
        }
    }
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, config.page_width, config.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        if !form.page_annotations[i].is_empty() {
            page.annotations(form.page_annotations[i].iter().copied());
        }
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for entry in &fonts {
                font_dict.pair(Name(entry.pdf_name), entry.font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    {
        let mut info = pdf.document_info(info_id);
        if let Some(title) = title {
            info.title(TextStr(title));
        }
        info.producer(TextStr(concat!("pdf-formflow ", env!("CARGO_PKG_VERSION"))));
    }

    RenderedForm {
        bytes: pdf.finish(),
        page_count: n,
        widget_count: form.widget_count,
    }
}
