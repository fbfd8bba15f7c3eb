pub mod config;
mod error;
mod fonts;
pub mod geometry;
pub mod model;
pub mod options;
pub mod pdf;
pub mod registry;
pub mod template;

pub use config::LayoutConfig;
pub use error::Error;
pub use fonts::FontStyle;
pub use pdf::RenderedForm;
pub use template::FormTemplate;

use std::path::Path;
use std::time::Instant;

use chrono::NaiveDate;

/// Render the template at `template_path` and write the PDF to `output`.
/// Logo paths in the template are resolved against the template's directory.
/// Nothing is written unless rendering succeeds.
pub fn build_form(
    template_path: &Path,
    config: LayoutConfig,
    reference_date: NaiveDate,
    output: &Path,
) -> Result<RenderedForm, Error> {
    let t0 = Instant::now();

    let template = FormTemplate::load(template_path)?;
    let t_parse = t0.elapsed();

    let rendered = pdf::render(&template, config, reference_date, template_path.parent())?;
    let t_render = t0.elapsed();

    std::fs::write(output, &rendered.bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes, {} pages, {} fields)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        rendered.bytes.len(),
        rendered.page_count,
        rendered.widget_count,
    );

    Ok(rendered)
}
