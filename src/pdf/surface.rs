use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pdf_writer::{Content, Filter, Name, Pdf, Ref, Str};

use crate::fonts::{FontStyle, to_winansi_bytes};

pub const BLACK: [u8; 3] = [0, 0, 0];
pub const GREY: [u8; 3] = [128, 128, 128];

/// Static painting collaborator for the layout phase. Coordinates are page
/// units with the origin at the bottom-left.
pub trait Surface {
    fn draw_text(&mut self, x: f32, y: f32, style: FontStyle, size: f32, color: [u8; 3], text: &str);
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32);
    /// Small downward triangle marking a dropdown box; `(x, y)` is its bottom-left.
    fn draw_dropdown_marker(&mut self, x: f32, y: f32);
    /// Draw the image scaled to fit `max_width` x `max_height` (aspect kept).
    /// Returns false when the image could not be used.
    fn draw_image(&mut self, path: &Path, x: f32, y: f32, max_width: f32, max_height: f32) -> bool;
    /// Flush the current page and start an empty one.
    fn show_page(&mut self);
    /// Pages so far, including the one being drawn.
    fn page_count(&self) -> usize;
}

const CIRCLE_KAPPA: f32 = 0.552_284_8;

enum ImageData {
    Jpeg(Vec<u8>),
    /// Zlib-compressed RGB samples plus optional compressed alpha.
    Flate { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

struct ImageAsset {
    pdf_name: String,
    data: ImageData,
    pixel_width: u32,
    pixel_height: u32,
}

/// Surface that paints into one `pdf_writer::Content` stream per page.
pub struct PdfSurface {
    finished: Vec<Content>,
    current: Content,
    images: Vec<ImageAsset>,
    image_index: HashMap<PathBuf, Option<usize>>,
}

impl Default for PdfSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfSurface {
    pub fn new() -> Self {
        Self {
            finished: Vec::new(),
            current: Content::new(),
            images: Vec::new(),
            image_index: HashMap::new(),
        }
    }

    /// Flush the last page and hand back every content stream in page order.
    pub(crate) fn finish(mut self) -> (Vec<Content>, PdfImages) {
        self.finished.push(self.current);
        (self.finished, PdfImages { assets: self.images })
    }

    fn load_image(&mut self, path: &Path) -> Option<usize> {
        if let Some(&idx) = self.image_index.get(path) {
            return idx;
        }
        let idx = decode_image(path, self.images.len() + 1).map(|asset| {
            self.images.push(asset);
            self.images.len() - 1
        });
        self.image_index.insert(path.to_path_buf(), idx);
        idx
    }
}

fn decode_image(path: &Path, number: usize) -> Option<ImageAsset> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("Cannot read image {}: {e}", path.display());
            return None;
        }
    };
    let format = match image::guess_format(&bytes) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Unknown image format {}: {e}", path.display());
            return None;
        }
    };
    let pdf_name = format!("Im{number}");

    if format == image::ImageFormat::Jpeg {
        let reader = image::ImageReader::with_format(std::io::Cursor::new(&bytes), format);
        let (pixel_width, pixel_height) = match reader.into_dimensions() {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Cannot read JPEG header {}: {e}", path.display());
                return None;
            }
        };
        return Some(ImageAsset {
            pdf_name,
            data: ImageData::Jpeg(bytes),
            pixel_width,
            pixel_height,
        });
    }

    let reader = image::ImageReader::with_format(std::io::Cursor::new(&bytes), format);
    let decoded = match reader.decode() {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Cannot decode image {}: {e}", path.display());
            return None;
        }
    };
    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);
    let alpha = has_alpha.then(|| {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6)
    });

    Some(ImageAsset {
        pdf_name,
        data: ImageData::Flate { rgb, alpha },
        pixel_width: w,
        pixel_height: h,
    })
}

impl Surface for PdfSurface {
    fn draw_text(&mut self, x: f32, y: f32, style: FontStyle, size: f32, color: [u8; 3], text: &str) {
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        let content = &mut self.current;
        if color != BLACK {
            content.set_fill_rgb(
                color[0] as f32 / 255.0,
                color[1] as f32 / 255.0,
                color[2] as f32 / 255.0,
            );
        }
        content.begin_text();
        content.set_font(Name(style.pdf_name()), size);
        content.next_line(x, y);
        content.show(Str(&bytes));
        content.end_text();
        if color != BLACK {
            content.set_fill_gray(0.0);
        }
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.current.set_stroke_gray(0.0);
        self.current.rect(x, y, width, height).stroke();
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        let k = radius * CIRCLE_KAPPA;
        let c = &mut self.current;
        c.set_stroke_gray(0.0);
        c.move_to(cx + radius, cy);
        c.cubic_to(cx + radius, cy + k, cx + k, cy + radius, cx, cy + radius);
        c.cubic_to(cx - k, cy + radius, cx - radius, cy + k, cx - radius, cy);
        c.cubic_to(cx - radius, cy - k, cx - k, cy - radius, cx, cy - radius);
        c.cubic_to(cx + k, cy - radius, cx + radius, cy - k, cx + radius, cy);
        c.close_path();
        c.stroke();
    }

    fn draw_dropdown_marker(&mut self, x: f32, y: f32) {
        let c = &mut self.current;
        c.save_state();
        c.set_fill_gray(0.5);
        c.move_to(x, y + 7.0);
        c.line_to(x + 8.0, y + 7.0);
        c.line_to(x + 4.0, y + 1.0);
        c.close_path();
        c.fill_nonzero();
        c.restore_state();
    }

    fn draw_image(&mut self, path: &Path, x: f32, y: f32, max_width: f32, max_height: f32) -> bool {
        let Some(idx) = self.load_image(path) else {
            return false;
        };
        let asset = &self.images[idx];
        let (pw, ph) = (asset.pixel_width as f32, asset.pixel_height as f32);
        if pw <= 0.0 || ph <= 0.0 {
            return false;
        }
        let scale = (max_width / pw).min(max_height / ph);
        let (w, h) = (pw * scale, ph * scale);
        // centred inside the bounding box
        let ix = x + (max_width - w) / 2.0;
        let iy = y + (max_height - h) / 2.0;
        self.current.save_state();
        self.current.transform([w, 0.0, 0.0, h, ix, iy]);
        self.current.x_object(Name(asset.pdf_name.as_bytes()));
        self.current.restore_state();
        true
    }

    fn show_page(&mut self) {
        let page = std::mem::replace(&mut self.current, Content::new());
        self.finished.push(page);
    }

    fn page_count(&self) -> usize {
        self.finished.len() + 1
    }
}

/// Decoded images waiting to be written as XObjects.
pub(crate) struct PdfImages {
    assets: Vec<ImageAsset>,
}

impl PdfImages {
    /// Write every image XObject; returns `(resource name, ref)` pairs.
    pub(crate) fn write(self, pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> Vec<(String, Ref)> {
        let mut out = Vec::with_capacity(self.assets.len());
        for asset in self.assets {
            let xobj_ref = alloc();
            match &asset.data {
                ImageData::Jpeg(data) => {
                    let mut xobj = pdf.image_xobject(xobj_ref, data);
                    xobj.filter(Filter::DctDecode);
                    xobj.width(asset.pixel_width as i32);
                    xobj.height(asset.pixel_height as i32);
                    xobj.color_space().device_rgb();
                    xobj.bits_per_component(8);
                }
                ImageData::Flate { rgb, alpha } => {
                    let smask_ref = alpha.as_ref().map(|alpha| {
                        let mask_ref = alloc();
                        let mut mask = pdf.image_xobject(mask_ref, alpha);
                        mask.filter(Filter::FlateDecode);
                        mask.width(asset.pixel_width as i32);
                        mask.height(asset.pixel_height as i32);
                        mask.color_space().device_gray();
                        mask.bits_per_component(8);
                        mask_ref
                    });
                    let mut xobj = pdf.image_xobject(xobj_ref, rgb);
                    xobj.filter(Filter::FlateDecode);
                    xobj.width(asset.pixel_width as i32);
                    xobj.height(asset.pixel_height as i32);
                    xobj.color_space().device_rgb();
                    xobj.bits_per_component(8);
                    if let Some(mask_ref) = smask_ref {
                        xobj.s_mask(mask_ref);
                    }
                }
            }
            out.push((asset.pdf_name, xobj_ref));
        }
        out
    }
}

/// One painting call captured by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text { x: f32, y: f32, style: FontStyle, size: f32, text: String },
    Rect { x: f32, y: f32, width: f32, height: f32 },
    Circle { cx: f32, cy: f32, radius: f32 },
    DropdownMarker { x: f32, y: f32 },
    Image { path: PathBuf, x: f32, y: f32 },
}

/// Surface that only remembers what was drawn on which page.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<(usize, DrawOp)>,
    page: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops_on_page(&self, page: usize) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |(p, _)| *p == page).map(|(_, op)| op)
    }

    fn record(&mut self, op: DrawOp) {
        self.ops.push((self.page, op));
    }
}

impl Surface for RecordingSurface {
    fn draw_text(&mut self, x: f32, y: f32, style: FontStyle, size: f32, _color: [u8; 3], text: &str) {
        self.record(DrawOp::Text {
            x,
            y,
            style,
            size,
            text: text.to_string(),
        });
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.record(DrawOp::Circle { cx, cy, radius });
    }

    fn draw_dropdown_marker(&mut self, x: f32, y: f32) {
        self.record(DrawOp::DropdownMarker { x, y });
    }

    fn draw_image(&mut self, path: &Path, x: f32, y: f32, _max_width: f32, _max_height: f32) -> bool {
        self.record(DrawOp::Image {
            path: path.to_path_buf(),
            x,
            y,
        });
        true
    }

    fn show_page(&mut self) {
        self.page += 1;
    }

    fn page_count(&self) -> usize {
        self.page + 1
    }
}
