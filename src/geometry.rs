use crate::error::Error;
use crate::model::{Padding, Rect};

/// Inset `outer` by `padding` on every side.
///
/// Padding that would leave a zero or negative interior (or negative padding) is
/// a caller bug and aborts the document with [`Error::InvalidGeometry`].
pub fn interior(outer: Rect, padding: Padding) -> Result<Rect, Error> {
    let width = outer.width - 2.0 * padding.x;
    let height = outer.height - 2.0 * padding.y;
    if padding.x < 0.0 || padding.y < 0.0 || width <= 0.0 || height <= 0.0 {
        return Err(Error::InvalidGeometry { outer, padding });
    }
    Ok(Rect::new(outer.x + padding.x, outer.y + padding.y, width, height))
}

/// The two side-by-side zones of a text + dropdown field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompoundZones {
    pub text: Rect,
    pub dropdown: Rect,
}

/// Split `outer` into a text zone on the left and a dropdown zone of `dropdown_width`
/// on the right, `gap` apart. The text zone takes whatever width remains.
pub fn split_compound(outer: Rect, dropdown_width: f32, gap: f32) -> Result<CompoundZones, Error> {
    let text_width = outer.width - dropdown_width - gap;
    if text_width <= 0.0 || dropdown_width <= 0.0 || gap < 0.0 {
        return Err(Error::CompoundTooNarrow {
            outer,
            dropdown_width,
            gap,
        });
    }
    Ok(CompoundZones {
        text: Rect::new(outer.x, outer.y, text_width, outer.height),
        dropdown: Rect::new(outer.x + text_width + gap, outer.y, dropdown_width, outer.height),
    })
}
