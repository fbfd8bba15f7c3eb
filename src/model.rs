use crate::error::Error;
use crate::geometry;

/// Axis-aligned box in page units, origin at the bottom-left of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }

    /// `[x1, y1, x2, y2]` as written into a `/Rect` entry.
    pub fn corners(&self) -> [f32; 4] {
        [self.x, self.y, self.right(), self.top()]
    }
}

/// Symmetric inset applied on both sides of each axis.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize)]
pub struct Padding {
    pub x: f32,
    pub y: f32,
}

impl Padding {
    pub const ZERO: Padding = Padding { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    SingleLineText,
    MultilineText,
    Dropdown { options: Vec<String> },
    /// One option of a radio group; the group is the set of descriptors sharing a name.
    RadioOption { value: String },
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::SingleLineText => "text",
            FieldKind::MultilineText => "paragraph",
            FieldKind::Dropdown { .. } => "dropdown",
            FieldKind::RadioOption { .. } => "radio",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub outer: Rect,
    pub interior: Rect,
    pub required: bool,
    pub page_index: usize,
}

impl FieldDescriptor {
    /// Builds a descriptor whose interior is `outer` inset by `padding`.
    pub fn new(
        name: impl Into<String>,
        kind: FieldKind,
        outer: Rect,
        padding: Padding,
        required: bool,
        page_index: usize,
    ) -> Result<Self, Error> {
        let interior = geometry::interior(outer, padding)?;
        Ok(Self {
            name: name.into(),
            kind,
            outer,
            interior,
            required,
            page_index,
        })
    }

    /// Option strings: the dropdown list, the single value of a radio option, or nothing.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Dropdown { options } => options,
            FieldKind::RadioOption { value } => std::slice::from_ref(value),
            FieldKind::SingleLineText | FieldKind::MultilineText => &[],
        }
    }

    pub fn group_value(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::RadioOption { value } => Some(value),
            _ => None,
        }
    }
}
