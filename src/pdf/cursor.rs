/// Why the layout moved to a new page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BreakReason {
    /// A space check found the cursor below the requested minimum.
    InsufficientSpace { y: f32, required: f32 },
    /// Section boundary or an explicit `new_page`.
    Explicit,
}

/// Vertical write position on the current page. `y` counts down from
/// `top_margin`; page indices only ever grow.
#[derive(Clone, Debug)]
pub struct LayoutCursor {
    y: f32,
    page_index: usize,
    top_margin: f32,
    bottom_margin: f32,
}

impl LayoutCursor {
    pub fn new(top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            y: top_margin,
            page_index: 0,
            top_margin,
            bottom_margin,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn bottom_margin(&self) -> f32 {
        self.bottom_margin
    }

    pub fn advance(&mut self, delta: f32) {
        self.y -= delta;
    }

    /// Move to an absolute position on the current page.
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Breaks the page when `y < minimum`. Returns the break that happened, if any;
    /// the caller is responsible for flushing the drawing surface.
    pub fn require_space(&mut self, minimum: f32) -> Option<BreakReason> {
        if self.y < minimum {
            let reason = BreakReason::InsufficientSpace {
                y: self.y,
                required: minimum,
            };
            self.next_page();
            Some(reason)
        } else {
            None
        }
    }

    /// Unconditional break: next page, cursor back at the top margin.
    pub fn page_break(&mut self) -> BreakReason {
        self.next_page();
        BreakReason::Explicit
    }

    fn next_page(&mut self) {
        self.page_index += 1;
        self.y = self.top_margin;
    }

    /// Room left above the bottom margin.
    pub fn remaining(&self) -> f32 {
        self.y - self.bottom_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enough_space_keeps_page_and_position() {
        let mut c = LayoutCursor::new(790.0, 50.0);
        c.advance(300.0);
        assert_eq!(c.require_space(200.0), None);
        assert_eq!(c.page_index(), 0);
        assert_eq!(c.y(), 490.0);
    }

    #[test]
    fn boundary_value_does_not_break() {
        let mut c = LayoutCursor::new(790.0, 50.0);
        c.set_y(200.0);
        assert_eq!(c.require_space(200.0), None);
        assert_eq!(c.page_index(), 0);
    }

    #[test]
    fn low_cursor_breaks_once() {
        let mut c = LayoutCursor::new(790.0, 50.0);
        c.set_y(40.0);
        let reason = c.require_space(200.0);
        assert_eq!(
            reason,
            Some(BreakReason::InsufficientSpace {
                y: 40.0,
                required: 200.0
            })
        );
        assert_eq!(c.page_index(), 1);
        assert_eq!(c.y(), 790.0);
        assert_eq!(c.require_space(200.0), None);
        assert_eq!(c.page_index(), 1);
    }

    #[test]
    fn explicit_break_resets_even_at_top() {
        let mut c = LayoutCursor::new(790.0, 50.0);
        assert_eq!(c.page_break(), BreakReason::Explicit);
        assert_eq!(c.page_index(), 1);
        assert_eq!(c.y(), 790.0);
        assert_eq!(c.remaining(), 740.0);
    }
}
