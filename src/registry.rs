use crate::model::FieldDescriptor;

/// Append-only record of every field drawn during layout, in creation order.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, field: FieldDescriptor) {
        debug_assert!(
            self.fields
                .last()
                .is_none_or(|last| last.page_index <= field.page_index),
            "field {} registered on an earlier page than its predecessor",
            field.name
        );
        log::debug!(
            "field {} ({}) on page {}",
            field.name,
            field.kind.label(),
            field.page_index
        );
        self.fields.push(field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Per-page subsequences for pages `0..page_count`, creation order preserved.
    /// Pages without fields get an empty list.
    pub fn by_page(&self, page_count: usize) -> Vec<Vec<&FieldDescriptor>> {
        let pages = page_count.max(self.fields.last().map_or(0, |f| f.page_index + 1));
        let mut out: Vec<Vec<&FieldDescriptor>> = vec![Vec::new(); pages];
        for field in &self.fields {
            out[field.page_index].push(field);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldKind, Padding, Rect};

    fn text(name: &str, page: usize) -> FieldDescriptor {
        FieldDescriptor::new(
            name,
            FieldKind::SingleLineText,
            Rect::new(50.0, 100.0, 200.0, 20.0),
            Padding::new(6.0, 4.0),
            false,
            page,
        )
        .unwrap()
    }

    #[test]
    fn by_page_keeps_creation_order() {
        let mut reg = FieldRegistry::new();
        reg.register(text("a", 0));
        reg.register(text("b", 0));
        reg.register(text("c", 2));
        reg.register(text("d", 2));

        let pages = reg.by_page(3);
        assert_eq!(pages.len(), 3);
        let names = |p: &Vec<&FieldDescriptor>| p.iter().map(|f| f.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&pages[0]), ["a", "b"]);
        assert!(pages[1].is_empty());
        assert_eq!(names(&pages[2]), ["c", "d"]);
    }

    #[test]
    fn duplicate_names_are_kept() {
        let mut reg = FieldRegistry::new();
        reg.register(text("same", 0));
        reg.register(text("same", 0));
        assert_eq!(reg.len(), 2);
    }
}
