use std::ops::Deref;

/// Append-only list that keeps at most `cap` items. Pushes past the cap are
/// dropped and remembered through [`BoundedList::is_truncated`].
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedList<T> {
    items: Vec<T>,
    cap: usize,
    truncated: bool,
}

impl<T> BoundedList<T> {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
            truncated: false,
        }
    }

    /// Returns false when the item was dropped.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.len() >= self.cap {
            self.truncated = true;
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for BoundedList<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        &self.items
    }
}
