use std::cell::OnceCell;

/// A lazily computed value that knows whether it is stale.
///
/// Reads go through [`Cached::get_or_compute`], which recomputes only after
/// [`Cached::invalidate`] and otherwise hands back the same instance.
#[derive(Debug)]
pub struct Cached<T> {
    cell: OnceCell<T>,
}

impl<T> Cached<T> {
    pub fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    pub fn is_stale(&self) -> bool {
        self.cell.get().is_none()
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(compute)
    }

    pub fn invalidate(&mut self) {
        self.cell.take();
    }
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self::new()
    }
}

// A clone starts stale so it never shares a computation with its source.
impl<T> Clone for Cached<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}
