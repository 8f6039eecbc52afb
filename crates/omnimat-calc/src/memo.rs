//! Compute-once cell for per-node intermediate results

use omnimat_core::MatrixResult;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Lazily computed value shared by all reads of one node.
///
/// The first caller computes while holding the lock; concurrent first
/// readers wait and then reuse the result, so the computation runs at most
/// once until [`Memo::clear`].
pub struct Memo<T> {
    cell: Mutex<Option<Arc<T>>>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cell: Mutex::new(None),
        }
    }

    /// Cached value, computing it with `init` on first use. A failed `init`
    /// leaves the memo empty.
    pub fn get_or_try_init<F>(&self, init: F) -> MatrixResult<Arc<T>>
    where
        F: FnOnce() -> MatrixResult<T>,
    {
        let mut cell = self.cell.lock();
        if let Some(value) = cell.as_ref() {
            return Ok(value.clone());
        }
        let value = Arc::new(init()?);
        *cell = Some(value.clone());
        Ok(value)
    }

    pub fn clear(&self) {
        *self.cell.lock() = None;
    }

    pub fn is_set(&self) -> bool {
        self.cell.lock().is_some()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo").field("set", &self.is_set()).finish()
    }
}
