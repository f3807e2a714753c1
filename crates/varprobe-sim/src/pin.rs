//! Working-area slot accounting.

use std::cell::Cell;
use std::rc::Rc;

/// One occupied working-area slot. Cloning occupies another; dropping frees it.
#[derive(Debug)]
pub struct Pin(Rc<Cell<usize>>);

impl Pin {
    pub(crate) fn new(live: &Rc<Cell<usize>>) -> Self {
        live.set(live.get() + 1);
        Self(Rc::clone(live))
    }
}

impl Clone for Pin {
    fn clone(&self) -> Self {
        Self::new(&self.0)
    }
}

impl Drop for Pin {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}
