//! Opaque element handles

use slotmap::new_key_type;

new_key_type! {
    /// Opaque identity of a host element (marker, sticky target, or root)
    pub struct ElementId;
}

impl ElementId {
    /// Convert to raw u64 for logging
    pub fn to_raw(&self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}
