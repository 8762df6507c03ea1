//! The deep-copy contract shared by every API value type.
//!
//! A copy compares equal to its source and owns all of its storage, so later
//! mutation of either side is never visible through the other. Optional
//! containers keep their presence: an absent map stays absent, a present but
//! empty map stays present.

use crate::Parameters;

/// A value that can be duplicated without sharing mutable storage.
pub trait DeepCopy: Clone + Default {
    /// Overwrite `out` with a deep copy of `self`.
    fn deep_copy_into(&self, out: &mut Self) {
        out.clone_from(self);
    }

    /// Allocate a deep copy of `source`. `None` is a valid value and passes
    /// straight through.
    fn deep_copy(source: Option<&Self>) -> Option<Self> {
        source.map(|value| {
            let mut out = Self::default();
            value.deep_copy_into(&mut out);
            out
        })
    }
}

/// Copy a parameter map pair by pair into `dst`, reusing its allocation.
pub(crate) fn copy_parameters(src: &Option<Parameters>, dst: &mut Option<Parameters>) {
    match src {
        None => *dst = None,
        Some(params) => {
            let out = dst.get_or_insert_with(|| Parameters::with_capacity(params.len()));
            out.clear();
            out.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
}

/// Copy an opaque byte blob into `dst`, reusing its allocation.
pub(crate) fn copy_blob(src: &Option<Vec<u8>>, dst: &mut Option<Vec<u8>>) {
    match src {
        None => *dst = None,
        Some(bytes) => {
            let out = dst.get_or_insert_with(|| Vec::with_capacity(bytes.len()));
            out.clear();
            out.extend_from_slice(bytes);
        }
    }
}
