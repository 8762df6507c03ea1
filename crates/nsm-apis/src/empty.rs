//! The empty mechanism marker.

use crate::copy::{DeepCopy, copy_blob};
use crate::wire::EmptyWire;
use serde::{Deserialize, Serialize};

/// No mechanism. Carries only unknown wire fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EmptyWire", into = "EmptyWire")]
pub struct Empty {
    /// Opaque bytes of wire fields this schema does not know.
    pub unrecognized: Option<Vec<u8>>,
}

impl Empty {
    /// Create an empty marker with no unknown fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unknown wire fields, if any were captured.
    pub fn unrecognized(&self) -> Option<&[u8]> {
        self.unrecognized.as_deref()
    }

    /// Replace the unknown wire fields.
    pub fn set_unrecognized(&mut self, blob: Option<Vec<u8>>) {
        self.unrecognized = blob;
    }
}

impl DeepCopy for Empty {
    fn deep_copy_into(&self, out: &mut Self) {
        copy_blob(&self.unrecognized, &mut out.unrecognized);
    }
}

impl From<Empty> for EmptyWire {
    fn from(empty: Empty) -> Self {
        EmptyWire::new(empty.unrecognized)
    }
}

impl TryFrom<EmptyWire> for Empty {
    type Error = serde_json::Error;

    fn try_from(wire: EmptyWire) -> Result<Self, Self::Error> {
        Ok(Self {
            unrecognized: wire.into_blob()?,
        })
    }
}
