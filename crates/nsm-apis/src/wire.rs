//! JSON wire shapes.
//!
//! Descriptors serialize through these intermediates so that fields unknown to
//! this schema are captured into the opaque blob on decode and written back at
//! the top level on encode.

use crate::{Empty, LocalMechanism, Mechanism, Parameters, RemoteMechanism};
use serde::{Deserialize, Serialize};

type UnknownFields = serde_json::Map<String, serde_json::Value>;

/// Field owned by a standalone descriptor. A blob never re-emits it.
const PARAMETERS_KEY: &str = "parameters";

/// Tag of a [`Mechanism`]. Only reserved when a descriptor is wrapped.
const TAG_KEY: &str = "type";

#[derive(Serialize, Deserialize)]
pub(crate) struct DescriptorWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<Parameters>,
    #[serde(flatten)]
    unknown: UnknownFields,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct EmptyWire {
    #[serde(flatten)]
    unknown: UnknownFields,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum MechanismWire {
    Empty(Empty),
    Local(LocalMechanism),
    Remote(RemoteMechanism),
}

impl DescriptorWire {
    pub(crate) fn new(parameters: Option<Parameters>, unrecognized: Option<Vec<u8>>) -> Self {
        let mut unknown = unknown_from_blob(unrecognized);
        unknown.remove(PARAMETERS_KEY);
        Self { parameters, unknown }
    }

    pub(crate) fn into_parts(
        self,
    ) -> Result<(Option<Parameters>, Option<Vec<u8>>), serde_json::Error> {
        Ok((self.parameters, blob_from_unknown(&self.unknown)?))
    }
}

impl EmptyWire {
    pub(crate) fn new(unrecognized: Option<Vec<u8>>) -> Self {
        Self {
            unknown: unknown_from_blob(unrecognized),
        }
    }

    pub(crate) fn into_blob(self) -> Result<Option<Vec<u8>>, serde_json::Error> {
        blob_from_unknown(&self.unknown)
    }
}

impl From<Mechanism> for MechanismWire {
    fn from(mechanism: Mechanism) -> Self {
        match mechanism {
            Mechanism::Empty(mut e) => {
                strip_tag(&mut e.unrecognized);
                Self::Empty(e)
            }
            Mechanism::Local(mut m) => {
                strip_tag(&mut m.unrecognized);
                Self::Local(m)
            }
            Mechanism::Remote(mut m) => {
                strip_tag(&mut m.unrecognized);
                Self::Remote(m)
            }
        }
    }
}

impl From<MechanismWire> for Mechanism {
    fn from(wire: MechanismWire) -> Self {
        match wire {
            MechanismWire::Empty(e) => Self::Empty(e),
            MechanismWire::Local(m) => Self::Local(m),
            MechanismWire::Remote(m) => Self::Remote(m),
        }
    }
}

fn blob_from_unknown(unknown: &UnknownFields) -> Result<Option<Vec<u8>>, serde_json::Error> {
    if unknown.is_empty() {
        return Ok(None);
    }
    serde_json::to_vec(unknown).map(Some)
}

// A blob that is not a JSON object (captured by some other codec) has no JSON
// representation and is left out.
fn unknown_from_blob(blob: Option<Vec<u8>>) -> UnknownFields {
    blob.and_then(|bytes| serde_json::from_slice::<UnknownFields>(&bytes).ok())
        .unwrap_or_default()
}

// An unknown "type" field would collide with the enum tag.
fn strip_tag(blob: &mut Option<Vec<u8>>) {
    let Some(bytes) = blob.as_deref() else {
        return;
    };
    let Ok(mut unknown) = serde_json::from_slice::<UnknownFields>(bytes) else {
        return;
    };
    if unknown.remove(TAG_KEY).is_none() {
        return;
    }
    if let Ok(stripped) = blob_from_unknown(&unknown) {
        *blob = stripped;
    }
}
