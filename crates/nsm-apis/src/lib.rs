//! Mechanism descriptors for Network Service Mesh.
//!
//! A mechanism is the transport-level means by which a client attaches to a
//! network service. This crate provides the value types and the deep-copy
//! contract they satisfy; negotiation and transport live elsewhere and only
//! produce and consume these values.

mod copy;
mod empty;
mod mechanism;
mod wire;

pub mod codec;

pub use codec::CodecError;
pub use copy::DeepCopy;
pub use empty::Empty;
pub use mechanism::{
    Local, LocalMechanism, MechanismDescriptor, MechanismKind, Parameters, Remote, RemoteMechanism,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use wire::MechanismWire;

/// Any mechanism, tagged by kind on the wire (`"type": "local"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MechanismWire", into = "MechanismWire")]
pub enum Mechanism {
    /// No mechanism.
    Empty(Empty),
    /// Attached on the local node.
    Local(LocalMechanism),
    /// Crosses nodes.
    Remote(RemoteMechanism),
}

impl Mechanism {
    /// The kind name ("empty", "local" or "remote").
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty(_) => "empty",
            Self::Local(m) => m.kind(),
            Self::Remote(m) => m.kind(),
        }
    }

    /// Parameters of a local or remote mechanism. Always `None` for empty.
    pub fn parameters(&self) -> Option<&Parameters> {
        match self {
            Self::Empty(_) => None,
            Self::Local(m) => m.parameters.as_ref(),
            Self::Remote(m) => m.parameters.as_ref(),
        }
    }

    /// Unknown wire fields of whichever descriptor is held.
    pub fn unrecognized(&self) -> Option<&[u8]> {
        match self {
            Self::Empty(e) => e.unrecognized(),
            Self::Local(m) => m.unrecognized(),
            Self::Remote(m) => m.unrecognized(),
        }
    }

    /// The local descriptor, if this is one.
    pub fn as_local(&self) -> Option<&LocalMechanism> {
        match self {
            Self::Local(m) => Some(m),
            _ => None,
        }
    }

    /// The remote descriptor, if this is one.
    pub fn as_remote(&self) -> Option<&RemoteMechanism> {
        match self {
            Self::Remote(m) => Some(m),
            _ => None,
        }
    }

    /// Check if this is the empty marker.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

impl Default for Mechanism {
    fn default() -> Self {
        Self::Empty(Empty::default())
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(_) => f.write_str("empty"),
            Self::Local(m) => fmt::Display::fmt(m, f),
            Self::Remote(m) => fmt::Display::fmt(m, f),
        }
    }
}

impl DeepCopy for Mechanism {
    fn deep_copy_into(&self, out: &mut Self) {
        match (self, out) {
            (Self::Empty(src), Self::Empty(dst)) => src.deep_copy_into(dst),
            (Self::Local(src), Self::Local(dst)) => src.deep_copy_into(dst),
            (Self::Remote(src), Self::Remote(dst)) => src.deep_copy_into(dst),
            (src, dst) => *dst = src.clone(),
        }
    }
}

impl From<Empty> for Mechanism {
    fn from(empty: Empty) -> Self {
        Self::Empty(empty)
    }
}

impl From<LocalMechanism> for Mechanism {
    fn from(m: LocalMechanism) -> Self {
        Self::Local(m)
    }
}

impl From<RemoteMechanism> for Mechanism {
    fn from(m: RemoteMechanism) -> Self {
        Self::Remote(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_into_other_variant_replaces_it() {
        let source = Mechanism::from(RemoteMechanism::from_parameters([("vni", "42")]));
        let mut out = Mechanism::from(LocalMechanism::from_parameters([("ifname", "eth0")]));

        source.deep_copy_into(&mut out);

        assert_eq!(out, source);
        assert_eq!(out.kind(), "remote");
        assert_eq!(out.as_local(), None);
    }

    #[test]
    fn copy_into_same_variant() {
        let source = Mechanism::from(LocalMechanism::from_parameters([("ifname", "eth0")]));
        let mut out = Mechanism::from(LocalMechanism::new().with_parameter("stale", "1"));

        source.deep_copy_into(&mut out);

        assert_eq!(out, source);
        assert_eq!(out.parameters().unwrap().len(), 1);
    }

    #[test]
    fn mutating_copy_leaves_shared_source_alone() {
        let shared = std::sync::Arc::new(Mechanism::from(
            LocalMechanism::from_parameters([("ifname", "eth0")]),
        ));
        let mut private = std::sync::Arc::clone(&shared);

        if let Mechanism::Local(m) = std::sync::Arc::make_mut(&mut private) {
            m.set_parameter("ifname", "veth0");
        }

        assert_eq!(shared.as_local().unwrap().parameter("ifname"), Some("eth0"));
        assert_eq!(private.as_local().unwrap().parameter("ifname"), Some("veth0"));
    }

    #[test]
    fn kinds() {
        assert_eq!(Mechanism::default().kind(), "empty");
        assert!(Mechanism::default().is_empty());
        assert_eq!(Mechanism::default().parameters(), None);
        assert_eq!(Mechanism::from(LocalMechanism::new()).kind(), "local");
        assert_eq!(Mechanism::from(RemoteMechanism::new()).kind(), "remote");
    }

    #[test]
    fn display() {
        assert_eq!(Mechanism::default().to_string(), "empty");
        let local = Mechanism::from(LocalMechanism::from_parameters([("ifname", "eth0")]));
        assert_eq!(local.to_string(), "local{ifname=eth0}");
    }

    #[test]
    fn descriptors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Mechanism>();
        assert_send_sync::<LocalMechanism>();
        assert_send_sync::<RemoteMechanism>();
        assert_send_sync::<Empty>();
    }
}
