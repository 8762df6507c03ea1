//! Local and remote mechanism descriptors.
//!
//! Both are one generic [`MechanismDescriptor`] tagged with a zero-sized kind
//! marker. They share shape and copy logic but are distinct types, so a local
//! mechanism can never stand in for a remote one.

use crate::copy::{DeepCopy, copy_blob, copy_parameters};
use crate::wire::DescriptorWire;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Open-ended mechanism parameters.
pub type Parameters = HashMap<String, String>;

mod sealed {
    pub trait Sealed {}
}

/// Marker for the kind of a [`MechanismDescriptor`].
pub trait MechanismKind:
    sealed::Sealed + fmt::Debug + Clone + Copy + Default + PartialEq + Eq + Send + Sync + 'static
{
    /// Wire tag and display name.
    const NAME: &'static str;
}

/// Reachable without leaving the local node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Local;

/// Requires cross-node transport setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remote;

impl sealed::Sealed for Local {}
impl sealed::Sealed for Remote {}

impl MechanismKind for Local {
    const NAME: &'static str = "local";
}

impl MechanismKind for Remote {
    const NAME: &'static str = "remote";
}

/// A mechanism attached on the local node.
pub type LocalMechanism = MechanismDescriptor<Local>;

/// A mechanism that crosses nodes.
pub type RemoteMechanism = MechanismDescriptor<Remote>;

/// A mechanism descriptor: a parameter bag plus unknown wire fields.
///
/// `parameters: None` (never set) and `Some(empty)` are different values and
/// both survive copying and encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "", try_from = "DescriptorWire", into = "DescriptorWire")]
pub struct MechanismDescriptor<K: MechanismKind> {
    /// Mechanism parameters, if any were set.
    pub parameters: Option<Parameters>,
    /// Opaque bytes of wire fields this schema does not know.
    pub unrecognized: Option<Vec<u8>>,
    kind: PhantomData<K>,
}

impl<K: MechanismKind> MechanismDescriptor<K> {
    /// Create a descriptor with no parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a descriptor whose parameter map holds exactly `params`.
    pub fn from_parameters<I, Key, Value>(params: I) -> Self
    where
        I: IntoIterator<Item = (Key, Value)>,
        Key: Into<String>,
        Value: Into<String>,
    {
        Self {
            parameters: Some(
                params
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Builder form of [`set_parameter`](Self::set_parameter).
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_parameter(key, value);
        self
    }

    /// The kind name ("local" or "remote").
    pub fn kind(&self) -> &'static str {
        K::NAME
    }

    /// Look up a single parameter.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.as_ref()?.get(key).map(String::as_str)
    }

    /// Insert a parameter, creating the map if it is absent.
    /// Returns the previous value for `key`.
    pub fn set_parameter(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.parameters
            .get_or_insert_with(Parameters::new)
            .insert(key.into(), value.into())
    }

    /// Remove a parameter. The map stays present even when it becomes empty.
    pub fn remove_parameter(&mut self, key: &str) -> Option<String> {
        self.parameters.as_mut()?.remove(key)
    }

    /// Drop the parameter map entirely.
    pub fn clear_parameters(&mut self) {
        self.parameters = None;
    }

    /// Check if the parameter map is present (possibly empty).
    pub fn has_parameters(&self) -> bool {
        self.parameters.is_some()
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

impl<K: MechanismKind> DeepCopy for MechanismDescriptor<K> {
    fn deep_copy_into(&self, out: &mut Self) {
        copy_parameters(&self.parameters, &mut out.parameters);
        copy_blob(&self.unrecognized, &mut out.unrecognized);
    }
}

impl<K: MechanismKind> fmt::Display for MechanismDescriptor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(K::NAME)?;
        if let Some(params) = &self.parameters {
            let mut entries: Vec<_> = params.iter().collect();
            entries.sort();
            f.write_str("{")?;
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

impl<K: MechanismKind> From<MechanismDescriptor<K>> for DescriptorWire {
    fn from(descriptor: MechanismDescriptor<K>) -> Self {
        DescriptorWire::new(descriptor.parameters, descriptor.unrecognized)
    }
}

impl<K: MechanismKind> TryFrom<DescriptorWire> for MechanismDescriptor<K> {
    type Error = serde_json::Error;

    fn try_from(wire: DescriptorWire) -> Result<Self, Self::Error> {
        let (parameters, unrecognized) = wire.into_parts()?;
        Ok(Self {
            parameters,
            unrecognized,
            kind: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_matches_and_owns_parameters() {
        let source = LocalMechanism::from_parameters([("ifname", "eth0")]);
        let copy = LocalMechanism::deep_copy(Some(&source)).unwrap();

        assert_eq!(copy, source);
        assert_eq!(copy.parameter("ifname"), Some("eth0"));
    }

    #[test]
    fn absent_parameters_stay_absent() {
        let source = RemoteMechanism::new();
        let copy = RemoteMechanism::deep_copy(Some(&source)).unwrap();

        assert_eq!(copy.parameters, None);
        assert!(!copy.has_parameters());
    }

    #[test]
    fn empty_parameters_stay_present() {
        let source = RemoteMechanism::from_parameters(Vec::<(String, String)>::new());
        let copy = RemoteMechanism::deep_copy(Some(&source)).unwrap();

        assert_eq!(copy.parameters, Some(Parameters::new()));
    }

    #[test]
    fn deep_copy_of_none_is_none() {
        assert_eq!(LocalMechanism::deep_copy(None), None);
        assert_eq!(RemoteMechanism::deep_copy(None), None);
    }

    #[test]
    fn mutating_copy_leaves_source_alone() {
        let source = LocalMechanism::new()
            .with_parameter("ifname", "eth0")
            .with_parameter("netns", "/proc/1/ns/net");
        let mut copy = source.clone();

        copy.set_parameter("ifname", "veth1");
        copy.remove_parameter("netns");

        assert_eq!(source.parameter("ifname"), Some("eth0"));
        assert_eq!(source.parameter("netns"), Some("/proc/1/ns/net"));
        assert_eq!(copy.parameter("ifname"), Some("veth1"));
        assert_eq!(copy.parameter("netns"), None);
    }

    #[test]
    fn deep_copy_into_overwrites_destination() {
        let source = RemoteMechanism::from_parameters([("src_ip", "10.0.0.1")]);
        let mut out = RemoteMechanism::new()
            .with_parameter("dst_ip", "10.0.0.2")
            .with_parameter("vni", "7");
        out.set_unrecognized(Some(vec![1, 2, 3]));

        source.deep_copy_into(&mut out);

        assert_eq!(out, source);
        assert_eq!(out.unrecognized(), None);
    }

    #[test]
    fn blob_is_copied_into_new_buffer() {
        let mut source = LocalMechanism::new();
        source.set_unrecognized(Some(vec![0xde, 0xad, 0xbe, 0xef]));
        let copy = LocalMechanism::deep_copy(Some(&source)).unwrap();

        assert_eq!(copy.unrecognized(), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
        assert_ne!(
            source.unrecognized().unwrap().as_ptr(),
            copy.unrecognized().unwrap().as_ptr()
        );
    }

    #[test]
    fn remove_keeps_map_present() {
        let mut m = LocalMechanism::from_parameters([("ifname", "eth0")]);
        assert_eq!(m.remove_parameter("ifname"), Some("eth0".to_string()));
        assert_eq!(m.parameters, Some(Parameters::new()));

        m.clear_parameters();
        assert_eq!(m.parameters, None);
        assert_eq!(m.remove_parameter("ifname"), None);
    }

    #[test]
    fn kinds() {
        assert_eq!(LocalMechanism::new().kind(), "local");
        assert_eq!(RemoteMechanism::new().kind(), "remote");
    }

    #[test]
    fn display_sorts_parameters() {
        let m = RemoteMechanism::new()
            .with_parameter("vni", "7")
            .with_parameter("dst_ip", "10.0.0.2");
        assert_eq!(m.to_string(), "remote{dst_ip=10.0.0.2, vni=7}");
        assert_eq!(LocalMechanism::new().to_string(), "local");
    }
}
