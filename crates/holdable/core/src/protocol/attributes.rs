//! Key/value attributes exchanged with the external save format.

use crate::state::ObjectId;

use super::{bool_from_wire, bool_to_wire, codec::parse_object_id};

pub const KEY_HIDDEN: &str = "Hidden";
pub const KEY_CONTAINER_IN: &str = "containerIn";
pub const KEY_INV_ROT: &str = "InvRot";

/// `containerIn` value meaning "not in a container".
const NO_CONTAINER: &str = "-1";

/// One saved key/value pair.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The attributes an item persists between sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersistedAttributes {
    /// Written only when true; presence of the key is the marker.
    pub hidden: bool,
    pub container_in: Option<ObjectId>,
    pub inv_rot: bool,
}

impl PersistedAttributes {
    pub fn to_attributes(&self) -> Vec<Attribute> {
        let mut out = Vec::with_capacity(3);
        if self.hidden {
            out.push(Attribute::new(KEY_HIDDEN, "1"));
        }
        let container = match self.container_in {
            Some(id) => f64::from(id.raw()).to_string(),
            None => NO_CONTAINER.to_owned(),
        };
        out.push(Attribute::new(KEY_CONTAINER_IN, container));
        out.push(Attribute::new(KEY_INV_ROT, bool_to_wire(self.inv_rot)));
        out
    }

    /// Reads saved attributes. Unknown keys are ignored; unreadable values
    /// fall back to the default with a warning.
    pub fn parse(attributes: &[Attribute]) -> Self {
        let mut parsed = Self::default();
        for attribute in attributes {
            match attribute.key.as_str() {
                KEY_HIDDEN => parsed.hidden = true,
                KEY_CONTAINER_IN => {
                    parsed.container_in = match attribute.value.as_str() {
                        NO_CONTAINER | "-1.0" => None,
                        raw => match parse_object_id(raw) {
                            Ok(id) => Some(id),
                            Err(error) => {
                                tracing::warn!(%error, "ignoring saved container link");
                                None
                            }
                        },
                    };
                }
                KEY_INV_ROT => match bool_from_wire(&attribute.value) {
                    Some(rotated) => parsed.inv_rot = rotated,
                    None => tracing::warn!(value = %attribute.value, "ignoring saved InvRot"),
                },
                _ => {}
            }
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_item_writes_sentinel_container() {
        let attributes = PersistedAttributes::default().to_attributes();
        assert_eq!(
            attributes,
            vec![
                Attribute::new("containerIn", "-1"),
                Attribute::new("InvRot", "False"),
            ]
        );
    }

    #[test]
    fn stored_hidden_item_round_trips() {
        let saved = PersistedAttributes {
            hidden: true,
            container_in: Some(ObjectId(17)),
            inv_rot: true,
        };
        let attributes = saved.to_attributes();
        assert_eq!(attributes[0], Attribute::new("Hidden", "1"));
        assert_eq!(attributes[1], Attribute::new("containerIn", "17"));
        assert_eq!(PersistedAttributes::parse(&attributes), saved);
    }

    #[test]
    fn garbage_values_fall_back_to_defaults() {
        let parsed = PersistedAttributes::parse(&[
            Attribute::new("containerIn", "chest"),
            Attribute::new("InvRot", "yes"),
            Attribute::new("Colour", "red"),
        ]);
        assert_eq!(parsed, PersistedAttributes::default());
    }
}
