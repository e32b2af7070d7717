//! Text frame encoding and validated decoding.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::config::HoldableConfig;
use crate::state::{BodySnapshot, ObjectId};

use super::{ItemMessage, Opcode, ProtocolError, bool_from_wire, bool_to_wire};

/// First field of every item frame; routes the frame to the item layer.
pub const ROUTING_TAG: &str = "item";

const DELIMITER: char = ',';

/// Decimal precision used when writing floats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatPrecision {
    /// Shortest representation that round-trips exactly.
    #[default]
    Full,
    /// Fixed number of digits after the decimal point.
    Fixed(u8),
}

impl FloatPrecision {
    fn write(self, out: &mut String, value: f32) {
        // Writing into a String cannot fail.
        let _ = match self {
            FloatPrecision::Full => write!(out, "{value}"),
            FloatPrecision::Fixed(digits) => write!(out, "{value:.prec$}", prec = digits as usize),
        };
    }

    /// Largest rounding error a value written with this precision can carry.
    pub fn tolerance(self) -> f32 {
        match self {
            FloatPrecision::Full => f32::EPSILON,
            FloatPrecision::Fixed(digits) => 0.5 * 10f32.powi(-i32::from(digits)),
        }
    }
}

/// Precision policy for outgoing frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub default_precision: FloatPrecision,
    pub hand_exit_precision: FloatPrecision,
}

impl ProtocolConfig {
    pub fn precision_for(&self, opcode: Opcode) -> FloatPrecision {
        if opcode.is_hand_exit() {
            self.hand_exit_precision
        } else {
            self.default_precision
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            default_precision: FloatPrecision::Full,
            hand_exit_precision: HoldableConfig::DEFAULT_HAND_EXIT_PRECISION,
        }
    }
}

impl From<&HoldableConfig> for ProtocolConfig {
    fn from(config: &HoldableConfig) -> Self {
        Self {
            default_precision: FloatPrecision::Full,
            hand_exit_precision: config.hand_exit_precision,
        }
    }
}

/// Encodes a message as `item,<Opcode>[,fields…]`.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidAnimName`] when an animation name would
/// break the field layout.
pub fn encode_frame(message: &ItemMessage, config: &ProtocolConfig) -> Result<String, ProtocolError> {
    let opcode = message.opcode();
    let precision = config.precision_for(opcode);

    let mut frame = String::with_capacity(64);
    frame.push_str(ROUTING_TAG);
    frame.push(DELIMITER);
    frame.push_str(opcode.as_ref());

    match message {
        ItemMessage::InPlayerHand => {}
        ItemMessage::OutPlayerHand(snapshot)
        | ItemMessage::Dropped(snapshot)
        | ItemMessage::OutInv(snapshot) => {
            for value in snapshot.to_fields() {
                frame.push(DELIMITER);
                precision.write(&mut frame, value);
            }
        }
        ItemMessage::InInv { container } => {
            frame.push(DELIMITER);
            let _ = write!(frame, "{}", f64::from(container.raw()));
        }
        ItemMessage::Anim { name, value } => {
            if name.is_empty() || name.contains(DELIMITER) {
                return Err(ProtocolError::InvalidAnimName(name.clone()));
            }
            frame.push(DELIMITER);
            frame.push_str(name);
            frame.push(DELIMITER);
            frame.push_str(bool_to_wire(*value));
        }
        ItemMessage::InvRot { rotated } => {
            frame.push(DELIMITER);
            frame.push_str(bool_to_wire(*rotated));
        }
    }

    Ok(frame)
}

/// Decodes and validates an item frame.
///
/// # Errors
///
/// Any structural problem (routing tag, opcode, field count) or unparsable
/// field rejects the whole frame.
pub fn decode_frame(frame: &str) -> Result<ItemMessage, ProtocolError> {
    let fields: Vec<&str> = frame.split(DELIMITER).collect();

    match fields.first() {
        Some(&tag) if tag == ROUTING_TAG => {}
        found => {
            return Err(ProtocolError::MissingRoutingTag {
                found: found.copied().unwrap_or_default().to_owned(),
            });
        }
    }

    let raw_opcode = fields
        .get(1)
        .filter(|raw| !raw.is_empty())
        .ok_or(ProtocolError::MissingOpcode)?;
    let opcode = Opcode::from_str(raw_opcode)
        .map_err(|_| ProtocolError::UnknownOpcode((*raw_opcode).to_owned()))?;

    let args = &fields[2..];
    if args.len() != opcode.field_count() {
        return Err(ProtocolError::FieldCount {
            opcode,
            expected: opcode.field_count(),
            found: args.len(),
        });
    }

    let message = match opcode {
        Opcode::InPlayerHand => ItemMessage::InPlayerHand,
        Opcode::OutPlayerHand => ItemMessage::OutPlayerHand(parse_snapshot(args)?),
        Opcode::Dropped => ItemMessage::Dropped(parse_snapshot(args)?),
        Opcode::OutInv => ItemMessage::OutInv(parse_snapshot(args)?),
        Opcode::InInv => ItemMessage::InInv {
            container: parse_object_id(args[0])?,
        },
        Opcode::Anim => {
            let name = args[0];
            if name.is_empty() {
                return Err(ProtocolError::InvalidAnimName(String::new()));
            }
            ItemMessage::Anim {
                name: name.to_owned(),
                value: parse_bool(args, 1)?,
            }
        }
        Opcode::InvRot => ItemMessage::InvRot {
            rotated: parse_bool(args, 0)?,
        },
    };

    Ok(message)
}

fn parse_snapshot(args: &[&str]) -> Result<BodySnapshot, ProtocolError> {
    let mut values = [0.0f32; BodySnapshot::FIELD_COUNT];
    for (index, (slot, raw)) in values.iter_mut().zip(args).enumerate() {
        *slot = parse_float(index, raw)?;
    }
    Ok(BodySnapshot::from_fields(&values))
}

fn parse_float(index: usize, raw: &str) -> Result<f32, ProtocolError> {
    raw.parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ProtocolError::InvalidFloat {
            index,
            value: raw.to_owned(),
        })
}

fn parse_bool(args: &[&str], index: usize) -> Result<bool, ProtocolError> {
    bool_from_wire(args[index]).ok_or_else(|| ProtocolError::InvalidBool {
        index,
        value: args[index].to_owned(),
    })
}

/// Parses a float-encoded object id (`"12"` or `"12.0"`).
pub(crate) fn parse_object_id(raw: &str) -> Result<ObjectId, ProtocolError> {
    let invalid = || ProtocolError::InvalidContainerId(raw.to_owned());
    let value = raw.parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(invalid());
    }
    Ok(ObjectId(value as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use strum::IntoEnumIterator;

    fn snapshot() -> BodySnapshot {
        BodySnapshot {
            position: Vec3::new(1.234_567, -2.5, 0.125),
            rotation: Quat::from_rotation_y(0.7),
            velocity: Vec3::new(0.0, -9.81, 0.333_333),
            angular_velocity: Vec3::new(0.1, 0.2, 0.3),
        }
    }

    #[test]
    fn pick_up_frame_has_no_fields() {
        let frame = encode_frame(&ItemMessage::InPlayerHand, &ProtocolConfig::default()).unwrap();
        assert_eq!(frame, "item,InPlayerHand");
    }

    #[test]
    fn hand_exit_frames_use_four_decimals() {
        let frame =
            encode_frame(&ItemMessage::Dropped(snapshot()), &ProtocolConfig::default()).unwrap();
        assert!(frame.starts_with("item,Dropped,1.2346,-2.5000,0.1250,"));
        assert_eq!(frame.split(',').count(), 2 + BodySnapshot::FIELD_COUNT);
    }

    #[test]
    fn out_inv_uses_full_precision() {
        let original = snapshot();
        let frame = encode_frame(&ItemMessage::OutInv(original), &ProtocolConfig::default()).unwrap();
        assert_eq!(decode_frame(&frame).unwrap(), ItemMessage::OutInv(original));
    }

    #[test]
    fn container_id_is_float_encoded() {
        let message = ItemMessage::InInv {
            container: ObjectId(42),
        };
        let frame = encode_frame(&message, &ProtocolConfig::default()).unwrap();
        assert_eq!(frame, "item,InInv,42");
        assert_eq!(decode_frame("item,InInv,42.0").unwrap(), message);
    }

    #[test]
    fn booleans_use_capitalised_literals() {
        let frame = encode_frame(
            &ItemMessage::Anim {
                name: "Swing".into(),
                value: true,
            },
            &ProtocolConfig::default(),
        )
        .unwrap();
        assert_eq!(frame, "item,Anim,Swing,True");
        assert_eq!(
            decode_frame("item,InvRot,False").unwrap(),
            ItemMessage::InvRot { rotated: false }
        );
    }

    #[test]
    fn anim_name_with_delimiter_is_rejected() {
        let err = encode_frame(
            &ItemMessage::Anim {
                name: "a,b".into(),
                value: true,
            },
            &ProtocolConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ProtocolError::InvalidAnimName("a,b".into()));
    }

    #[test]
    fn rejects_wrong_routing_tag() {
        assert!(matches!(
            decode_frame("door,InPlayerHand"),
            Err(ProtocolError::MissingRoutingTag { .. })
        ));
        assert!(matches!(
            decode_frame(""),
            Err(ProtocolError::MissingRoutingTag { .. })
        ));
    }

    #[test]
    fn rejects_missing_and_unknown_opcodes() {
        assert_eq!(decode_frame("item"), Err(ProtocolError::MissingOpcode));
        assert_eq!(decode_frame("item,"), Err(ProtocolError::MissingOpcode));
        assert_eq!(
            decode_frame("item,Explode"),
            Err(ProtocolError::UnknownOpcode("Explode".into()))
        );
    }

    #[test]
    fn rejects_truncated_snapshot() {
        assert_eq!(
            decode_frame("item,Dropped,1,2,3"),
            Err(ProtocolError::FieldCount {
                opcode: Opcode::Dropped,
                expected: 13,
                found: 3,
            })
        );
    }

    #[test]
    fn rejects_unparsable_and_non_finite_floats() {
        let bad = "item,OutInv,1,2,x,0,0,0,1,0,0,0,0,0,0";
        assert_eq!(
            decode_frame(bad),
            Err(ProtocolError::InvalidFloat {
                index: 2,
                value: "x".into(),
            })
        );
        let nan = "item,OutInv,NaN,2,3,0,0,0,1,0,0,0,0,0,0";
        assert!(matches!(
            decode_frame(nan),
            Err(ProtocolError::InvalidFloat { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_lowercase_bool_and_fractional_container() {
        assert!(matches!(
            decode_frame("item,InvRot,true"),
            Err(ProtocolError::InvalidBool { .. })
        ));
        assert!(matches!(
            decode_frame("item,InInv,3.5"),
            Err(ProtocolError::InvalidContainerId(_))
        ));
        assert!(matches!(
            decode_frame("item,InInv,-1"),
            Err(ProtocolError::InvalidContainerId(_))
        ));
    }

    #[test]
    fn every_opcode_declares_its_arity() {
        for opcode in Opcode::iter() {
            let frame = format!("item,{opcode}");
            let result = decode_frame(&frame);
            if opcode.field_count() == 0 {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result, Err(ProtocolError::FieldCount { .. })));
            }
        }
    }

    #[test]
    fn fixed_precision_tolerance() {
        assert!((FloatPrecision::Fixed(4).tolerance() - 0.000_05).abs() < 1e-9);
    }
}
