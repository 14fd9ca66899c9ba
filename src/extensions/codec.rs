//! Conversion between configuration state and handshake extension bytes.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ConfigState;
use crate::core::constants::{INT64_SIZE, MAX_BLOCK_LENGTH};
use crate::core::{OptionResult, Role};
use crate::options::{
    Advertise, Direction, OptionDescriptor, OptionId, OptionKind, OptionValue, duration_to_millis,
};

use super::block::{ExtensionBlock, ExtensionSet};

/// Option values received from the peer, keyed by the option they carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerOptions {
    values: Vec<(OptionId, OptionValue)>,
}

impl PeerOptions {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, replacing any earlier one for the same option.
    pub fn insert(&mut self, id: OptionId, value: OptionValue) {
        match self.values.iter_mut().find(|(e, _)| *e == id) {
            Some(entry) => entry.1 = value,
            None => self.values.push((id, value)),
        }
    }

    /// Value the peer sent for `id`.
    pub fn get(&self, id: OptionId) -> Option<&OptionValue> {
        self.values.iter().find(|(e, _)| *e == id).map(|(_, v)| v)
    }

    /// Iterate over received values in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionId, &OptionValue)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    /// Number of received values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing was received.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check if `role` emits blocks travelling in `direction`.
fn sends(direction: Direction, role: Role) -> bool {
    match direction {
        Direction::Both => true,
        Direction::CallerOnly => role == Role::Caller,
    }
}

/// Encode the extension area `role` sends for `state`.
///
/// Options never set explicitly are left out unless they are always
/// advertised.
pub fn encode_outbound_extension(state: &ConfigState, role: Role) -> Vec<u8> {
    let mut set = ExtensionSet::new();

    for desc in OptionDescriptor::all() {
        let Some(wire) = desc.wire else { continue };
        if !sends(wire.direction, role) {
            continue;
        }
        if wire.advertise == Advertise::WhenSet && !state.is_explicit(desc.id) {
            continue;
        }

        let payload = wire_payload(state.value(desc.id));
        match ExtensionBlock::new(wire.block_type, payload) {
            Ok(block) => set.add(block),
            Err(err) => warn!(option = desc.name, %err, "option not encodable"),
        }
    }

    debug!(?role, blocks = set.len(), "encoded handshake extension");
    set.encode()
}

/// Decode the extension area received by a socket in `role`.
///
/// Unknown block types, blocks the sender's role may not send, and malformed
/// scalar blocks are skipped. An oversized byte string or a
/// truncated buffer fails the whole extension.
pub fn decode_inbound_extension(bytes: &[u8], role: Role) -> OptionResult<PeerOptions> {
    let sender = role.peer();
    let set = ExtensionSet::decode(bytes, |block_type| receive_limit(block_type, sender))?;
    let mut peer = PeerOptions::new();

    for block in set.iter() {
        let Some(desc) = OptionDescriptor::by_block_type(block.block_type()) else {
            warn!(block_type = block.block_type(), "skipping unknown extension block");
            continue;
        };
        let allowed = desc.wire.is_some_and(|w| sends(w.direction, sender));
        if !allowed {
            warn!(option = desc.name, ?sender, "skipping block from wrong direction");
            continue;
        }
        match parse_payload(desc, block.data()) {
            Some(value) => peer.insert(desc.id, value),
            None => warn!(
                option = desc.name,
                len = block.data().len(),
                "skipping malformed scalar block"
            ),
        }
    }

    debug!(?role, values = peer.len(), "decoded handshake extension");
    Ok(peer)
}

/// Largest logical length accepted for a block type from `sender`.
///
/// Only byte strings the sender may send are bounded here. Scalar size
/// mismatches and wrong-direction blocks are skipped later instead of
/// failing the handshake.
fn receive_limit(block_type: u16, sender: Role) -> usize {
    match OptionDescriptor::by_block_type(block_type) {
        Some(desc)
            if desc.kind == OptionKind::Bytes
                && desc.wire.is_some_and(|w| sends(w.direction, sender)) =>
        {
            desc.max_len
        }
        _ => MAX_BLOCK_LENGTH,
    }
}

/// Big-endian wire form of a value.
fn wire_payload(value: &OptionValue) -> Vec<u8> {
    match value {
        OptionValue::Bool(b) => i32::from(*b).to_be_bytes().to_vec(),
        OptionValue::Int32(v) | OptionValue::Enum(v) => v.to_be_bytes().to_vec(),
        OptionValue::Int64(v) => v.to_be_bytes().to_vec(),
        OptionValue::Duration(d) => duration_to_millis(*d).unsigned_abs().to_be_bytes().to_vec(),
        OptionValue::Bytes(b) => b.clone(),
    }
}

fn parse_payload(desc: &OptionDescriptor, data: &[u8]) -> Option<OptionValue> {
    let be32 = || -> Option<[u8; 4]> { data.try_into().ok() };

    let value = match desc.kind {
        OptionKind::Bool => OptionValue::Bool(i32::from_be_bytes(be32()?) != 0),
        OptionKind::Int32 => OptionValue::Int32(i32::from_be_bytes(be32()?)),
        OptionKind::Enum => OptionValue::Enum(i32::from_be_bytes(be32()?)),
        OptionKind::Duration => {
            // Local durations are bounded to 32-bit signed milliseconds
            let ms = u32::from_be_bytes(be32()?);
            if ms > i32::MAX.unsigned_abs() {
                return None;
            }
            OptionValue::Duration(Duration::from_millis(u64::from(ms)))
        }
        OptionKind::Int64 => {
            let bytes: [u8; INT64_SIZE] = data.try_into().ok()?;
            OptionValue::Int64(i64::from_be_bytes(bytes))
        }
        OptionKind::Bytes => OptionValue::Bytes(data.to_vec()),
    };
    Some(value)
}
