//! Peer option negotiation.
//!
//! Overlays values decoded from the peer's handshake extension onto a local
//! state. Each negotiated option names the peer option it reads and a
//! [`CombineRule`]. Every rule is checked before anything is written, so a
//! conflict leaves the state untouched.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::config::ConfigState;
use crate::core::{OptionError, OptionResult};
use crate::options::{CombineRule, OptionDescriptor, OptionId, OptionValue};

use super::codec::PeerOptions;

/// Overlay `peer` onto `state`.
///
/// Options the peer did not send keep their local value. Writes bypass phase
/// gating and mark the option explicit. Returns the options whose stored value
/// changed.
pub fn apply_peer_extension(state: &mut ConfigState, peer: &PeerOptions) -> OptionResult<Vec<OptionId>> {
    let mut writes: Vec<(OptionId, OptionValue)> = Vec::new();

    for desc in OptionDescriptor::all() {
        let Some(combine) = desc.combine else { continue };
        let Some(remote) = peer.get(combine.from) else { continue };
        let local = state.value(desc.id);

        if remote.kind() != local.kind() {
            warn!(option = desc.name, "peer value has the wrong kind, ignored");
            continue;
        }

        if let Some(value) = combine_values(desc, combine.rule, local, remote)? {
            writes.push((desc.id, value));
        }
    }

    let mut changed = Vec::new();
    for (id, value) in writes {
        if state.store(id, value) {
            changed.push(id);
        }
    }

    debug!(changed = changed.len(), "applied peer extension");
    Ok(changed)
}

/// Resolve one rule. `None` means the local value stays as it is.
fn combine_values(
    desc: &OptionDescriptor,
    rule: CombineRule,
    local: &OptionValue,
    remote: &OptionValue,
) -> OptionResult<Option<OptionValue>> {
    let failed = |reason: &'static str| OptionError::NegotiationFailed {
        option: desc.name,
        reason,
    };

    let value = match rule {
        CombineRule::Replace => Some(remote.clone()),
        CombineRule::Max => match compare(local, remote) {
            Some(Ordering::Less) => Some(remote.clone()),
            _ => Some(local.clone()),
        },
        CombineRule::And => match (local.as_bool(), remote.as_bool()) {
            (Some(a), Some(b)) => Some(OptionValue::Bool(a && b)),
            _ => None,
        },
        CombineRule::AdoptOrMatch => {
            let local_bytes = local.as_bytes().unwrap_or_default();
            let remote_bytes = remote.as_bytes().unwrap_or_default();
            if local_bytes.is_empty() {
                Some(remote.clone())
            } else if remote_bytes.is_empty() || local_bytes == remote_bytes {
                None
            } else {
                return Err(failed("local and peer configurations differ"));
            }
        }
        CombineRule::MustMatch => {
            if local != remote {
                return Err(failed("local and peer values differ"));
            }
            None
        }
        CombineRule::AtLeast => {
            if compare(remote, local) == Some(Ordering::Less) {
                return Err(failed("peer value below local minimum"));
            }
            None
        }
    };
    Ok(value)
}

fn compare(a: &OptionValue, b: &OptionValue) -> Option<Ordering> {
    match (a, b) {
        (OptionValue::Duration(x), OptionValue::Duration(y)) => Some(x.cmp(y)),
        _ => Some(a.as_i64()?.cmp(&b.as_i64()?)),
    }
}
