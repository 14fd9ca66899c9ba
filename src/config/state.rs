//! Per-socket configuration state.

use crate::options::{OptionDescriptor, OptionId, OptionValue};

/// Lifecycle stage of a socket, gating which options remain settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created, not yet bound.
    PreBind,
    /// Bound or accepted, handshake not complete.
    PreConnect,
    /// Connected, or listening for peers.
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    value: OptionValue,
    /// Set by the application or by negotiation rather than defaulted.
    explicit: bool,
}

/// Current option values of one socket.
///
/// Cloning produces a fully independent copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigState {
    phase: Phase,
    slots: Vec<Slot>,
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigState {
    /// Create a state with every option at its default, in [`Phase::PreBind`].
    pub fn new() -> Self {
        let slots = OptionDescriptor::all()
            .iter()
            .map(|desc| Slot {
                value: desc.default.to_value(),
                explicit: false,
            })
            .collect();
        Self {
            phase: Phase::PreBind,
            slots,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `phase`.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Stored value of `id`.
    pub fn value(&self, id: OptionId) -> &OptionValue {
        &self.slots[id.index()].value
    }

    /// Check if `id` holds a value that was set rather than defaulted.
    pub fn is_explicit(&self, id: OptionId) -> bool {
        self.slots[id.index()].explicit
    }

    /// Iterate over all options and their values in table order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionId, &OptionValue)> {
        OptionId::ALL
            .iter()
            .copied()
            .zip(self.slots.iter().map(|slot| &slot.value))
    }

    /// Store an already validated value and mark it explicit.
    ///
    /// Returns `true` if the stored value changed.
    pub(crate) fn store(&mut self, id: OptionId, value: OptionValue) -> bool {
        let slot = &mut self.slots[id.index()];
        slot.explicit = true;
        if slot.value == value {
            return false;
        }
        slot.value = value;
        true
    }

    /// Return `id` to its default and clear the explicit flag.
    pub(crate) fn reset(&mut self, id: OptionId) {
        self.slots[id.index()] = Slot {
            value: id.descriptor().default.to_value(),
            explicit: false,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_state_has_defaults() {
        let state = ConfigState::new();

        assert_eq!(state.phase(), Phase::PreBind);
        assert_eq!(state.value(OptionId::MinInputBandwidth), &OptionValue::Int64(0));
        assert_eq!(state.value(OptionId::MaxBandwidth), &OptionValue::Int64(-1));
        assert_eq!(
            state.value(OptionId::RecvLatency),
            &OptionValue::Duration(Duration::from_millis(120))
        );
        assert_eq!(state.value(OptionId::StreamId), &OptionValue::Bytes(Vec::new()));
        assert!(OptionId::ALL.iter().all(|&id| !state.is_explicit(id)));
    }

    #[test]
    fn test_store_marks_explicit() {
        let mut state = ConfigState::new();

        // Storing the default still counts as an explicit set
        assert!(!state.store(OptionId::MaxReorderTtl, OptionValue::Int32(0)));
        assert!(state.is_explicit(OptionId::MaxReorderTtl));

        assert!(state.store(OptionId::MaxReorderTtl, OptionValue::Int32(5)));
        assert_eq!(state.value(OptionId::MaxReorderTtl), &OptionValue::Int32(5));

        state.reset(OptionId::MaxReorderTtl);
        assert_eq!(state.value(OptionId::MaxReorderTtl), &OptionValue::Int32(0));
        assert!(!state.is_explicit(OptionId::MaxReorderTtl));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = ConfigState::new();
        original.store(OptionId::StreamId, OptionValue::from("abc"));

        let mut copy = original.clone();
        copy.store(OptionId::StreamId, OptionValue::from("xyz"));

        assert_eq!(original.value(OptionId::StreamId), &OptionValue::from("abc"));
        assert_eq!(copy.value(OptionId::StreamId), &OptionValue::from("xyz"));
    }

    #[test]
    fn test_iter_covers_table() {
        let state = ConfigState::new();
        let ids: Vec<OptionId> = state.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, OptionId::ALL.to_vec());
    }
}
