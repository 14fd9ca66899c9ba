//! Thread-safe per-socket configuration handle.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::core::{LiveConnection, OptionResult};
use crate::options::{
    OptionId, OptionValue, effective_value, get_into, resolve_name, set_tracked,
    set_value_tracked, validate_and_get,
};

use super::inherit::clone_for_accept;
use super::state::{ConfigState, Phase};

/// Configuration of one socket.
///
/// Every get and set holds the lock only for validation and copying, so a
/// reader never sees a torn value. [`LiveConnection`] callbacks run after the
/// lock is released.
pub struct SocketConfig {
    state: RwLock<ConfigState>,
    live: RwLock<Option<Arc<dyn LiveConnection>>>,
}

impl fmt::Debug for SocketConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketConfig")
            .field("phase", &self.phase())
            .field("live", &self.live.read().is_some())
            .finish()
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketConfig {
    /// Fresh configuration with defaults, in [`Phase::PreBind`].
    pub fn new() -> Self {
        Self::from_state(ConfigState::new())
    }

    /// Wrap an existing state.
    pub fn from_state(state: ConfigState) -> Self {
        Self {
            state: RwLock::new(state),
            live: RwLock::new(None),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.read().phase()
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> ConfigState {
        self.state.read().clone()
    }

    /// Set an option by name or alias from its raw bytes.
    ///
    /// Returns the number of bytes consumed.
    pub fn set_option(&self, name: &str, raw: &[u8]) -> OptionResult<usize> {
        self.set_raw(resolve_name(name)?, raw)
    }

    /// Set an option from its raw bytes.
    pub fn set_raw(&self, id: OptionId, raw: &[u8]) -> OptionResult<usize> {
        self.write(|state| set_tracked(state, id, raw))?;
        Ok(raw.len())
    }

    /// Set an option from a typed value.
    pub fn set(&self, id: OptionId, value: impl Into<OptionValue>) -> OptionResult<()> {
        let value = value.into();
        self.write(|state| set_value_tracked(state, id, &value))
    }

    /// Read an option by name into `buf`, returning its length.
    pub fn get_option(&self, name: &str, buf: &mut [u8]) -> OptionResult<usize> {
        let id = resolve_name(name)?;
        get_into(&self.state.read(), id, buf)
    }

    /// Raw form of an option, if it fits in `capacity` bytes.
    pub fn get_raw(&self, id: OptionId, capacity: usize) -> OptionResult<Vec<u8>> {
        validate_and_get(&self.state.read(), id, capacity)
    }

    /// Typed value of an option.
    pub fn get(&self, id: OptionId) -> OptionValue {
        effective_value(&self.state.read(), id).clone()
    }

    /// The socket was bound to a local address.
    pub fn mark_bound(&self) {
        let mut state = self.state.write();
        if state.phase() == Phase::PreBind {
            state.set_phase(Phase::PreConnect);
            debug!("socket bound, pre-bind options locked");
        }
    }

    /// The handshake completed.
    pub fn mark_connected(&self) {
        self.state.write().set_phase(Phase::Connected);
        debug!("socket connected, pre-connect options locked");
    }

    /// Freeze a listener's configuration as the template for accepted sockets.
    pub fn freeze_for_listen(&self) {
        self.state.write().set_phase(Phase::Connected);
        debug!("listener frozen");
    }

    /// Configuration for a socket accepted by this listener.
    ///
    /// The live connection handle is not inherited.
    pub fn accept(&self) -> Self {
        let accepted = clone_for_accept(&self.state.read());
        Self::from_state(accepted)
    }

    /// Route future runtime changes to `live`.
    pub fn attach_live(&self, live: Arc<dyn LiveConnection>) {
        *self.live.write() = Some(live);
    }

    /// Stop routing runtime changes.
    pub fn detach_live(&self) {
        *self.live.write() = None;
    }

    /// Apply a mutation and forward changed values if the socket is connected.
    fn write<F>(&self, f: F) -> OptionResult<()>
    where
        F: FnOnce(&mut ConfigState) -> OptionResult<Vec<OptionId>>,
    {
        let updates = {
            let mut state = self.state.write();
            let changed = f(&mut state)?;
            if state.phase() == Phase::Connected {
                collect(&state, &changed)
            } else {
                Vec::new()
            }
        };
        self.notify(updates);
        Ok(())
    }

    #[cfg(feature = "extensions")]
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&ConfigState) -> R) -> R {
        f(&self.state.read())
    }

    /// Apply a negotiation overlay and forward every changed value.
    #[cfg(feature = "extensions")]
    pub(crate) fn negotiate<F>(&self, f: F) -> OptionResult<()>
    where
        F: FnOnce(&mut ConfigState) -> OptionResult<Vec<OptionId>>,
    {
        let updates = {
            let mut state = self.state.write();
            let changed = f(&mut state)?;
            collect(&state, &changed)
        };
        self.notify(updates);
        Ok(())
    }

    fn notify(&self, updates: Vec<(OptionId, OptionValue)>) {
        if updates.is_empty() {
            return;
        }
        let Some(live) = self.live.read().clone() else {
            return;
        };
        for (id, value) in &updates {
            debug!(option = %id, "forwarding to live connection");
            live.apply_option(*id, value);
        }
    }
}

fn collect(state: &ConfigState, changed: &[OptionId]) -> Vec<(OptionId, OptionValue)> {
    changed
        .iter()
        .map(|&id| (id, effective_value(state, id).clone()))
        .collect()
}
