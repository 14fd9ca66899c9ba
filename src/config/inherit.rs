//! Listener to accepted-socket inheritance.

use tracing::trace;

use crate::options::{Inherit, OptionDescriptor};

use super::state::{ConfigState, Phase};

/// Derive the configuration of a socket accepted by `listener`.
///
/// Every value is deep-copied, options whose policy is [`Inherit::Reset`] go
/// back to their defaults, and the result starts in [`Phase::PreConnect`].
/// The two states share nothing afterwards.
pub fn clone_for_accept(listener: &ConfigState) -> ConfigState {
    let mut accepted = listener.clone();
    for desc in OptionDescriptor::all() {
        if desc.inherit == Inherit::Reset {
            trace!(option = desc.name, "reset on accept");
            accepted.reset(desc.id);
        }
    }
    accepted.set_phase(Phase::PreConnect);
    accepted
}
