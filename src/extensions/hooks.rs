//! Handshake entry points on a socket's configuration.

use tracing::{debug, warn};

use crate::config::SocketConfig;
use crate::core::{HandshakeHooks, OptionResult, Role};

use super::codec::{decode_inbound_extension, encode_outbound_extension};
use super::negotiation::apply_peer_extension;

impl HandshakeHooks for SocketConfig {
    fn on_listen_freeze(&self) {
        self.freeze_for_listen();
    }

    fn on_accept(&self) -> Self {
        debug!("deriving accepted socket configuration");
        self.accept()
    }

    fn encode_outbound_extension(&self, role: Role) -> Vec<u8> {
        self.with_state(|state| encode_outbound_extension(state, role))
    }

    fn decode_inbound_extension(&self, bytes: &[u8], role: Role) -> OptionResult<()> {
        let peer = decode_inbound_extension(bytes, role).inspect_err(|err| {
            warn!(%err, "rejecting handshake extension");
        })?;
        self.negotiate(|state| apply_peer_extension(state, &peer))
            .inspect_err(|err| warn!(%err, "negotiation failed"))
    }
}
