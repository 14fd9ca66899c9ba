//! SRT Options - Handshake Extensions
//!
//! Negotiable options travel in the handshake as aligned extension blocks.
//!
//! ## Block Types
//!
//! | Type   | Option                 | Sent by        | Combine rule            |
//! |--------|------------------------|----------------|-------------------------|
//! | 0x0001 | `version`              | both           | replaces `peer_version` |
//! | 0x0002 | `tsbpd_mode`           | both           | and                     |
//! | 0x0003 | `recv_latency`         | both           | max with `peer_latency` |
//! | 0x0004 | `peer_latency`         | both           | max with `recv_latency` |
//! | 0x0005 | `stream_id`            | caller only    | replace                 |
//! | 0x0006 | `congestion`           | both, when set | must match              |
//! | 0x0007 | `packet_filter`        | both, when set | adopt or match          |
//! | 0x0008 | `too_late_packet_drop` | both           | and                     |
//!
//! `version` is also checked against the local `min_version`.
//!
//! ## Modules
//!
//! - `block`: framing and padding ([`ExtensionBlock`], [`padded_len`])
//! - `codec`: state to bytes and bytes to [`PeerOptions`]
//! - `negotiation`: [`apply_peer_extension`]
//! - `hooks`: [`HandshakeHooks`](crate::core::HandshakeHooks) for
//!   [`SocketConfig`](crate::config::SocketConfig)

mod block;
mod codec;
mod hooks;
mod negotiation;

pub use block::*;
pub use codec::*;
pub use negotiation::*;
