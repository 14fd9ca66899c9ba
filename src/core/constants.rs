//! Protocol constants for SRT socket options.
//!
//! Wire-format values are fixed by the handshake format and MUST NOT be changed.

use std::time::Duration;

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// Alignment unit for handshake extension payloads, in bytes.
pub const ALIGNMENT_UNIT: usize = 4;

/// Extension block header size (type + declared length).
pub const BLOCK_HEADER_SIZE: usize = 4;

/// Largest length representable in a block header.
pub const MAX_BLOCK_LENGTH: usize = u16::MAX as usize;

/// Size of a fixed 32-bit option value (bool, int32, enum, duration).
pub const INT32_SIZE: usize = 4;

/// Size of a fixed 64-bit option value.
pub const INT64_SIZE: usize = 8;

// =============================================================================
// BYTE-STRING LIMITS
// =============================================================================

/// Maximum stream identifier length.
pub const MAX_SID_LENGTH: usize = 512;

/// Maximum packet filter configuration length.
pub const MAX_PFILTER_LENGTH: usize = 512;

/// Maximum congestion controller name length.
pub const MAX_CONGESTION_LENGTH: usize = 16;

/// Maximum network device name length (IFNAMSIZ).
pub const MAX_DEVICE_NAME_LENGTH: usize = 16;

// =============================================================================
// PACKET SIZING
// =============================================================================

/// Smallest accepted MSS.
pub const MIN_MSS: i32 = 76;

/// Largest accepted MSS (Ethernet MTU).
pub const MAX_MSS: i32 = 1500;

/// UDP/IP (28) plus SRT data header (16).
pub const PACKET_OVERHEAD: i32 = 44;

/// Payload size used in live mode (7 MPEG-TS cells).
pub const LIVE_PAYLOAD_SIZE: i32 = 1316;

/// Smallest flight flag size, in packets.
pub const MIN_FLIGHT_FLAG_SIZE: i32 = 32;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default protocol version (1.5.3), encoded as `0x00MMmmpp`.
pub const SRT_VERSION: i32 = 0x0001_0503;

/// Oldest protocol version accepted by default.
pub const DEFAULT_MIN_VERSION: i32 = 0x0001_0000;

/// Default send/receive buffer size in bytes (8192 packets of 1472 bytes).
pub const DEFAULT_BUFFER_SIZE: i32 = 8192 * 1472;

/// Default UDP receive buffer in bytes.
pub const DEFAULT_UDP_RCVBUF: i32 = 8192 * 1500;

/// Default UDP send buffer in bytes.
pub const DEFAULT_UDP_SNDBUF: i32 = 65536;

/// Default flight flag size, in packets.
pub const DEFAULT_FLIGHT_FLAG_SIZE: i32 = 25600;

/// Default linger time in file mode, in seconds.
pub const DEFAULT_LINGER_SECS: i32 = 180;

/// Default receiver latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(120);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Default peer idle timeout.
pub const DEFAULT_PEER_IDLE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default bandwidth overhead over input rate, in percent.
pub const DEFAULT_OVERHEAD_BW: i32 = 25;

/// Default IP type-of-service (DSCP EF).
pub const DEFAULT_IP_TOS: i32 = 0xB8;

/// Default IP time-to-live.
pub const DEFAULT_IP_TTL: i32 = 64;

/// Max bandwidth sentinel: no limit.
pub const MAXBW_UNLIMITED: i64 = -1;

/// Bandwidth sentinel: derive from input rate / defaults.
pub const BW_AUTO: i64 = 0;

// =============================================================================
// CONGESTION CONTROLLERS
// =============================================================================

/// Live congestion controller name.
pub const CONGESTION_LIVE: &[u8] = b"live";

/// File congestion controller name.
pub const CONGESTION_FILE: &[u8] = b"file";

// =============================================================================
// HANDSHAKE EXTENSION BLOCK TYPES
// =============================================================================

/// Block types carried in the handshake extension area.
pub mod ext_type {
    /// Sender's protocol version.
    pub const VERSION: u16 = 0x0001;
    /// Timestamp-based packet delivery mode flag.
    pub const TSBPD: u16 = 0x0002;
    /// Sender's receiver latency.
    pub const RCV_LATENCY: u16 = 0x0003;
    /// Sender's requested peer latency.
    pub const PEER_LATENCY: u16 = 0x0004;
    /// Application stream identifier.
    pub const STREAM_ID: u16 = 0x0005;
    /// Congestion controller name.
    pub const CONGESTION: u16 = 0x0006;
    /// Packet filter configuration.
    pub const PACKET_FILTER: u16 = 0x0007;
    /// Too-late packet drop flag.
    pub const TLPKTDROP: u16 = 0x0008;
}
