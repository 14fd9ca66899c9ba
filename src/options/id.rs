//! Option identifiers.
//!
//! Each option has a dense table index (the enum discriminant) and a raw
//! numeric id that matches the `SRTO_*` constants used on the C API.

use super::descriptor::OptionDescriptor;

/// Identifier of a registered socket option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum OptionId {
    /// Maximum segment size.
    Mss = 0,
    /// Blocking send.
    SendSync,
    /// Blocking receive.
    RecvSync,
    /// Flight flag size (max packets in flight).
    FlightFlagSize,
    /// Send buffer size in bytes.
    SendBuffer,
    /// Receive buffer size in bytes.
    RecvBuffer,
    /// Linger on close, in seconds.
    Linger,
    /// UDP send buffer size.
    UdpSendBuffer,
    /// UDP receive buffer size.
    UdpRecvBuffer,
    /// Rendezvous connection mode.
    Rendezvous,
    /// Send timeout in milliseconds, -1 for infinite.
    SendTimeout,
    /// Receive timeout in milliseconds, -1 for infinite.
    RecvTimeout,
    /// Reuse an existing UDP binding.
    ReuseAddr,
    /// Maximum send bandwidth in bytes/s.
    MaxBandwidth,
    /// Sender side flag for legacy handshake.
    Sender,
    /// Timestamp-based packet delivery.
    TsbpdMode,
    /// Receiver and peer latency together.
    Latency,
    /// Estimated input bandwidth in bytes/s.
    InputBandwidth,
    /// Overhead over input bandwidth, in percent.
    OverheadBandwidth,
    /// IP time-to-live.
    IpTtl,
    /// IP type-of-service.
    IpTos,
    /// Drop packets that arrive too late to play.
    TooLatePacketDrop,
    /// Extra sender drop delay in milliseconds.
    SendDropDelay,
    /// Periodic NAK reports.
    NakReport,
    /// Local protocol version.
    Version,
    /// Protocol version announced by the peer.
    PeerVersion,
    /// Connection timeout.
    ConnectTimeout,
    /// Clock drift tracer.
    DriftTracer,
    /// Minimum input bandwidth estimate in bytes/s.
    MinInputBandwidth,
    /// Reorder tolerance for loss reports, in packets.
    MaxReorderTtl,
    /// Receiver latency.
    RecvLatency,
    /// Latency requested from the peer as sender.
    PeerLatency,
    /// Minimum peer version accepted.
    MinVersion,
    /// Application stream identifier.
    StreamId,
    /// Congestion controller name.
    Congestion,
    /// Message (vs. buffer) API.
    MessageApi,
    /// Maximum payload size per packet.
    PayloadSize,
    /// Transmission type profile.
    TransType,
    /// IPV6_V6ONLY on the underlying socket.
    Ipv6Only,
    /// Peer idle timeout.
    PeerIdleTimeout,
    /// Bind to a network device.
    BindToDevice,
    /// Packet filter configuration.
    PacketFilter,
    /// Retransmission algorithm.
    RetransmitAlgo,
}

impl OptionId {
    /// Number of registered options.
    pub const COUNT: usize = 43;

    /// All options in table order.
    pub const ALL: [OptionId; Self::COUNT] = [
        OptionId::Mss,
        OptionId::SendSync,
        OptionId::RecvSync,
        OptionId::FlightFlagSize,
        OptionId::SendBuffer,
        OptionId::RecvBuffer,
        OptionId::Linger,
        OptionId::UdpSendBuffer,
        OptionId::UdpRecvBuffer,
        OptionId::Rendezvous,
        OptionId::SendTimeout,
        OptionId::RecvTimeout,
        OptionId::ReuseAddr,
        OptionId::MaxBandwidth,
        OptionId::Sender,
        OptionId::TsbpdMode,
        OptionId::Latency,
        OptionId::InputBandwidth,
        OptionId::OverheadBandwidth,
        OptionId::IpTtl,
        OptionId::IpTos,
        OptionId::TooLatePacketDrop,
        OptionId::SendDropDelay,
        OptionId::NakReport,
        OptionId::Version,
        OptionId::PeerVersion,
        OptionId::ConnectTimeout,
        OptionId::DriftTracer,
        OptionId::MinInputBandwidth,
        OptionId::MaxReorderTtl,
        OptionId::RecvLatency,
        OptionId::PeerLatency,
        OptionId::MinVersion,
        OptionId::StreamId,
        OptionId::Congestion,
        OptionId::MessageApi,
        OptionId::PayloadSize,
        OptionId::TransType,
        OptionId::Ipv6Only,
        OptionId::PeerIdleTimeout,
        OptionId::BindToDevice,
        OptionId::PacketFilter,
        OptionId::RetransmitAlgo,
    ];

    /// Position in the descriptor table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Raw numeric id (`SRTO_*` value).
    pub fn raw(self) -> i32 {
        match self {
            OptionId::Mss => 0,
            OptionId::SendSync => 1,
            OptionId::RecvSync => 2,
            OptionId::FlightFlagSize => 4,
            OptionId::SendBuffer => 5,
            OptionId::RecvBuffer => 6,
            OptionId::Linger => 7,
            OptionId::UdpSendBuffer => 8,
            OptionId::UdpRecvBuffer => 9,
            OptionId::Rendezvous => 12,
            OptionId::SendTimeout => 13,
            OptionId::RecvTimeout => 14,
            OptionId::ReuseAddr => 15,
            OptionId::MaxBandwidth => 16,
            OptionId::Sender => 21,
            OptionId::TsbpdMode => 22,
            OptionId::Latency => 23,
            OptionId::InputBandwidth => 24,
            OptionId::OverheadBandwidth => 25,
            OptionId::IpTtl => 29,
            OptionId::IpTos => 30,
            OptionId::TooLatePacketDrop => 31,
            OptionId::SendDropDelay => 32,
            OptionId::NakReport => 33,
            OptionId::Version => 34,
            OptionId::PeerVersion => 35,
            OptionId::ConnectTimeout => 36,
            OptionId::DriftTracer => 37,
            OptionId::MinInputBandwidth => 38,
            OptionId::MaxReorderTtl => 42,
            OptionId::RecvLatency => 43,
            OptionId::PeerLatency => 44,
            OptionId::MinVersion => 45,
            OptionId::StreamId => 46,
            OptionId::Congestion => 47,
            OptionId::MessageApi => 48,
            OptionId::PayloadSize => 49,
            OptionId::TransType => 50,
            OptionId::Ipv6Only => 54,
            OptionId::PeerIdleTimeout => 55,
            OptionId::BindToDevice => 56,
            OptionId::PacketFilter => 60,
            OptionId::RetransmitAlgo => 61,
        }
    }

    /// Look up an option by raw numeric id.
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.raw() == raw)
    }

    /// Look up an option by name or short alias.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == name || id.descriptor().alias == name)
    }

    /// Static metadata for this option.
    pub fn descriptor(self) -> &'static OptionDescriptor {
        OptionDescriptor::get(self)
    }

    /// Canonical option name.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_table_order() {
        for (i, id) in OptionId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_raw_roundtrip() {
        for id in OptionId::ALL {
            assert_eq!(OptionId::from_raw(id.raw()), Some(id));
        }
        assert_eq!(OptionId::from_raw(3), None); // ISN is not an option here
        assert_eq!(OptionId::from_raw(-1), None);
    }

    #[test]
    fn test_raw_ids_unique() {
        let mut raws: Vec<i32> = OptionId::ALL.iter().map(|id| id.raw()).collect();
        raws.sort_unstable();
        raws.dedup();
        assert_eq!(raws.len(), OptionId::COUNT);
    }

    #[test]
    fn test_from_name_and_alias() {
        assert_eq!(OptionId::from_name("stream_id"), Some(OptionId::StreamId));
        assert_eq!(OptionId::from_name("streamid"), Some(OptionId::StreamId));
        assert_eq!(OptionId::from_name("lossmaxttl"), Some(OptionId::MaxReorderTtl));
        assert_eq!(OptionId::from_name("max_reorder_ttl"), Some(OptionId::MaxReorderTtl));
        assert_eq!(OptionId::from_name("STREAMID"), None);
        assert_eq!(OptionId::from_name(""), None);
    }
}
