//! Option descriptor table.
//!
//! One immutable [`OptionDescriptor`] per [`OptionId`], holding the storage
//! kind, size limits, the phases in which the option may be changed, its
//! default, a validator function, and how it behaves across accept and the
//! handshake.

use crate::config::{ConfigState, Phase};
use crate::core::constants::{
    CONGESTION_FILE, CONGESTION_LIVE, DEFAULT_BUFFER_SIZE, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_FLIGHT_FLAG_SIZE, DEFAULT_IP_TOS, DEFAULT_IP_TTL, DEFAULT_LATENCY,
    DEFAULT_LINGER_SECS, DEFAULT_MIN_VERSION, DEFAULT_OVERHEAD_BW, DEFAULT_PEER_IDLE_TIMEOUT,
    DEFAULT_UDP_RCVBUF, DEFAULT_UDP_SNDBUF, INT32_SIZE, INT64_SIZE, LIVE_PAYLOAD_SIZE,
    MAX_CONGESTION_LENGTH, MAX_DEVICE_NAME_LENGTH, MAX_MSS, MAX_PFILTER_LENGTH, MAX_SID_LENGTH,
    MAXBW_UNLIMITED, MIN_FLIGHT_FLAG_SIZE, MIN_MSS, PACKET_OVERHEAD, SRT_VERSION, ext_type,
};

use super::id::OptionId;
use super::value::{Initial, OptionKind, OptionValue};

/// Set of phases in which an option may be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseSet(u8);

impl PhaseSet {
    /// Never settable (read-only).
    pub const NONE: Self = Self(0);
    /// Only before bind.
    pub const PRE_BIND: Self = Self(0b001);
    /// Before the connection is established.
    pub const PRE: Self = Self(0b011);
    /// At any time.
    pub const ANY: Self = Self(0b111);

    /// Check if `phase` is in the set.
    pub fn contains(self, phase: Phase) -> bool {
        let bit = match phase {
            Phase::PreBind => 0b001,
            Phase::PreConnect => 0b010,
            Phase::Connected => 0b100,
        };
        self.0 & bit != 0
    }

    /// Check if the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Kind-specific predicate. Returns the rejection reason on failure.
pub type Validator = fn(&OptionValue, &ConfigState) -> Result<(), &'static str>;

/// What an accepted socket gets from its listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inherit {
    /// Listener's value is copied.
    Copy,
    /// Reset to the default; only the peer can supply it.
    Reset,
}

/// When an option's block is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advertise {
    /// Only when the option was explicitly set.
    WhenSet,
    /// In every handshake.
    Always,
}

/// Which sides send an option's block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Only the caller, in its request.
    CallerOnly,
    /// Caller and responder.
    Both,
}

/// How an option travels in the handshake extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireSpec {
    /// Block type on the wire.
    pub block_type: u16,
    /// Emission policy.
    pub advertise: Advertise,
    /// Permitted senders.
    pub direction: Direction,
}

/// How a peer's value is merged into the local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineRule {
    /// Peer value replaces the local value.
    Replace,
    /// Larger of local and peer.
    Max,
    /// Enabled only if both enable it.
    And,
    /// Adopt the peer's value if unset locally, otherwise both must match.
    AdoptOrMatch,
    /// Values must be equal.
    MustMatch,
    /// Peer value must be at least the local value; nothing is stored.
    AtLeast,
}

/// Negotiation rule of a local option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combine {
    /// Peer option whose value feeds this one.
    pub from: OptionId,
    /// Merge rule.
    pub rule: CombineRule,
}

/// Static metadata of one option.
#[derive(Debug, Clone, Copy)]
pub struct OptionDescriptor {
    /// Option id.
    pub id: OptionId,
    /// Canonical name.
    pub name: &'static str,
    /// Short alias (the `SRTO_*` suffix in lowercase).
    pub alias: &'static str,
    /// Storage kind.
    pub kind: OptionKind,
    /// Exact size for fixed kinds, maximum length for byte strings.
    pub max_len: usize,
    /// Phases in which the option may be set.
    pub phases: PhaseSet,
    /// Value on a fresh socket.
    pub default: Initial,
    /// Semantic predicate.
    pub validate: Validator,
    /// Listener-to-accepted behavior.
    pub inherit: Inherit,
    /// Handshake block, if the option is sent to the peer.
    pub wire: Option<WireSpec>,
    /// Negotiation rule, if the option takes input from the peer.
    pub combine: Option<Combine>,
    /// Discriminants and names of enum kinds.
    pub variants: &'static [(i32, &'static str)],
}

impl OptionDescriptor {
    const fn fixed(
        id: OptionId,
        name: &'static str,
        alias: &'static str,
        kind: OptionKind,
        phases: PhaseSet,
        default: Initial,
        validate: Validator,
    ) -> Self {
        let max_len = match kind {
            OptionKind::Int64 => INT64_SIZE,
            _ => INT32_SIZE,
        };
        Self {
            id,
            name,
            alias,
            kind,
            max_len,
            phases,
            default,
            validate,
            inherit: Inherit::Copy,
            wire: None,
            combine: None,
            variants: &[],
        }
    }

    const fn bytes(
        id: OptionId,
        name: &'static str,
        alias: &'static str,
        max_len: usize,
        phases: PhaseSet,
        default: &'static [u8],
        validate: Validator,
    ) -> Self {
        Self {
            id,
            name,
            alias,
            kind: OptionKind::Bytes,
            max_len,
            phases,
            default: Initial::Bytes(default),
            validate,
            inherit: Inherit::Copy,
            wire: None,
            combine: None,
            variants: &[],
        }
    }

    const fn sent(self, block_type: u16, advertise: Advertise, direction: Direction) -> Self {
        Self {
            wire: Some(WireSpec {
                block_type,
                advertise,
                direction,
            }),
            ..self
        }
    }

    const fn negotiated(self, from: OptionId, rule: CombineRule) -> Self {
        Self {
            combine: Some(Combine { from, rule }),
            ..self
        }
    }

    const fn reset_on_accept(self) -> Self {
        Self {
            inherit: Inherit::Reset,
            ..self
        }
    }

    const fn with_variants(self, variants: &'static [(i32, &'static str)]) -> Self {
        Self { variants, ..self }
    }

    /// Descriptor of `id`.
    pub fn get(id: OptionId) -> &'static Self {
        &TABLE[id.index()]
    }

    /// Whole table in id order.
    pub fn all() -> &'static [OptionDescriptor] {
        &TABLE
    }

    /// Descriptor of the option carried by a handshake block type.
    pub fn by_block_type(block_type: u16) -> Option<&'static Self> {
        TABLE
            .iter()
            .find(|d| d.wire.is_some_and(|w| w.block_type == block_type))
    }

    /// Check if the option can never be set by the application.
    pub fn is_read_only(&self) -> bool {
        self.phases.is_empty()
    }

    /// Name of an enum discriminant.
    pub fn variant_name(&self, value: i32) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| *name)
    }

    /// Discriminant of an enum variant name.
    pub fn variant_value(&self, name: &str) -> Option<i32> {
        self.variants
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(v, _)| *v)
    }
}

// =============================================================================
// VALIDATORS
// =============================================================================

fn any(_: &OptionValue, _: &ConfigState) -> Result<(), &'static str> {
    Ok(())
}

fn non_negative(value: &OptionValue, _: &ConfigState) -> Result<(), &'static str> {
    match value.as_i64() {
        Some(v) if v < 0 => Err("must not be negative"),
        _ => Ok(()),
    }
}

fn positive(value: &OptionValue, _: &ConfigState) -> Result<(), &'static str> {
    match value.as_i64() {
        Some(v) if v <= 0 => Err("must be positive"),
        _ => Ok(()),
    }
}

fn minus_one_or_more(value: &OptionValue, _: &ConfigState) -> Result<(), &'static str> {
    match value.as_i64() {
        Some(v) if v < -1 => Err("must be -1 or greater"),
        _ => Ok(()),
    }
}

fn in_range<const MIN: i32, const MAX: i32>(
    value: &OptionValue,
    _: &ConfigState,
) -> Result<(), &'static str> {
    match value.as_i64() {
        Some(v) if v < i64::from(MIN) || v > i64::from(MAX) => Err("out of range"),
        _ => Ok(()),
    }
}

fn at_least<const MIN: i32>(value: &OptionValue, _: &ConfigState) -> Result<(), &'static str> {
    match value.as_i64() {
        Some(v) if v < i64::from(MIN) => Err("below minimum"),
        _ => Ok(()),
    }
}

fn payload_within_mss(value: &OptionValue, state: &ConfigState) -> Result<(), &'static str> {
    let mss = state
        .value(OptionId::Mss)
        .as_i64()
        .unwrap_or(i64::from(MAX_MSS));
    match value.as_i64() {
        Some(v) if v < 0 => Err("must not be negative"),
        Some(v) if v > mss - i64::from(PACKET_OVERHEAD) => Err("exceeds mss minus packet overhead"),
        _ => Ok(()),
    }
}

fn congestion_name(value: &OptionValue, _: &ConfigState) -> Result<(), &'static str> {
    match value.as_bytes() {
        Some(name) if name == CONGESTION_LIVE || name == CONGESTION_FILE => Ok(()),
        _ => Err("unknown congestion controller"),
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Transmission type: live streaming.
pub const TRANSTYPE_LIVE: i32 = 0;
/// Transmission type: file transfer.
pub const TRANSTYPE_FILE: i32 = 1;

const TRANSTYPE_VARIANTS: &[(i32, &str)] = &[(TRANSTYPE_LIVE, "live"), (TRANSTYPE_FILE, "file")];
const RETRANSMIT_VARIANTS: &[(i32, &str)] = &[(0, "eager"), (1, "reduced")];

const fn millis(d: std::time::Duration) -> Initial {
    Initial::Millis(d.as_millis() as u64)
}

use Advertise::{Always, WhenSet};
use OptionKind::{Bool, Duration as Dur, Enum, Int32, Int64};

#[rustfmt::skip]
static TABLE: [OptionDescriptor; OptionId::COUNT] = [
    OptionDescriptor::fixed(OptionId::Mss, "mss", "mss", Int32, PhaseSet::PRE_BIND, Initial::Int32(MAX_MSS), in_range::<MIN_MSS, MAX_MSS>),
    OptionDescriptor::fixed(OptionId::SendSync, "send_sync", "sndsyn", Bool, PhaseSet::ANY, Initial::Bool(true), any),
    OptionDescriptor::fixed(OptionId::RecvSync, "recv_sync", "rcvsyn", Bool, PhaseSet::ANY, Initial::Bool(true), any),
    OptionDescriptor::fixed(OptionId::FlightFlagSize, "flight_flag_size", "fc", Int32, PhaseSet::PRE, Initial::Int32(DEFAULT_FLIGHT_FLAG_SIZE), at_least::<MIN_FLIGHT_FLAG_SIZE>),
    OptionDescriptor::fixed(OptionId::SendBuffer, "send_buffer", "sndbuf", Int32, PhaseSet::PRE_BIND, Initial::Int32(DEFAULT_BUFFER_SIZE), positive),
    OptionDescriptor::fixed(OptionId::RecvBuffer, "recv_buffer", "rcvbuf", Int32, PhaseSet::PRE_BIND, Initial::Int32(DEFAULT_BUFFER_SIZE), positive),
    OptionDescriptor::fixed(OptionId::Linger, "linger", "linger", Int32, PhaseSet::ANY, Initial::Int32(DEFAULT_LINGER_SECS), non_negative),
    OptionDescriptor::fixed(OptionId::UdpSendBuffer, "udp_send_buffer", "udp_sndbuf", Int32, PhaseSet::PRE_BIND, Initial::Int32(DEFAULT_UDP_SNDBUF), positive),
    OptionDescriptor::fixed(OptionId::UdpRecvBuffer, "udp_recv_buffer", "udp_rcvbuf", Int32, PhaseSet::PRE_BIND, Initial::Int32(DEFAULT_UDP_RCVBUF), positive),
    OptionDescriptor::fixed(OptionId::Rendezvous, "rendezvous", "rendezvous", Bool, PhaseSet::PRE, Initial::Bool(false), any),
    OptionDescriptor::fixed(OptionId::SendTimeout, "send_timeout", "sndtimeo", Int32, PhaseSet::ANY, Initial::Int32(-1), minus_one_or_more),
    OptionDescriptor::fixed(OptionId::RecvTimeout, "recv_timeout", "rcvtimeo", Int32, PhaseSet::ANY, Initial::Int32(-1), minus_one_or_more),
    OptionDescriptor::fixed(OptionId::ReuseAddr, "reuse_addr", "reuseaddr", Bool, PhaseSet::PRE_BIND, Initial::Bool(true), any),
    OptionDescriptor::fixed(OptionId::MaxBandwidth, "max_bandwidth", "maxbw", Int64, PhaseSet::ANY, Initial::Int64(MAXBW_UNLIMITED), minus_one_or_more),
    OptionDescriptor::fixed(OptionId::Sender, "sender", "sender", Bool, PhaseSet::PRE, Initial::Bool(false), any),
    OptionDescriptor::fixed(OptionId::TsbpdMode, "tsbpd_mode", "tsbpdmode", Bool, PhaseSet::PRE, Initial::Bool(true), any)
        .sent(ext_type::TSBPD, Always, Direction::Both)
        .negotiated(OptionId::TsbpdMode, CombineRule::And),
    OptionDescriptor::fixed(OptionId::Latency, "latency", "latency", Dur, PhaseSet::PRE, millis(DEFAULT_LATENCY), any),
    OptionDescriptor::fixed(OptionId::InputBandwidth, "input_bandwidth", "inputbw", Int64, PhaseSet::ANY, Initial::Int64(0), non_negative),
    OptionDescriptor::fixed(OptionId::OverheadBandwidth, "overhead_bandwidth", "oheadbw", Int32, PhaseSet::ANY, Initial::Int32(DEFAULT_OVERHEAD_BW), in_range::<5, 100>),
    OptionDescriptor::fixed(OptionId::IpTtl, "ip_ttl", "ipttl", Int32, PhaseSet::PRE_BIND, Initial::Int32(DEFAULT_IP_TTL), in_range::<1, 255>),
    OptionDescriptor::fixed(OptionId::IpTos, "ip_tos", "iptos", Int32, PhaseSet::PRE_BIND, Initial::Int32(DEFAULT_IP_TOS), in_range::<0, 255>),
    OptionDescriptor::fixed(OptionId::TooLatePacketDrop, "too_late_packet_drop", "tlpktdrop", Bool, PhaseSet::PRE, Initial::Bool(true), any)
        .sent(ext_type::TLPKTDROP, Always, Direction::Both)
        .negotiated(OptionId::TooLatePacketDrop, CombineRule::And),
    OptionDescriptor::fixed(OptionId::SendDropDelay, "send_drop_delay", "snddropdelay", Int32, PhaseSet::ANY, Initial::Int32(0), minus_one_or_more),
    OptionDescriptor::fixed(OptionId::NakReport, "nak_report", "nakreport", Bool, PhaseSet::PRE, Initial::Bool(true), any),
    OptionDescriptor::fixed(OptionId::Version, "version", "version", Int32, PhaseSet::PRE, Initial::Int32(SRT_VERSION), at_least::<DEFAULT_MIN_VERSION>)
        .sent(ext_type::VERSION, Always, Direction::Both),
    OptionDescriptor::fixed(OptionId::PeerVersion, "peer_version", "peerversion", Int32, PhaseSet::NONE, Initial::Int32(0), any)
        .negotiated(OptionId::Version, CombineRule::Replace)
        .reset_on_accept(),
    OptionDescriptor::fixed(OptionId::ConnectTimeout, "connect_timeout", "conntimeo", Dur, PhaseSet::PRE, millis(DEFAULT_CONNECT_TIMEOUT), any),
    OptionDescriptor::fixed(OptionId::DriftTracer, "drift_tracer", "drifttracer", Bool, PhaseSet::ANY, Initial::Bool(true), any),
    OptionDescriptor::fixed(OptionId::MinInputBandwidth, "min_input_bandwidth", "mininputbw", Int64, PhaseSet::ANY, Initial::Int64(0), non_negative),
    OptionDescriptor::fixed(OptionId::MaxReorderTtl, "max_reorder_ttl", "lossmaxttl", Int32, PhaseSet::ANY, Initial::Int32(0), non_negative),
    OptionDescriptor::fixed(OptionId::RecvLatency, "recv_latency", "rcvlatency", Dur, PhaseSet::PRE, millis(DEFAULT_LATENCY), any)
        .sent(ext_type::RCV_LATENCY, Always, Direction::Both)
        .negotiated(OptionId::PeerLatency, CombineRule::Max),
    OptionDescriptor::fixed(OptionId::PeerLatency, "peer_latency", "peerlatency", Dur, PhaseSet::PRE, Initial::Millis(0), any)
        .sent(ext_type::PEER_LATENCY, Always, Direction::Both)
        .negotiated(OptionId::RecvLatency, CombineRule::Max),
    OptionDescriptor::fixed(OptionId::MinVersion, "min_version", "minversion", Int32, PhaseSet::PRE, Initial::Int32(DEFAULT_MIN_VERSION), non_negative)
        .negotiated(OptionId::Version, CombineRule::AtLeast),
    OptionDescriptor::bytes(OptionId::StreamId, "stream_id", "streamid", MAX_SID_LENGTH, PhaseSet::PRE, b"", any)
        .sent(ext_type::STREAM_ID, WhenSet, Direction::CallerOnly)
        .negotiated(OptionId::StreamId, CombineRule::Replace)
        .reset_on_accept(),
    OptionDescriptor::bytes(OptionId::Congestion, "congestion", "congestion", MAX_CONGESTION_LENGTH, PhaseSet::PRE, CONGESTION_LIVE, congestion_name)
        .sent(ext_type::CONGESTION, WhenSet, Direction::Both)
        .negotiated(OptionId::Congestion, CombineRule::MustMatch),
    OptionDescriptor::fixed(OptionId::MessageApi, "message_api", "messageapi", Bool, PhaseSet::PRE, Initial::Bool(true), any),
    OptionDescriptor::fixed(OptionId::PayloadSize, "payload_size", "payloadsize", Int32, PhaseSet::PRE, Initial::Int32(LIVE_PAYLOAD_SIZE), payload_within_mss),
    OptionDescriptor::fixed(OptionId::TransType, "transtype", "transtype", Enum, PhaseSet::PRE, Initial::Enum(TRANSTYPE_LIVE), any)
        .with_variants(TRANSTYPE_VARIANTS),
    OptionDescriptor::fixed(OptionId::Ipv6Only, "ipv6_only", "ipv6only", Int32, PhaseSet::PRE_BIND, Initial::Int32(-1), in_range::<{ -1 }, 1>),
    OptionDescriptor::fixed(OptionId::PeerIdleTimeout, "peer_idle_timeout", "peeridletimeo", Dur, PhaseSet::PRE, millis(DEFAULT_PEER_IDLE_TIMEOUT), any),
    OptionDescriptor::bytes(OptionId::BindToDevice, "bind_to_device", "bindtodevice", MAX_DEVICE_NAME_LENGTH, PhaseSet::PRE_BIND, b"", any),
    OptionDescriptor::bytes(OptionId::PacketFilter, "packet_filter", "packetfilter", MAX_PFILTER_LENGTH, PhaseSet::PRE, b"", any)
        .sent(ext_type::PACKET_FILTER, WhenSet, Direction::Both)
        .negotiated(OptionId::PacketFilter, CombineRule::AdoptOrMatch),
    OptionDescriptor::fixed(OptionId::RetransmitAlgo, "retransmit_algo", "retransmitalgo", Enum, PhaseSet::PRE, Initial::Enum(1), any)
        .with_variants(RETRANSMIT_VARIANTS),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::ALIGNMENT_UNIT;

    #[test]
    fn test_table_order_matches_ids() {
        for (i, desc) in OptionDescriptor::all().iter().enumerate() {
            assert_eq!(desc.id.index(), i, "descriptor {} out of place", desc.name);
        }
    }

    #[test]
    fn test_byte_string_limits_are_aligned() {
        for desc in OptionDescriptor::all() {
            if desc.kind == OptionKind::Bytes {
                assert_eq!(desc.max_len % ALIGNMENT_UNIT, 0, "{} not aligned", desc.name);
            }
        }
    }

    #[test]
    fn test_names_and_aliases_unique() {
        let mut names: Vec<&str> = Vec::new();
        for desc in OptionDescriptor::all() {
            names.push(desc.name);
            if desc.alias != desc.name {
                names.push(desc.alias);
            }
        }
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_block_types_unique() {
        let mut types: Vec<u16> = OptionDescriptor::all()
            .iter()
            .filter_map(|d| d.wire.map(|w| w.block_type))
            .collect();
        let total = types.len();
        types.sort_unstable();
        types.dedup();
        assert_eq!(types.len(), total);
    }

    #[test]
    fn test_combine_pairs_share_kind() {
        for desc in OptionDescriptor::all() {
            if let Some(combine) = desc.combine {
                let source = combine.from.descriptor();
                assert_eq!(source.kind, desc.kind, "{} pairs with {}", desc.name, source.name);
                assert!(source.wire.is_some(), "{} feeds from unsent {}", desc.name, source.name);
            }
        }
    }

    #[test]
    fn test_defaults_match_kind() {
        let state = ConfigState::new();
        for desc in OptionDescriptor::all() {
            let value = desc.default.to_value();
            assert_eq!(value.kind(), desc.kind, "{}", desc.name);
            assert!(value.raw_len() <= desc.max_len, "{}", desc.name);
            assert!((desc.validate)(&value, &state).is_ok(), "{} default rejected", desc.name);
        }
    }

    #[test]
    fn test_phase_sets() {
        assert!(PhaseSet::PRE_BIND.contains(Phase::PreBind));
        assert!(!PhaseSet::PRE_BIND.contains(Phase::PreConnect));
        assert!(PhaseSet::PRE.contains(Phase::PreConnect));
        assert!(!PhaseSet::PRE.contains(Phase::Connected));
        assert!(PhaseSet::ANY.contains(Phase::Connected));
        assert!(PhaseSet::NONE.is_empty());
        assert!(OptionId::PeerVersion.descriptor().is_read_only());
    }

    #[test]
    fn test_variants() {
        let desc = OptionId::TransType.descriptor();
        assert_eq!(desc.variant_name(TRANSTYPE_FILE), Some("file"));
        assert_eq!(desc.variant_value("live"), Some(TRANSTYPE_LIVE));
        assert_eq!(desc.variant_value("bulk"), None);
    }

    #[test]
    fn test_by_block_type() {
        let desc = OptionDescriptor::by_block_type(ext_type::STREAM_ID).unwrap();
        assert_eq!(desc.id, OptionId::StreamId);
        assert!(OptionDescriptor::by_block_type(0x7fff).is_none());
    }
}
