//! NTP packet codec
//!
//! A [`Packet`] is the fixed 48-byte NTPv3/NTPv4 header. All multibyte fields are
//! big-endian on the wire. Decoding is total for any buffer of at least
//! [`PACKET_SIZE`] bytes, so `Packet::decode(&p.to_bytes()) == Ok(p)` and
//! `Packet::decode(b)?.to_bytes() == b[..PACKET_SIZE]`.
use core::fmt::{Display, Formatter};

use crate::log::trace;
use crate::time::NtpTimestamp;
use crate::{Error, Result};

/// Size of an encoded NTP packet in bytes
pub const PACKET_SIZE: usize = 48;

/// NTP mode value bit mask
pub(crate) const MODE_MASK: u8 = 0b0000_0111;
/// NTP mode bit mask shift value
pub(crate) const MODE_SHIFT: u8 = 0;
/// NTP version value bit mask
pub(crate) const VERSION_MASK: u8 = 0b0011_1000;
/// NTP version bit mask shift value
pub(crate) const VERSION_SHIFT: u8 = 3;
/// NTP LI (leap indicator) bit mask value
pub(crate) const LI_MASK: u8 = 0b1100_0000;
/// NTP LI bit mask shift value
pub(crate) const LI_SHIFT: u8 = 6;

/// Oldest protocol version accepted by [`Packet::valid_settings_format`]
pub const MIN_SUPPORTED_VERSION: u8 = 3;
/// Newest protocol version accepted by [`Packet::valid_settings_format`]
pub const MAX_SUPPORTED_VERSION: u8 = 4;
/// Protocol version used for packets built by this crate
pub const NTP_VERSION: u8 = 4;

/// Leap indicator warning of an impending leap second
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LeapIndicator {
    /// No warning
    NoWarning = 0,
    /// Last minute of the day has 61 seconds
    LastMinute61 = 1,
    /// Last minute of the day has 59 seconds
    LastMinute59 = 2,
    /// Unknown (clock unsynchronized)
    Unsynchronized = 3,
}

impl LeapIndicator {
    /// Map the two low bits of `bits` onto a leap indicator
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => LeapIndicator::NoWarning,
            1 => LeapIndicator::LastMinute61,
            2 => LeapIndicator::LastMinute59,
            _ => LeapIndicator::Unsynchronized,
        }
    }
}

/// Association mode
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Reserved = 0,
    SymmetricActive = 1,
    SymmetricPassive = 2,
    Client = 3,
    Server = 4,
    Broadcast = 5,
    Control = 6,
    Private = 7,
}

impl Mode {
    /// Map the three low bits of `bits` onto a mode
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Mode::Reserved,
            1 => Mode::SymmetricActive,
            2 => Mode::SymmetricPassive,
            3 => Mode::Client,
            4 => Mode::Server,
            5 => Mode::Broadcast,
            6 => Mode::Control,
            _ => Mode::Private,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mode = match self {
            Mode::Reserved => "reserved",
            Mode::SymmetricActive => "symmetric active",
            Mode::SymmetricPassive => "symmetric passive",
            Mode::Client => "client",
            Mode::Server => "server",
            Mode::Broadcast => "broadcast",
            Mode::Control => "control",
            Mode::Private => "private",
        };

        write!(f, "{mode}")
    }
}

/// First byte of an NTP packet: leap indicator, version number and mode
///
/// ```text
///  7 6 5 4 3 2 1 0
/// +---+-----+-----+
/// |LI | VN  |Mode |
/// +---+-----+-----+
/// ```
///
/// Every byte value is a valid `Settings`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Settings(u8);

impl Settings {
    /// Pack leap indicator, version and mode. Only the three low bits of
    /// `version` are used.
    #[must_use]
    pub const fn new(li: LeapIndicator, version: u8, mode: Mode) -> Self {
        Settings(
            ((li as u8) << LI_SHIFT) & LI_MASK
                | (version << VERSION_SHIFT) & VERSION_MASK
                | ((mode as u8) << MODE_SHIFT) & MODE_MASK,
        )
    }

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Settings(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn leap_indicator(self) -> LeapIndicator {
        LeapIndicator::from_bits(shifter(self.0, LI_MASK, LI_SHIFT))
    }

    #[must_use]
    pub const fn version(self) -> u8 {
        shifter(self.0, VERSION_MASK, VERSION_SHIFT)
    }

    #[must_use]
    pub const fn mode(self) -> Mode {
        Mode::from_bits(shifter(self.0, MODE_MASK, MODE_SHIFT))
    }

    /// Whether the version field names a protocol version this codec handles
    #[must_use]
    pub const fn has_supported_version(self) -> bool {
        let version = self.version();

        version >= MIN_SUPPORTED_VERSION && version <= MAX_SUPPORTED_VERSION
    }
}

impl From<u8> for Settings {
    fn from(bits: u8) -> Self {
        Settings(bits)
    }
}

impl From<Settings> for u8 {
    fn from(settings: Settings) -> Self {
        settings.0
    }
}

const fn shifter(val: u8, mask: u8, shift: u8) -> u8 {
    (val & mask) >> shift
}

/// NTP packet header
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Packet {
    pub settings: Settings,
    pub stratum: u8,
    /// Maximum interval between messages, log2 seconds
    pub poll: u8,
    /// Precision of the system clock, log2 seconds
    pub precision: i8,
    /// Round-trip delay to the reference clock, NTP short format (16.16)
    pub root_delay: u32,
    /// Dispersion to the reference clock, NTP short format (16.16)
    pub root_dispersion: u32,
    pub reference_id: u32,
    /// Time the system clock was last set or corrected
    pub reference: NtpTimestamp,
    /// Client transmit time echoed back by the server (T1)
    pub origin: NtpTimestamp,
    /// Time the request arrived at the server (T2)
    pub receive: NtpTimestamp,
    /// Time the packet departed its sender (T3 in a response)
    pub transmit: NtpTimestamp,
}

impl Packet {
    /// Build a version 4 client request stamped with the given transmit time
    #[must_use]
    pub fn client_request(transmit: NtpTimestamp) -> Packet {
        Packet {
            settings: Settings::new(
                LeapIndicator::NoWarning,
                NTP_VERSION,
                Mode::Client,
            ),
            transmit,
            ..Packet::default()
        }
    }

    /// Decode the first [`PACKET_SIZE`] bytes of `buf`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectPayload`] if `buf` is shorter than [`PACKET_SIZE`]
    pub fn decode(buf: &[u8]) -> Result<Packet> {
        let raw: &[u8; PACKET_SIZE] = buf
            .get(..PACKET_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(Error::IncorrectPayload)?;
        let to_u32 = |at: usize| {
            u32::from_be_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]])
        };
        let to_ts = |at: usize| NtpTimestamp::new(to_u32(at), to_u32(at + 4));

        let packet = Packet {
            settings: Settings(raw[0]),
            stratum: raw[1],
            poll: raw[2],
            precision: i8::from_be_bytes([raw[3]]),
            root_delay: to_u32(4),
            root_dispersion: to_u32(8),
            reference_id: to_u32(12),
            reference: to_ts(16),
            origin: to_ts(24),
            receive: to_ts(32),
            transmit: to_ts(40),
        };
        trace_packet(&packet);

        Ok(packet)
    }

    /// Encode into the first [`PACKET_SIZE`] bytes of `buf` and return the number of
    /// bytes written
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncorrectPayload`] if `buf` cannot hold a whole packet
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let out = buf.get_mut(..PACKET_SIZE).ok_or(Error::IncorrectPayload)?;

        out.copy_from_slice(&self.to_bytes());
        Ok(PACKET_SIZE)
    }

    /// Encode to the 48-byte wire representation
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut tmp_buf = [0u8; PACKET_SIZE];

        tmp_buf[0] = self.settings.bits();
        tmp_buf[1] = self.stratum;
        tmp_buf[2] = self.poll;
        tmp_buf[3] = self.precision.to_be_bytes()[0];
        tmp_buf[4..8].copy_from_slice(&self.root_delay.to_be_bytes());
        tmp_buf[8..12].copy_from_slice(&self.root_dispersion.to_be_bytes());
        tmp_buf[12..16].copy_from_slice(&self.reference_id.to_be_bytes());
        tmp_buf[16..24].copy_from_slice(&self.reference.to_bits().to_be_bytes());
        tmp_buf[24..32].copy_from_slice(&self.origin.to_bits().to_be_bytes());
        tmp_buf[32..40].copy_from_slice(&self.receive.to_bits().to_be_bytes());
        tmp_buf[40..48].copy_from_slice(&self.transmit.to_bits().to_be_bytes());

        tmp_buf
    }

    /// Simple check of the first packet byte: the version field must name NTPv3
    /// or NTPv4. An all-zero (uninitialized) header is rejected.
    #[must_use]
    pub fn valid_settings_format(&self) -> bool {
        self.settings.has_supported_version()
    }
}

impl TryFrom<&[u8]> for Packet {
    type Error = Error;

    fn try_from(buf: &[u8]) -> Result<Self> {
        Packet::decode(buf)
    }
}

impl From<&Packet> for [u8; PACKET_SIZE] {
    fn from(packet: &Packet) -> Self {
        packet.to_bytes()
    }
}

#[allow(unused_variables)]
fn trace_packet(packet: &Packet) {
    trace!("| Mode:\t\t{}", packet.settings.mode());
    trace!("| Version:\t{}", packet.settings.version());
    trace!("| Leap:\t\t{:?}", packet.settings.leap_indicator());
    trace!("| Stratum:\t{}", packet.stratum);
    trace!("| Poll:\t\t{}", packet.poll);
    trace!("| Precision:\t\t{}", packet.precision);
    trace!("| Root delay:\t\t{}", packet.root_delay);
    trace!("| Root dispersion:\t{}", packet.root_dispersion);
    trace!("| Reference ID:\t\t{:#010x}", packet.reference_id);
    trace!(
        "| Reference timestamp:\t{:>20}",
        packet.reference.to_bits()
    );
    trace!("| Origin timestamp:\t{:>20}", packet.origin.to_bits());
    trace!("| Receive timestamp:\t{:>20}", packet.receive.to_bits());
    trace!("| Transmit timestamp:\t{:>20}", packet.transmit.to_bits());
}
