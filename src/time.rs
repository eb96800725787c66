//! NTP 32.32 fixed-point timestamps and conversions to and from local time
//!
//! An NTP timestamp counts seconds since the NTP epoch (1900-01-01 00:00:00 UTC)
//! in its upper 32 bits and fractions of a second in units of 2^-32 s in its lower
//! 32 bits. Converting between that representation and nanoseconds is lossy:
//! [`to_ntp_time`] rounds to the nearest 2^-32 s and [`from_ntp_time`] truncates to
//! whole nanoseconds, so a round trip may come back 1 ns early.
#[cfg(feature = "std")]
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds between the NTP epoch and the UNIX epoch, see
/// [RFC 5905](https://www.rfc-editor.org/rfc/rfc5905)
pub const NTP_TIMESTAMP_DELTA: u32 = 2_208_988_800u32;
/// Nanoseconds in second constant
pub(crate) const NSEC_IN_SEC: u32 = 1_000_000_000;
/// NTP seconds mask
pub(crate) const SECONDS_MASK: u64 = 0xffff_ffff_0000_0000;
/// NTP seconds fraction mask
pub(crate) const SECONDS_FRAC_MASK: u64 = 0xffff_ffff;

/// NTP timestamp as transmitted on the wire
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct NtpTimestamp {
    /// Seconds since the NTP epoch, modulo 2^32
    pub sec: u32,
    /// Second fraction, `frac / 2^32` seconds
    pub frac: u32,
}

impl NtpTimestamp {
    /// Create a timestamp from its seconds and fraction parts
    #[must_use]
    pub const fn new(sec: u32, frac: u32) -> Self {
        NtpTimestamp { sec, frac }
    }

    /// Build a timestamp from its 64-bit on-wire value
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        NtpTimestamp {
            sec: ((bits & SECONDS_MASK) >> 32) as u32,
            frac: (bits & SECONDS_FRAC_MASK) as u32,
        }
    }

    /// Returns the 64-bit on-wire value
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.sec as u64) << 32) | self.frac as u64
    }

    /// Returns the second fraction truncated to whole nanoseconds
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn subsec_nanos(self) -> u32 {
        ((self.frac as u64 * NSEC_IN_SEC as u64) >> 32) as u32
    }
}

impl From<u64> for NtpTimestamp {
    fn from(bits: u64) -> Self {
        NtpTimestamp::from_bits(bits)
    }
}

impl From<NtpTimestamp> for u64 {
    fn from(ts: NtpTimestamp) -> Self {
        ts.to_bits()
    }
}

/// Convert a local wall-clock instant to an NTP timestamp
///
/// The seconds part wraps every 2^32 seconds (the next wrap happens in 2036), the
/// fraction is rounded to the nearest representable value. Instants before 1970 are
/// supported.
#[cfg(feature = "std")]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
#[must_use]
pub fn to_ntp_time(time: SystemTime) -> NtpTimestamp {
    let (unix_sec, nanos) = match time.duration_since(UNIX_EPOCH) {
        Ok(since) => (since.as_secs() as i64, since.subsec_nanos()),
        Err(err) => {
            let before = err.duration();
            let sec = -(before.as_secs() as i64);

            match before.subsec_nanos() {
                0 => (sec, 0),
                n => (sec - 1, NSEC_IN_SEC - n),
            }
        }
    };
    let sec = unix_sec.wrapping_add(i64::from(NTP_TIMESTAMP_DELTA)) as u32;
    let frac = ((u64::from(nanos) << 32) + u64::from(NSEC_IN_SEC / 2))
        / u64::from(NSEC_IN_SEC);

    NtpTimestamp::new(sec, frac as u32)
}

/// Convert an NTP timestamp back to a local wall-clock instant
///
/// Timestamps are read in NTP era 0 (1900..2036). The fraction is truncated to whole
/// nanoseconds, so `from_ntp_time(to_ntp_time(t))` is within 1 ns of `t`.
#[cfg(feature = "std")]
#[must_use]
pub fn from_ntp_time(ts: NtpTimestamp) -> SystemTime {
    let unix_sec = i64::from(ts.sec) - i64::from(NTP_TIMESTAMP_DELTA);
    let nanos = Duration::from_nanos(u64::from(ts.subsec_nanos()));

    if unix_sec >= 0 {
        UNIX_EPOCH + Duration::from_secs(unix_sec.unsigned_abs()) + nanos
    } else {
        UNIX_EPOCH - Duration::from_secs(unix_sec.unsigned_abs()) + nanos
    }
}

#[cfg(feature = "std")]
impl From<SystemTime> for NtpTimestamp {
    fn from(time: SystemTime) -> Self {
        to_ntp_time(time)
    }
}

#[cfg(feature = "std")]
impl From<NtpTimestamp> for SystemTime {
    fn from(ts: NtpTimestamp) -> Self {
        from_ntp_time(ts)
    }
}

#[cfg(all(test, feature = "std"))]
mod time_tests {
    use super::{from_ntp_time, to_ntp_time, NtpTimestamp, NTP_TIMESTAMP_DELTA};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    const UNIX_SEC: u64 = 1_585_147_599;
    const UNIX_NSEC: u32 = 631_495_778;
    const NTP_SEC: u32 = 3_794_136_399;
    const NTP_FRAC: u32 = 2_712_253_714;

    #[test]
    fn test_to_ntp_time() {
        let time = UNIX_EPOCH + Duration::new(UNIX_SEC, UNIX_NSEC);
        let ts = to_ntp_time(time);

        assert_eq!(NTP_SEC, ts.sec);
        assert_eq!(NTP_FRAC, ts.frac);
    }

    #[test]
    fn test_from_ntp_time() {
        let time = from_ntp_time(NtpTimestamp::new(NTP_SEC, NTP_FRAC));
        let since = time.duration_since(UNIX_EPOCH).unwrap();

        assert_eq!(UNIX_SEC, since.as_secs());
        // truncation of the fraction loses the last nanosecond
        assert_eq!(UNIX_NSEC, since.subsec_nanos() + 1);
    }

    #[test]
    fn test_round_trip_within_one_nanosecond() {
        for nanos in [0u32, 1, 499_999_999, 500_000_000, 999_999_999] {
            let time = UNIX_EPOCH + Duration::new(UNIX_SEC, nanos);
            let back = from_ntp_time(to_ntp_time(time));
            let delta = match time.duration_since(back) {
                Ok(d) => d,
                Err(e) => e.duration(),
            };

            assert!(delta <= Duration::from_nanos(1), "{nanos}: {delta:?}");
        }
    }

    #[test]
    fn test_unix_epoch() {
        let ts = to_ntp_time(UNIX_EPOCH);

        assert_eq!(NtpTimestamp::new(NTP_TIMESTAMP_DELTA, 0), ts);
        assert_eq!(UNIX_EPOCH, from_ntp_time(ts));
    }

    #[test]
    fn test_before_unix_epoch() {
        let time = UNIX_EPOCH - Duration::new(10, 250_000_000);
        let ts = to_ntp_time(time);

        assert_eq!(NTP_TIMESTAMP_DELTA - 11, ts.sec);
        assert_eq!(0xc000_0000, ts.frac);
        assert_eq!(time, from_ntp_time(ts));
    }

    #[test]
    fn test_era_wrap() {
        // 2036-02-07 06:28:16 UTC starts NTP era 1
        let era_end = u64::from(u32::MAX) - u64::from(NTP_TIMESTAMP_DELTA) + 1;
        let time = UNIX_EPOCH + Duration::from_secs(era_end + 5);

        assert_eq!(NtpTimestamp::new(5, 0), to_ntp_time(time));
    }

    #[test]
    fn test_bits() {
        let ts = NtpTimestamp::new(NTP_SEC, NTP_FRAC);

        assert_eq!(ts, NtpTimestamp::from_bits(ts.to_bits()));
        assert_eq!(u64::from(NTP_SEC) << 32 | u64::from(NTP_FRAC), u64::from(ts));
    }

    #[test]
    fn test_system_time_conversions() {
        let now = SystemTime::now();
        let ts = NtpTimestamp::from(now);

        assert_eq!(ts, to_ntp_time(now));
        assert_eq!(SystemTime::from(ts), from_ntp_time(ts));
    }
}
