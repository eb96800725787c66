//! Clock offset and round-trip delay from the four timestamps of an NTP exchange
//!
//! ```text
//! offset = [(T2 - T1) + (T3 - T4)] / 2
//! delay  = (T4 - T1) - (T3 - T2)
//! ```
//!
//! where
//! - T1 = client's transmit timestamp (origin)
//! - T2 = server's receive timestamp
//! - T3 = server's transmit timestamp
//! - T4 = client's receive timestamp
//!
//! All results are signed nanoseconds. The functions keep no state and can be
//! called from any number of threads.
use std::time::{Duration, SystemTime};

use crate::packet::Packet;
use crate::time::from_ntp_time;

/// Round-trip delay of an exchange in nanoseconds
///
/// A constant offset between client and server clocks cancels out, leaving the sum
/// of both one-way network delays.
#[must_use]
pub fn round_trip_delay(
    t1: SystemTime,
    t2: SystemTime,
    t3: SystemTime,
    t4: SystemTime,
) -> i64 {
    nanos_between(t4, t1).saturating_sub(nanos_between(t3, t2))
}

/// Offset of the server clock relative to the client clock in nanoseconds,
/// assuming a symmetric network path
#[must_use]
pub fn offset(
    t1: SystemTime,
    t2: SystemTime,
    t3: SystemTime,
    t4: SystemTime,
) -> i64 {
    nanos_between(t2, t1).saturating_add(nanos_between(t3, t4)) / 2
}

/// Shift a local instant by `offset` nanoseconds; negative offsets move it back
#[must_use]
pub fn correct_time(time: SystemTime, offset: i64) -> SystemTime {
    let shift = Duration::from_nanos(offset.unsigned_abs());

    if offset >= 0 {
        time + shift
    } else {
        time - shift
    }
}

/// `later - earlier` in nanoseconds, saturating at the `i64` range
fn nanos_between(later: SystemTime, earlier: SystemTime) -> i64 {
    match later.duration_since(earlier) {
        Ok(ahead) => i64::try_from(ahead.as_nanos()).unwrap_or(i64::MAX),
        Err(behind) => i64::try_from(behind.duration().as_nanos())
            .map_or(i64::MIN, |nanos| -nanos),
    }
}

/// Delay and offset computed from one request/response exchange
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Round-trip delay in nanoseconds
    pub delay: i64,
    /// Server clock minus client clock in nanoseconds
    pub offset: i64,
}

impl Measurement {
    #[must_use]
    pub fn from_timestamps(
        t1: SystemTime,
        t2: SystemTime,
        t3: SystemTime,
        t4: SystemTime,
    ) -> Self {
        Measurement {
            delay: round_trip_delay(t1, t2, t3, t4),
            offset: offset(t1, t2, t3, t4),
        }
    }

    /// Take T1, T2 and T3 from the origin, receive and transmit fields of a
    /// server response and T4 from the local receive time
    #[must_use]
    pub fn from_response(response: &Packet, client_receive: SystemTime) -> Self {
        Measurement::from_timestamps(
            from_ntp_time(response.origin),
            from_ntp_time(response.receive),
            from_ntp_time(response.transmit),
            client_receive,
        )
    }
}

#[cfg(test)]
mod clock_tests {
    use super::{correct_time, offset, round_trip_delay, Measurement};
    use crate::packet::Packet;
    use crate::time::to_ntp_time;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    const FORWARD_DELAY: Duration = Duration::from_millis(10);
    const RETURN_DELAY: Duration = Duration::from_millis(20);
    const SYMMETRIC_DELAY: Duration = Duration::from_millis(25);
    const SERVER_PROCESSING: Duration = Duration::from_micros(10);
    const SKEW: Duration = Duration::from_millis(50);

    const ROUND_TRIP_DELAY: i64 = 30_000_000;
    const ASYMMETRIC_OFFSET: i64 = -5_000_000;

    /// T1..T4 for clocks in agreement
    fn exchange(
        forward: Duration,
        back: Duration,
    ) -> (SystemTime, SystemTime, SystemTime, SystemTime) {
        let origin = SystemTime::now();
        let server_receive = origin + forward;
        let server_transmit = server_receive + SERVER_PROCESSING;
        let client_receive = server_transmit + back;

        (origin, server_receive, server_transmit, client_receive)
    }

    #[test]
    fn test_round_trip_delay() {
        let (t1, t2, t3, t4) = exchange(FORWARD_DELAY, RETURN_DELAY);

        assert_eq!(ROUND_TRIP_DELAY, round_trip_delay(t1, t2, t3, t4));
    }

    #[test]
    fn test_round_trip_delay_client_ahead() {
        let (t1, t2, t3, t4) = exchange(FORWARD_DELAY, RETURN_DELAY);

        assert_eq!(
            ROUND_TRIP_DELAY,
            round_trip_delay(t1 + SKEW, t2, t3, t4 + SKEW)
        );
    }

    #[test]
    fn test_round_trip_delay_client_behind() {
        let (t1, t2, t3, t4) = exchange(FORWARD_DELAY, RETURN_DELAY);

        assert_eq!(
            ROUND_TRIP_DELAY,
            round_trip_delay(t1 - SKEW, t2, t3, t4 - SKEW)
        );
    }

    #[test]
    fn test_offset_symmetric_network() {
        let (t1, t2, t3, t4) = exchange(SYMMETRIC_DELAY, SYMMETRIC_DELAY);

        assert_eq!(0, offset(t1, t2, t3, t4));
    }

    #[test]
    fn test_offset_asymmetric_network() {
        let (t1, t2, t3, t4) = exchange(FORWARD_DELAY, RETURN_DELAY);

        assert_eq!(ASYMMETRIC_OFFSET, offset(t1, t2, t3, t4));
    }

    #[test]
    fn test_offset_follows_server_skew() {
        let (t1, t2, t3, t4) = exchange(SYMMETRIC_DELAY, SYMMETRIC_DELAY);

        // server clock 50ms ahead of the client
        assert_eq!(50_000_000, offset(t1, t2 + SKEW, t3 + SKEW, t4));
        assert_eq!(-50_000_000, offset(t1, t2 - SKEW, t3 - SKEW, t4));
    }

    #[test]
    fn test_correct_time() {
        let now = SystemTime::now();

        assert_eq!(
            now - Duration::from_millis(5),
            correct_time(now, ASYMMETRIC_OFFSET)
        );
        assert_eq!(
            now + Duration::from_nanos(1_234_567),
            correct_time(now, 1_234_567)
        );
        assert_eq!(now, correct_time(now, 0));
    }

    #[test]
    fn test_measurement_from_timestamps() {
        let (t1, t2, t3, t4) = exchange(FORWARD_DELAY, RETURN_DELAY);
        let measurement = Measurement::from_timestamps(t1, t2, t3, t4);

        assert_eq!(ROUND_TRIP_DELAY, measurement.delay);
        assert_eq!(ASYMMETRIC_OFFSET, measurement.offset);
    }

    #[test]
    fn test_measurement_from_response() {
        // each timestamp may lose 1 ns in the NTP fraction round trip
        let t1 = UNIX_EPOCH + Duration::from_secs(1_585_147_599);
        let t2 = t1 + Duration::from_millis(110);
        let t3 = t2 + Duration::from_millis(1);
        let t4 = t1 + Duration::from_millis(31);
        let response = Packet {
            origin: to_ntp_time(t1),
            receive: to_ntp_time(t2),
            transmit: to_ntp_time(t3),
            ..Packet::default()
        };
        let measurement = Measurement::from_response(&response, t4);

        assert!((measurement.delay - 30_000_000).abs() <= 2);
        assert!((measurement.offset - 95_000_000).abs() <= 2);
    }
}
