//! NTP wire format, clock arithmetic and leap-second tables
//!
//! This crate provides the pieces an NTP client or server is built from, without
//! any transport or clock-discipline policy of its own:
//!
//! - [`packet`]: the 48-byte NTP header codec with leap indicator, version and mode
//!   accessors
//! - [`time`]: NTP 32.32 fixed-point timestamps and conversions to and from
//!   [`std::time::SystemTime`]
//! - [`clock`]: round-trip delay and clock offset from the four timestamps of an
//!   exchange (requires `std`)
//! - [`leapsectz`]: TZif leap-second table parsing and writing (requires `std`)
//!
//! Sockets are provided by the `ntp-wire-net-std` crate.
//!
//! # Features
//!
//! - `std`: enables `SystemTime` conversions, [`clock`] and [`leapsectz`]
//!   (enabled by default)
//! - `log`: enables `trace!`/`debug!` output through the [`log`](https://crates.io/crates/log) crate
//! - `chrono`: adds `chrono` accessors for leap-second instants
//!
//! # Example
//!
//! ```rust
//! use ntp_wire::{to_ntp_time, Mode, Packet};
//! use std::time::SystemTime;
//!
//! let request = Packet::client_request(to_ntp_time(SystemTime::now()));
//! let bytes = request.to_bytes();
//! let decoded = Packet::decode(&bytes).unwrap();
//!
//! assert_eq!(Mode::Client, decoded.settings.mode());
//! assert!(decoded.valid_settings_format());
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

mod error;
mod log;

#[cfg(feature = "std")]
pub mod clock;
#[cfg(feature = "std")]
pub mod leapsectz;
pub mod packet;
pub mod time;

pub use crate::error::{Error, Result};
pub use crate::packet::{LeapIndicator, Mode, Packet, Settings, PACKET_SIZE};
#[cfg(feature = "std")]
pub use crate::time::{from_ntp_time, to_ntp_time};
pub use crate::time::{NtpTimestamp, NTP_TIMESTAMP_DELTA};
