//! Leap-second tables in the TZif binary format
//!
//! The table lives in a zoneinfo file (by default [`DEFAULT_LEAP_FILE`]) laid out as
//! described in [RFC 8536](https://datatracker.ietf.org/doc/html/rfc8536). Only the
//! leap-second records are interpreted; transition times, local time types,
//! abbreviations and indicators are skipped by length.
//!
//! ```text
//! +---------------+---+
//! |  magic  (4)   |ver|  "TZif", 0x00 / '2' / '3'
//! +---------------+---+---------------------------+
//! |                unused  (15)                   |
//! +---------------+---------------+---------------+
//! |  isutcnt  (4) |  isstdcnt (4) |  leapcnt  (4) |
//! +---------------+---------------+---------------+
//! |  timecnt  (4) |  typecnt  (4) |  charcnt  (4) |
//! +---------------+---------------+---------------+
//! |  transition times, types, abbreviations       |
//! |  leapcnt x (time (4 or 8), correction (4))    |
//! |  standard/wall and UT/local indicators        |
//! +-----------------------------------------------+
//! ```
//!
//! Version 1 files hold one such block with 4-byte times. Version 2 and 3 files
//! repeat the block with 8-byte times and end with a newline-delimited footer.
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::log::debug;
use crate::{Error, Result};

/// System zoneinfo file carrying the leap-second table
pub const DEFAULT_LEAP_FILE: &str = "/usr/share/zoneinfo/right/UTC";

const MAGIC: [u8; 4] = *b"TZif";
/// Magic, version byte and the 15 unused bytes that follow it
const PREFIX_SIZE: usize = 20;
/// UTC offset (4), DST flag (1), abbreviation index (1)
const LOCAL_TIME_TYPE_SIZE: usize = 6;
const LEAP_COUNT_SIZE: usize = 4;

/// One entry of a leap-second table
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LeapSecond {
    /// UNIX time at which the correction takes effect
    pub tleap: u64,
    /// Total number of leap seconds applied from `tleap` on
    pub nleap: i32,
}

impl LeapSecond {
    #[must_use]
    pub const fn new(tleap: u64, nleap: i32) -> Self {
        LeapSecond { tleap, nleap }
    }

    /// Instant at which the correction takes effect
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.tleap)
    }

    /// UTC date and time at which the correction takes effect, `None` if it lies
    /// outside of the range `chrono` can represent
    #[cfg(feature = "chrono")]
    #[must_use]
    pub fn time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(i64::try_from(self.tleap).ok()?, 0)
    }
}

/// TZif format version
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] for anything but `0x00`, `'2'` and `'3'`
    pub const fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Version::V1),
            b'2' => Ok(Version::V2),
            b'3' => Ok(Version::V3),
            _ => Err(Error::UnsupportedVersion),
        }
    }

    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Version::V1 => 0,
            Version::V2 => b'2',
            Version::V3 => b'3',
        }
    }
}

/// Data block layout, selects the width of time fields
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Layout {
    /// 32-bit times; the only block of a version 1 file and the first block of
    /// later versions
    V1,
    /// 64-bit times; the second block of version 2 and 3 files
    V2,
}

impl Layout {
    const fn time_size(self) -> usize {
        match self {
            Layout::V1 => 4,
            Layout::V2 => 8,
        }
    }
}

/// Counts of the variable-length sections of a TZif data block
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Number of UT/local indicators
    pub is_utc_cnt: u32,
    /// Number of standard/wall indicators
    pub is_std_cnt: u32,
    /// Number of leap-second records
    pub leap_cnt: u32,
    /// Number of transition times
    pub time_cnt: u32,
    /// Number of local time type records
    pub type_cnt: u32,
    /// Number of bytes of time zone abbreviation strings
    pub char_cnt: u32,
}

impl Header {
    /// Encoded size in bytes
    pub const SIZE: usize = 24;

    /// Decode the six big-endian counts
    #[must_use]
    pub fn from_bytes(raw: &[u8; Header::SIZE]) -> Self {
        let count = |i: usize| {
            let at = i * 4;
            u32::from_be_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]])
        };

        Header {
            is_utc_cnt: count(0),
            is_std_cnt: count(1),
            leap_cnt: count(2),
            time_cnt: count(3),
            type_cnt: count(4),
            char_cnt: count(5),
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; Header::SIZE] {
        let mut raw = [0u8; Header::SIZE];
        let counts = [
            self.is_utc_cnt,
            self.is_std_cnt,
            self.leap_cnt,
            self.time_cnt,
            self.type_cnt,
            self.char_cnt,
        ];

        for (chunk, count) in raw.chunks_exact_mut(4).zip(counts) {
            chunk.copy_from_slice(&count.to_be_bytes());
        }

        raw
    }

    /// Bytes between the header and the first leap-second record
    fn pre_leap_len(&self, layout: Layout) -> u64 {
        u64::from(self.time_cnt) * (layout.time_size() as u64 + 1)
            + u64::from(self.type_cnt) * LOCAL_TIME_TYPE_SIZE as u64
            + u64::from(self.char_cnt)
    }

    /// Bytes between the last leap-second record and the end of the block
    fn post_leap_len(&self) -> u64 {
        u64::from(self.is_std_cnt) + u64::from(self.is_utc_cnt)
    }
}

/// Location of the leap-second table
///
/// Defaults to [`DEFAULT_LEAP_FILE`]; tests and callers with a private copy of the
/// table point it elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeapFile {
    path: PathBuf,
}

impl Default for LeapFile {
    fn default() -> Self {
        LeapFile {
            path: PathBuf::from(DEFAULT_LEAP_FILE),
        }
    }
}

impl LeapFile {
    /// Use the table at `path`, or [`DEFAULT_LEAP_FILE`] when `path` is empty
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            LeapFile::default()
        } else {
            LeapFile {
                path: path.to_path_buf(),
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole table
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or read, otherwise any
    /// error of [`parse_reader`]
    pub fn parse(&self) -> Result<Vec<LeapSecond>> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        let leap_seconds = parse_reader(&mut reader)?;

        debug!(
            "Loaded {} leap seconds from {}",
            leap_seconds.len(),
            self.path.display()
        );

        Ok(leap_seconds)
    }

    /// Latest leap second already in effect at the current system time
    ///
    /// # Errors
    ///
    /// Returns any error of [`LeapFile::parse`], or
    /// [`Error::NoApplicableLeapSecond`] if every entry lies in the future
    pub fn latest(&self) -> Result<LeapSecond> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_secs());

        latest_at(&self.parse()?, now)
    }
}

/// Parse the leap-second table at `path`; an empty path reads [`DEFAULT_LEAP_FILE`]
///
/// # Errors
///
/// See [`LeapFile::parse`]
pub fn parse(path: impl AsRef<Path>) -> Result<Vec<LeapSecond>> {
    LeapFile::new(path).parse()
}

/// Latest leap second in effect now according to the table at `path`; an empty
/// path reads [`DEFAULT_LEAP_FILE`]
///
/// # Errors
///
/// See [`LeapFile::latest`]
pub fn latest(path: impl AsRef<Path>) -> Result<LeapSecond> {
    LeapFile::new(path).latest()
}

/// Entry with the greatest `tleap` not after `now` (UNIX seconds)
///
/// Entries scheduled after `now` are ignored even though the table lists them.
///
/// # Errors
///
/// Returns [`Error::NoApplicableLeapSecond`] if no entry is at or before `now`
pub fn latest_at(leap_seconds: &[LeapSecond], now: u64) -> Result<LeapSecond> {
    let latest = leap_seconds
        .iter()
        .filter(|ls| ls.tleap <= now)
        .max_by_key(|ls| ls.tleap)
        .copied()
        .ok_or(Error::NoApplicableLeapSecond)?;

    debug!("Leap second in effect at {}: {:?}", now, latest);

    Ok(latest)
}

/// Parse a TZif stream and return its leap-second records in file order
///
/// For version 2 and 3 data the first (32-bit) block is consumed and discarded
/// and the records come from the second (64-bit) block. The footer is not read.
///
/// # Errors
///
/// - [`Error::BadData`] if the magic is wrong, a fixed header is cut short, or a
///   second block is missing its magic or claims version 1
/// - [`Error::UnsupportedVersion`] for an unknown version byte
/// - [`Error::Truncated`] if a variable-length section is cut short
/// - [`Error::NoLeapSeconds`] if the table holds no records
/// - [`Error::Io`] if reading fails otherwise
pub fn parse_reader<R: Read>(reader: &mut R) -> Result<Vec<LeapSecond>> {
    let version = read_prefix(reader)?;
    let header = read_header(reader)?;
    let mut leap_seconds = read_block(reader, &header, Layout::V1)?;

    if version != Version::V1 {
        if read_prefix(reader)? == Version::V1 {
            return Err(Error::BadData);
        }
        let header = read_header(reader)?;
        leap_seconds = read_block(reader, &header, Layout::V2)?;
    }

    debug!(
        "TZif version {:?} with {} leap seconds",
        version,
        leap_seconds.len()
    );

    if leap_seconds.is_empty() {
        return Err(Error::NoLeapSeconds);
    }

    Ok(leap_seconds)
}

/// Serialize a leap-second table as TZif version 2 data
///
/// Writes a version 1 compatible block (times truncated to 32 bits), a block with
/// 64-bit times and the `"\n<abbreviation>\n"` footer. Each block carries a single
/// local time type (UTC offset 0) named `abbreviation`.
///
/// # Errors
///
/// - [`Error::UnsupportedVersion`] if `version` is not `b'2'`
/// - [`Error::BadData`] if the table or abbreviation do not fit the 32-bit counts
/// - [`Error::Io`] if writing fails
pub fn write<W: Write>(
    writer: &mut W,
    version: u8,
    leap_seconds: &[LeapSecond],
    abbreviation: &str,
) -> Result<()> {
    if version != b'2' {
        return Err(Error::UnsupportedVersion);
    }
    let header = Header {
        is_utc_cnt: 1,
        is_std_cnt: 1,
        leap_cnt: u32::try_from(leap_seconds.len())
            .map_err(|_| Error::BadData)?,
        time_cnt: 0,
        type_cnt: 1,
        char_cnt: u32::try_from(abbreviation.len() + 1)
            .map_err(|_| Error::BadData)?,
    };

    for layout in [Layout::V1, Layout::V2] {
        write_block(writer, version, &header, layout, leap_seconds, abbreviation)?;
    }

    writer.write_all(b"\n")?;
    writer.write_all(abbreviation.as_bytes())?;
    writer.write_all(b"\n")?;

    Ok(())
}

fn read_prefix<R: Read>(reader: &mut R) -> Result<Version> {
    let prefix: [u8; PREFIX_SIZE] = read_fixed(reader)?;

    if prefix[..MAGIC.len()] != MAGIC {
        return Err(Error::BadData);
    }

    Version::from_byte(prefix[MAGIC.len()])
}

fn read_header<R: Read>(reader: &mut R) -> Result<Header> {
    let raw: [u8; Header::SIZE] = read_fixed(reader)?;

    Ok(Header::from_bytes(&raw))
}

/// Read a fixed-size header region; a short read means the data is not TZif
fn read_fixed<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];

    reader.read_exact(&mut buf).map_err(|err| match Error::from(err) {
        Error::Truncated => Error::BadData,
        other => other,
    })?;

    Ok(buf)
}

fn read_block<R: Read>(
    reader: &mut R,
    header: &Header,
    layout: Layout,
) -> Result<Vec<LeapSecond>> {
    skip(reader, header.pre_leap_len(layout))?;
    let leap_seconds = (0..header.leap_cnt)
        .map(|_| read_leap_second(reader, layout))
        .collect::<Result<Vec<_>>>()?;
    skip(reader, header.post_leap_len())?;

    Ok(leap_seconds)
}

fn read_leap_second<R: Read>(
    reader: &mut R,
    layout: Layout,
) -> Result<LeapSecond> {
    let mut time = [0u8; 8];
    let time_size = layout.time_size();
    reader.read_exact(&mut time[8 - time_size..])?;

    let mut count = [0u8; LEAP_COUNT_SIZE];
    reader.read_exact(&mut count)?;

    Ok(LeapSecond {
        tleap: u64::from_be_bytes(time),
        nleap: i32::from_be_bytes(count),
    })
}

fn skip<R: Read>(reader: &mut R, len: u64) -> Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(len), &mut io::sink())?;

    if skipped == len {
        Ok(())
    } else {
        Err(Error::Truncated)
    }
}

fn write_block<W: Write>(
    writer: &mut W,
    version: u8,
    header: &Header,
    layout: Layout,
    leap_seconds: &[LeapSecond],
    abbreviation: &str,
) -> Result<()> {
    let mut prefix = [0u8; PREFIX_SIZE];
    prefix[..MAGIC.len()].copy_from_slice(&MAGIC);
    prefix[MAGIC.len()] = version;

    writer.write_all(&prefix)?;
    writer.write_all(&header.to_bytes())?;
    // one local time type: UTC offset 0, no DST, abbreviation at index 0
    writer.write_all(&[0u8; LOCAL_TIME_TYPE_SIZE])?;
    writer.write_all(abbreviation.as_bytes())?;
    writer.write_all(&[0])?;

    let time_size = layout.time_size();
    for ls in leap_seconds {
        // version 1 blocks keep the low 32 bits only
        writer.write_all(&ls.tleap.to_be_bytes()[8 - time_size..])?;
        writer.write_all(&ls.nleap.to_be_bytes())?;
    }

    // standard/wall and UT/local indicators of the local time type
    writer.write_all(&[0, 0])?;

    Ok(())
}
