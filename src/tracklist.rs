use std::fmt;

/// An elapsed duration as written in a tracklist, e.g. `01h32m15s`.
///
/// Minutes and seconds are expected to lie in `0..=59`, but values read from
/// a file are stored as-is; see [`Timestamp::is_well_formed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub(crate) hours: u32,
    pub(crate) minutes: u32,
    pub(crate) seconds: u32,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.minutes <= 59 && self.seconds <= 59
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{:02}h{:02}m{:02}s",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    SectorMarker,
    Song,
    Other,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SongEntry {
    pub(crate) timestamp: Timestamp,
    pub(crate) label: String,
}
