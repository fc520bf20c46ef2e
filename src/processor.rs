use crate::error::{TracklistError, TracklistResult};
use crate::parser::{classify, parse_song};
use crate::serialiser;
use crate::tracklist::{LineKind, SongEntry, Timestamp};

use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result};
use log::{debug, warn};

pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

pub struct ProcessOpts {
    /// Longest chunk read as one line. Longer physical lines are split and
    /// each piece is handled on its own.
    pub max_line_len: usize,
}

impl Default for ProcessOpts {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub lines: usize,
    pub sectors: usize,
    pub songs: usize,
    pub skipped: usize,
}

/// What a single input line turns into.
#[derive(Debug, PartialEq, Eq)]
pub enum Emit<'a> {
    Blank,
    Verbatim(&'a [u8]),
    Song { timestamp: Timestamp, label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectorState {
    /// The next song becomes the sector's time zero.
    AwaitingFirstSong,
    Anchored(Timestamp),
}

/// Carries the sector offset from one line to the next.
pub struct Session {
    state: SectorState,
    summary: Summary,
}

impl Session {
    /// Songs appearing before any `SECTOR` line are treated as the start of
    /// an implicit first sector.
    pub fn new() -> Self {
        Self {
            state: SectorState::AwaitingFirstSong,
            summary: Summary::default(),
        }
    }

    /// 1-based number of the line most recently passed to `process_line`.
    pub fn line_number(&self) -> usize {
        self.summary.lines
    }

    pub fn process_line<'a>(&mut self, line: &'a [u8]) -> TracklistResult<Emit<'a>> {
        self.summary.lines += 1;
        let result = match classify(line) {
            LineKind::Blank => Ok(Emit::Blank),
            LineKind::SectorMarker => {
                self.state = SectorState::AwaitingFirstSong;
                self.summary.sectors += 1;
                Ok(Emit::Verbatim(line))
            }
            LineKind::Song => self.song(line),
            LineKind::Other => Ok(Emit::Verbatim(line)),
        };
        match result {
            Ok(Emit::Song { .. }) => self.summary.songs += 1,
            Err(_) => self.summary.skipped += 1,
            Ok(_) => (),
        }
        result
    }

    pub fn finish(self) -> Summary {
        self.summary
    }

    fn song(&mut self, line: &[u8]) -> TracklistResult<Emit<'static>> {
        let line = std::str::from_utf8(line).map_err(|err| {
            TracklistError::MalformedSongLine(format!("not valid UTF-8 ({})", err))
        })?;
        let SongEntry { timestamp, label } = parse_song(line)?;

        let timestamp = match self.state {
            SectorState::AwaitingFirstSong => {
                if !timestamp.is_well_formed() {
                    warn!(
                        "Line {}: sector starts at out-of-range time {}; later songs in this sector will be rejected",
                        self.line_number(),
                        timestamp
                    );
                }
                debug!("Line {}: sector anchored at {}", self.line_number(), timestamp);
                self.state = SectorState::Anchored(timestamp);
                Timestamp::ZERO
            }
            SectorState::Anchored(offset) => normalize(timestamp, offset)?,
        };

        Ok(Emit::Song { timestamp, label })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Subtracts `offset` from `song`, borrowing from minutes and hours when a
/// field of the offset is larger than the song's.
pub fn normalize(song: Timestamp, offset: Timestamp) -> TracklistResult<Timestamp> {
    let invalid = || TracklistError::InvalidTimeRange { song, offset };
    if offset.hours > song.hours || !offset.is_well_formed() || !song.is_well_formed() {
        return Err(invalid());
    }

    // Borrows only touch this copy; the sector keeps its offset.
    let mut offset = offset;

    let seconds = if offset.seconds > song.seconds {
        offset.minutes += 1;
        song.seconds + 60 - offset.seconds
    } else {
        song.seconds - offset.seconds
    };

    let minutes = if offset.minutes > song.minutes {
        offset.hours += 1;
        song.minutes + 60 - offset.minutes
    } else {
        song.minutes - offset.minutes
    };

    // A borrow can push the offset past the song, e.g. 01h20m after 01h30m.
    let hours = song.hours.checked_sub(offset.hours).ok_or_else(invalid)?;

    Ok(Timestamp::new(hours, minutes, seconds))
}

pub fn process<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    opts: &ProcessOpts,
) -> Result<Summary> {
    let limit = opts.max_line_len as u64;
    let mut session = Session::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = input
            .by_ref()
            .take(limit)
            .read_until(b'\n', &mut line)
            .context("Failed to read from input.")?;
        if read == 0 {
            break;
        }

        match session.process_line(&line) {
            Ok(emit) => serialiser::write_emit(&mut output, &emit)
                .context("Failed to write to output file.")?,
            Err(err) => warn!(
                "Line {}: {}\nSkipping this line",
                session.line_number(),
                err
            ),
        }
    }

    output.flush().context("Failed to write to output file.")?;
    Ok(session.finish())
}
