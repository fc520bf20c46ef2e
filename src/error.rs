use crate::tracklist::Timestamp;

use thiserror::Error;

/// Errors confined to a single input line. The driver reports them and moves
/// on to the next line.
#[derive(Debug, Error)]
pub enum TracklistError {
    #[error("Invalid song line: {0}")]
    MalformedSongLine(String),

    #[error("Invalid offset or song time format (song {song}, offset {offset})")]
    InvalidTimeRange { song: Timestamp, offset: Timestamp },
}

pub type TracklistResult<T> = Result<T, TracklistError>;
