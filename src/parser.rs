use crate::error::{TracklistError, TracklistResult};
use crate::tracklist::{LineKind, SongEntry, Timestamp};

use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space1};
use nom::combinator::{map_res, rest, verify};
use nom::error::{convert_error, VerboseError};
use nom::{Err, IResult};

const SECTOR_MARKER: &[u8] = b"SECTOR";

/// Decides what to do with a raw input line, terminator included.
///
/// A line counts as a song when the characters at offsets 2, 5 and 8 are
/// `h`, `m` and `s` (in either case). The digits around them are not checked
/// here; [`parse_song`] rejects lines that only look like songs.
pub fn classify<L: AsRef<[u8]>>(line: L) -> LineKind {
    let line = line.as_ref();
    if has_song_markers(line) {
        LineKind::Song
    } else if line.starts_with(SECTOR_MARKER) {
        LineKind::SectorMarker
    } else if line == b"\n" {
        LineKind::Blank
    } else {
        LineKind::Other
    }
}

fn has_song_markers(line: &[u8]) -> bool {
    let marker_at = |idx: usize, marker: u8| {
        line.get(idx)
            .map_or(false, |c| c.eq_ignore_ascii_case(&marker))
    };
    marker_at(2, b'h') && marker_at(5, b'm') && marker_at(8, b's')
}

/// Parses `<h>h<m>m<s>s <label>` into its timestamp and label.
///
/// Only the trailing `\n` is dropped; a `\r` before it stays in the label so
/// CRLF files keep their line endings.
pub fn parse_song(line: &str) -> TracklistResult<SongEntry> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    match song_line(line) {
        Ok((_, entry)) => Ok(entry),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => {
            Err(TracklistError::MalformedSongLine(convert_error(line, err)))
        }
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

fn song_line(input: &str) -> IResult<&str, SongEntry, VerboseError<&str>> {
    let (input, timestamp) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, label) = verify(rest, |s: &str| !s.is_empty())(input)?;

    Ok((
        input,
        SongEntry {
            timestamp,
            label: label.to_string(),
        },
    ))
}

fn timestamp(input: &str) -> IResult<&str, Timestamp, VerboseError<&str>> {
    let (input, hours) = number(input)?;
    let (input, _) = tag("h")(input)?;
    let (input, minutes) = number(input)?;
    let (input, _) = tag("m")(input)?;
    let (input, seconds) = number(input)?;
    let (input, _) = tag("s")(input)?;

    Ok((input, Timestamp::new(hours, minutes, seconds)))
}

fn number(input: &str) -> IResult<&str, u32, VerboseError<&str>> {
    map_res(digit1, |s: &str| s.parse())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_classify {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(classify(input), expected);
            }
        )*
        }
    }

    test_classify! {
        classify_song: ("01h30m00s Track A\n", LineKind::Song),
        classify_song_upper: ("01H30M00S Track A\n", LineKind::Song),
        classify_song_without_newline: ("01h30m00s", LineKind::Song),
        classify_song_markers_only: ("xxHxxMxxSrest\n", LineKind::Song),
        classify_sector: ("SECTOR 1\n", LineKind::SectorMarker),
        classify_sector_bare: ("SECTOR", LineKind::SectorMarker),
        classify_sector_lowercase: ("sector 1\n", LineKind::Other),
        classify_blank: ("\n", LineKind::Blank),
        classify_crlf_is_not_blank: ("\r\n", LineKind::Other),
        classify_empty: ("", LineKind::Other),
        classify_short: ("1h2m\n", LineKind::Other),
        classify_eight_chars: ("01h30m00", LineKind::Other),
        classify_text: ("Recorded live, 2020\n", LineKind::Other),
    }

    macro_rules! test_parse_song {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, (h, m, s), label) = $value;

                let entry = parse_song(input).unwrap();

                assert_eq!(entry.timestamp, Timestamp::new(h, m, s));
                assert_eq!(entry.label, label);
            }
        )*
        }
    }

    test_parse_song! {
        parse_song_0: ("01h30m00s Track A\n", (1, 30, 0), "Track A"),
        parse_song_1: ("00h00m05s Intro", (0, 0, 5), "Intro"),
        parse_song_2: ("01h32m15s Track B\r\n", (1, 32, 15), "Track B\r"),
        parse_song_3: ("01h30m00s \r\n", (1, 30, 0), "\r"),
        parse_song_4: ("01h99m00s Bad\n", (1, 99, 0), "Bad"),
        parse_song_5: ("02h00m00s\tTabbed - Artist (Remix)\n", (2, 0, 0), "Tabbed - Artist (Remix)"),
        // Field widths are free here; classify only sends two-digit hours.
        parse_song_6: ("123h04m09s Long set\n", (123, 4, 9), "Long set"),
        parse_song_7: ("1h2m3s short fields\n", (1, 2, 3), "short fields"),
    }

    macro_rules! test_parse_song_fails {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let input = $value;

                match parse_song(input) {
                    Err(TracklistError::MalformedSongLine(_)) => (),
                    other => panic!("expected a malformed line, got {:?}", other),
                }
            }
        )*
        }
    }

    test_parse_song_fails! {
        parse_song_fails_letters: "xxHxxMxxSrest\n",
        parse_song_fails_uppercase_units: "01H30M00S Track\n",
        parse_song_fails_no_label: "01h30m00s\n",
        parse_song_fails_no_label_crlf: "01h30m00s\r\n",
        parse_song_fails_space_only_label: "01h30m00s \n",
        parse_song_fails_no_separator: "01h30m00sTrack\n",
        parse_song_fails_overflow: "99999999999h00m00s Huge\n",
        parse_song_fails_empty: "",
    }
}
