use crate::processor::Emit;
use crate::tracklist::Timestamp;

use std::io::Write;

use anyhow::Result;

pub fn write_emit<W: Write>(buf: &mut W, emit: &Emit) -> Result<()> {
    match emit {
        Emit::Blank => writeln!(buf)?,
        Emit::Verbatim(line) => buf.write_all(line)?,
        Emit::Song { timestamp, label } => write_song(buf, *timestamp, label)?,
    }
    Ok(())
}

fn write_song<W: Write>(buf: &mut W, timestamp: Timestamp, label: &str) -> Result<()> {
    write_ts(buf, timestamp)?;
    writeln!(buf, " {}", label)?;
    Ok(())
}

fn write_ts<W: Write>(buf: &mut W, timestamp: Timestamp) -> Result<()> {
    write!(buf, "{}", timestamp)?;
    Ok(())
}
