//! Movie file parsing.
//!
//! The file is read line by line. Line 1 of every 14-line block holds the
//! delay, lines 2-14 hold the frame text. A frame is emitted when the 14th
//! line of its block arrives, so a truncated trailing block yields nothing.

use crate::error::{MovieError, Result};
use crate::frame::{Frame, FrameMessage};
use crate::movie::Movie;
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

/// Lines per frame block, delay line included.
pub const BLOCK_LINES: usize = 14;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Delay units in the file are tenths of a second.
const DELAY_UNIT_MS: u64 = 100;

/// Load and parse a gzip-compressed movie file.
pub fn load_movie(path: impl AsRef<Path>) -> Result<Movie> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MovieError::open(path, e))?;
    let mut reader = BufReader::new(file);

    if !reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        return Err(MovieError::not_gzip(path));
    }

    let movie = parse_movie(BufReader::new(GzDecoder::new(reader)))?;
    tracing::info!(
        "Loaded {} frames ({:?} running time) from {:?}",
        movie.len(),
        movie.total_duration(),
        path
    );
    Ok(movie)
}

/// Parse decompressed movie text.
///
/// Only newline-terminated lines count. A read error before the first line
/// is returned; a later one ends the movie at the last complete frame.
pub fn parse_movie<R: BufRead>(mut reader: R) -> Result<Movie> {
    let mut parser = BlockParser::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) if line.last() != Some(&b'\n') => break,
            Ok(_) => {}
            Err(e) if parser.lines_seen() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!(
                    "Stopped reading movie after {} lines: {}",
                    parser.lines_seen(),
                    e
                );
                break;
            }
        }
        parser.push_line(&String::from_utf8_lossy(&line))?;
    }

    if parser.pending_lines() > 0 {
        tracing::debug!(
            "Dropping partial trailing block of {} lines",
            parser.pending_lines()
        );
    }

    Ok(parser.finish())
}

/// Accumulates lines into frames, one block at a time.
struct BlockParser {
    lines_seen: usize,
    next_frame_no: u64,
    delay: Duration,
    buffer: String,
    frames: Vec<Frame>,
}

impl BlockParser {
    fn new() -> Self {
        Self {
            lines_seen: 0,
            next_frame_no: 1,
            delay: Duration::ZERO,
            buffer: String::new(),
            frames: Vec::new(),
        }
    }

    fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    fn pending_lines(&self) -> usize {
        self.lines_seen % BLOCK_LINES
    }

    fn push_line(&mut self, line: &str) -> Result<()> {
        self.lines_seen += 1;

        match self.lines_seen % BLOCK_LINES {
            // Last line of the block.
            0 => {
                self.buffer.push_str(line);
                let message = FrameMessage::new(self.next_frame_no, &self.buffer);
                self.frames.push(Frame::encode(self.delay, &message)?);
                self.next_frame_no += 1;
                self.buffer.clear();
            }
            1 => match parse_delay(line) {
                Some(delay) => self.delay = delay,
                // Keeps the previous frame's delay.
                None => tracing::debug!(
                    "Unparsable delay {:?} on line {}",
                    line.trim_end(),
                    self.lines_seen
                ),
            },
            _ => self.buffer.push_str(line),
        }

        Ok(())
    }

    fn finish(self) -> Movie {
        Movie::new(self.frames)
    }
}

/// Parse a delay line. Negative delays clamp to zero.
fn parse_delay(line: &str) -> Option<Duration> {
    let value = line.strip_suffix('\n').unwrap_or(line);
    let tenths = value.parse::<i64>().ok()?;
    let millis = u64::try_from(tenths).unwrap_or(0).saturating_mul(DELAY_UNIT_MS);
    Some(Duration::from_millis(millis))
}
