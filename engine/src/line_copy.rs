//! Line-oriented text copy with re-encoding.
//!
//! The source is decoded with one encoding and the destination written with
//! another, one line at a time. This is the only strategy that interprets
//! the file as text, so its output is **not** byte-exact in general:
//!
//! - characters the destination encoding cannot represent are replaced,
//! - `\r\n` and lone `\r` terminators are rewritten to the configured ending,
//! - a byte-order mark in the source selects the decoder and is not copied.
//!
//! With identical lossless encodings and `\n` line endings the output matches
//! the source byte for byte.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use encoding_rs::{CoderResult, Decoder, Encoder, Encoding, UTF_8};
use serde::Deserialize;
use tracing::debug;

use crate::block_copy::DEFAULT_BLOCK_SIZE;
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::UnitKind;
use crate::strategy::CopyStrategy;
use crate::validate::validate_paths;

const READ_CHUNK: usize = 64 * 1024;

/// Terminator written after each line that had one in the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Parse "lf" or "crlf" (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lf" => Some(LineEnding::Lf),
            "crlf" => Some(LineEnding::CrLf),
            _ => None,
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEnding::Lf => write!(f, "lf"),
            LineEnding::CrLf => write!(f, "crlf"),
        }
    }
}

/// Encodings and terminator used by [`LineCopy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCopyOptions {
    pub source_encoding: &'static Encoding,
    pub destination_encoding: &'static Encoding,
    pub line_ending: LineEnding,
}

impl Default for LineCopyOptions {
    fn default() -> Self {
        LineCopyOptions {
            source_encoding: UTF_8,
            destination_encoding: UTF_8,
            line_ending: LineEnding::Lf,
        }
    }
}

impl LineCopyOptions {
    /// Build options from WHATWG encoding labels such as `"utf-8"` or
    /// `"windows-1252"`.
    pub fn from_labels(source: &str, destination: &str) -> Result<Self, EngineError> {
        Ok(LineCopyOptions {
            source_encoding: encoding_for_label("source_encoding", source)?,
            destination_encoding: encoding_for_label("destination_encoding", destination)?,
            line_ending: LineEnding::default(),
        })
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}

/// Resolve an encoding label, failing with `InvalidArgument` if it is unknown.
pub fn encoding_for_label(name: &'static str, label: &str) -> Result<&'static Encoding, EngineError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| EngineError::invalid_argument(name, format!("unknown encoding '{}'", label)))
}

/// Line-by-line copy strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCopy {
    options: LineCopyOptions,
}

impl LineCopy {
    pub fn new(options: LineCopyOptions) -> Self {
        LineCopy { options }
    }
}

impl CopyStrategy for LineCopy {
    fn name(&self) -> &'static str {
        "LineCopy"
    }

    fn unit(&self) -> UnitKind {
        UnitKind::Lines
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<u64, EngineError> {
        validate_paths(source, destination)?;

        debug!(
            target: "streams::copy",
            strategy = "line",
            from = self.options.source_encoding.name(),
            to = self.options.destination_encoding.output_encoding().name(),
            src = %source.display(),
            dst = %destination.display(),
            "starting copy"
        );

        let mut reader = LineReader::new(
            fs_ops::open_source(source)?,
            self.options.source_encoding.new_decoder(),
            source,
        );
        let mut writer = LineWriter::new(
            fs_ops::create_destination(destination)?,
            self.options.destination_encoding.new_encoder(),
            destination,
        );

        let terminator = self.options.line_ending.as_str();
        let mut amount_of_lines: u64 = 0;
        while let Some(line) = reader.next_line()? {
            writer.write_str(&line.text, false)?;
            if line.terminated {
                writer.write_str(terminator, false)?;
                amount_of_lines += 1;
            }
        }
        writer.finish()?;

        debug!(target: "streams::copy", strategy = "line", lines = amount_of_lines, "copy finished");
        Ok(amount_of_lines)
    }
}

/// Copy `source` to `destination` line by line, UTF-8 to UTF-8 with `\n`
/// endings.
///
/// Returns the number of lines written with a terminator. A final line
/// without a terminator in the source is written without one and is not
/// counted.
pub fn copy_by_line(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
) -> Result<u64, EngineError> {
    LineCopy::default().copy(source.as_ref(), destination.as_ref())
}

/// Copy `source` to `destination` line by line with explicit encodings.
pub fn copy_by_line_with(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &LineCopyOptions,
) -> Result<u64, EngineError> {
    LineCopy::new(*options).copy(source.as_ref(), destination.as_ref())
}

#[derive(Debug, PartialEq, Eq)]
struct Line {
    text: String,
    /// Whether the source had a terminator after this line
    terminated: bool,
}

/// Streams decoded lines out of a byte reader.
///
/// Recognises `\n`, `\r\n` and a lone `\r` as terminators. A `\r` at the
/// end of the decoded text is held back until the next chunk shows whether
/// a `\n` follows.
struct LineReader<'p, R> {
    inner: R,
    decoder: Decoder,
    path: &'p Path,
    raw: Vec<u8>,
    pending: String,
    /// Start of unconsumed text in `pending`
    pos: usize,
    /// Bytes after `pos` already known to hold no terminator
    scanned: usize,
    finished: bool,
}

impl<'p, R: Read> LineReader<'p, R> {
    fn new(inner: R, decoder: Decoder, path: &'p Path) -> Self {
        LineReader {
            inner,
            decoder,
            path,
            raw: vec![0u8; READ_CHUNK],
            pending: String::new(),
            pos: 0,
            scanned: 0,
            finished: false,
        }
    }

    fn next_line(&mut self) -> Result<Option<Line>, EngineError> {
        loop {
            let rest = &self.pending[self.pos..];
            let found = rest[self.scanned..]
                .find(&['\r', '\n'][..])
                .map(|i| i + self.scanned);

            if let Some(idx) = found {
                let bytes = rest.as_bytes();
                let is_cr = bytes[idx] == b'\r';
                if is_cr && idx + 1 == bytes.len() && !self.finished {
                    self.scanned = idx;
                    self.fill()?;
                    continue;
                }
                let consumed = if is_cr && bytes.get(idx + 1) == Some(&b'\n') {
                    idx + 2
                } else {
                    idx + 1
                };
                let text = rest[..idx].to_string();
                self.pos += consumed;
                self.scanned = 0;
                return Ok(Some(Line {
                    text,
                    terminated: true,
                }));
            }

            if self.finished {
                if rest.is_empty() {
                    return Ok(None);
                }
                let text = rest.to_string();
                self.pos = self.pending.len();
                self.scanned = 0;
                return Ok(Some(Line {
                    text,
                    terminated: false,
                }));
            }

            self.scanned = rest.len();
            self.fill()?;
        }
    }

    /// Read and decode the next chunk. Sets `finished` at end of input.
    fn fill(&mut self) -> Result<(), EngineError> {
        self.pending.drain(..self.pos);
        self.pos = 0;

        let n = fs_ops::read_chunk(&mut self.inner, &mut self.raw, self.path)?;
        let last = n == 0;
        let mut input = &self.raw[..n];
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() * 3 + 16);
            self.pending.reserve(needed);
            let (result, read, _) = self.decoder.decode_to_string(input, &mut self.pending, last);
            input = &input[read..];
            if let CoderResult::InputEmpty = result {
                break;
            }
        }
        self.finished = last;
        Ok(())
    }
}

/// Encodes text into a buffered destination file.
struct LineWriter<'p> {
    inner: BufWriter<File>,
    encoder: Encoder,
    path: &'p Path,
    scratch: Vec<u8>,
}

impl<'p> LineWriter<'p> {
    fn new(file: File, encoder: Encoder, path: &'p Path) -> Self {
        LineWriter {
            inner: BufWriter::with_capacity(DEFAULT_BLOCK_SIZE, file),
            encoder,
            path,
            scratch: Vec::new(),
        }
    }

    fn write_str(&mut self, text: &str, last: bool) -> Result<(), EngineError> {
        self.scratch.clear();
        let mut input = text;
        loop {
            // Room for at least one numeric character reference.
            let needed = self
                .encoder
                .max_buffer_length_from_utf8_if_no_unmappables(input.len())
                .unwrap_or(input.len() * 4)
                + 16;
            self.scratch.reserve(needed);
            let (result, read, _) =
                self.encoder
                    .encode_from_utf8_to_vec(input, &mut self.scratch, last);
            input = &input[read..];
            if let CoderResult::InputEmpty = result {
                break;
            }
        }
        fs_ops::write_chunk(&mut self.inner, &self.scratch, self.path)
    }

    /// Flush encoder state and buffered bytes to disk.
    fn finish(mut self) -> Result<(), EngineError> {
        self.write_str("", true)?;
        fs_ops::flush(&mut self.inner, self.path)
    }
}
