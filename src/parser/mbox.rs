//! Streaming MBOX splitter.
//!
//! Yields each raw message of a mailbox in turn, so a large MBOX can be
//! scanned for invites without loading it into memory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{InviteError, Result};

/// Read buffer size (1 MB).
const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Messages larger than this are truncated (64 MB).
const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// One message split out of an MBOX.
#[derive(Debug, Clone)]
pub struct MboxMessage {
    /// Zero-based position in the mailbox.
    pub sequence: u64,
    /// Byte offset of the `From ` separator line.
    pub offset: u64,
    /// Raw bytes, separator line included.
    pub raw: Vec<u8>,
}

struct Pending {
    offset: u64,
    raw: Vec<u8>,
    truncated: bool,
}

impl Pending {
    fn new(offset: u64, first_line: &[u8]) -> Self {
        Self {
            offset,
            raw: first_line.to_vec(),
            truncated: false,
        }
    }
}

/// Iterator over the messages of an MBOX stream.
///
/// Tolerates CRLF line endings, a UTF-8 BOM, missing blank lines before a
/// separator (logged) and a truncated last message.
pub struct MboxReader<R> {
    reader: R,
    path: PathBuf,
    line: Vec<u8>,
    pending: Option<Pending>,
    offset: u64,
    sequence: u64,
    prev_blank: bool,
    done: bool,
}

impl MboxReader<BufReader<File>> {
    /// Open an MBOX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InviteError::FileNotFound(path.to_path_buf())
            } else {
                InviteError::io(path, e)
            }
        })?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        Ok(Self::with_path(reader, path.to_path_buf()))
    }
}

impl<R: BufRead> MboxReader<R> {
    /// Split messages out of any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::with_path(reader, PathBuf::from("<stream>"))
    }

    fn with_path(reader: R, path: PathBuf) -> Self {
        Self {
            reader,
            path,
            line: Vec::with_capacity(4096),
            pending: None,
            offset: 0,
            sequence: 0,
            prev_blank: true,
            done: false,
        }
    }

    /// Bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.offset
    }

    fn take_pending(&mut self) -> Option<MboxMessage> {
        let pending = self.pending.take()?;
        let message = MboxMessage {
            sequence: self.sequence,
            offset: pending.offset,
            raw: pending.raw,
        };
        self.sequence += 1;
        Some(message)
    }
}

impl<R: BufRead> Iterator for MboxReader<R> {
    type Item = Result<MboxMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.line.clear();
            let read = match self.reader.read_until(b'\n', &mut self.line) {
                Ok(n) => n,
                Err(e) => {
                    self.done = true;
                    return Some(Err(InviteError::io(&self.path, e)));
                }
            };
            if read == 0 {
                self.done = true;
                return self.take_pending().map(Ok);
            }

            let line_offset = self.offset;
            self.offset += read as u64;

            if is_mbox_separator(&self.line) {
                if !self.prev_blank {
                    warn!(
                        offset = line_offset,
                        "Found 'From ' separator without preceding blank line"
                    );
                }
                self.prev_blank = false;
                let finished = self.take_pending();
                self.pending = Some(Pending::new(line_offset, &self.line));
                if let Some(message) = finished {
                    return Some(Ok(message));
                }
                continue;
            }

            self.prev_blank = is_blank_line(&self.line);
            if self.pending.is_none() {
                // Text before the first separator: treat the stream as one bare message.
                self.pending = Some(Pending::new(line_offset, &self.line));
                continue;
            }
            match self.pending.as_mut() {
                Some(pending) if pending.raw.len() + self.line.len() <= MAX_MESSAGE_SIZE => {
                    pending.raw.extend_from_slice(&self.line);
                }
                Some(pending) if !pending.truncated => {
                    warn!(
                        offset = pending.offset,
                        max_size = MAX_MESSAGE_SIZE,
                        "Message exceeds maximum size, truncating"
                    );
                    pending.truncated = true;
                }
                _ => {}
            }
        }
    }
}

/// `From ` at the start of a line, after an optional BOM.
fn is_mbox_separator(line: &[u8]) -> bool {
    let line = line.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(line);
    line.starts_with(b"From ")
}

fn is_blank_line(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}
