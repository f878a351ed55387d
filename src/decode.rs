//! One-code-point-at-a-time UTF-8 decoding over a buffered reader

use std::fmt;
use std::io::{self, BufRead};

/// Why a read produced no unit
#[derive(Debug)]
pub enum ReadError {
    /// The input stream is closed.
    EndOfInput,
    /// Interrupted by a signal or a spurious wakeup; safe to retry.
    Interrupted,
    /// The bytes consumed do not form a valid UTF-8 code point.
    Decode(Vec<u8>),
    Io(io::Error),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfInput => write!(f, "end of input"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Decode(bytes) => write!(f, "invalid UTF-8 sequence {:02x?}", bytes),
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Self::Interrupted,
            io::ErrorKind::UnexpectedEof => Self::EndOfInput,
            _ => Self::Io(e),
        }
    }
}

/// Expected sequence length from a lead byte, `None` for continuation bytes
/// and bytes that never start a sequence.
fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xc0 == 0x80
}

/// Read the next byte without retrying; `Ok(None)` at end of input.
fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<u8>, ReadError> {
    let buf = reader.fill_buf()?;
    Ok(buf.first().copied())
}

/// Like [`peek_byte`] but retries interruptions, for use once a lead byte has
/// been consumed and the sequence cannot be abandoned.
fn peek_continuation<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<u8>, ReadError> {
    loop {
        match peek_byte(reader) {
            Err(ReadError::Interrupted) => continue,
            other => return other,
        }
    }
}

/// Decode exactly one code point, consuming only its bytes.
///
/// A malformed sequence consumes the bytes read so far but never the byte
/// that broke it, so the following unit is still decoded intact.
pub fn read_unit<R: BufRead + ?Sized>(reader: &mut R) -> Result<char, ReadError> {
    let lead = peek_byte(reader)?.ok_or(ReadError::EndOfInput)?;
    reader.consume(1);

    let len = match sequence_len(lead) {
        Some(1) => return Ok(char::from(lead)),
        Some(len) => len,
        None => return Err(ReadError::Decode(vec![lead])),
    };

    let mut bytes = Vec::with_capacity(len);
    bytes.push(lead);
    while bytes.len() < len {
        match peek_continuation(reader)? {
            Some(b) if is_continuation(b) => {
                reader.consume(1);
                bytes.push(b);
            }
            _ => return Err(ReadError::Decode(bytes)),
        }
    }

    // rejects overlong encodings and surrogates the lead byte table lets through
    let decoded = std::str::from_utf8(&bytes).ok().and_then(|s| s.chars().next());
    decoded.ok_or(ReadError::Decode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn units(input: &[u8]) -> Vec<Result<char, String>> {
        let mut reader = Cursor::new(input.to_vec());
        let mut out = Vec::new();
        loop {
            match read_unit(&mut reader) {
                Ok(c) => out.push(Ok(c)),
                Err(ReadError::EndOfInput) => break,
                Err(e) => out.push(Err(e.to_string())),
            }
        }
        out
    }

    #[test]
    fn ascii_one_unit_per_byte() {
        assert_eq!(units(b"ab q"), vec![Ok('a'), Ok('b'), Ok(' '), Ok('q')]);
    }

    #[test]
    fn control_bytes_are_units() {
        assert_eq!(units(b"\x1b\r\x03"), vec![Ok('\x1b'), Ok('\r'), Ok('\x03')]);
    }

    #[test]
    fn multibyte_code_points() {
        assert_eq!(
            units("é€😀".as_bytes()),
            vec![Ok('é'), Ok('€'), Ok('😀')]
        );
    }

    #[test]
    fn stray_continuation_byte() {
        assert_eq!(
            units(b"\x80a"),
            vec![Err("invalid UTF-8 sequence [80]".to_string()), Ok('a')]
        );
    }

    #[test]
    fn broken_sequence_keeps_next_unit() {
        // 0xe2 expects two continuation bytes, 'q' interrupts it
        assert_eq!(
            units(b"\xe2\x82q"),
            vec![Err("invalid UTF-8 sequence [e2, 82]".to_string()), Ok('q')]
        );
    }

    #[test]
    fn truncated_at_end_of_input() {
        assert_eq!(
            units(b"\xf0\x9f"),
            vec![Err("invalid UTF-8 sequence [f0, 9f]".to_string())]
        );
    }

    #[test]
    fn overlong_and_surrogate_rejected() {
        assert!(units(b"\xe0\x80\xaf")[0].is_err());
        assert!(units(b"\xed\xa0\x80")[0].is_err());
    }

    #[test]
    fn empty_input_is_end_of_input() {
        let mut reader = Cursor::new(Vec::new());
        assert!(matches!(read_unit(&mut reader), Err(ReadError::EndOfInput)));
    }

    /// Hands out one byte per read, like a terminal in raw mode.
    struct Trickle(Vec<u8>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0.remove(0);
            Ok(1)
        }
    }

    #[test]
    fn sequence_split_across_reads() {
        let mut reader = BufReader::new(Trickle("€x".as_bytes().to_vec()));
        assert_eq!(read_unit(&mut reader).unwrap(), '€');
        assert_eq!(read_unit(&mut reader).unwrap(), 'x');
    }

    /// Replays scripted reads, one chunk or error per call
    struct Scripted(Vec<io::Result<Vec<u8>>>);

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let bytes = self.0.remove(0)?;
            buf[..bytes.len()].copy_from_slice(&bytes);
            Ok(bytes.len())
        }
    }

    #[test]
    fn interrupted_before_lead_byte_is_reported() {
        let mut reader = BufReader::new(Scripted(vec![
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(b"a".to_vec()),
        ]));
        assert!(matches!(read_unit(&mut reader), Err(ReadError::Interrupted)));
        assert_eq!(read_unit(&mut reader).unwrap(), 'a');
    }

    #[test]
    fn interrupted_mid_sequence_keeps_the_unit() {
        let mut reader = BufReader::new(Scripted(vec![
            Ok(b"\xe2".to_vec()),
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(b"\x82".to_vec()),
            Err(io::Error::from(io::ErrorKind::WouldBlock)),
            Ok(b"\xacq".to_vec()),
        ]));
        assert_eq!(read_unit(&mut reader).unwrap(), '€');
        assert_eq!(read_unit(&mut reader).unwrap(), 'q');
    }

    #[test]
    fn io_error_kinds() {
        let interrupted = io::Error::from(io::ErrorKind::Interrupted);
        assert!(matches!(ReadError::from(interrupted), ReadError::Interrupted));

        let eof = io::Error::from(io::ErrorKind::UnexpectedEof);
        assert!(matches!(ReadError::from(eof), ReadError::EndOfInput));

        let other = io::Error::new(io::ErrorKind::Other, "device gone");
        assert!(matches!(ReadError::from(other), ReadError::Io(_)));
    }
}
