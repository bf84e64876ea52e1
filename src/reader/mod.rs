#![doc = r#"
Bounds-checked cursor over raw SMF bytes.

Every read either succeeds and advances the cursor by exactly the number
of bytes consumed, or fails without moving it. Failures carry the byte
offset at which the read began.
"#]

mod error;
pub use error::*;

/// A cursor over an in-memory byte buffer.
///
/// The buffer is borrowed and never mutated; a `Reader` is cheap to
/// create, so chunk payloads get their own reader over the captured
/// sub-range.
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    position: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader over a borrowed byte slice.
    pub const fn from_byte_slice(data: &'slc [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The current read offset into the buffer.
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Read exactly `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> ReadResult<&'slc [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(ReaderError::truncated(self.position, n, available));
        }
        let slice = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    pub fn read_exact<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let available = self.remaining();
        if available == 0 {
            return Err(ReaderError::truncated(self.position, 1, 0));
        }
        let byte = self.data[self.position];
        self.position += 1;
        Ok(byte)
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        if self.remaining() == 0 {
            return Err(ReaderError::truncated(self.position, 1, 0));
        }
        Ok(self.data[self.position])
    }

    /// Read a big-endian u16.
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact::<2>().map(u16::from_be_bytes)
    }

    /// Read a big-endian u32.
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact::<4>().map(u32::from_be_bytes)
    }

    /// Read a MIDI variable-length quantity.
    ///
    /// Seven payload bits per byte, most significant first; the high bit
    /// marks continuation. SMF caps the encoding at 4 bytes (28 payload
    /// bits), so a 5th continuation byte is [`ReaderErrorKind::MalformedVlq`].
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        for _ in 0..4 {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.position = start;
                    return Err(e);
                }
            };
            value = (value << 7) | u32::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        self.position = start;
        Err(ReaderError::new(start, ReaderErrorKind::MalformedVlq))
    }
}

#[test]
fn fixed_width_reads() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);

    assert_eq!(reader.read_u32_be().unwrap(), 0x0102_0304);
    assert_eq!(reader.read_u16_be().unwrap(), 0x0506);
    assert_eq!(reader.read_u8().unwrap(), 0x07);
    assert_eq!(reader.buffer_position(), 7);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn read_bytes_slices_in_order() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(b"MThdrest");

    assert_eq!(reader.read_bytes(4).unwrap(), b"MThd");
    assert_eq!(reader.read_bytes(4).unwrap(), b"rest");
}

#[test]
fn failed_read_leaves_cursor_in_place() {
    let mut reader = Reader::from_byte_slice(&[0xAA, 0xBB]);

    let err = reader.read_u32_be().unwrap_err();
    assert_eq!(
        *err.error_kind(),
        ReaderErrorKind::TruncatedData {
            needed: 4,
            available: 2
        }
    );
    assert_eq!(err.position(), 0);
    assert_eq!(reader.buffer_position(), 0);

    assert_eq!(reader.read_u16_be().unwrap(), 0xAABB);
}

#[test]
fn peek_does_not_consume() {
    let mut reader = Reader::from_byte_slice(&[0x90]);
    assert_eq!(reader.peek_u8().unwrap(), 0x90);
    assert_eq!(reader.buffer_position(), 0);
    assert_eq!(reader.read_u8().unwrap(), 0x90);
    assert!(reader.peek_u8().is_err());
}

#[test]
fn vlq_single_and_multi_byte() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::from_byte_slice(&[
        0x00, // 0
        0x7F, // 127
        0x81, 0x00, // 128
        0xC0, 0x00, // 8192
        0xFF, 0x7F, // 16383
        0xFF, 0xFF, 0xFF, 0x7F, // 0x0FFFFFFF
    ]);

    assert_eq!(reader.read_vlq().unwrap(), 0);
    assert_eq!(reader.read_vlq().unwrap(), 127);
    assert_eq!(reader.read_vlq().unwrap(), 128);
    assert_eq!(reader.read_vlq().unwrap(), 8192);
    assert_eq!(reader.read_vlq().unwrap(), 16383);
    assert_eq!(reader.read_vlq().unwrap(), 0x0FFF_FFFF);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn vlq_rejects_a_fifth_byte() {
    let mut reader = Reader::from_byte_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);

    let err = reader.read_vlq().unwrap_err();
    assert_eq!(*err.error_kind(), ReaderErrorKind::MalformedVlq);
    assert_eq!(err.position(), 0);
    // all-or-nothing: the cursor is back at the start of the quantity
    assert_eq!(reader.buffer_position(), 0);
}

#[test]
fn vlq_truncated_mid_sequence() {
    let mut reader = Reader::from_byte_slice(&[0x81, 0x82]);

    let err = reader.read_vlq().unwrap_err();
    assert!(err.is_truncation());
    assert_eq!(reader.buffer_position(), 0);
}
