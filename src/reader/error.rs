use thiserror::Error;

#[doc = r#"
An error produced while decoding SMF bytes, carrying the byte offset
at which the failing read began.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reading at position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// A 4-byte chunk tag did not match the expected literal.
    #[error("expected chunk identifier `{expected}`, found {found:?}")]
    BadIdentifier {
        /// The tag the format requires at this offset (`MThd` or `MTrk`).
        expected: &'static str,
        /// The four bytes actually present.
        found: [u8; 4],
    },
    /// Fewer bytes remain in the buffer than the read requires.
    #[error("not enough data, needed {needed} bytes but {available} available")]
    TruncatedData {
        /// Bytes the read required.
        needed: usize,
        /// Bytes that were left.
        available: usize,
    },
    /// A variable-length quantity would exceed its 4-byte cap.
    #[error("variable-length quantity exceeds 4 bytes")]
    MalformedVlq,
    /// An event's declared payload extends past its track chunk's end.
    #[error("event data needs {needed} bytes but its track chunk has {available} left")]
    MalformedEvent {
        /// Bytes the event declared.
        needed: usize,
        /// Bytes remaining inside the chunk.
        available: usize,
    },
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True if the input ended before the read could complete.
    pub const fn is_truncation(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedData { .. })
    }

    /// Create a new truncated-data error
    pub const fn truncated(position: usize, needed: usize, available: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::TruncatedData { needed, available },
        }
    }

    /// Create a new bad-identifier error
    pub const fn bad_identifier(position: usize, expected: &'static str, found: [u8; 4]) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::BadIdentifier { expected, found },
        }
    }

    /// Rebase the error position by the offset of an enclosing byte range.
    ///
    /// Used when a chunk's payload is decoded through its own reader, so
    /// diagnostics still point into the whole file.
    pub(crate) const fn offset_by(mut self, base: usize) -> Self {
        self.position += base;
        self
    }

    /// Reinterpret a short read as a chunk-boundary overrun.
    ///
    /// Inside a fully captured track chunk, running out of bytes means an
    /// event's declared payload crossed the chunk's declared end.
    pub(crate) fn into_malformed_event(mut self) -> Self {
        if let ReaderErrorKind::TruncatedData { needed, available } = self.kind {
            self.kind = ReaderErrorKind::MalformedEvent { needed, available };
        }
        self
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
