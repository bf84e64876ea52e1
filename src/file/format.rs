use num_enum::FromPrimitive;

#[doc = r#"
The SMF format code from the header chunk.

Format 0 stores one multi-channel track, format 1 a set of simultaneous
tracks forming a single song, and format 2 a set of independent
sequences. Any other code is carried through in [`Format::Unknown`]
rather than rejected, so a caller can decide what to do with it.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Format {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
    /// A format code the SMF specification does not define.
    #[num_enum(catch_all)]
    Unknown(u16),
}

impl Format {
    /// The format code as it appeared in the header.
    pub const fn raw(&self) -> u16 {
        use Format::*;
        match self {
            SingleMultiChannel => 0,
            Simultaneous => 1,
            SequentiallyIndependent => 2,
            Unknown(code) => *code,
        }
    }

    /// True for formats 0 and 1, whose tracks form one logical sequence.
    ///
    /// A Sequence/Track Name meta event in the first track of such a file
    /// names the whole sequence rather than the track.
    pub const fn is_single_sequence(&self) -> bool {
        use Format::*;
        matches!(self, SingleMultiChannel | Simultaneous)
    }
}

#[test]
fn known_codes_map_to_variants() {
    use pretty_assertions::assert_eq;
    assert_eq!(Format::from(0u16), Format::SingleMultiChannel);
    assert_eq!(Format::from(1u16), Format::Simultaneous);
    assert_eq!(Format::from(2u16), Format::SequentiallyIndependent);
}

#[test]
fn unknown_codes_round_trip() {
    use pretty_assertions::assert_eq;
    let format = Format::from(7u16);
    assert_eq!(format, Format::Unknown(7));
    assert_eq!(format.raw(), 7);
    assert!(!format.is_single_sequence());
}
