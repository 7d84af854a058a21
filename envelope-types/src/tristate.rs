//! three-valued boolean flags

/// A boolean flag that distinguishes "never computed" from `false`.
///
/// Flags are packed four to a byte on the wire, two bits each, in declaration
/// order starting at the low bits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriState {
    /// The flag was never set.
    #[default]
    Absent,
    False,
    True,
}

impl TriState {
    /// The width of one packed flag, in bits.
    pub const BIT_LEN: usize = 2;

    /// Encode this flag as its two-bit wire representation.
    pub const fn to_bits(self) -> u8 {
        match self {
            TriState::Absent => 0b00,
            TriState::False => 0b01,
            TriState::True => 0b10,
        }
    }

    /// Decode a flag from the low two bits of `bits`.
    ///
    /// The writer never produces `0b11`; if it shows up anyway it decodes as
    /// `Absent`, so a corrupt byte can never read back as `True`.
    pub const fn from_bits(bits: u8) -> TriState {
        match bits & 0b11 {
            0b01 => TriState::False,
            0b10 => TriState::True,
            _ => TriState::Absent,
        }
    }

    /// The number of bytes needed to pack `n` flags.
    pub const fn packed_len(n: usize) -> usize {
        n.div_ceil(4)
    }
}

impl From<Option<bool>> for TriState {
    fn from(src: Option<bool>) -> TriState {
        match src {
            None => TriState::Absent,
            Some(false) => TriState::False,
            Some(true) => TriState::True,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(src: TriState) -> Option<bool> {
        match src {
            TriState::Absent => None,
            TriState::False => Some(false),
            TriState::True => Some(true),
        }
    }
}
