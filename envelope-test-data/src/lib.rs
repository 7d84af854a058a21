//! test data shared between the envelope crates.

pub mod lebuffer;

/// A raw `CssFontInfo` envelope: `("serif", "400", "0")`.
#[rustfmt::skip]
pub static CSS_FONT_INFO_SIMPLE: &[u8] = &[
    0x05, 0x00, 0x00, 0x00,             // font_family length 5
    b's', b'e', b'r', b'i', b'f',
    0x03, 0x00, 0x00, 0x00,             // font_weight length 3
    b'4', b'0', b'0',
    0x01, 0x00, 0x00, 0x00,             // italic_angle length 1
    b'0',
];
