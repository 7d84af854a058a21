//! types for working with raw little-endian bytes

/// A trait for envelope scalars.
///
/// This is an internal trait for encoding and decoding little-endian bytes.
/// Everything a transfer envelope stores crosses the wire in little-endian
/// order, so this trait has no big-endian counterpart.
///
/// You do not need to implement this trait directly; it is an implemention
/// detail of the [`LittleEndian`] wrapper.
pub trait Scalar: Sized {
    /// The raw byte representation of this type.
    ///
    /// This is always a byte array; the extra bounds let the wrapper derive
    /// its comparison traits.
    type Raw: Copy + AsRef<[u8]> + PartialEq + Eq + std::hash::Hash;

    /// Create an instance of this type from raw little-endian bytes.
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw little-endian bytes.
    fn to_raw(self) -> Self::Raw;

    /// Attempt to read a scalar from the front of a slice.
    ///
    /// Returns `None` if `slice.len() < Self::RAW_BYTE_LEN`.
    fn read(slice: &[u8]) -> Option<Self>;
}

/// A trait for types with a known, constant size.
pub trait FixedSize: Sized {
    /// The raw size of this type, in bytes.
    const RAW_BYTE_LEN: usize;
}

/// A wrapper around raw little-endian bytes for some type.
///
/// This always has an alignment of 1, which makes it possible to cheaply
/// reinterpret regions of an envelope as slices of typed values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct LittleEndian<T: Scalar>(pub(crate) T::Raw);

// # SAFETY:
//
// `LittleEndian<T>` has the bound `T: Scalar`, and contains only a single
// value, `<T as Scalar>::Raw`, which is only ever a byte array.
#[cfg(feature = "bytemuck")]
unsafe impl<T> bytemuck::Zeroable for LittleEndian<T> where T: Scalar + Copy {}
#[cfg(feature = "bytemuck")]
unsafe impl<T> bytemuck::AnyBitPattern for LittleEndian<T> where T: Scalar + Copy + 'static {}

impl<T: Scalar> LittleEndian<T> {
    /// construct a new `LittleEndian<T>` from raw bytes
    pub fn new(raw: T::Raw) -> LittleEndian<T> {
        LittleEndian(raw)
    }

    /// Read a copy of this type from the raw bytes.
    #[inline(always)]
    pub fn get(self) -> T {
        T::from_raw(self.0)
    }

    /// Set the value, overwriting the bytes.
    pub fn set(&mut self, value: T) {
        self.0 = value.to_raw();
    }

    /// Get the raw little-endian bytes.
    pub fn le_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: Scalar> From<T> for LittleEndian<T> {
    #[inline]
    fn from(val: T) -> Self {
        LittleEndian(val.to_raw())
    }
}

impl<T: Scalar + Default> Default for LittleEndian<T> {
    fn default() -> Self {
        Self::from(T::default())
    }
}

// NOTE: due to the orphan rules, we cannot impl the inverse of this, e.g.
// impl<T> PartialEq<LittleEndian<T>> for T (<https://doc.rust-lang.org/error_codes/E0210.html>)
impl<T: Scalar + Copy + PartialEq> PartialEq<T> for LittleEndian<T> {
    fn eq(&self, other: &T) -> bool {
        self.get() == *other
    }
}

impl<T: std::fmt::Debug + Scalar + Copy> std::fmt::Debug for LittleEndian<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

impl<T: std::fmt::Display + Scalar + Copy> std::fmt::Display for LittleEndian<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

macro_rules! le_scalar {
    ($ty:ty, $len:literal) => {
        impl Scalar for $ty {
            type Raw = [u8; $len];

            fn to_raw(self) -> Self::Raw {
                self.to_le_bytes()
            }

            fn from_raw(raw: Self::Raw) -> Self {
                Self::from_le_bytes(raw)
            }

            fn read(slice: &[u8]) -> Option<Self> {
                slice
                    .get(..$len)
                    .and_then(|bytes| bytes.try_into().ok())
                    .map(Self::from_raw)
            }
        }

        impl FixedSize for $ty {
            const RAW_BYTE_LEN: usize = $len;
        }
    };
}

le_scalar!(u8, 1);
le_scalar!(i8, 1);
le_scalar!(u16, 2);
le_scalar!(i16, 2);
le_scalar!(u32, 4);
le_scalar!(i32, 4);
le_scalar!(u64, 8);
le_scalar!(i64, 8);
le_scalar!(f32, 4);
le_scalar!(f64, 8);

impl<T: Scalar + FixedSize> FixedSize for LittleEndian<T> {
    const RAW_BYTE_LEN: usize = T::RAW_BYTE_LEN;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_get_set() {
        let mut val = LittleEndian::from(0x1234_5678u32);
        assert_eq!(val.le_bytes(), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(val.get(), 0x1234_5678);
        val.set(7);
        assert_eq!(val.get(), 7);
    }

    #[test]
    fn read_checks_bounds() {
        assert_eq!(u32::read(&[1, 0, 0]), None);
        assert_eq!(u32::read(&[1, 0, 0, 0, 9]), Some(1));
        assert_eq!(f64::read(&2.5f64.to_le_bytes()), Some(2.5));
    }
}
