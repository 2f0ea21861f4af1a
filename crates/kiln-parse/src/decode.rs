use std::fmt;

/// Byte order of a multi-byte value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

/// Fixed-width values read by [`BinaryParser::read`](crate::BinaryParser::read).
pub trait Decode: Sized {
    /// Number of bytes a value occupies.
    const WIDTH: usize;

    /// `None` unless `bytes` is exactly [`WIDTH`](Self::WIDTH) long.
    fn decode(bytes: &[u8], endian: Endian) -> Option<Self>;

    fn encode(self, endian: Endian) -> Vec<u8>;
}

macro_rules! impl_decode {
    ($($ty:ty),* $(,)?) => {$(
        impl Decode for $ty {
            const WIDTH: usize = size_of::<$ty>();

            #[inline]
            fn decode(bytes: &[u8], endian: Endian) -> Option<Self> {
                let bytes = bytes.try_into().ok()?;
                Some(match endian {
                    Endian::Little => <$ty>::from_le_bytes(bytes),
                    Endian::Big => <$ty>::from_be_bytes(bytes),
                })
            }

            #[inline]
            fn encode(self, endian: Endian) -> Vec<u8> {
                match endian {
                    Endian::Little => self.to_le_bytes().to_vec(),
                    Endian::Big => self.to_be_bytes().to_vec(),
                }
            }
        }
    )*};
}

impl_decode!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Character encodings for fixed-length strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    Ascii,
    Latin1,
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Latin1 => "Latin-1",
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
        }
    }

    /// `None` when `bytes` is not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Ascii => bytes.is_ascii().then(|| bytes.iter().copied().map(char::from).collect()),
            Self::Latin1 => Some(bytes.iter().copied().map(char::from).collect()),
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Self::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }

    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
