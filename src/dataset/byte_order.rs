use derive_more::Display;

use super::DataType;

/// The byte order requested for a dataset at creation, or for an in-memory
/// view of its elements.
///
/// `Native` is a request-time convenience: it is resolved to the concrete
/// order of the executing machine ([`NATIVE_ENDIAN`]) before anything is
/// persisted, so a stored dataset always reports a concrete [`Endianness`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum ByteOrder {
    /// The byte order of the executing machine.
    #[display("native")]
    Native,
    /// Little endian, regardless of platform.
    #[display("little")]
    Little,
    /// Big endian, regardless of platform.
    #[display("big")]
    Big,
}

impl ByteOrder {
    /// Resolve to the concrete byte order this tag denotes on the executing machine.
    #[must_use]
    pub const fn resolve(self) -> Endianness {
        match self {
            Self::Native => NATIVE_ENDIAN,
            Self::Little => Endianness::Little,
            Self::Big => Endianness::Big,
        }
    }
}

impl From<Endianness> for ByteOrder {
    fn from(endianness: Endianness) -> Self {
        match endianness {
            Endianness::Little => Self::Little,
            Endianness::Big => Self::Big,
        }
    }
}

/// The concrete byte order of each element in a stored dataset, either `big`
/// or `little`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum Endianness {
    /// Little endian.
    #[display("little")]
    Little,
    /// Big endian.
    #[display("big")]
    Big,
}

impl Endianness {
    /// Return true if the endianness matches the endianness of the CPU.
    #[must_use]
    pub fn is_native(self) -> bool {
        self == NATIVE_ENDIAN
    }
}

impl serde::Serialize for Endianness {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Little => s.serialize_str("little"),
            Self::Big => s.serialize_str("big"),
        }
    }
}

impl<'de> serde::Deserialize<'de> for Endianness {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(d)?;
        if let serde_json::Value::String(string) = value {
            if string == "little" {
                return Ok(Self::Little);
            } else if string == "big" {
                return Ok(Self::Big);
            }
        }
        Err(serde::de::Error::custom(
            "byte_order: a string equal to either \"big\" or \"little\"",
        ))
    }
}

/// The endianness of the CPU.
pub const NATIVE_ENDIAN: Endianness = if cfg!(target_endian = "big") {
    Endianness::Big
} else {
    Endianness::Little
};

/// Reverse the byte order of each element of `v`, an array of elements of `data_type`.
pub(crate) fn reverse_endianness(v: &mut [u8], data_type: &DataType) {
    match data_type {
        DataType::Int8 | DataType::UInt8 => {}
        DataType::Int16 | DataType::UInt16 | DataType::Float16 | DataType::BFloat16 => {
            let swap = |chunk: &mut [u8]| {
                let bytes = u16::from_ne_bytes(chunk.try_into().unwrap());
                chunk.copy_from_slice(bytes.swap_bytes().to_ne_bytes().as_slice());
            };
            v.chunks_exact_mut(2).for_each(swap);
        }
        DataType::Int32 | DataType::UInt32 | DataType::Float32 => {
            let swap = |chunk: &mut [u8]| {
                let bytes = u32::from_ne_bytes(chunk.try_into().unwrap());
                chunk.copy_from_slice(bytes.swap_bytes().to_ne_bytes().as_slice());
            };
            v.chunks_exact_mut(4).for_each(swap);
        }
        DataType::Int64 | DataType::UInt64 | DataType::Float64 => {
            let swap = |chunk: &mut [u8]| {
                let bytes = u64::from_ne_bytes(chunk.try_into().unwrap());
                chunk.copy_from_slice(bytes.swap_bytes().to_ne_bytes().as_slice());
            };
            v.chunks_exact_mut(8).for_each(swap);
        }
    }
}
