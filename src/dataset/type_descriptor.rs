use derive_more::Display;

use super::{ByteOrder, DataType, Endianness};

/// A scalar element type: a logical [`DataType`] paired with a [`ByteOrder`].
///
/// Describes either the on-disk representation of a dataset or an in-memory
/// view supplied to [`write`](super::Dataset::write) / [`read`](super::Dataset::read).
///
/// Equality is *layout* equality: two descriptors are equal iff their data
/// types and widths match and their byte orders, after resolving any `Native`
/// tag to the order of the executing machine, are identical. A native-tagged
/// descriptor therefore equals its resolved concrete form.
#[derive(Copy, Clone, Debug, Display)]
#[display("{data_type} ({order} endian)")]
pub struct TypeDescriptor {
    data_type: DataType,
    order: ByteOrder,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    #[must_use]
    pub const fn new(data_type: DataType, order: ByteOrder) -> Self {
        Self { data_type, order }
    }

    /// Create a new type descriptor in the byte order of the executing machine.
    #[must_use]
    pub const fn native(data_type: DataType) -> Self {
        Self::new(data_type, ByteOrder::Native)
    }

    /// Create a new little endian type descriptor.
    #[must_use]
    pub const fn little(data_type: DataType) -> Self {
        Self::new(data_type, ByteOrder::Little)
    }

    /// Create a new big endian type descriptor.
    #[must_use]
    pub const fn big(data_type: DataType) -> Self {
        Self::new(data_type, ByteOrder::Big)
    }

    /// The logical data type.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The byte order as requested, which may be `Native`.
    #[must_use]
    pub const fn order(&self) -> ByteOrder {
        self.order
    }

    /// The size in bytes of an element of this type.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.data_type.size()
    }

    /// The concrete byte order this descriptor denotes on the executing machine.
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.order.resolve()
    }

    /// This descriptor with any `Native` order tag rewritten to the concrete
    /// order of the executing machine.
    #[must_use]
    pub const fn resolved(&self) -> Self {
        Self {
            data_type: self.data_type,
            order: match self.order.resolve() {
                Endianness::Little => ByteOrder::Little,
                Endianness::Big => ByteOrder::Big,
            },
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type
            && self.size() == other.size()
            && self.endianness() == other.endianness()
    }
}

impl Eq for TypeDescriptor {}
