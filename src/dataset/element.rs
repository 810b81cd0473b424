use half::{bf16, f16};

use super::DataType;

/// A Rust scalar type usable as a typed view of dataset elements.
///
/// The `Pod` bound means element views are bit reinterpretations of the
/// underlying buffer, never numeric conversions: writing `i32` elements into a
/// [`Float32`](DataType::Float32) dataset stores the integer bit patterns
/// verbatim.
pub trait Element: bytemuck::Pod {
    /// The data type describing this element's bit layout.
    const DATA_TYPE: DataType;
}

impl Element for i8 {
    const DATA_TYPE: DataType = DataType::Int8;
}

impl Element for i16 {
    const DATA_TYPE: DataType = DataType::Int16;
}

impl Element for i32 {
    const DATA_TYPE: DataType = DataType::Int32;
}

impl Element for i64 {
    const DATA_TYPE: DataType = DataType::Int64;
}

impl Element for u8 {
    const DATA_TYPE: DataType = DataType::UInt8;
}

impl Element for u16 {
    const DATA_TYPE: DataType = DataType::UInt16;
}

impl Element for u32 {
    const DATA_TYPE: DataType = DataType::UInt32;
}

impl Element for u64 {
    const DATA_TYPE: DataType = DataType::UInt64;
}

impl Element for f16 {
    const DATA_TYPE: DataType = DataType::Float16;
}

impl Element for f32 {
    const DATA_TYPE: DataType = DataType::Float32;
}

impl Element for f64 {
    const DATA_TYPE: DataType = DataType::Float64;
}

impl Element for bf16 {
    const DATA_TYPE: DataType = DataType::BFloat16;
}
