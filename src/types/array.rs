//! Typed n-dimensional payloads read from datasets and attributes
//!
//! `ArrayData` keeps the element type of the source dataset so that a value
//! read from a container can be written back bit-for-bit. A zero-dimensional
//! array is a scalar.

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Array payload with the element type of its source
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(ArrayD<bool>),
    I8(ArrayD<i8>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    U32(ArrayD<u32>),
    U64(ArrayD<u64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
    Text(ArrayD<String>),
}

/// Apply the same expression to whichever typed array is held
macro_rules! each_variant {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            ArrayData::Bool($arr) => $body,
            ArrayData::I8($arr) => $body,
            ArrayData::I16($arr) => $body,
            ArrayData::I32($arr) => $body,
            ArrayData::I64($arr) => $body,
            ArrayData::U8($arr) => $body,
            ArrayData::U16($arr) => $body,
            ArrayData::U32($arr) => $body,
            ArrayData::U64($arr) => $body,
            ArrayData::F32($arr) => $body,
            ArrayData::F64($arr) => $body,
            ArrayData::Text($arr) => $body,
        }
    };
}

impl ArrayData {
    /// Shape of the payload; empty for scalars
    pub fn shape(&self) -> &[usize] {
        each_variant!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        each_variant!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_scalar(&self) -> bool {
        self.ndim() == 0
    }

    /// Short element-type name used in summaries (`f64`, `text`, ...)
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ArrayData::Bool(_) => "bool",
            ArrayData::I8(_) => "i8",
            ArrayData::I16(_) => "i16",
            ArrayData::I32(_) => "i32",
            ArrayData::I64(_) => "i64",
            ArrayData::U8(_) => "u8",
            ArrayData::U16(_) => "u16",
            ArrayData::U32(_) => "u32",
            ArrayData::U64(_) => "u64",
            ArrayData::F32(_) => "f32",
            ArrayData::F64(_) => "f64",
            ArrayData::Text(_) => "text",
        }
    }

    /// The string held by a text scalar (or single-element text array)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArrayData::Text(a) if a.len() == 1 => a.iter().next().map(String::as_str),
            _ => None,
        }
    }

    /// Scalar text value
    pub fn text(value: impl Into<String>) -> Self {
        ArrayData::Text(ArrayD::from_elem(IxDyn(&[]), value.into()))
    }
}

macro_rules! impl_from_elements {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$t>> for ArrayData {
                fn from(values: Vec<$t>) -> Self {
                    ArrayData::$variant(ndarray::Array1::from(values).into_dyn())
                }
            }

            impl From<ArrayD<$t>> for ArrayData {
                fn from(values: ArrayD<$t>) -> Self {
                    ArrayData::$variant(values)
                }
            }

            impl From<$t> for ArrayData {
                fn from(value: $t) -> Self {
                    ArrayData::$variant(ArrayD::from_elem(IxDyn(&[]), value))
                }
            }
        )*
    };
}

impl_from_elements!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Text,
);

impl From<&str> for ArrayData {
    fn from(value: &str) -> Self {
        ArrayData::text(value)
    }
}

impl std::fmt::Display for ArrayData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(text) = self.as_text() {
            return write!(f, "{}", text);
        }
        if self.is_scalar() {
            return each_variant!(self, a => match a.first() {
                Some(v) => write!(f, "{:?}", v),
                None => write!(f, "<empty>"),
            });
        }
        let dims: Vec<String> = self.shape().iter().map(|d| d.to_string()).collect();
        write!(f, "{}[{}]", self.dtype_name(), dims.join("x"))
    }
}

/// Serialises an array view as nested sequences, scalars as bare values
struct Nested<'a, T>(ArrayViewD<'a, T>);

impl<T: Serialize> Serialize for Nested<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.ndim() == 0 {
            return match self.0.first() {
                Some(value) => value.serialize(serializer),
                None => serializer.serialize_none(),
            };
        }
        let mut seq = serializer.serialize_seq(Some(self.0.len_of(ndarray::Axis(0))))?;
        for sub in self.0.outer_iter() {
            seq.serialize_element(&Nested(sub))?;
        }
        seq.end()
    }
}

impl Serialize for ArrayData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        each_variant!(self, a => Nested(a.view()).serialize(serializer))
    }
}
