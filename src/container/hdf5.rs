//! HDF5 file backend
//!
//! Element types are mapped one-to-one onto `ArrayData` variants so values
//! are read without conversion. Fixed and variable length strings both decode
//! to `String`. HDF5 cannot convert fixed-length strings to variable-length
//! ones, so fixed strings go through a fixed buffer at least as wide.

use super::{normalize, split_parent, Container, NodeKind};
use crate::errors::{LoaderError, LoaderResult};
use crate::types::ArrayData;
use hdf5::types::{
    FixedAscii, FixedUnicode, FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode,
};
use hdf5::{File, Location};
use ndarray::ArrayD;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read-only HDF5 file handle; closed on drop
pub struct Hdf5Container {
    file: File,
    path: PathBuf,
}

impl Hdf5Container {
    /// Open `path` read-only
    pub fn open(path: &Path) -> LoaderResult<Self> {
        let file = File::open(path)
            .map_err(|e| LoaderError::access(path.display().to_string(), e))?;
        debug!("Opened HDF5 container {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    fn access_error(&self, node: &str, err: impl ToString) -> LoaderError {
        LoaderError::access(
            format!("{}:{}", self.path.display(), node),
            err.to_string(),
        )
    }

    /// Run `f` against the group or dataset at `path`
    fn with_location<T>(
        &self,
        path: &str,
        f: impl FnOnce(&Location) -> hdf5::Result<T>,
    ) -> LoaderResult<T> {
        let path = normalize(path);
        let result = match self.kind(&path)? {
            NodeKind::Group => self.file.group(&path).and_then(|g| {
                let loc: &Location = &g;
                f(loc)
            }),
            NodeKind::Dataset => self.file.dataset(&path).and_then(|d| {
                let loc: &Location = &d;
                f(loc)
            }),
        };
        result.map_err(|e| self.access_error(&path, e))
    }
}

impl Container for Hdf5Container {
    fn kind(&self, path: &str) -> LoaderResult<NodeKind> {
        let path = normalize(path);
        let Some((parent, name)) = split_parent(&path) else {
            return Ok(NodeKind::Group);
        };
        let group = self
            .file
            .group(&parent)
            .map_err(|_| LoaderError::MissingPath(path.clone()))?;
        if !group.link_exists(&name) {
            return Err(LoaderError::MissingPath(path));
        }
        if group.group(&name).is_ok() {
            Ok(NodeKind::Group)
        } else if group.dataset(&name).is_ok() {
            Ok(NodeKind::Dataset)
        } else {
            Err(self.access_error(&path, "link is neither a group nor a dataset"))
        }
    }

    fn member_names(&self, path: &str) -> LoaderResult<Vec<String>> {
        let path = normalize(path);
        let mut names = self
            .file
            .group(&path)
            .and_then(|g| g.member_names())
            .map_err(|e| self.access_error(&path, e))?;
        names.sort();
        Ok(names)
    }

    fn read(&self, path: &str) -> LoaderResult<ArrayData> {
        let path = normalize(path);
        self.file
            .dataset(&path)
            .and_then(|ds| read_array(&ds))
            .map_err(|e| self.access_error(&path, e))
    }

    fn attr_names(&self, path: &str) -> LoaderResult<Vec<String>> {
        self.with_location(path, |loc| loc.attr_names())
    }

    fn attr(&self, path: &str, name: &str) -> LoaderResult<Option<ArrayData>> {
        self.with_location(path, |loc| {
            if !loc.attr_names()?.iter().any(|n| n == name) {
                return Ok(None);
            }
            let attr = loc.attr(name)?;
            read_array(&attr).map(Some)
        })
    }
}

/// Read a dataset or attribute payload with its stored element type
fn read_array(source: &hdf5::Container) -> hdf5::Result<ArrayData> {
    let descriptor = source.dtype()?.to_descriptor()?;
    let data = match descriptor {
        TypeDescriptor::Integer(IntSize::U1) => ArrayData::I8(source.read_dyn::<i8>()?),
        TypeDescriptor::Integer(IntSize::U2) => ArrayData::I16(source.read_dyn::<i16>()?),
        TypeDescriptor::Integer(IntSize::U4) => ArrayData::I32(source.read_dyn::<i32>()?),
        TypeDescriptor::Integer(IntSize::U8) => ArrayData::I64(source.read_dyn::<i64>()?),
        TypeDescriptor::Unsigned(IntSize::U1) => ArrayData::U8(source.read_dyn::<u8>()?),
        TypeDescriptor::Unsigned(IntSize::U2) => ArrayData::U16(source.read_dyn::<u16>()?),
        TypeDescriptor::Unsigned(IntSize::U4) => ArrayData::U32(source.read_dyn::<u32>()?),
        TypeDescriptor::Unsigned(IntSize::U8) => ArrayData::U64(source.read_dyn::<u64>()?),
        TypeDescriptor::Float(FloatSize::U4) => ArrayData::F32(source.read_dyn::<f32>()?),
        TypeDescriptor::Float(FloatSize::U8) => ArrayData::F64(source.read_dyn::<f64>()?),
        TypeDescriptor::Boolean => ArrayData::Bool(source.read_dyn::<bool>()?),
        TypeDescriptor::VarLenUnicode => ArrayData::Text(
            source
                .read_dyn::<VarLenUnicode>()?
                .map(|s| s.as_str().to_string()),
        ),
        TypeDescriptor::VarLenAscii => ArrayData::Text(
            source
                .read_dyn::<VarLenAscii>()?
                .map(|s| s.as_str().to_string()),
        ),
        TypeDescriptor::FixedAscii(len) => ArrayData::Text(read_fixed_text(source, len, false)?),
        TypeDescriptor::FixedUnicode(len) => ArrayData::Text(read_fixed_text(source, len, true)?),
        other => {
            return Err(hdf5::Error::from(format!(
                "unsupported element type: {:?}",
                other
            )))
        }
    };
    Ok(data)
}

/// Largest fixed-length string element the reader accepts, in bytes
pub const MAX_FIXED_STRING_LEN: usize = 65536;

/// Read a fixed-length string payload of `len` bytes per element
fn read_fixed_text(
    source: &hdf5::Container,
    len: usize,
    unicode: bool,
) -> hdf5::Result<ArrayD<String>> {
    match len {
        0..=16 => read_fixed::<16>(source, unicode),
        17..=64 => read_fixed::<64>(source, unicode),
        65..=256 => read_fixed::<256>(source, unicode),
        257..=1024 => read_fixed::<1024>(source, unicode),
        1025..=8192 => read_fixed::<8192>(source, unicode),
        8193..=MAX_FIXED_STRING_LEN => read_fixed::<MAX_FIXED_STRING_LEN>(source, unicode),
        _ => Err(hdf5::Error::from(format!(
            "fixed-length string of {} bytes exceeds {} byte limit",
            len, MAX_FIXED_STRING_LEN
        ))),
    }
}

fn read_fixed<const N: usize>(
    source: &hdf5::Container,
    unicode: bool,
) -> hdf5::Result<ArrayD<String>> {
    if unicode {
        Ok(source
            .read_dyn::<FixedUnicode<N>>()?
            .map(|s| s.as_str().to_string()))
    } else {
        Ok(source
            .read_dyn::<FixedAscii<N>>()?
            .map(|s| s.as_str().to_string()))
    }
}
