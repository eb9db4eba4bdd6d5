use std::fmt::{self, Debug};

use ndarray::{Array, Array1, Array2, ArrayD, ArrayView};

use crate::codec::{self, RawBuffer};
use crate::hl::storage::{ObjectInfo, Storage};
use crate::internal_prelude::*;

/// Where a container lives inside its storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Dataset { name: String },
    Attribute { owner: String, name: String },
}

/// Shared part of datasets and attributes: a typed, shaped blob of elements.
#[derive(Clone)]
pub struct Container<'a> {
    storage: &'a dyn Storage,
    kind: ContainerKind,
    info: ObjectInfo,
}

impl Debug for Container<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ContainerKind::Dataset { ref name } => {
                write!(f, "<dataset {:?}: {} {}>", name, self.info.space, self.info.dtype)
            }
            ContainerKind::Attribute { ref owner, ref name } => write!(
                f,
                "<attribute {:?} of {:?}: {} {}>",
                name, owner, self.info.space, self.info.dtype
            ),
        }
    }
}

impl<'a> Container<'a> {
    pub(crate) fn new(storage: &'a dyn Storage, kind: ContainerKind, info: ObjectInfo) -> Self {
        Self { storage, kind, info }
    }

    pub(crate) fn storage(&self) -> &'a dyn Storage {
        self.storage
    }

    pub fn kind(&self) -> &ContainerKind {
        &self.kind
    }

    /// Name of the dataset or attribute itself.
    pub fn name(&self) -> &str {
        match self.kind {
            ContainerKind::Dataset { ref name } | ContainerKind::Attribute { ref name, .. } => name,
        }
    }

    pub fn is_attr(&self) -> bool {
        matches!(self.kind, ContainerKind::Attribute { .. })
    }

    /// Returns the stored datatype.
    pub fn dtype(&self) -> &TypeDescriptor {
        &self.info.dtype
    }

    pub fn space(&self) -> &Dataspace {
        &self.info.space
    }

    pub fn shape(&self) -> Vec<Ix> {
        self.info.space.shape()
    }

    pub fn ndim(&self) -> usize {
        self.info.space.ndim()
    }

    /// Number of elements (one for scalars).
    pub fn size(&self) -> usize {
        self.info.space.size()
    }

    pub fn is_scalar(&self) -> bool {
        self.info.space.is_scalar()
    }

    /// Size in bytes of the stored element buffer.
    pub fn storage_size(&self) -> usize {
        self.info.byte_size()
    }

    pub fn as_reader(&self) -> Reader {
        Reader::new(self)
    }

    pub fn as_writer(&self) -> Writer {
        Writer::new(self)
    }

    pub fn read_buffer(&self) -> Result<RawBuffer> {
        self.as_reader().read_buffer()
    }

    pub fn read_values(&self) -> Result<Vec<Value>> {
        self.as_reader().read_values()
    }

    pub fn read<T: H5Type, D: ndarray::Dimension>(&self) -> Result<Array<T, D>> {
        self.as_reader().read()
    }

    pub fn read_raw<T: H5Type>(&self) -> Result<Vec<T>> {
        self.as_reader().read_raw()
    }

    pub fn read_1d<T: H5Type>(&self) -> Result<Array1<T>> {
        self.as_reader().read_1d()
    }

    pub fn read_2d<T: H5Type>(&self) -> Result<Array2<T>> {
        self.as_reader().read_2d()
    }

    pub fn read_dyn<T: H5Type>(&self) -> Result<ArrayD<T>> {
        self.as_reader().read_dyn()
    }

    pub fn read_scalar<T: H5Type>(&self) -> Result<T> {
        self.as_reader().read_scalar()
    }

    pub fn write<'b, A, T, D>(&self, arr: A) -> Result<()>
    where
        A: Into<ArrayView<'b, T, D>>,
        T: H5Type,
        D: ndarray::Dimension,
    {
        self.as_writer().write(arr)
    }

    pub fn write_raw<T: H5Type>(&self, data: &[T]) -> Result<()> {
        self.as_writer().write_raw(data)
    }

    pub fn write_scalar<T: H5Type>(&self, val: &T) -> Result<()> {
        self.as_writer().write_scalar(val)
    }

    pub fn write_values(&self, values: &[Value]) -> Result<()> {
        self.as_writer().write_values(values)
    }
}

#[derive(Debug)]
pub struct Reader<'a> {
    obj: &'a Container<'a>,
}

impl<'a> Reader<'a> {
    /// Creates a reader for a dataset/attribute.
    pub fn new(obj: &'a Container<'a>) -> Self {
        Self { obj }
    }

    /// Reads the encoded element buffer as stored.
    pub fn read_buffer(&self) -> Result<RawBuffer> {
        match self.obj.kind {
            ContainerKind::Dataset { ref name } => self.obj.storage.read_dataset(name),
            ContainerKind::Attribute { ref owner, ref name } => {
                self.obj.storage.read_attribute(owner, name)
            }
        }
    }

    /// Reads all elements as dynamic values in memory order.
    pub fn read_values(&self) -> Result<Vec<Value>> {
        codec::decode(&self.obj.info.dtype, &self.read_buffer()?)
    }

    /// Reads a dataset/attribute into an n-dimensional array.
    ///
    /// If the array has a fixed number of dimensions, it must match the dimensionality
    /// of the dataset/attribute.
    pub fn read<T: H5Type, D: ndarray::Dimension>(&self) -> Result<Array<T, D>> {
        let shape = self.obj.shape();
        if let Some(ndim) = D::NDIM {
            let obj_ndim = shape.len();
            ensure!(obj_ndim == ndim, "ndim mismatch: expected {}, got {}", ndim, obj_ndim);
        }
        let vec = self.read_raw()?;
        let arr = ArrayD::from_shape_vec(shape, vec)?;
        Ok(arr.into_dimensionality()?)
    }

    /// Reads a dataset/attribute into a vector in memory order.
    pub fn read_raw<T: H5Type>(&self) -> Result<Vec<T>> {
        let values = self.read_values()?;
        Ok(values.iter().map(T::from_value).collect::<Result<_, _>>()?)
    }

    /// Reads a dataset/attribute into a 1-dimensional array.
    ///
    /// The dataset/attribute must be 1-dimensional.
    pub fn read_1d<T: H5Type>(&self) -> Result<Array1<T>> {
        self.read()
    }

    /// Reads a dataset/attribute into a 2-dimensional array.
    ///
    /// The dataset/attribute must be 2-dimensional.
    pub fn read_2d<T: H5Type>(&self) -> Result<Array2<T>> {
        self.read()
    }

    /// Reads a dataset/attribute into an array with dynamic number of dimensions.
    pub fn read_dyn<T: H5Type>(&self) -> Result<ArrayD<T>> {
        self.read()
    }

    /// Reads a scalar dataset/attribute.
    pub fn read_scalar<T: H5Type>(&self) -> Result<T> {
        let obj_ndim = self.obj.ndim();
        ensure!(obj_ndim == 0, "ndim mismatch: expected scalar, got {}", obj_ndim);
        match self.read_values()?.first() {
            Some(value) => Ok(T::from_value(value)?),
            None => fail!("scalar {:?} holds no value", self.obj.name()),
        }
    }
}

#[derive(Debug)]
pub struct Writer<'a> {
    obj: &'a Container<'a>,
}

impl<'a> Writer<'a> {
    /// Creates a writer for a dataset/attribute.
    pub fn new(obj: &'a Container<'a>) -> Self {
        Self { obj }
    }

    /// Replaces the stored buffer; its length must match the container exactly.
    pub fn write_buffer(&self, raw: RawBuffer) -> Result<()> {
        match self.obj.kind {
            ContainerKind::Dataset { ref name } => self.obj.storage.write_dataset(name, raw),
            ContainerKind::Attribute { ref owner, ref name } => {
                self.obj.storage.write_attribute(owner, name, raw)
            }
        }
    }

    /// Encodes and writes one value per element in memory order.
    pub fn write_values(&self, values: &[Value]) -> Result<()> {
        let size = self.obj.size();
        ensure!(
            values.len() == size,
            "shape mismatch when writing: expected {} elements, got {}",
            size,
            values.len()
        );
        let raw = codec::encode(&self.obj.info.dtype, values)?;
        self.write_buffer(raw)
    }

    /// Writes an n-dimensional array view into a dataset/attribute.
    ///
    /// The shape of the view must match the shape of the dataset/attribute exactly.
    pub fn write<'b, A, T, D>(&self, arr: A) -> Result<()>
    where
        A: Into<ArrayView<'b, T, D>>,
        T: H5Type,
        D: ndarray::Dimension,
    {
        let view = arr.into();
        let src = view.shape();
        let dst = self.obj.shape();
        if src.is_empty() && dst.is_empty() {
            ensure!(view.len() == 1, "expected a single element for a scalar");
        } else {
            ensure!(
                src == dst.as_slice(),
                "shape mismatch when writing: memory = {:?}, destination = {:?}",
                src,
                dst
            );
        }
        let values: Vec<Value> = view.iter().map(H5Type::to_value).collect();
        self.write_values(&values)
    }

    /// Writes a slice of elements in memory order; its length must match the container size.
    pub fn write_raw<T: H5Type>(&self, data: &[T]) -> Result<()> {
        let values: Vec<Value> = data.iter().map(H5Type::to_value).collect();
        self.write_values(&values)
    }

    /// Writes a scalar dataset/attribute.
    pub fn write_scalar<T: H5Type>(&self, val: &T) -> Result<()> {
        let ndim = self.obj.ndim();
        ensure!(ndim == 0, "ndim mismatch: expected scalar, got {}", ndim);
        self.write_values(&[val.to_value()])
    }
}
