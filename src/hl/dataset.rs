use std::fmt::{self, Debug};
use std::ops::Deref;

use ndarray::ArrayView;

use crate::hl::attribute::{Attribute, AttributeBuilder, AttributeBuilderEmpty};
use crate::hl::container::{Container, ContainerKind};
use crate::hl::storage::{normalize_name, Storage};
use crate::internal_prelude::*;

/// Represents a dataset stored in some [`Storage`].
#[derive(Clone)]
pub struct Dataset<'a>(Container<'a>);

impl Debug for Dataset<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<'a> Deref for Dataset<'a> {
    type Target = Container<'a>;

    fn deref(&self) -> &Container<'a> {
        &self.0
    }
}

impl<'a> Dataset<'a> {
    /// Opens an existing dataset by name.
    pub fn open(storage: &'a dyn Storage, name: &str) -> Result<Self> {
        let name = normalize_name(name)?;
        let info = storage.dataset_info(name)?;
        let kind = ContainerKind::Dataset { name: name.to_owned() };
        Ok(Self(Container::new(storage, kind, info)))
    }

    /// Opens an attribute attached to this dataset.
    pub fn attr(&self, name: &str) -> Result<Attribute<'a>> {
        Attribute::open(self.storage(), self.name(), name)
    }

    /// Returns names of all attributes attached to this dataset, sorted.
    pub fn attr_names(&self) -> Result<Vec<String>> {
        self.storage().attr_names(self.name())
    }

    pub fn new_attr<T: H5Type>(&self) -> AttributeBuilderEmpty<'a> {
        self.new_attr_builder().empty::<T>()
    }

    pub fn new_attr_builder(&self) -> AttributeBuilder<'a> {
        AttributeBuilder::new(self.storage(), self.name())
    }

    /// Returns an object reference pointing at this dataset.
    pub fn reference(&self) -> Result<ObjectReference> {
        self.storage().reference(self.name())
    }
}

#[derive(Clone)]
/// A dataset builder
pub struct DatasetBuilder<'a> {
    builder: DatasetBuilderInner<'a>,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { builder: DatasetBuilderInner::new(storage) }
    }

    pub fn empty<T: H5Type>(self) -> DatasetBuilderEmpty<'a> {
        self.empty_as(&T::type_descriptor())
    }

    pub fn empty_as(self, type_desc: &TypeDescriptor) -> DatasetBuilderEmpty<'a> {
        DatasetBuilderEmpty { builder: self.builder, type_desc: type_desc.clone() }
    }

    pub fn with_data<'d, A, T, D>(self, data: A) -> DatasetBuilderData<'a, 'd, T, D>
    where
        A: Into<ArrayView<'d, T, D>>,
        T: H5Type,
        D: ndarray::Dimension,
    {
        self.with_data_as::<A, T, D>(data, &T::type_descriptor())
    }

    /// Like `with_data`, but stores elements as `type_desc` (e.g. a wider integer).
    pub fn with_data_as<'d, A, T, D>(
        self, data: A, type_desc: &TypeDescriptor,
    ) -> DatasetBuilderData<'a, 'd, T, D>
    where
        A: Into<ArrayView<'d, T, D>>,
        T: H5Type,
        D: ndarray::Dimension,
    {
        DatasetBuilderData { builder: self.builder, data: data.into(), type_desc: type_desc.clone() }
    }

    /// Scalar dataset holding a single value.
    pub fn with_scalar<T: H5Type>(self, value: &T) -> DatasetBuilderValues<'a> {
        self.with_values(&T::type_descriptor(), (), vec![value.to_value()])
    }

    /// Dataset built from dynamic values, for types only known at runtime.
    pub fn with_values<S: Into<Dataspace>>(
        self, type_desc: &TypeDescriptor, shape: S, values: Vec<Value>,
    ) -> DatasetBuilderValues<'a> {
        DatasetBuilderValues {
            builder: self.builder,
            type_desc: type_desc.clone(),
            space: shape.into(),
            values,
        }
    }

    /// Stores compound types without padding between fields.
    #[must_use]
    pub fn packed(mut self, packed: bool) -> Self {
        self.builder.packed = packed;
        self
    }
}

#[derive(Clone)]
/// A dataset builder with the type known
pub struct DatasetBuilderEmpty<'a> {
    builder: DatasetBuilderInner<'a>,
    type_desc: TypeDescriptor,
}

impl<'a> DatasetBuilderEmpty<'a> {
    pub fn shape<S: Into<Dataspace>>(self, space: S) -> DatasetBuilderEmptyShape<'a> {
        DatasetBuilderEmptyShape {
            builder: self.builder,
            type_desc: self.type_desc,
            space: space.into(),
        }
    }

    pub fn create(self, name: &str) -> Result<Dataset<'a>> {
        self.shape(()).create(name)
    }

    #[must_use]
    pub fn packed(mut self, packed: bool) -> Self {
        self.builder.packed = packed;
        self
    }
}

#[derive(Clone)]
/// A dataset builder with type and shape known
pub struct DatasetBuilderEmptyShape<'a> {
    builder: DatasetBuilderInner<'a>,
    type_desc: TypeDescriptor,
    space: Dataspace,
}

impl<'a> DatasetBuilderEmptyShape<'a> {
    pub fn create(&self, name: &str) -> Result<Dataset<'a>> {
        self.builder.create(&self.type_desc, name, &self.space)
    }
}

#[derive(Clone)]
/// A dataset builder with type, shape, and data known
pub struct DatasetBuilderData<'a, 'd, T, D> {
    builder: DatasetBuilderInner<'a>,
    data: ArrayView<'d, T, D>,
    type_desc: TypeDescriptor,
}

impl<'a, 'd, T, D> DatasetBuilderData<'a, 'd, T, D>
where
    T: H5Type,
    D: ndarray::Dimension,
{
    pub fn create(&self, name: &str) -> Result<Dataset<'a>> {
        let space = Dataspace::from(self.data.shape());
        let ds = self.builder.create(&self.type_desc, name, &space)?;
        if let Err(err) = ds.write(self.data.view()) {
            self.builder.try_unlink(name);
            Err(err)
        } else {
            Ok(ds)
        }
    }

    #[must_use]
    pub fn packed(mut self, packed: bool) -> Self {
        self.builder.packed = packed;
        self
    }
}

#[derive(Clone)]
/// A dataset builder with dynamic values known
pub struct DatasetBuilderValues<'a> {
    builder: DatasetBuilderInner<'a>,
    type_desc: TypeDescriptor,
    space: Dataspace,
    values: Vec<Value>,
}

impl<'a> DatasetBuilderValues<'a> {
    pub fn create(&self, name: &str) -> Result<Dataset<'a>> {
        let size = self.space.size();
        ensure!(
            self.values.len() == size,
            "expected {} values for shape {}, got {}",
            size,
            self.space,
            self.values.len()
        );
        let ds = self.builder.create(&self.type_desc, name, &self.space)?;
        if let Err(err) = ds.write_values(&self.values) {
            self.builder.try_unlink(name);
            Err(err)
        } else {
            Ok(ds)
        }
    }

    #[must_use]
    pub fn packed(mut self, packed: bool) -> Self {
        self.builder.packed = packed;
        self
    }
}

#[derive(Clone)]
/// The true internal dataset builder
struct DatasetBuilderInner<'a> {
    storage: &'a dyn Storage,
    packed: bool,
}

impl<'a> DatasetBuilderInner<'a> {
    fn new(storage: &'a dyn Storage) -> Self {
        Self { storage, packed: false }
    }

    fn create(&self, desc: &TypeDescriptor, name: &str, space: &Dataspace) -> Result<Dataset<'a>> {
        // in-storage descriptor: packed or C layout for compounds
        let desc = if self.packed { desc.to_packed_repr() } else { desc.to_c_repr() };
        self.storage.create_dataset(name, &desc, space)?;
        Dataset::open(self.storage, name)
    }

    fn try_unlink(&self, name: &str) {
        if let Err(err) = self.storage.unlink(name) {
            warn!(dataset = name, %err, "failed to unlink partially created dataset");
        }
    }
}
