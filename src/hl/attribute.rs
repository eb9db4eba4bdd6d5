use std::fmt::{self, Debug};
use std::ops::Deref;

use ndarray::ArrayView;

use crate::hl::container::{Container, ContainerKind};
use crate::hl::storage::{normalize_name, Storage};
use crate::internal_prelude::*;

/// Represents an attribute attached to a dataset.
#[derive(Clone)]
pub struct Attribute<'a>(Container<'a>);

impl Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<'a> Deref for Attribute<'a> {
    type Target = Container<'a>;

    fn deref(&self) -> &Container<'a> {
        &self.0
    }
}

impl<'a> Attribute<'a> {
    /// Opens an existing attribute of the dataset `owner`.
    pub fn open(storage: &'a dyn Storage, owner: &str, name: &str) -> Result<Self> {
        let owner = normalize_name(owner)?;
        let info = storage.attribute_info(owner, name)?;
        let kind = ContainerKind::Attribute { owner: owner.to_owned(), name: name.to_owned() };
        Ok(Self(Container::new(storage, kind, info)))
    }

    /// Name of the dataset the attribute is attached to.
    pub fn owner(&self) -> &str {
        match self.kind() {
            ContainerKind::Attribute { owner, .. } => owner.as_str(),
            ContainerKind::Dataset { name } => name.as_str(),
        }
    }
}

#[derive(Clone)]
/// An attribute builder
pub struct AttributeBuilder<'a> {
    builder: AttributeBuilderInner<'a>,
}

impl<'a> AttributeBuilder<'a> {
    pub fn new(storage: &'a dyn Storage, owner: &str) -> Self {
        Self { builder: AttributeBuilderInner::new(storage, owner) }
    }

    pub fn empty<T: H5Type>(self) -> AttributeBuilderEmpty<'a> {
        self.empty_as(&T::type_descriptor())
    }

    pub fn empty_as(self, type_desc: &TypeDescriptor) -> AttributeBuilderEmpty<'a> {
        AttributeBuilderEmpty { builder: self.builder, type_desc: type_desc.clone() }
    }

    pub fn with_data<'d, A, T, D>(self, data: A) -> AttributeBuilderData<'a, 'd, T, D>
    where
        A: Into<ArrayView<'d, T, D>>,
        T: H5Type,
        D: ndarray::Dimension,
    {
        AttributeBuilderData {
            builder: self.builder,
            data: data.into(),
            type_desc: T::type_descriptor(),
        }
    }

    pub fn with_scalar<T: H5Type>(self, value: &T) -> AttributeBuilderValues<'a> {
        self.with_values(&T::type_descriptor(), (), vec![value.to_value()])
    }

    pub fn with_values<S: Into<Dataspace>>(
        self, type_desc: &TypeDescriptor, shape: S, values: Vec<Value>,
    ) -> AttributeBuilderValues<'a> {
        AttributeBuilderValues {
            builder: self.builder,
            type_desc: type_desc.clone(),
            space: shape.into(),
            values,
        }
    }

    #[must_use]
    pub fn packed(mut self, packed: bool) -> Self {
        self.builder.packed = packed;
        self
    }
}

#[derive(Clone)]
/// An attribute builder with the type known
pub struct AttributeBuilderEmpty<'a> {
    builder: AttributeBuilderInner<'a>,
    type_desc: TypeDescriptor,
}

impl<'a> AttributeBuilderEmpty<'a> {
    pub fn shape<S: Into<Dataspace>>(self, space: S) -> AttributeBuilderEmptyShape<'a> {
        AttributeBuilderEmptyShape {
            builder: self.builder,
            type_desc: self.type_desc,
            space: space.into(),
        }
    }

    pub fn create(self, name: &str) -> Result<Attribute<'a>> {
        self.shape(()).create(name)
    }
}

#[derive(Clone)]
/// An attribute builder with type and shape known
pub struct AttributeBuilderEmptyShape<'a> {
    builder: AttributeBuilderInner<'a>,
    type_desc: TypeDescriptor,
    space: Dataspace,
}

impl<'a> AttributeBuilderEmptyShape<'a> {
    pub fn create(&self, name: &str) -> Result<Attribute<'a>> {
        self.builder.create(&self.type_desc, name, &self.space)
    }
}

#[derive(Clone)]
/// An attribute builder with type, shape, and data known
pub struct AttributeBuilderData<'a, 'd, T, D> {
    builder: AttributeBuilderInner<'a>,
    data: ArrayView<'d, T, D>,
    type_desc: TypeDescriptor,
}

impl<'a, 'd, T, D> AttributeBuilderData<'a, 'd, T, D>
where
    T: H5Type,
    D: ndarray::Dimension,
{
    pub fn create(&self, name: &str) -> Result<Attribute<'a>> {
        let space = Dataspace::from(self.data.shape());
        let attr = self.builder.create(&self.type_desc, name, &space)?;
        attr.write(self.data.view())?;
        Ok(attr)
    }
}

#[derive(Clone)]
/// An attribute builder with dynamic values known
pub struct AttributeBuilderValues<'a> {
    builder: AttributeBuilderInner<'a>,
    type_desc: TypeDescriptor,
    space: Dataspace,
    values: Vec<Value>,
}

impl<'a> AttributeBuilderValues<'a> {
    pub fn create(&self, name: &str) -> Result<Attribute<'a>> {
        let size = self.space.size();
        ensure!(
            self.values.len() == size,
            "expected {} values for shape {}, got {}",
            size,
            self.space,
            self.values.len()
        );
        let attr = self.builder.create(&self.type_desc, name, &self.space)?;
        attr.write_values(&self.values)?;
        Ok(attr)
    }
}

#[derive(Clone)]
struct AttributeBuilderInner<'a> {
    storage: &'a dyn Storage,
    owner: String,
    packed: bool,
}

impl<'a> AttributeBuilderInner<'a> {
    fn new(storage: &'a dyn Storage, owner: &str) -> Self {
        Self { storage, owner: owner.to_owned(), packed: false }
    }

    fn create(
        &self, desc: &TypeDescriptor, name: &str, space: &Dataspace,
    ) -> Result<Attribute<'a>> {
        let desc = if self.packed { desc.to_packed_repr() } else { desc.to_c_repr() };
        self.storage.create_attribute(&self.owner, name, &desc, space)?;
        Attribute::open(self.storage, &self.owner, name)
    }
}
