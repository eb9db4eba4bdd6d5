use crate::codec::RawBuffer;
use crate::hl::attribute::{AttributeBuilder, AttributeBuilderEmpty};
use crate::hl::dataset::{Dataset, DatasetBuilder, DatasetBuilderEmpty};
use crate::internal_prelude::*;

/// Datatype and shape of a stored dataset or attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectInfo {
    pub dtype: TypeDescriptor,
    pub space: Dataspace,
}

impl ObjectInfo {
    pub fn new(dtype: TypeDescriptor, space: Dataspace) -> Self {
        Self { dtype, space }
    }

    /// Number of bytes a full buffer for this object must have.
    pub fn byte_size(&self) -> usize {
        self.dtype.size() * self.space.size()
    }
}

/// Capabilities a fixture writer needs from an HDF5-like container.
///
/// Object names are flat; a leading `/` is ignored. Buffers passed to the
/// write methods must hold exactly `dtype.size() * space.size()` bytes.
pub trait Storage {
    /// Creates a zero-filled dataset and returns its object reference.
    fn create_dataset(
        &self, name: &str, dtype: &TypeDescriptor, space: &Dataspace,
    ) -> Result<ObjectReference>;

    fn dataset_info(&self, name: &str) -> Result<ObjectInfo>;

    fn write_dataset(&self, name: &str, raw: RawBuffer) -> Result<()>;

    fn read_dataset(&self, name: &str) -> Result<RawBuffer>;

    /// Removes a dataset along with its attributes.
    fn unlink(&self, name: &str) -> Result<()>;

    /// Creates a zero-filled attribute on the dataset `owner`.
    fn create_attribute(
        &self, owner: &str, name: &str, dtype: &TypeDescriptor, space: &Dataspace,
    ) -> Result<()>;

    fn attribute_info(&self, owner: &str, name: &str) -> Result<ObjectInfo>;

    fn write_attribute(&self, owner: &str, name: &str, raw: RawBuffer) -> Result<()>;

    fn read_attribute(&self, owner: &str, name: &str) -> Result<RawBuffer>;

    /// Names of all datasets, sorted.
    fn dataset_names(&self) -> Result<Vec<String>>;

    /// Names of all attributes on `owner`, sorted.
    fn attr_names(&self, owner: &str) -> Result<Vec<String>>;

    fn reference(&self, name: &str) -> Result<ObjectReference>;

    /// Resolves a reference back to a dataset name.
    fn dereference(&self, reference: ObjectReference) -> Result<String>;

    /// Instantiates a new dataset builder.
    fn new_dataset_builder(&self) -> DatasetBuilder<'_>
    where
        Self: Sized,
    {
        DatasetBuilder::new(self)
    }

    /// Instantiates a new typed dataset builder.
    fn new_dataset<T: H5Type>(&self) -> DatasetBuilderEmpty<'_>
    where
        Self: Sized,
    {
        self.new_dataset_builder().empty::<T>()
    }

    /// Opens an existing dataset.
    fn dataset(&self, name: &str) -> Result<Dataset<'_>>
    where
        Self: Sized,
    {
        Dataset::open(self, name)
    }

    /// Instantiates an attribute builder for the dataset `owner`.
    fn new_attr_builder(&self, owner: &str) -> AttributeBuilder<'_>
    where
        Self: Sized,
    {
        AttributeBuilder::new(self, owner)
    }

    /// Instantiates a typed attribute builder for the dataset `owner`.
    fn new_attr<T: H5Type>(&self, owner: &str) -> AttributeBuilderEmpty<'_>
    where
        Self: Sized,
    {
        self.new_attr_builder(owner).empty::<T>()
    }
}

/// Strips the optional leading `/` and rejects empty or nested names.
pub(crate) fn normalize_name(name: &str) -> Result<&str> {
    let name = name.strip_prefix('/').unwrap_or(name);
    ensure!(!name.is_empty(), "object name must not be empty");
    ensure!(!name.contains('/'), "nested object names are not supported: '{}'", name);
    Ok(name)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    pub fn test_normalize_name() {
        assert_eq!(normalize_name("/myDataset").unwrap(), "myDataset");
        assert_eq!(normalize_name("records").unwrap(), "records");
        assert_err!(normalize_name("/"), "must not be empty");
        assert_err!(normalize_name("a/b"), "nested object names");
    }

    #[test]
    pub fn test_object_info() {
        let info = ObjectInfo::new(u16::type_descriptor(), (2, 3).into());
        assert_eq!(info.byte_size(), 12);
    }
}
