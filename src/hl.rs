pub mod attribute;
pub mod container;
pub mod dataset;
pub mod dataspace;
pub mod file;
pub mod storage;

pub use self::{
    attribute::{
        Attribute, AttributeBuilder, AttributeBuilderData, AttributeBuilderEmpty,
        AttributeBuilderEmptyShape, AttributeBuilderValues,
    },
    container::{Container, ContainerKind, Reader, Writer},
    dataset::{
        Dataset, DatasetBuilder, DatasetBuilderData, DatasetBuilderEmpty, DatasetBuilderEmptyShape,
        DatasetBuilderValues,
    },
    dataspace::{Dataspace, Ix},
    file::{File, FileBuilder, OpenMode},
    storage::{ObjectInfo, Storage},
};
