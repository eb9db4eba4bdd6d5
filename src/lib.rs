//! Deterministic HDF5 datatype fixtures for Rust.
//!
//! The crate produces reproducible test data sets that sweep every integer
//! type through its boundary values. Some of the features include:
//!
//! - A stateless boundary-value cycler (`min`, lower interior, midpoint, upper interior, `max`).
//! - Native representation of HDF5 types, including compounds, enums, fixed point,
//!   variable-length strings and arrays, opaque blobs and object references.
//! - Derive-macros mapping user structs and enums to HDF5 types and to cycled values.
//! - An in-memory, thread-safe file store with a dataset/attribute API modelled on HDF5,
//!   plus a `Storage` trait so fixture writers can target other containers.
//! - Ready-made fixture generators mirroring the classic HDF5 datatype examples.

#![cfg_attr(feature = "cargo-clippy", warn(clippy::all))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::module_name_repetitions))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::cast_possible_truncation))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::cast_sign_loss))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::cast_precision_loss))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::missing_errors_doc))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::must_use_candidate))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::wildcard_imports))]
#![cfg_attr(not(test), allow(dead_code))]

extern crate self as h5fixture;

mod export {
    pub use crate::{
        codec::{decode, encode, GlobalHeap, RawBuffer},
        error::{Error, Result},
        hl::{
            Attribute, AttributeBuilder, AttributeBuilderData, AttributeBuilderEmpty,
            AttributeBuilderEmptyShape, AttributeBuilderValues, Container, ContainerKind, Dataset,
            DatasetBuilder, DatasetBuilderData, DatasetBuilderEmpty, DatasetBuilderEmptyShape,
            DatasetBuilderValues, Dataspace, File, FileBuilder, Ix, ObjectInfo, OpenMode, Reader,
            Storage, Writer,
        },
    };

    pub use h5fixture_derive::{Cycled, H5Type};
    pub use h5fixture_types::{cycled, Cycled, H5Type};

    pub mod types {
        pub use h5fixture_types::*;
    }

    pub mod file {
        pub use crate::hl::file::{File, FileBuilder, OpenMode};
    }

    pub mod dataset {
        pub use crate::hl::dataset::*;
    }

    pub mod attribute {
        pub use crate::hl::attribute::*;
    }
}

pub use crate::export::*;

#[macro_use]
mod macros;

mod codec;
mod error;
pub mod fixtures;
mod hl;
#[doc(hidden)]
pub mod sync;

mod internal_prelude {
    pub use tracing::{debug, info, warn};

    pub use crate::{
        export::*,
        sync::sync,
        types::{ObjectReference, TypeDescriptor, Value},
    };

    #[cfg(test)]
    pub use crate::test::{with_tmp_dir, with_tmp_file, with_tmp_path};
}
