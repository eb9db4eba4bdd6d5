use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};

use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

use crate::codec::RawBuffer;
use crate::hl::storage::{normalize_name, ObjectInfo, Storage};
use crate::internal_prelude::*;
use crate::sync::{self, SharedImage};

/// File opening mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// Open a file as read-only, file must exist.
    Read,
    /// Open a file as read/write, file must exist.
    ReadWrite,
    /// Create a file, truncate if exists.
    Create,
    /// Create a file, fail if exists.
    CreateExcl,
    /// Open a file as read/write if exists, create otherwise.
    Append,
}

#[derive(Clone, Debug)]
struct Blob {
    info: ObjectInfo,
    data: RawBuffer,
}

impl Blob {
    fn new(dtype: &TypeDescriptor, space: &Dataspace) -> Self {
        let data = RawBuffer::zeroed(dtype, space.size());
        Self { info: ObjectInfo::new(dtype.clone(), space.clone()), data }
    }

    fn replace(&mut self, raw: RawBuffer) -> Result<()> {
        let expected = self.info.byte_size();
        ensure!(
            raw.len() == expected,
            "buffer size mismatch: expected {} bytes, got {}",
            expected,
            raw.len()
        );
        self.data = raw;
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct DatasetEntry {
    addr: u64,
    blob: Blob,
    attrs: BTreeMap<String, Blob>,
}

/// Contents of one in-memory file, shared by every handle opened on its path.
#[derive(Clone, Debug, Default)]
pub struct FileImage {
    datasets: BTreeMap<String, DatasetEntry>,
    last_addr: u64,
}

impl FileImage {
    fn entry(&self, name: &str) -> Result<&DatasetEntry> {
        self.datasets
            .get(name)
            .ok_or_else(|| storage_err!("unable to open dataset: '{}' does not exist", name))
    }

    fn entry_mut(&mut self, name: &str) -> Result<&mut DatasetEntry> {
        self.datasets
            .get_mut(name)
            .ok_or_else(|| storage_err!("unable to open dataset: '{}' does not exist", name))
    }

    fn attr(&self, owner: &str, name: &str) -> Result<&Blob> {
        self.entry(owner)?.attrs.get(name).ok_or_else(|| {
            storage_err!("unable to open attribute: '{}' does not exist on '{}'", name, owner)
        })
    }

    fn attr_mut(&mut self, owner: &str, name: &str) -> Result<&mut Blob> {
        self.entry_mut(owner)?.attrs.get_mut(name).ok_or_else(|| {
            storage_err!("unable to open attribute: '{}' does not exist on '{}'", name, owner)
        })
    }
}

/// In-memory HDF5-like file object.
///
/// Files are kept in a process-wide registry keyed by path, so a writer and a
/// reader opened on the same path see the same contents.
#[derive(Clone)]
pub struct File {
    path: PathBuf,
    image: SharedImage,
    read_only: bool,
}

impl Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let basename = self.path.file_name().unwrap_or(self.path.as_os_str());
        let mode = if self.read_only { "read-only" } else { "read/write" };
        write!(f, "<h5fixture file: {:?} ({})>", basename, mode)
    }
}

impl File {
    /// Opens a file as read-only, file must exist.
    pub fn open<P: AsRef<Path>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::Read)
    }

    /// Opens a file as read/write, file must exist.
    pub fn open_rw<P: AsRef<Path>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::ReadWrite)
    }

    /// Creates a file, truncates if exists.
    pub fn create<P: AsRef<Path>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::Create)
    }

    /// Creates a file, fails if exists.
    pub fn create_excl<P: AsRef<Path>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::CreateExcl)
    }

    /// Opens a file as read/write if exists, creates otherwise.
    pub fn append<P: AsRef<Path>>(filename: P) -> Result<Self> {
        Self::open_as(filename, OpenMode::Append)
    }

    /// Opens a file in a given mode.
    pub fn open_as<P: AsRef<Path>>(filename: P, mode: OpenMode) -> Result<Self> {
        FileBuilder::new().open_as(filename, mode)
    }

    /// Opens a file with custom file-level options.
    pub fn with_options() -> FileBuilder {
        FileBuilder::new()
    }

    /// Removes a file from the registry; open handles keep their contents.
    pub fn delete<P: AsRef<Path>>(filename: P) -> Result<()> {
        let path = filename.as_ref();
        if !sync::unregister(path) {
            return Err(storage_err!("unable to delete file: {:?} not found", path));
        }
        debug!(path = %path.display(), "deleted file");
        Ok(())
    }

    /// Returns the path the file was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file name as a string.
    pub fn filename(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Total size in bytes of all stored element buffers and heap payloads.
    pub fn size(&self) -> u64 {
        let blob_size = |b: &Blob| (b.data.len() + b.data.heap.byte_size()) as u64;
        self.read()
            .datasets
            .values()
            .map(|e| blob_size(&e.blob) + e.attrs.values().map(blob_size).sum::<u64>())
            .sum()
    }

    /// Returns handles to all datasets in the file, sorted by name.
    pub fn datasets(&self) -> Result<Vec<Dataset<'_>>> {
        self.dataset_names()?.iter().map(|name| self.dataset(name)).collect()
    }

    /// Opens the dataset an object reference points at.
    pub fn dereference_dataset(&self, reference: ObjectReference) -> Result<Dataset<'_>> {
        let name = self.dereference(reference)?;
        self.dataset(&name)
    }

    /// Closes the file handle; the contents stay in the registry.
    pub fn close(self) -> Result<()> {
        debug!(path = %self.path.display(), "closed file");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, FileImage> {
        self.image.read()
    }

    fn write(&self, action: &str) -> Result<RwLockWriteGuard<'_, FileImage>> {
        if self.read_only {
            return Err(storage_err!("unable to {}: no write intent on file", action));
        }
        Ok(self.image.write())
    }
}

impl Storage for File {
    fn create_dataset(
        &self, name: &str, dtype: &TypeDescriptor, space: &Dataspace,
    ) -> Result<ObjectReference> {
        let name = normalize_name(name)?;
        let mut image = self.write("create dataset")?;
        if image.datasets.contains_key(name) {
            return Err(storage_err!("unable to create dataset: '{}' already exists", name));
        }
        image.last_addr += 1;
        let addr = image.last_addr;
        let entry = DatasetEntry { addr, blob: Blob::new(dtype, space), attrs: BTreeMap::new() };
        image.datasets.insert(name.to_owned(), entry);
        debug!(dataset = name, dtype = %dtype, space = %space, addr, "created dataset");
        Ok(ObjectReference::from_addr(addr))
    }

    fn dataset_info(&self, name: &str) -> Result<ObjectInfo> {
        let name = normalize_name(name)?;
        Ok(self.read().entry(name)?.blob.info.clone())
    }

    fn write_dataset(&self, name: &str, raw: RawBuffer) -> Result<()> {
        let name = normalize_name(name)?;
        let mut image = self.write("write dataset")?;
        let bytes = raw.len();
        image.entry_mut(name)?.blob.replace(raw)?;
        debug!(dataset = name, bytes, "wrote dataset");
        Ok(())
    }

    fn read_dataset(&self, name: &str) -> Result<RawBuffer> {
        let name = normalize_name(name)?;
        Ok(self.read().entry(name)?.blob.data.clone())
    }

    fn unlink(&self, name: &str) -> Result<()> {
        let name = normalize_name(name)?;
        let mut image = self.write("unlink dataset")?;
        match image.datasets.remove(name) {
            Some(_) => {
                debug!(dataset = name, "unlinked dataset");
                Ok(())
            }
            None => Err(storage_err!("unable to unlink dataset: '{}' does not exist", name)),
        }
    }

    fn create_attribute(
        &self, owner: &str, name: &str, dtype: &TypeDescriptor, space: &Dataspace,
    ) -> Result<()> {
        let owner = normalize_name(owner)?;
        ensure!(!name.is_empty(), "attribute name must not be empty");
        let mut image = self.write("create attribute")?;
        let entry = image.entry_mut(owner)?;
        if entry.attrs.contains_key(name) {
            return Err(storage_err!(
                "unable to create attribute: '{}' already exists on '{}'",
                name,
                owner
            ));
        }
        entry.attrs.insert(name.to_owned(), Blob::new(dtype, space));
        debug!(dataset = owner, attribute = name, dtype = %dtype, "created attribute");
        Ok(())
    }

    fn attribute_info(&self, owner: &str, name: &str) -> Result<ObjectInfo> {
        let owner = normalize_name(owner)?;
        Ok(self.read().attr(owner, name)?.info.clone())
    }

    fn write_attribute(&self, owner: &str, name: &str, raw: RawBuffer) -> Result<()> {
        let owner = normalize_name(owner)?;
        let mut image = self.write("write attribute")?;
        image.attr_mut(owner, name)?.replace(raw)?;
        debug!(dataset = owner, attribute = name, "wrote attribute");
        Ok(())
    }

    fn read_attribute(&self, owner: &str, name: &str) -> Result<RawBuffer> {
        let owner = normalize_name(owner)?;
        Ok(self.read().attr(owner, name)?.data.clone())
    }

    fn dataset_names(&self) -> Result<Vec<String>> {
        Ok(self.read().datasets.keys().cloned().collect())
    }

    fn attr_names(&self, owner: &str) -> Result<Vec<String>> {
        let owner = normalize_name(owner)?;
        Ok(self.read().entry(owner)?.attrs.keys().cloned().collect())
    }

    fn reference(&self, name: &str) -> Result<ObjectReference> {
        let name = normalize_name(name)?;
        Ok(ObjectReference::from_addr(self.read().entry(name)?.addr))
    }

    fn dereference(&self, reference: ObjectReference) -> Result<String> {
        ensure!(!reference.is_null(), "unable to dereference a null reference");
        self.read()
            .datasets
            .iter()
            .find(|(_, e)| e.addr == reference.addr())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| storage_err!("unable to dereference {}: no such object", reference))
    }
}

/// File builder allowing to customize how a file is opened.
#[derive(Default, Clone, Debug)]
pub struct FileBuilder {
    read_only: bool,
}

impl FileBuilder {
    /// Creates a new file builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the resulting handle to be read-only regardless of the open mode.
    pub fn read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = read_only;
        self
    }

    /// Opens a file as read-only, file must exist.
    pub fn open<P: AsRef<Path>>(&self, filename: P) -> Result<File> {
        self.open_as(filename, OpenMode::Read)
    }

    /// Opens a file as read/write, file must exist.
    pub fn open_rw<P: AsRef<Path>>(&self, filename: P) -> Result<File> {
        self.open_as(filename, OpenMode::ReadWrite)
    }

    /// Creates a file, truncates if exists.
    pub fn create<P: AsRef<Path>>(&self, filename: P) -> Result<File> {
        self.open_as(filename, OpenMode::Create)
    }

    /// Creates a file, fails if exists.
    pub fn create_excl<P: AsRef<Path>>(&self, filename: P) -> Result<File> {
        self.open_as(filename, OpenMode::CreateExcl)
    }

    /// Opens a file as read/write if exists, creates otherwise.
    pub fn append<P: AsRef<Path>>(&self, filename: P) -> Result<File> {
        self.open_as(filename, OpenMode::Append)
    }

    /// Opens a file in a given mode.
    pub fn open_as<P: AsRef<Path>>(&self, filename: P, mode: OpenMode) -> Result<File> {
        let path = filename.as_ref();
        sync::sync(|| {
            if mode == OpenMode::Append {
                if let Ok(file) = self.open_as(path, OpenMode::ReadWrite) {
                    return Ok(file);
                }
            }
            let image = match mode {
                OpenMode::Read | OpenMode::ReadWrite => sync::lookup(path)
                    .ok_or_else(|| storage_err!("unable to open file: {:?} not found", path))?,
                OpenMode::Create => sync::register(path, false)
                    .ok_or_else(|| storage_err!("unable to create file {:?}", path))?,
                OpenMode::CreateExcl | OpenMode::Append => sync::register(path, true)
                    .ok_or_else(|| storage_err!("unable to create file: {:?} exists", path))?,
            };
            let read_only = self.read_only || mode == OpenMode::Read;
            debug!(path = %path.display(), ?mode, read_only, "opened file");
            Ok(File { path: path.to_owned(), image, read_only })
        })
    }
}
