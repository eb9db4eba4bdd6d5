use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::hl::file::FileImage;

pub(crate) type SharedImage = Arc<RwLock<FileImage>>;

lazy_static! {
    static ref REGISTRY: Mutex<HashMap<PathBuf, SharedImage>> = Mutex::new(HashMap::new());
}

/// Guards the execution of the provided closure with a recursive static mutex.
///
/// Used where several registry and image operations must appear atomic to
/// other threads (e.g. "open or create" in append mode).
pub fn sync<T, F>(func: F) -> T
where
    F: FnOnce() -> T,
{
    lazy_static! {
        static ref LOCK: ReentrantMutex<()> = ReentrantMutex::new(());
    }
    let _guard = LOCK.lock();
    func()
}

pub(crate) fn lookup(path: &Path) -> Option<SharedImage> {
    REGISTRY.lock().get(path).cloned()
}

/// Registers a fresh image under `path`, replacing any previous one unless `exclusive`.
pub(crate) fn register(path: &Path, exclusive: bool) -> Option<SharedImage> {
    let mut registry = REGISTRY.lock();
    if exclusive && registry.contains_key(path) {
        return None;
    }
    let image = Arc::new(RwLock::new(FileImage::default()));
    registry.insert(path.to_owned(), image.clone());
    Some(image)
}

pub(crate) fn unregister(path: &Path) -> bool {
    REGISTRY.lock().remove(path).is_some()
}
