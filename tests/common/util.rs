use super::gen::gen_ascii;

pub fn random_filename() -> String {
    format!("{}.h5", gen_ascii(&mut rand::thread_rng(), 8))
}

/// Creates a fresh file under a random name; it lives in the process-wide store only.
pub fn new_file() -> h5fixture::Result<h5fixture::File> {
    h5fixture::File::create(random_filename())
}
