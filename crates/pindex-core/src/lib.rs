pub mod classify;
pub mod config;
pub mod extract;
pub mod inspect;
pub mod locator;
pub mod manifest;
pub mod pipeline;

pub use config::Config;
pub use manifest::{Manifest, ManifestEntry};
pub use pipeline::{Invocation, Pipeline};

/// Returns the crate version baked in at compile time.
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{fs::File, io::Write, path::Path};

    use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

    /// Writes a zip archive containing `files` (name, contents).
    pub fn write_archive(path: &Path, files: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
}
