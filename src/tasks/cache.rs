// src/tasks/cache.rs

//! Content-hash cache for the image task.
//!
//! The file format is a simple line-based mapping, hash first so relative
//! paths may contain whitespace:
//!
//! ```text
//! <hex_hash> assets/img/logo.png
//! <hex_hash> assets/img/photos/team.jpg
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use blake3::Hasher;
use tracing::debug;

/// Persistent mapping from relative image path to content hash.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, String>,
}

impl ImageCache {
    /// Load the cache from disk; a missing file is an empty cache.
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut entries = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some((hash, rel)) = trimmed.split_once(char::is_whitespace) {
                entries.insert(rel.trim().to_string(), hash.to_string());
            }
        }

        Ok(Self { entries })
    }

    /// Persist the cache, creating the parent directory as needed.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        for (rel, hash) in &self.entries {
            writeln!(writer, "{hash} {rel}")?;
        }
        writer.flush()
    }

    /// True if the stored hash for `rel` matches `hash`.
    pub fn is_fresh(&self, rel: &str, hash: &str) -> bool {
        self.entries.get(rel).is_some_and(|stored| stored == hash)
    }

    pub fn record(&mut self, rel: String, hash: String) {
        self.entries.insert(rel, hash);
    }

    /// Remove the cache file; a missing file is already clear.
    pub fn clear(path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Streaming blake3 hash of a file's contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut hasher = Hasher::new();
    let mut file = File::open(path)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let hash = hasher.finalize().to_hex().to_string();
    debug!(path = ?path, hash = %hash, "hashed image");
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache_path = dir.path().join("imagecache");

        let mut cache = ImageCache::default();
        cache.record("assets/img/a.png".into(), "abc123".into());
        cache.record("assets/img/with space.png".into(), "def456".into());
        cache.save(&cache_path).expect("save");

        let loaded = ImageCache::load(&cache_path).expect("load");
        assert!(loaded.is_fresh("assets/img/a.png", "abc123"));
        assert!(loaded.is_fresh("assets/img/with space.png", "def456"));
        assert!(!loaded.is_fresh("assets/img/a.png", "other"));
    }

    #[test]
    fn clear_is_terminal_stable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache_path = dir.path().join("imagecache");

        ImageCache::default().save(&cache_path).expect("save");
        ImageCache::clear(&cache_path).expect("first clear");
        ImageCache::clear(&cache_path).expect("second clear");
        assert!(!cache_path.exists());
    }
}
