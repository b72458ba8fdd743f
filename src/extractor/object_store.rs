use std::path::PathBuf;

/// Content-addressed object store laid out as `<root>/<hash[0:2]>/<hash>`.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn object_path(&self, hash: &str) -> PathBuf {
        let fan_out = hash.get(..2).unwrap_or(hash);
        self.root.join(fan_out).join(hash)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.object_path(hash).is_file()
    }
}
