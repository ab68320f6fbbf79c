use std::io;
use std::path::Path;

/// The one destructive primitive the scanner uses.
pub trait Remover: Send + Sync {
    fn remove(&self, path: &Path) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
