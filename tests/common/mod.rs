#![allow(dead_code)]
//! Shared fixtures: projected-volume trees and fault-injecting adapters.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use data_seeder::fs_ops::{FileInfo, WalkControl, WalkEntry, WalkError};
use data_seeder::store::StoreError;
use data_seeder::{ConfigStore, Filesystem, MemoryStore, OsFilesystem};

/// Lay out `root` like the kubelet does for a ConfigMap without subPath:
/// `..<stamp>/` holds the files, `..data -> ..<stamp>`, and every key is
/// exposed as `key -> ..data/key`.
#[cfg(unix)]
pub fn projected_volume(root: &Path, stamp: &str, files: &[(&str, &str)]) -> PathBuf {
    use std::os::unix::fs::symlink;

    let rotated = root.join(format!("..{stamp}"));
    fs::create_dir_all(&rotated).unwrap();
    for (name, body) in files {
        fs::write(rotated.join(name), body).unwrap();
        symlink(Path::new("..data").join(name), root.join(name)).unwrap();
    }
    symlink(format!("..{stamp}"), root.join("..data")).unwrap();
    rotated
}

/// OsFilesystem with switchable failures; records every delete request.
#[derive(Default)]
pub struct FaultyFs {
    pub fail_delete: HashSet<PathBuf>,
    pub fail_create: HashSet<PathBuf>,
    pub fail_sync: bool,
    pub deleted: RefCell<Vec<PathBuf>>,
}

fn injected() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "injected failure")
}

impl Filesystem for FaultyFs {
    type File = File;

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileInfo> {
        OsFilesystem.symlink_metadata(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        OsFilesystem.canonicalize(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<FileInfo> {
        OsFilesystem.metadata(path)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        OsFilesystem.read_link(path)
    }

    fn open(&self, path: &Path) -> io::Result<File> {
        OsFilesystem.open(path)
    }

    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        OsFilesystem.create_dir_all(path, mode)
    }

    fn create(&self, path: &Path) -> io::Result<File> {
        if self.fail_create.contains(path) {
            return Err(injected());
        }
        OsFilesystem.create(path)
    }

    fn copy(&self, from: &mut File, to: &mut File) -> io::Result<u64> {
        OsFilesystem.copy(from, to)
    }

    fn sync(&self, file: &mut File) -> io::Result<()> {
        if self.fail_sync {
            return Err(injected());
        }
        OsFilesystem.sync(file)
    }

    fn close(&self, file: File) -> io::Result<()> {
        OsFilesystem.close(file)
    }

    fn same_file(&self, a: &FileInfo, b: &FileInfo) -> bool {
        OsFilesystem.same_file(a, b)
    }

    fn walk_dir(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(Result<WalkEntry, WalkError>) -> WalkControl,
    ) -> io::Result<()> {
        OsFilesystem.walk_dir(root, visit)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        self.deleted.borrow_mut().push(path.to_path_buf());
        if self.fail_delete.contains(path) {
            return Err(injected());
        }
        OsFilesystem.delete_file(path)
    }
}

/// MemoryStore whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_set: bool,
    pub fail_exists: bool,
}

impl ConfigStore for FlakyStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_set {
            return Err(StoreError::Io { path: PathBuf::from("memory"), source: injected() });
        }
        self.inner.set(key, value)
    }

    fn get(&self, key: &str) -> Result<String, StoreError> {
        self.inner.get(key)
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        if self.fail_exists {
            return Err(StoreError::Io { path: PathBuf::from("memory"), source: injected() });
        }
        self.inner.exists(key)
    }
}
