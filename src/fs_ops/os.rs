//! Production [`Filesystem`] adapter backed by std, walkdir and the platform helpers.

use std::fs::{self, File, Metadata};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FileInfo, FileKind, Filesystem, WalkControl, WalkEntry, WalkError};
use crate::platform;

const BUF_SIZE: usize = 1024 * 1024; // 1 MiB buffers

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

fn file_info(meta: &Metadata) -> FileInfo {
    let ft = meta.file_type();
    let kind = if ft.is_symlink() {
        FileKind::Symlink
    } else if ft.is_dir() {
        FileKind::Dir
    } else if ft.is_file() {
        FileKind::Regular
    } else {
        FileKind::Other
    };
    FileInfo { kind, id: platform::file_id(meta) }
}

impl Filesystem for OsFilesystem {
    type File = File;

    fn symlink_metadata(&self, path: &Path) -> io::Result<FileInfo> {
        fs::symlink_metadata(path).map(|m| file_info(&m))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<FileInfo> {
        fs::metadata(path).map(|m| file_info(&m))
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }

    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        platform::create_dir_all_mode(path, mode)
    }

    fn create(&self, path: &Path) -> io::Result<File> {
        File::create(path)
    }

    fn copy(&self, from: &mut File, to: &mut File) -> io::Result<u64> {
        let mut reader = BufReader::with_capacity(BUF_SIZE, from);
        let mut writer = BufWriter::with_capacity(BUF_SIZE, to);
        let bytes = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(bytes)
    }

    fn sync(&self, file: &mut File) -> io::Result<()> {
        file.sync_all()
    }

    fn close(&self, file: File) -> io::Result<()> {
        platform::close_file(file)
    }

    fn same_file(&self, a: &FileInfo, b: &FileInfo) -> bool {
        matches!((a.id, b.id), (Some(x), Some(y)) if x == y)
    }

    fn walk_dir(
        &self,
        root: &Path,
        visit: &mut dyn FnMut(Result<WalkEntry, WalkError>) -> WalkControl,
    ) -> io::Result<()> {
        let mut it = WalkDir::new(root).follow_links(false).sort_by_file_name().into_iter();
        while let Some(next) = it.next() {
            match next {
                Ok(e) => {
                    let is_dir = e.file_type().is_dir();
                    let depth = e.depth();
                    let entry = WalkEntry { path: e.into_path(), depth, is_dir };
                    if visit(Ok(entry)) == WalkControl::SkipDir && is_dir {
                        it.skip_current_dir();
                    }
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    let msg = e.to_string();
                    let source = e.into_io_error().unwrap_or_else(|| io::Error::other(msg));
                    // Errors carry no directory to prune; the answer is irrelevant.
                    let _ = visit(Err(WalkError { path, source }));
                }
            }
        }
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
