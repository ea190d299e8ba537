#![cfg(unix)]
mod common;

use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use data_seeder::tracker::FileTracker;
use data_seeder::{
    LocalConfigFileTracker, MemoryStore, MountSpec, OsFilesystem, SeederError, VolumeMountCopier,
};

use common::{projected_volume, FaultyFs};

fn tracked(store: &MemoryStore) -> Vec<PathBuf> {
    LocalConfigFileTracker::new(store, &OsFilesystem).tracked_files().unwrap()
}

fn copy(mounts: &[MountSpec], store: &MemoryStore) -> Result<(), SeederError> {
    let tracker = LocalConfigFileTracker::new(store, &OsFilesystem);
    VolumeMountCopier::new(&OsFilesystem, &tracker).copy_volume_mount(mounts)
}

#[test]
fn projected_and_sub_path_files_land_in_destination() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    let cfg = temp.child("cfg");
    mount.create_dir_all().unwrap();
    projected_volume(mount.path(), "2024_01_01", &[("db.conf", "db")]);
    mount.child("sub/app.yaml").write_str("app: 1").unwrap();

    let store = MemoryStore::new();
    copy(&[MountSpec::new(mount.path(), cfg.path())], &store).unwrap();

    cfg.child("db.conf").assert("db");
    cfg.child("sub/app.yaml").assert("app: 1");
    assert!(!cfg.path().join("..2024_01_01").exists());
    assert!(!cfg.path().join("..data").exists());

    let mut got = tracked(&store);
    got.sort();
    assert_eq!(got, vec![cfg.path().join("db.conf"), cfg.path().join("sub/app.yaml")]);
}

#[test]
fn data_link_without_projection_links() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("..2024_01_01/db.conf").write_str("db").unwrap();
    symlink("..2024_01_01", mount.path().join("..data")).unwrap();
    let cfg = temp.child("cfg");

    let store = MemoryStore::new();
    copy(&[MountSpec::new(mount.path(), cfg.path())], &store).unwrap();

    cfg.child("db.conf").assert("db");
    assert_eq!(tracked(&store), vec![cfg.path().join("db.conf")]);
}

#[test]
fn rotated_directory_is_flattened() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("..2025_05_07/nested/deep.conf").write_str("deep").unwrap();
    symlink("..2025_05_07", mount.path().join("..data")).unwrap();
    let cfg = temp.child("cfg");

    copy(&[MountSpec::new(mount.path(), cfg.path())], &MemoryStore::new()).unwrap();

    cfg.child("deep.conf").assert("deep");
    assert!(!cfg.path().join("nested").exists());
}

#[test]
fn sub_path_mount_keeps_nesting() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("a.txt").write_str("a").unwrap();
    mount.child("x/y/b.txt").write_str("b").unwrap();
    let cfg = temp.child("cfg");

    let store = MemoryStore::new();
    copy(&[MountSpec::new(mount.path(), cfg.path())], &store).unwrap();

    cfg.child("a.txt").assert("a");
    cfg.child("x/y/b.txt").assert("b");
    assert_eq!(tracked(&store), vec![cfg.path().join("a.txt"), cfg.path().join("x/y/b.txt")]);
}

#[test]
fn reserved_directories_are_never_sub_path_content() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("..stale_rotation/old.conf").write_str("old").unwrap();
    mount.child("keep.conf").write_str("keep").unwrap();
    let cfg = temp.child("cfg");

    copy(&[MountSpec::new(mount.path(), cfg.path())], &MemoryStore::new()).unwrap();

    cfg.child("keep.conf").assert("keep");
    assert!(!cfg.path().join("old.conf").exists());
    assert!(!cfg.path().join("..stale_rotation").exists());
}

#[test]
fn dot_dot_prefixed_file_is_sub_path_content() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("..foo").write_str("foo").unwrap();
    mount.child("nested/..bar").write_str("bar").unwrap();
    let cfg = temp.child("cfg");

    let store = MemoryStore::new();
    copy(&[MountSpec::new(mount.path(), cfg.path())], &store).unwrap();

    cfg.child("..foo").assert("foo");
    cfg.child("nested/..bar").assert("bar");
    assert_eq!(tracked(&store), vec![cfg.path().join("..foo"), cfg.path().join("nested/..bar")]);
}

#[test]
fn existing_destination_is_overwritten() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("app.yaml").write_str("new").unwrap();
    let cfg = temp.child("cfg");
    cfg.child("app.yaml").write_str("old and longer").unwrap();

    copy(&[MountSpec::new(mount.path(), cfg.path())], &MemoryStore::new()).unwrap();
    cfg.child("app.yaml").assert("new");
}

#[test]
fn same_file_is_skipped_without_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("a.txt").write_str("a").unwrap();

    let store = MemoryStore::new();
    copy(&[MountSpec::new(mount.path(), mount.path())], &store).unwrap();

    mount.child("a.txt").assert("a");
    assert!(tracked(&store).is_empty(), "nothing was written, nothing is tracked");
}

#[test]
fn bad_entries_are_reported_and_siblings_still_copied() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("b_ok.txt").write_str("ok").unwrap();
    mount.child("c_dir_in_dest.txt").write_str("x").unwrap();
    symlink("/etc/hostname", mount.path().join("a_link")).unwrap();
    let cfg = temp.child("cfg");
    cfg.child("c_dir_in_dest.txt").create_dir_all().unwrap();

    let err = copy(&[MountSpec::new(mount.path(), cfg.path())], &MemoryStore::new()).unwrap_err();

    let SeederError::Multiple(list) = &err else {
        panic!("expected aggregated errors, got {err:?}");
    };
    let codes: Vec<_> = list.iter().map(|e| e.code()).collect();
    assert_eq!(codes, vec!["source_not_regular", "destination_not_regular"]);
    let msg = err.to_string();
    assert!(msg.contains("a_link is not a regular file"), "{msg}");
    assert!(msg.contains("exists and is not a regular file"), "{msg}");
    cfg.child("b_ok.txt").assert("ok");
}

#[test]
fn unresolvable_mount_does_not_stop_other_mounts() {
    let temp = assert_fs::TempDir::new().unwrap();
    let broken = temp.child("broken");
    broken.create_dir_all().unwrap();
    broken.child("subpath.conf").write_str("never").unwrap();
    symlink("..gone", broken.path().join("..data")).unwrap();
    let good = temp.child("good");
    good.child("app.yaml").write_str("app").unwrap();
    let cfg_broken = temp.child("cfg_broken");
    let cfg_good = temp.child("cfg_good");

    let err = copy(
        &[
            MountSpec::new(broken.path(), cfg_broken.path()),
            MountSpec::new(good.path(), cfg_good.path()),
        ],
        &MemoryStore::new(),
    )
    .unwrap_err();

    assert!(err.is_resolution(), "{err:?}");
    assert!(err.to_string().contains("failed to resolve data dir symlink"));
    assert!(!cfg_broken.path().exists(), "both walks are skipped for the broken mount");
    cfg_good.child("app.yaml").assert("app");
}

#[test]
fn missing_source_is_a_walk_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    let err = copy(
        &[MountSpec::new(temp.path().join("absent"), temp.path().join("cfg"))],
        &MemoryStore::new(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "walk");
    assert!(err.to_string().contains("error during directory walk"));
}

#[test]
fn failed_sync_is_not_tracked() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("a.txt").write_str("a").unwrap();
    let cfg = temp.child("cfg");

    let fs = FaultyFs { fail_sync: true, ..Default::default() };
    let store = MemoryStore::new();
    let tracker = LocalConfigFileTracker::new(&store, &fs);
    let err = VolumeMountCopier::new(&fs, &tracker)
        .copy_volume_mount(&[MountSpec::new(mount.path(), cfg.path())])
        .unwrap_err();

    assert!(err.to_string().contains("failed to flush buffer to file"), "{err}");
    assert!(tracked(&store).is_empty());
}

#[test]
fn empty_mount_list_is_a_noop() {
    let store = MemoryStore::new();
    copy(&[], &store).unwrap();
    assert!(store.value(data_seeder::ADDITIONAL_MOUNTS_KEY).is_none());
}

#[test]
fn tracker_add_runs_once_per_copied_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    let mount = temp.child("mount");
    mount.child("a.txt").write_str("a").unwrap();
    let cfg = temp.child("cfg");
    let spec = MountSpec::new(mount.path(), cfg.path());

    let store = MemoryStore::new();
    copy(std::slice::from_ref(&spec), &store).unwrap();
    copy(std::slice::from_ref(&spec), &store).unwrap();

    assert_eq!(tracked(&store), vec![Path::new(cfg.path()).join("a.txt")]);
    let tracker = LocalConfigFileTracker::new(&store, &OsFilesystem);
    tracker.delete_all_tracked_files().unwrap();
    assert!(!cfg.path().join("a.txt").exists());
    assert!(fs::read_dir(cfg.path()).unwrap().next().is_none());
}
