// tests/integration/fs_abstraction.rs

use std::path::Path;

use treewatch::fs::mock::{MockEntry, MockFileSystem};
use treewatch::fs::{FileSystem, RealFileSystem};

#[test]
fn mock_fs_tracks_files_and_parents() {
    let fs = MockFileSystem::new();
    fs.add_file("/root/a/b/file.txt");

    assert_eq!(fs.entry("/root/a/b/file.txt"), Some(MockEntry::File));
    assert_eq!(fs.entry("/root/a/b"), Some(MockEntry::Dir));
    assert!(fs.is_dir(Path::new("/root/a")));
    assert!(fs.exists(Path::new("/root/a/./b/../b/file.txt")));
    assert!(!fs.is_dir(Path::new("/root/a/b/file.txt")));
    assert!(!fs.exists(Path::new("/root/c")));
}

#[test]
fn mock_fs_canonicalize_normalizes_existing_paths_only() {
    let fs = MockFileSystem::new();
    fs.add_dir("/root/a");

    assert_eq!(
        fs.canonicalize(Path::new("/root/./a/../a")).unwrap(),
        Path::new("/root/a")
    );
    assert!(fs.canonicalize(Path::new("/root/missing")).is_err());
}

#[test]
fn mock_fs_mutations() {
    let fs = MockFileSystem::new();
    fs.create_dir_all(Path::new("/root/d/e")).unwrap();
    fs.create_file(Path::new("/root/d/e/old")).unwrap();

    fs.rename(Path::new("/root/d/e/old"), Path::new("/root/d/e/new")).unwrap();
    assert!(!fs.exists(Path::new("/root/d/e/old")));
    assert_eq!(fs.entry("/root/d/e/new"), Some(MockEntry::File));

    fs.remove_file(Path::new("/root/d/e/new")).unwrap();
    assert!(!fs.exists(Path::new("/root/d/e/new")));
    assert!(fs.remove_file(Path::new("/root/d/e/new")).is_err());

    fs.remove_dir_all(Path::new("/root/d")).unwrap();
    assert!(!fs.exists(Path::new("/root/d/e")));
    assert!(fs.exists(Path::new("/root")));
}

#[test]
fn real_fs_round_trips_through_a_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let fs = RealFileSystem;
    let root = fs.canonicalize(dir.path()).unwrap();

    fs.create_dir_all(&root.join("x/y")).unwrap();
    fs.create_file(&root.join("x/y/f")).unwrap();
    assert!(fs.is_dir(&root.join("x/y")));
    assert!(fs.exists(&root.join("x/y/f")));

    fs.rename(&root.join("x/y/f"), &root.join("x/g")).unwrap();
    assert!(!fs.exists(&root.join("x/y/f")));
    fs.remove_file(&root.join("x/g")).unwrap();
    fs.remove_dir_all(&root.join("x")).unwrap();
    assert!(!fs.exists(&root.join("x")));
}
