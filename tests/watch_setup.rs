// tests/watch_setup.rs
//
// Everything `Watcher::with_parts` / `Watcher::watch` refuses up front.

mod common;
use crate::common::{MOCK_ROOT, manual_watcher, small_options};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use treewatch::backend::ManualBackend;
use treewatch::errors::WatchError;
use treewatch::fs::mock::MockFileSystem;
use treewatch::watch::{NoIgnore, WatchOptions, Watcher};
use treewatch_test_utils::init_tracing;

#[tokio::test]
async fn missing_subpath_is_rejected_without_registering() {
    init_tracing();
    let (watcher, backend, _fs) = manual_watcher(&[], small_options());

    let err = watcher
        .watch("nope", Arc::new(NoIgnore), CancellationToken::new(), true)
        .unwrap_err();

    assert!(matches!(err, WatchError::SubpathNotFound(ref p) if p == &Path::new(MOCK_ROOT).join("nope")));
    assert!(backend.registrations().is_empty());
}

#[tokio::test]
async fn file_subpath_is_not_a_directory() {
    init_tracing();
    let (watcher, backend, fs) = manual_watcher(&[], small_options());
    fs.add_file(Path::new(MOCK_ROOT).join("plain.txt"));

    let err = watcher
        .watch("plain.txt", Arc::new(NoIgnore), CancellationToken::new(), true)
        .unwrap_err();

    assert!(matches!(err, WatchError::NotADirectory(_)));
    assert!(backend.registrations().is_empty());
}

#[tokio::test]
async fn subpath_escaping_the_root_is_invalid() {
    init_tracing();
    let (watcher, backend, _fs) = manual_watcher(&["a"], small_options());

    for bad in ["../x", "a/../../x", "/etc"] {
        let err = watcher
            .watch(bad, Arc::new(NoIgnore), CancellationToken::new(), true)
            .unwrap_err();
        assert!(
            matches!(err, WatchError::InvalidSubpath { ref path, .. } if path == bad),
            "{bad}: {err}"
        );
    }
    assert!(backend.registrations().is_empty());
}

#[tokio::test]
async fn dotted_subpaths_are_normalized() {
    init_tracing();
    let (watcher, backend, _fs) = manual_watcher(&["a/b"], small_options());
    let cancel = CancellationToken::new();

    let stream = watcher
        .watch("./a/x/../b/", Arc::new(NoIgnore), cancel.clone(), false)
        .unwrap();

    assert_eq!(stream.subpath(), "a/b");
    assert_eq!(
        backend.registrations(),
        vec![(Path::new(MOCK_ROOT).join("a/b"), false)]
    );

    cancel.cancel();
    stream.join().await.unwrap();
}

#[tokio::test]
async fn backend_refusal_surfaces_as_registration_error() {
    init_tracing();
    let (watcher, backend, _fs) = manual_watcher(&["a"], small_options());
    backend.reject_registrations("too many watches");

    let err = watcher
        .watch("a", Arc::new(NoIgnore), CancellationToken::new(), true)
        .unwrap_err();

    match err {
        WatchError::Registration { path, source } => {
            assert_eq!(path, Path::new(MOCK_ROOT).join("a"));
            assert!(source.to_string().contains("too many watches"));
        }
        other => panic!("expected a registration error, got {other:?}"),
    }
    assert!(backend.registrations().is_empty());
}

#[test]
fn watch_outside_a_runtime_is_an_error() {
    let (watcher, backend, _fs) = manual_watcher(&[], small_options());

    let err = watcher
        .watch(".", Arc::new(NoIgnore), CancellationToken::new(), true)
        .unwrap_err();

    assert!(matches!(err, WatchError::Other(_)));
    assert!(backend.registrations().is_empty());
}

#[test]
fn missing_root_is_rejected() {
    let fs = MockFileSystem::new();
    let err = Watcher::with_parts(
        "/not/there",
        Arc::new(fs),
        Arc::new(ManualBackend::new()),
        WatchOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, WatchError::RootNotFound(ref p) if p == &PathBuf::from("/not/there")));
}

#[test]
fn root_must_be_a_directory() {
    let fs = MockFileSystem::new();
    fs.add_file("/watch/file");
    let err = Watcher::with_parts(
        "/watch/file",
        Arc::new(fs),
        Arc::new(ManualBackend::new()),
        WatchOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, WatchError::NotADirectory(_)));
}

#[test]
fn zero_buffers_are_clamped() {
    let (watcher, _backend, _fs) = manual_watcher(
        &[],
        WatchOptions::default()
            .with_backend_buffer(0)
            .with_output_buffer(0),
    );

    assert_eq!(watcher.options().backend_buffer, 1);
    assert_eq!(watcher.options().output_buffer, 1);
    assert_eq!(watcher.root(), Path::new(MOCK_ROOT));
}
