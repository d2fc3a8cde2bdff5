use std::fs;

use scout_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("youtube_channels.csv", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "youtube_channels.csv");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("youtube_channels.csv", b"world".as_slice()).unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");

    // Only the target remains; temp files are renamed away.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn rejects_file_names_with_separators() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let result = writer.write("../escape.csv", "data");
    assert!(matches!(result, Err(PersistError::InvalidFileName(_))));
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("youtube_channels.csv", "data");
    assert!(matches!(result, Err(PersistError::OutputDir(_))));
    assert!(!file_path.with_file_name("youtube_channels.csv").exists());
}
