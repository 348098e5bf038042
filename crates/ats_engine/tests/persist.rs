use std::fs;

use ats_core::{CandidateQuery, JobQuery};
use ats_engine::{
    ensure_output_dir, load_snapshot, save_snapshot, seed_store, AtomicFileWriter, EntityStore,
    PersistError, SeedSettings, STORE_FILENAME,
};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("data");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("store.ron", "one").unwrap();
    let second = writer.write("store.ron", "two").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "two");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(matches!(
        writer.write("store.ron", "data"),
        Err(PersistError::OutputDir(_))
    ));
    assert!(!file_path.with_file_name("store.ron").exists());
}

#[test]
fn missing_store_loads_as_none() {
    let temp = TempDir::new().unwrap();
    assert!(load_snapshot(temp.path()).unwrap().is_none());
}

#[test]
fn seeded_store_survives_save_and_load() {
    let temp = TempDir::new().unwrap();
    let store = EntityStore::new();
    let settings = SeedSettings {
        jobs: 4,
        candidates: 30,
        assessments: 1,
    };
    seed_store(&store, &settings, &mut ChaCha8Rng::seed_from_u64(5)).unwrap();

    let path = save_snapshot(temp.path(), &store.snapshot()).unwrap();
    assert_eq!(path.file_name().unwrap(), STORE_FILENAME);

    let restored = EntityStore::from_snapshot(load_snapshot(temp.path()).unwrap().unwrap());
    assert_eq!(
        restored.list_jobs(&JobQuery::all()).items,
        store.list_jobs(&JobQuery::all()).items
    );
    assert_eq!(
        restored.list_candidates(&CandidateQuery::all()).items,
        store.list_candidates(&CandidateQuery::all()).items
    );
    assert_eq!(restored.snapshot().next_id, store.snapshot().next_id);
}

#[test]
fn corrupt_store_is_a_decode_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(STORE_FILENAME), "(jobs: [").unwrap();
    assert!(matches!(
        load_snapshot(temp.path()),
        Err(PersistError::Decode(_))
    ));
}
