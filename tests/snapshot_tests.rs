mod common;

use std::sync::Arc;

use common::new_file;
use shark_store::prelude::*;
use shark_store::{memory_store_from_options, MemoryStore, MemoryStoreConfig, Options};
use tempfile::TempDir;

#[test]
fn test_save_and_load() {
    let (store, mut file) = new_file("galaxies.hdf5");
    let mut halos = file.create_group("halos").unwrap();
    halos.create_group("h1").unwrap();
    halos
        .create_dataset("mvir", &DataType::Float32, &DataSpace::simple([16]))
        .unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    store.save(&path).unwrap();

    let loaded = Arc::new(MemoryStore::load(&path, MemoryStoreConfig::default()).unwrap());
    assert_eq!(loaded.snapshot(), store.snapshot());

    let file = File::open(loaded.clone(), "galaxies.hdf5").unwrap();
    let halos = file.open_group("halos").unwrap();
    assert_eq!(halos.child_names().unwrap(), vec!["h1", "mvir"]);
    let mvir = halos.open_dataset("mvir").unwrap();
    assert_eq!(mvir.data_space().unwrap().dims(), &[16]);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = MemoryStore::load(dir.path().join("nope.json"), MemoryStoreConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Io);
}

#[test]
fn test_store_from_options() {
    let options = Options::parse("store.read_only = true").unwrap();
    let store = memory_store_from_options(&options).unwrap();
    let err = File::create(store, "out.hdf5").unwrap_err();
    assert_eq!(err.kind(), FailureKind::InvalidArgument);
    assert!(err.to_string().contains("read-only"));

    let options = Options::parse("store.max_open_handles = lots").unwrap();
    let err = memory_store_from_options(&options).unwrap_err();
    assert_eq!(err.kind(), FailureKind::InvalidOption);
}

#[test]
fn test_handle_limit_surfaces_as_io() {
    let options = Options::parse("store.max_open_handles = 2").unwrap();
    let store = memory_store_from_options(&options).unwrap();
    let mut file = File::create(store.clone(), "small.hdf5").unwrap();
    let _halos = file.create_group("halos").unwrap();
    let err = file.open_group("halos").unwrap_err();
    assert_eq!(err.kind(), FailureKind::Io);
    assert_eq!(store.open_handles(), 2);
}
