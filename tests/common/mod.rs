use std::sync::Arc;

use shark_store::{File, MemoryStore};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

pub fn new_file(name: &str) -> (Arc<MemoryStore>, File) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let file = File::create(store.clone(), name).unwrap();
    (store, file)
}
