#![no_main]

use libfuzzer_sys::fuzz_target;
use shark_store::{MemoryStoreConfig, Options};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(options) = Options::parse(text) {
            let _ = MemoryStoreConfig::from_options(&options);
        }
    }
});
