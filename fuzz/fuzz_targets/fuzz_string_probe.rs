#![no_main]

use libfuzzer_sys::fuzz_target;
use shark_store::marshal::string_from_api;

// The first byte picks the length the probe reports, the rest is what it
// writes into the buffer.
fuzz_target!(|data: &[u8]| {
    let Some((&reported, payload)) = data.split_first() else {
        return;
    };
    let reported = reported as isize - 16;

    let result = string_from_api(|buf| {
        if let Some(buf) = buf {
            let n = payload.len().min(buf.len());
            buf[..n].copy_from_slice(&payload[..n]);
        }
        reported
    });

    if let Ok(s) = result {
        assert_eq!(s.len() as isize, reported);
    }
});
