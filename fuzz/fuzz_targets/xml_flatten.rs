#![no_main]
use libfuzzer_sys::fuzz_target;
use ldmlprune::xml::{Config, flatten_bytes_with_config};

fuzz_target!(|data: &[u8]| {
    if let Ok(records) = flatten_bytes_with_config(data, Config::default()) {
        let _ = ldmlprune::classify(&records);
    }
});
