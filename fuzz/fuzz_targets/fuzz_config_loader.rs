#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary TOML must either fail to parse, fail validation, or pass; never panic.
fuzz_target!(|data: &str| {
    if let Ok(cfg) = thermolog_config::load_toml(data) {
        let _ = cfg.validate();
    }
});
