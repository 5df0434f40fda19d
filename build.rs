fn main() {
    // ESP-IDF link/env plumbing is only wanted for firmware builds; host
    // builds (tests, fuzzing) must not require the xtensa toolchain.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
