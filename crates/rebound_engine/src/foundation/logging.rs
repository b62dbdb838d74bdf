//! Logging setup

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}
