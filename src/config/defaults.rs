//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

pub fn default_host() -> String {
    crate::bancho::DEFAULT_HOST.to_string()
}

pub fn default_port() -> u16 {
    crate::bancho::DEFAULT_PORT
}

pub fn default_log_level() -> String {
    "info".to_string()
}
