/// Default configuration constants used across the system.

/// Default gateway port.
pub const DEFAULT_GATEWAY_PORT: u16 = 18791;

/// Default bind host.
pub const DEFAULT_BIND_HOST: &str = "127.0.0.1";

/// Default retry budget for transient read failures.
pub const DEFAULT_READ_RETRIES: u32 = 2;

/// Maximum size for a config file (1 MB).
pub const MAX_CONFIG_FILE_BYTES: u64 = 1024 * 1024;
