//! Configuration for apiros
//!
//! Centralized configuration with sensible defaults.

/// Default plaintext API port
pub const DEFAULT_PORT: u16 = 8728;

/// Default upper bound on a single incoming word (64 MiB)
pub const DEFAULT_MAX_WORD_LEN: u32 = 64 * 1024 * 1024;

/// Main configuration for a session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Router host name or address
    pub host: String,

    /// API port
    pub port: u16,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = block indefinitely)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block indefinitely)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Largest word length accepted from the peer
    pub max_word_len: u32,

    /// How `login` authenticates
    pub login_method: LoginMethod,

    /// Emit every word sent/received through tracing
    pub debug: bool,
}

/// Authentication scheme used by `Session::login`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMethod {
    /// `/login`, then `/login =name= =response=00<md5>` against the returned challenge
    #[default]
    Challenge,

    /// `/login =name= =password=` in one round-trip
    ///
    /// The second `/login` with a challenge response is sent only when the
    /// router answers with a `ret` (older routers), so a successful plain
    /// login is a single exchange rather than two.
    Plain,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            max_word_len: DEFAULT_MAX_WORD_LEN,
            login_method: LoginMethod::Challenge,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` as used for logging and resolution
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the router host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the API port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the largest accepted incoming word
    pub fn max_word_len(mut self, len: u32) -> Self {
        self.config.max_word_len = len;
        self
    }

    /// Set the login method
    pub fn login_method(mut self, method: LoginMethod) -> Self {
        self.config.login_method = method;
        self
    }

    /// Enable word-level tracing
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
