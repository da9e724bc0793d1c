use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use log::warn;

const DEFAULT_PORT: u16 = 5004;

/// Application configuration and constants
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose Markdown files are served
    pub root_dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    /// Entry script name stripped from the front of request paths, e.g. `index.php`
    pub entry_prefix: Option<String>,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            entry_prefix: None,
        }
    }

    /// Create configuration with custom values
    pub fn with_custom(
        root_dir: PathBuf,
        port: Option<u16>,
        host: Option<IpAddr>,
        entry_prefix: Option<String>,
    ) -> Self {
        Self {
            root_dir,
            host: host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: port.unwrap_or(DEFAULT_PORT),
            entry_prefix: entry_prefix.filter(|p| !p.is_empty()),
        }
    }

    /// Read `MDREADER_ROOT`, `MDREADER_HOST`, `MDREADER_PORT` and
    /// `MDREADER_ENTRY_PREFIX`, keeping defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let root_dir = lookup("MDREADER_ROOT").map(PathBuf::from);

        let host = lookup("MDREADER_HOST").and_then(|raw| match raw.parse::<IpAddr>() {
            Ok(host) => Some(host),
            Err(_) => {
                warn!("Ignoring invalid MDREADER_HOST '{}'", raw);
                None
            }
        });

        let port = lookup("MDREADER_PORT").and_then(|raw| match raw.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                warn!("Ignoring invalid MDREADER_PORT '{}'", raw);
                None
            }
        });

        Self::with_custom(
            root_dir.unwrap_or_else(|| PathBuf::from(".")),
            port,
            host,
            lookup("MDREADER_ENTRY_PREFIX"),
        )
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_serve_the_working_directory() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.root_dir, PathBuf::from("."));
        assert_eq!(config.socket_addr(), "0.0.0.0:5004".parse().unwrap());
        assert!(config.entry_prefix.is_none());
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("MDREADER_ROOT", "/srv/wiki"),
            ("MDREADER_HOST", "127.0.0.1"),
            ("MDREADER_PORT", "8080"),
            ("MDREADER_ENTRY_PREFIX", "index.php"),
        ]));
        assert_eq!(config.root_dir, PathBuf::from("/srv/wiki"));
        assert_eq!(config.socket_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.entry_prefix.as_deref(), Some("index.php"));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("MDREADER_HOST", "not-an-ip"),
            ("MDREADER_PORT", "99999"),
            ("MDREADER_ENTRY_PREFIX", ""),
        ]));
        assert_eq!(config.socket_addr(), "0.0.0.0:5004".parse().unwrap());
        assert!(config.entry_prefix.is_none());
    }
}
