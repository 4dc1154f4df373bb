//! Service settings loaded via OrthoConfig.
//!
//! Values come from `SQLEGALIZE_*` environment variables, configuration
//! files and command-line flags, in OrthoConfig's usual precedence.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080/api/v2";

/// Listener, link base and catalogue location.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SQLEGALIZE")]
pub struct ServiceSettings {
    /// Socket address to bind, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<SocketAddr>,
    /// Absolute API root used in hypermedia links.
    pub public_url: Option<String>,
    /// JSON catalogue file; the built-in demo catalogue is used when unset.
    pub catalogue_path: Option<PathBuf>,
}

impl ServiceSettings {
    /// Configured bind address or the default.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Configured public URL or the default.
    pub fn public_url(&self) -> &str {
        self.public_url.as_deref().unwrap_or(DEFAULT_PUBLIC_URL)
    }

    /// Configured catalogue file, if any.
    pub fn catalogue_path(&self) -> Option<&PathBuf> {
        self.catalogue_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("sqlegalize")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("SQLEGALIZE_BIND_ADDR", None::<String>),
            ("SQLEGALIZE_PUBLIC_URL", None::<String>),
            ("SQLEGALIZE_CATALOGUE_PATH", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(settings.public_url(), DEFAULT_PUBLIC_URL);
        assert!(settings.catalogue_path().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("SQLEGALIZE_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "SQLEGALIZE_PUBLIC_URL",
                Some("https://relations.example.test/api/v2".to_owned()),
            ),
            (
                "SQLEGALIZE_CATALOGUE_PATH",
                Some("/etc/sqlegalize/catalogue.json".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(settings.public_url(), "https://relations.example.test/api/v2");
        assert_eq!(
            settings.catalogue_path(),
            Some(&PathBuf::from("/etc/sqlegalize/catalogue.json"))
        );
    }
}
