//! Control plane configuration

use super::settings::Settings;
use super::Ensure;
use crate::error::Result;
use crate::flags::{
    InstallOptions, JoinOptions, NetworkOptions, SwarmJoinOptions, SwarmScheduler, UninstallOptions,
};
use std::path::PathBuf;

/// Default Docker socket mounted into the bootstrapper
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/docker.sock";

/// Default bootstrapper image
pub const DEFAULT_UCP_IMAGE: &str = "docker/ucp";

const KNOWN_KEYS: &[&str] = &[
    "ensure",
    "controller",
    "host_address",
    "tracking",
    "usage",
    "version",
    "swarm_port",
    "controller_port",
    "preserve_certs",
    "external_ca",
    "swarm_scheduler",
    "dns_servers",
    "dns_search_domains",
    "dns_options",
    "subject_alternative_names",
    "extra_parameters",
    "replica",
    "fingerprint",
    "ucp_url",
    "ucp_id",
    "preserve_certs_on_delete",
    "preserve_images_on_delete",
    "username",
    "password",
    "docker_socket_path",
    "license_file",
    "token",
    "listen_address",
    "advertise_address",
    "ucp_manager",
    "ucp_image",
    "marker_namespace",
];

/// Desired state of the control plane on this host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UcpConfig {
    pub ensure: Ensure,
    /// Install a new controller instead of joining an existing one
    pub controller: bool,
    pub host_address: Option<String>,
    pub tracking: bool,
    pub usage: bool,
    pub version: Option<String>,
    pub swarm_port: Option<u16>,
    pub controller_port: Option<u16>,
    pub preserve_certs: bool,
    pub external_ca: bool,
    pub swarm_scheduler: Option<SwarmScheduler>,
    pub dns_servers: Vec<String>,
    pub dns_search_domains: Vec<String>,
    pub dns_options: Vec<String>,
    pub subject_alternative_names: Vec<String>,
    pub extra_parameters: Vec<String>,
    pub replica: bool,
    pub fingerprint: Option<String>,
    pub ucp_url: Option<String>,
    pub ucp_id: Option<String>,
    pub preserve_certs_on_delete: bool,
    pub preserve_images_on_delete: bool,
    pub username: String,
    pub password: String,
    pub docker_socket_path: PathBuf,
    pub license_file: Option<PathBuf>,
    pub token: Option<String>,
    pub listen_address: Option<String>,
    pub advertise_address: Option<String>,
    pub ucp_manager: Option<String>,
    pub ucp_image: String,
    /// Prefix of the marker containers, `<namespace>/ucp-proxy`
    pub marker_namespace: String,
}

impl Default for UcpConfig {
    fn default() -> Self {
        Self {
            ensure: Ensure::Present,
            controller: false,
            host_address: None,
            tracking: true,
            usage: true,
            version: None,
            swarm_port: None,
            controller_port: None,
            preserve_certs: false,
            external_ca: false,
            swarm_scheduler: None,
            dns_servers: Vec::new(),
            dns_search_domains: Vec::new(),
            dns_options: Vec::new(),
            subject_alternative_names: Vec::new(),
            extra_parameters: Vec::new(),
            replica: false,
            fingerprint: None,
            ucp_url: None,
            ucp_id: None,
            preserve_certs_on_delete: false,
            preserve_images_on_delete: false,
            username: "admin".to_string(),
            password: "orca".to_string(),
            docker_socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            license_file: None,
            token: None,
            listen_address: None,
            advertise_address: None,
            ucp_manager: None,
            ucp_image: DEFAULT_UCP_IMAGE.to_string(),
            marker_namespace: short_hostname(),
        }
    }
}

/// Host name up to the first dot
pub fn short_hostname() -> String {
    let name = gethostname::gethostname().to_string_lossy().into_owned();
    match name.split_once('.') {
        Some((short, _)) => short.to_string(),
        None => name,
    }
}

impl UcpConfig {
    /// Resolve and validate a `ucp` manifest section
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.unknown_keys(KNOWN_KEYS);
        let defaults = Self::default();

        Ok(Self {
            ensure: settings.parsed::<Ensure>("ensure")?.unwrap_or_default(),
            controller: settings.boolean("controller", defaults.controller)?,
            host_address: settings.string("host_address")?,
            tracking: settings.boolean("tracking", defaults.tracking)?,
            usage: settings.boolean("usage", defaults.usage)?,
            version: settings.string("version")?,
            swarm_port: settings.port("swarm_port")?,
            controller_port: settings.port("controller_port")?,
            preserve_certs: settings.boolean("preserve_certs", defaults.preserve_certs)?,
            external_ca: settings.boolean("external_ca", defaults.external_ca)?,
            swarm_scheduler: settings.parsed::<SwarmScheduler>("swarm_scheduler")?,
            dns_servers: settings.list("dns_servers")?,
            dns_search_domains: settings.list("dns_search_domains")?,
            dns_options: settings.list("dns_options")?,
            subject_alternative_names: settings.list("subject_alternative_names")?,
            extra_parameters: settings.list("extra_parameters")?,
            replica: settings.boolean("replica", defaults.replica)?,
            fingerprint: settings.string("fingerprint")?,
            ucp_url: settings.string("ucp_url")?,
            ucp_id: settings.string("ucp_id")?,
            preserve_certs_on_delete: settings
                .boolean("preserve_certs_on_delete", defaults.preserve_certs_on_delete)?,
            preserve_images_on_delete: settings
                .boolean("preserve_images_on_delete", defaults.preserve_images_on_delete)?,
            username: settings.string_or("username", &defaults.username)?,
            password: settings.string_or("password", &defaults.password)?,
            docker_socket_path: settings
                .absolute_path("docker_socket_path")?
                .unwrap_or(defaults.docker_socket_path),
            license_file: settings.absolute_path("license_file")?,
            token: settings.string("token")?,
            listen_address: settings.string("listen_address")?,
            advertise_address: settings.string("advertise_address")?,
            ucp_manager: settings.string("ucp_manager")?,
            ucp_image: settings.string_or("ucp_image", &defaults.ucp_image)?,
            marker_namespace: settings.string_or("marker_namespace", &defaults.marker_namespace)?,
        })
    }

    fn network(&self) -> NetworkOptions {
        NetworkOptions {
            dns_servers: self.dns_servers.clone(),
            dns_search_domains: self.dns_search_domains.clone(),
            dns_options: self.dns_options.clone(),
            subject_alternative_names: self.subject_alternative_names.clone(),
        }
    }

    pub fn install_options(&self) -> InstallOptions {
        InstallOptions {
            admin_username: Some(self.username.clone()),
            admin_password: Some(self.password.clone()),
            host_address: self.host_address.clone(),
            tracking: self.tracking,
            usage: self.usage,
            version: self.version.clone(),
            swarm_port: self.swarm_port,
            controller_port: self.controller_port,
            preserve_certs: self.preserve_certs,
            external_ca: self.external_ca,
            swarm_scheduler: self.swarm_scheduler,
            network: self.network(),
            extra_parameters: self.extra_parameters.clone(),
        }
    }

    pub fn join_options(&self) -> JoinOptions {
        JoinOptions {
            host_address: self.host_address.clone(),
            tracking: self.tracking,
            usage: self.usage,
            replica: self.replica,
            version: self.version.clone(),
            fingerprint: self.fingerprint.clone(),
            ucp_url: self.ucp_url.clone(),
            network: self.network(),
            extra_parameters: self.extra_parameters.clone(),
        }
    }

    pub fn swarm_join_options(&self) -> SwarmJoinOptions {
        SwarmJoinOptions {
            token: self.token.clone(),
            listen_address: self.listen_address.clone(),
            advertise_address: self.advertise_address.clone(),
            ucp_manager: self.ucp_manager.clone(),
            extra_parameters: self.extra_parameters.clone(),
        }
    }

    pub fn uninstall_options(&self) -> UninstallOptions {
        UninstallOptions {
            preserve_certs_on_delete: self.preserve_certs_on_delete,
            preserve_images_on_delete: self.preserve_images_on_delete,
            ucp_id: self.ucp_id.clone(),
            extra_parameters: self.extra_parameters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(value: serde_json::Value) -> Result<UcpConfig> {
        UcpConfig::from_settings(&Settings::from_value("ucp", value).unwrap())
    }

    #[test]
    fn test_minimum_controller_defaults() {
        let config = resolve(json!({ "controller": true })).unwrap();
        assert_eq!(config.ensure, Ensure::Present);
        assert!(config.controller);
        assert!(config.tracking);
        assert!(config.usage);
        assert!(!config.external_ca);
        assert!(!config.preserve_certs);
        assert!(!config.replica);
        assert!(!config.preserve_certs_on_delete);
        assert!(!config.preserve_images_on_delete);
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "orca");
        assert_eq!(config.docker_socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));
    }

    #[test]
    fn test_invalid_booleans() {
        for key in [
            "tracking",
            "usage",
            "preserve_certs",
            "controller",
            "external_ca",
            "preserve_certs_on_delete",
            "preserve_images_on_delete",
            "replica",
        ] {
            let err = resolve(json!({ key: "invalid" })).unwrap_err();
            assert!(err.to_string().contains("is not a boolean"), "{}", key);
        }
    }

    #[test]
    fn test_invalid_paths() {
        for key in ["docker_socket_path", "license_file"] {
            let err = resolve(json!({ key: "invalid" })).unwrap_err();
            assert!(err.to_string().contains("is not an absolute path"), "{}", key);
        }
    }

    #[test]
    fn test_invalid_enums() {
        for key in ["ensure", "swarm_scheduler"] {
            let err = resolve(json!({ key: "invalid" })).unwrap_err();
            assert!(err.to_string().contains("does not match"), "{}", key);
        }
    }

    #[test]
    fn test_invalid_strings() {
        for key in [
            "host_address",
            "version",
            "ucp_url",
            "ucp_id",
            "fingerprint",
            "username",
            "password",
        ] {
            let err = resolve(json!({ key: 1234 })).unwrap_err();
            assert!(err.is_validation(), "{}", key);
        }
    }

    #[test]
    fn test_invalid_ports() {
        for key in ["swarm_port", "controller_port"] {
            let err = resolve(json!({ key: "invalid" })).unwrap_err();
            assert!(err.to_string().contains("expected an integer"), "{}", key);
        }
    }

    #[test]
    fn test_install_options_carry_admin_credentials() {
        let config = resolve(json!({
            "controller": true,
            "subject_alternative_names": "one",
            "swarm_port": 1000,
        }))
        .unwrap();
        let opts = config.install_options();
        assert_eq!(opts.admin_username.as_deref(), Some("admin"));
        assert_eq!(opts.admin_password.as_deref(), Some("orca"));
        assert_eq!(opts.network.subject_alternative_names, vec!["one"]);
        assert_eq!(opts.swarm_port, Some(1000));
    }

    #[test]
    fn test_join_and_uninstall_options() {
        let config = resolve(json!({
            "fingerprint": "12345",
            "ucp_url": "https://ucp",
            "replica": true,
            "ucp_id": "1",
            "preserve_images_on_delete": true,
        }))
        .unwrap();

        let join = config.join_options();
        assert!(join.replica);
        assert_eq!(join.fingerprint.as_deref(), Some("12345"));

        let uninstall = config.uninstall_options();
        assert_eq!(uninstall.ucp_id.as_deref(), Some("1"));
        assert!(uninstall.preserve_images_on_delete);
        assert!(!uninstall.preserve_certs_on_delete);
    }

    #[test]
    fn test_short_hostname_has_no_domain() {
        assert!(!short_hostname().contains('.'));
    }
}
