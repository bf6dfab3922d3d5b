//! Trusted registry configuration

use super::settings::Settings;
use super::Ensure;
use crate::error::Result;
use crate::flags::DtrOptions;

/// Default registry bootstrapper image
pub const DEFAULT_DTR_IMAGE: &str = "docker/dtr";

const KNOWN_KEYS: &[&str] = &[
    "ensure",
    "install",
    "join",
    "dtr_version",
    "dtr_external_url",
    "ucp_node",
    "ucp_username",
    "ucp_password",
    "ucp_insecure_tls",
    "dtr_ucp_url",
    "replica_id",
    "ucp_ca",
    "dtr_image",
    "legacy_flags",
];

/// Desired state of the registry replica on this host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtrConfig {
    pub ensure: Ensure,
    /// Bootstrap a new registry
    pub install: bool,
    /// Add a replica to an existing registry
    pub join: bool,
    pub dtr_version: Option<String>,
    pub dtr_external_url: Option<String>,
    pub ucp_node: Option<String>,
    pub ucp_username: Option<String>,
    pub ucp_password: Option<String>,
    pub ucp_insecure_tls: Option<bool>,
    pub dtr_ucp_url: Option<String>,
    pub replica_id: Option<String>,
    pub ucp_ca: Option<String>,
    pub dtr_image: String,
    pub legacy_flags: bool,
}

impl Default for DtrConfig {
    fn default() -> Self {
        Self {
            ensure: Ensure::Present,
            install: false,
            join: false,
            dtr_version: None,
            dtr_external_url: None,
            ucp_node: None,
            ucp_username: None,
            ucp_password: None,
            ucp_insecure_tls: None,
            dtr_ucp_url: None,
            replica_id: None,
            ucp_ca: None,
            dtr_image: DEFAULT_DTR_IMAGE.to_string(),
            legacy_flags: true,
        }
    }
}

impl DtrConfig {
    /// Resolve and validate a `dtr` manifest section
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.unknown_keys(KNOWN_KEYS);

        Ok(Self {
            ensure: settings.parsed::<Ensure>("ensure")?.unwrap_or_default(),
            install: settings.boolean("install", false)?,
            join: settings.boolean("join", false)?,
            dtr_version: settings.string("dtr_version")?,
            dtr_external_url: settings.string("dtr_external_url")?,
            ucp_node: settings.string("ucp_node")?,
            ucp_username: settings.string("ucp_username")?,
            ucp_password: settings.string("ucp_password")?,
            ucp_insecure_tls: settings.opt_boolean("ucp_insecure_tls")?,
            dtr_ucp_url: settings.string("dtr_ucp_url")?,
            replica_id: settings.string("replica_id")?,
            ucp_ca: settings.string("ucp_ca")?,
            dtr_image: settings.string_or("dtr_image", DEFAULT_DTR_IMAGE)?,
            legacy_flags: settings.boolean("legacy_flags", true)?,
        })
    }

    pub fn dtr_options(&self) -> DtrOptions {
        DtrOptions {
            dtr_external_url: self.dtr_external_url.clone(),
            dtr_version: self.dtr_version.clone(),
            ucp_node: self.ucp_node.clone(),
            ucp_username: self.ucp_username.clone(),
            ucp_password: self.ucp_password.clone(),
            ucp_insecure_tls: self.ucp_insecure_tls,
            dtr_ucp_url: self.dtr_ucp_url.clone(),
            replica_id: self.replica_id.clone(),
            ucp_ca: self.ucp_ca.clone(),
            legacy: self.legacy_flags,
        }
    }

    /// Bootstrapper image, tagged with `dtr_version` when one is set
    pub fn image(&self) -> String {
        match &self.dtr_version {
            Some(version) => format!("{}:{}", self.dtr_image, version),
            None => self.dtr_image.clone(),
        }
    }
}
