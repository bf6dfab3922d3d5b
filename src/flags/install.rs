//! Flags for `docker/ucp install`

use super::{Flags, NetworkOptions};
use std::fmt;
use std::str::FromStr;

/// Swarm scheduling strategy for a new control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwarmScheduler {
    /// UCP's own default; no flag is emitted
    #[default]
    Spread,
    Binpack,
    Random,
}

impl SwarmScheduler {
    /// The flag selecting this strategy, if it has one
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            SwarmScheduler::Spread => None,
            SwarmScheduler::Binpack => Some("--binpack"),
            SwarmScheduler::Random => Some("--random"),
        }
    }
}

impl FromStr for SwarmScheduler {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "spread" => Ok(SwarmScheduler::Spread),
            "binpack" => Ok(SwarmScheduler::Binpack),
            "random" => Ok(SwarmScheduler::Random),
            other => Err(format!(
                "\"{}\" does not match \"^(spread|binpack|random)$\"",
                other
            )),
        }
    }
}

impl fmt::Display for SwarmScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwarmScheduler::Spread => write!(f, "spread"),
            SwarmScheduler::Binpack => write!(f, "binpack"),
            SwarmScheduler::Random => write!(f, "random"),
        }
    }
}

/// Options accepted by the control plane installer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub host_address: Option<String>,
    /// Anonymous tracking, on unless explicitly disabled
    pub tracking: bool,
    /// Usage reporting, on unless explicitly disabled
    pub usage: bool,
    pub version: Option<String>,
    pub swarm_port: Option<u16>,
    pub controller_port: Option<u16>,
    pub preserve_certs: bool,
    pub external_ca: bool,
    pub swarm_scheduler: Option<SwarmScheduler>,
    pub network: NetworkOptions,
    pub extra_parameters: Vec<String>,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            admin_username: None,
            admin_password: None,
            host_address: None,
            tracking: true,
            usage: true,
            version: None,
            swarm_port: None,
            controller_port: None,
            preserve_certs: false,
            external_ca: false,
            swarm_scheduler: None,
            network: NetworkOptions::default(),
            extra_parameters: Vec::new(),
        }
    }
}

/// Build the argument string for `install`
pub fn install_flags(opts: &InstallOptions) -> Flags {
    let mut flags = Flags::new();

    flags
        .quoted_opt("--admin-username", opts.admin_username.as_deref())
        .secret_opt("--admin-password", opts.admin_password.as_deref())
        .quoted_opt("--host-address", opts.host_address.as_deref());

    if !opts.tracking {
        flags.switch("--disable-tracking");
    }
    if !opts.usage {
        flags.switch("--disable-usage");
    }

    flags
        .quoted_opt("--image-version", opts.version.as_deref())
        .quoted_opt("--swarm-port", opts.swarm_port)
        .quoted_opt("--controller-port", opts.controller_port);

    if opts.preserve_certs {
        flags.switch("--preserve-certs");
    }
    if opts.external_ca {
        flags.switch("--external-ucp-ca");
    }
    if let Some(flag) = opts.swarm_scheduler.and_then(|s| s.flag()) {
        flags.switch(flag);
    }

    opts.network.append_to(&mut flags, "--dns-opt");
    flags.raw(&opts.extra_parameters);
    flags
}
