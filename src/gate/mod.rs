//! Deciding what to run
//!
//! Picks the action a resolved configuration asks for, checks that the
//! parameters the action depends on are present, and describes the marker
//! container guarding it.

pub mod guard;

pub use guard::{Guard, Marker, DTR_NGINX, UCP_CONTROLLER, UCP_PROXY};

use crate::config::{DtrConfig, Ensure, UcpConfig};
use crate::error::{Result, UcpError};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Join protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinProtocol {
    /// `docker/ucp join` with fingerprint and URL
    V1,
    /// `docker swarm join` with a token
    V2,
}

impl JoinProtocol {
    /// V2 when the major component of `version` is 2 or later
    pub fn detect(version: Option<&str>) -> Self {
        match version.and_then(major_version) {
            Some(major) if major >= 2 => JoinProtocol::V2,
            _ => JoinProtocol::V1,
        }
    }
}

fn major_version(version: &str) -> Option<u64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN
        .get_or_init(|| Regex::new(r"^\s*v?(\d+)").expect("version pattern is valid"));
    re.captures(version)?.get(1)?.as_str().parse().ok()
}

/// Control plane action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UcpAction {
    Install,
    Join(JoinProtocol),
    Uninstall,
}

impl UcpAction {
    /// Pick and validate the action for `config`
    pub fn select(config: &UcpConfig) -> Result<Self> {
        if config.ensure == Ensure::Absent {
            if config.ucp_id.is_none() {
                return Err(UcpError::validation(
                    "When passing ensure => absent you must also provide the UCP id",
                ));
            }
            return Ok(UcpAction::Uninstall);
        }

        if config.controller {
            return Ok(UcpAction::Install);
        }

        match JoinProtocol::detect(config.version.as_deref()) {
            JoinProtocol::V1 => {
                if config.fingerprint.is_none() {
                    return Err(UcpError::validation(
                        "When joining UCP you must provide a fingerprint",
                    ));
                }
                if config.ucp_url.is_none() {
                    return Err(UcpError::validation("When joining UCP you must provide a URL"));
                }
                Ok(UcpAction::Join(JoinProtocol::V1))
            }
            JoinProtocol::V2 => {
                if config.token.is_none() {
                    return Err(UcpError::validation(
                        "When joining UCP v2 you must provide a join token",
                    ));
                }
                if config.ucp_manager.is_none() {
                    return Err(UcpError::validation(
                        "When joining UCP v2 you must provide the UCP manager address",
                    ));
                }
                Ok(UcpAction::Join(JoinProtocol::V2))
            }
        }
    }

    /// Guard for this action, markers prefixed with `namespace`
    pub fn guard(&self, namespace: &str) -> Guard {
        match self {
            UcpAction::Install => Guard::Unless(Marker::namespaced(namespace, UCP_CONTROLLER)),
            UcpAction::Join(_) => Guard::Unless(Marker::namespaced(namespace, UCP_PROXY)),
            UcpAction::Uninstall => Guard::OnlyIf(Marker::namespaced(namespace, UCP_PROXY)),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            UcpAction::Install => "Install Docker Universal Control Plane",
            UcpAction::Join(JoinProtocol::V1) => "Join Docker Universal Control Plane v1",
            UcpAction::Join(JoinProtocol::V2) => "Join Docker Universal Control Plane v2",
            UcpAction::Uninstall => "Uninstall Docker Universal Control Plane",
        }
    }
}

impl fmt::Display for UcpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Registry action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DtrAction {
    Install,
    Join,
    Uninstall,
}

impl DtrAction {
    /// Pick and validate the action for `config`
    pub fn select(config: &DtrConfig) -> Result<Self> {
        if config.ensure == Ensure::Absent {
            return Ok(DtrAction::Uninstall);
        }

        match (config.install, config.join) {
            (true, false) => Ok(DtrAction::Install),
            (false, true) => Ok(DtrAction::Join),
            (true, true) => Err(UcpError::validation(
                "DTR install and join are mutually exclusive",
            )),
            (false, false) => Err(UcpError::validation(
                "When ensure => present you must set either install or join for DTR",
            )),
        }
    }

    /// Guard for this action
    pub fn guard(&self, replica_id: Option<&str>) -> Guard {
        let marker = match replica_id {
            Some(id) => Marker::new(&format!("{}-{}", DTR_NGINX, id)),
            None => Marker::new(DTR_NGINX),
        };
        match self {
            DtrAction::Install | DtrAction::Join => Guard::Unless(marker),
            DtrAction::Uninstall => Guard::OnlyIf(marker),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DtrAction::Install => "Install dtr",
            DtrAction::Join => "Join dtr",
            DtrAction::Uninstall => "Uninstall dtr",
        }
    }

    /// Bootstrapper subcommand
    pub fn subcommand(&self) -> &'static str {
        match self {
            DtrAction::Install => "install",
            DtrAction::Join => "join",
            DtrAction::Uninstall => "remove",
        }
    }
}

impl fmt::Display for DtrAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
