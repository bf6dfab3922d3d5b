//! Marker containers and idempotency guards

use serde::Serialize;
use std::fmt;

/// Control plane container present on every node once installed or joined
pub const UCP_PROXY: &str = "ucp-proxy";

/// Control plane container present only on controllers
pub const UCP_CONTROLLER: &str = "ucp-controller";

/// Registry container present on every replica
pub const DTR_NGINX: &str = "dtr-nginx";

/// A container whose existence means an action already happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub namespace: Option<String>,
    pub name: String,
}

impl Marker {
    pub fn new(name: &str) -> Self {
        Self {
            namespace: None,
            name: name.to_string(),
        }
    }

    pub fn namespaced(namespace: &str, name: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
        }
    }

    /// Command that exits 0 exactly when the marker exists
    pub fn inspect_command(&self) -> String {
        format!("docker inspect {}", self)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Precondition evaluated before an action runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "marker", rename_all = "lowercase")]
pub enum Guard {
    /// Run unless the marker exists
    Unless(Marker),
    /// Run only if the marker exists
    OnlyIf(Marker),
}

impl Guard {
    pub fn marker(&self) -> &Marker {
        match self {
            Guard::Unless(marker) | Guard::OnlyIf(marker) => marker,
        }
    }

    /// Command whose exit status decides the guard
    pub fn command(&self) -> String {
        self.marker().inspect_command()
    }

    /// Whether the action should run given the marker's presence
    pub fn should_run(&self, marker_exists: bool) -> bool {
        match self {
            Guard::Unless(_) => !marker_exists,
            Guard::OnlyIf(_) => marker_exists,
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::Unless(_) => write!(f, "unless {}", self.command()),
            Guard::OnlyIf(_) => write!(f, "onlyif {}", self.command()),
        }
    }
}
