//! Manifest loading and schema resolution
//!
//! Manifests are parsed into untyped [`Settings`] sections, then resolved
//! once into [`UcpConfig`] and [`DtrConfig`] with defaults applied and every
//! value type-checked.

pub mod dtr;
pub mod manifest;
pub mod settings;
pub mod ucp;

pub use dtr::DtrConfig;
pub use manifest::Manifest;
pub use settings::{Settings, UNDEF};
pub use ucp::UcpConfig;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Whether the product should be present on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl FromStr for Ensure {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "present" => Ok(Ensure::Present),
            "absent" => Ok(Ensure::Absent),
            other => Err(format!("\"{}\" does not match \"^(present|absent)$\"", other)),
        }
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ensure::Present => write!(f, "present"),
            Ensure::Absent => write!(f, "absent"),
        }
    }
}
