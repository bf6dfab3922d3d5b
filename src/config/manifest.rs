//! Manifest file loading
//!
//! A manifest is a YAML (or JSON) document with up to two sections:
//!
//! ```yaml
//! ucp:
//!   controller: true
//!   subject_alternative_names: [ucp.example.com]
//! dtr:
//!   install: true
//!   replica_id: "0123456789ab"
//! ```

use super::dtr::DtrConfig;
use super::settings::Settings;
use super::ucp::UcpConfig;
use crate::error::{Result, UcpError};
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default manifest file names, searched in the working directory
pub const DEFAULT_MANIFEST_FILES: &[&str] =
    &["docker-ucp.yaml", "docker-ucp.yml", "docker-ucp.json"];

pub const UCP_SECTION: &str = "ucp";
pub const DTR_SECTION: &str = "dtr";

/// Parsed manifest, sections still untyped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub ucp: Option<Settings>,
    pub dtr: Option<Settings>,
}

impl Manifest {
    /// Find a manifest in `dir`, falling back to the per-user config file
    pub fn find(dir: &Path) -> Option<PathBuf> {
        for name in DEFAULT_MANIFEST_FILES {
            let path = dir.join(name);
            if path.exists() {
                return Some(path);
            }
        }

        let user = Self::user_path()?;
        user.exists().then_some(user)
    }

    /// `<config dir>/docker-ucp/config.yaml`
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docker-ucp").join("config.yaml"))
    }

    /// Parse manifest from path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            UcpError::ConfigParse(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let document = if is_json {
            serde_json::from_str(&content)?
        } else {
            parse_yaml(&content)?
        };

        tracing::debug!("Loaded manifest from {}", path.display());
        Self::from_value(document)
    }

    /// Parse manifest from a YAML string
    pub fn parse_str(content: &str) -> Result<Self> {
        Self::from_value(parse_yaml(content)?)
    }

    fn from_value(document: Value) -> Result<Self> {
        let mut manifest = Self::default();

        let sections = match document {
            Value::Object(map) => map,
            Value::Null => return Ok(manifest),
            other => {
                return Err(UcpError::ConfigParse(format!(
                    "manifest must be a mapping, got {}",
                    other
                )))
            }
        };

        for (name, value) in sections {
            match name.as_str() {
                UCP_SECTION => manifest.ucp = Some(Settings::from_value(UCP_SECTION, value)?),
                DTR_SECTION => manifest.dtr = Some(Settings::from_value(DTR_SECTION, value)?),
                other => {
                    return Err(UcpError::ConfigParse(format!(
                        "unknown manifest section '{}' (expected '{}' or '{}')",
                        other, UCP_SECTION, DTR_SECTION
                    )))
                }
            }
        }

        Ok(manifest)
    }

    /// Apply a `[section.]key=value` override. The section defaults to `ucp`
    /// and the value is read as YAML, so `false` and `1000` keep their types.
    pub fn apply_override(&mut self, spec: &str) -> Result<()> {
        let captures = override_pattern().captures(spec).ok_or_else(|| {
            UcpError::InvalidConfig(format!(
                "override '{}' is not of the form [ucp.|dtr.]key=value",
                spec
            ))
        })?;

        let section = captures.get(1).map_or(UCP_SECTION, |m| m.as_str());
        let key = &captures[2];
        let raw = &captures[3];
        let value = if raw.is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        };

        let target = match section {
            DTR_SECTION => &mut self.dtr,
            _ => &mut self.ucp,
        };
        target
            .get_or_insert_with(|| Settings::new(section))
            .set(key, value);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.ucp.is_none() && self.dtr.is_none()
    }

    /// Resolve the `ucp` section, if present
    pub fn ucp_config(&self) -> Result<Option<UcpConfig>> {
        self.ucp.as_ref().map(UcpConfig::from_settings).transpose()
    }

    /// Resolve the `dtr` section, if present
    pub fn dtr_config(&self) -> Result<Option<DtrConfig>> {
        self.dtr.as_ref().map(DtrConfig::from_settings).transpose()
    }
}

fn parse_yaml(content: &str) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(content)
        .map_err(|e| UcpError::ConfigParse(format!("Failed to parse YAML: {}", e)))
}

fn override_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(ucp|dtr)\.)?([a-z_][a-z0-9_]*)=(.*)$").expect("override pattern is valid")
    })
}
