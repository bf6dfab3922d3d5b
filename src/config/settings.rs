//! Typed access to a flat manifest section
//!
//! Manifest values arrive untyped. Every lookup here resolves one key into
//! the type the schema expects, treating a missing key, `null` and the
//! templating sentinel `"undef"` all as "not set".

use crate::error::{Result, UcpError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Placeholder written by templating layers that have no native null
pub const UNDEF: &str = "undef";

/// One section (`ucp` or `dtr`) of a manifest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    section: String,
    values: Map<String, Value>,
}

impl Settings {
    /// Create an empty section
    pub fn new(section: &str) -> Self {
        Self {
            section: section.to_string(),
            values: Map::new(),
        }
    }

    /// Wrap a parsed section. `null` is treated as an empty section.
    pub fn from_value(section: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self {
                section: section.to_string(),
                values,
            }),
            Value::Null => Ok(Self::new(section)),
            other => Err(UcpError::ConfigParse(format!(
                "section '{}' must be a mapping, got {}",
                section, other
            ))),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Set or replace a key
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Keys present in the section
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Raw value for a key, `None` when unset
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.values.get(key)? {
            Value::Null => None,
            Value::String(s) if s == UNDEF => None,
            value => Some(value),
        }
    }

    fn invalid(&self, key: &str, message: impl std::fmt::Display) -> UcpError {
        UcpError::validation(format!("{}.{}: {}", self.section, key, message))
    }

    /// A string-typed key
    pub fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(key, format!("{} is not a string", other))),
        }
    }

    /// A string-typed key with a default
    pub fn string_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.string(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// A boolean key with a default
    pub fn boolean(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.opt_boolean(key)?.unwrap_or(default))
    }

    /// A boolean key where "unset" is meaningful
    pub fn opt_boolean(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.invalid(key, format!("{} is not a boolean", other))),
        }
    }

    /// A TCP port. Numeric strings are accepted.
    pub fn port(&self, key: &str) -> Result<Option<u16>> {
        let value = match self.get(key) {
            None => return Ok(None),
            Some(value) => value,
        };

        let port = match value {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u16>().ok(),
            _ => None,
        };

        match port {
            Some(port) if port > 0 => Ok(Some(port)),
            _ => Err(self.invalid(
                key,
                format!("expected an integer between 1 and 65535, got {}", value),
            )),
        }
    }

    /// A filesystem path that must be absolute
    pub fn absolute_path(&self, key: &str) -> Result<Option<PathBuf>> {
        match self.string(key)? {
            None => Ok(None),
            Some(path) if Path::new(&path).is_absolute() => Ok(Some(PathBuf::from(path))),
            Some(path) => Err(self.invalid(key, format!("\"{}\" is not an absolute path", path))),
        }
    }

    /// A key accepting a single value or a (possibly nested) list.
    ///
    /// Scalars become one-element lists, nested lists are flattened and
    /// `null` entries dropped.
    pub fn list(&self, key: &str) -> Result<Vec<String>> {
        let mut out = Vec::new();
        if let Some(value) = self.get(key) {
            self.flatten_into(key, value, &mut out)?;
        }
        Ok(out)
    }

    fn flatten_into(&self, key: &str, value: &Value, out: &mut Vec<String>) -> Result<()> {
        match value {
            Value::Null => {}
            Value::String(s) => out.push(s.clone()),
            Value::Number(n) => out.push(n.to_string()),
            Value::Bool(b) => out.push(b.to_string()),
            Value::Array(items) => {
                for item in items {
                    self.flatten_into(key, item, out)?;
                }
            }
            Value::Object(_) => {
                return Err(self.invalid(key, "expected a value or a list of values, got a mapping"))
            }
        }
        Ok(())
    }

    /// A string key constrained to a fixed set of values
    pub fn parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = String>,
    {
        match self.string(key)? {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|e| self.invalid(key, e)),
        }
    }

    /// Keys not in `known`, logged so typos do not pass silently
    pub fn unknown_keys<'a>(&'a self, known: &'a [&str]) -> Vec<&'a str> {
        let unknown: Vec<&str> = self.keys().filter(|key| !known.contains(key)).collect();
        for key in &unknown {
            tracing::warn!("Ignoring unknown {} setting '{}'", self.section, key);
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: Value) -> Settings {
        Settings::from_value("ucp", value).unwrap()
    }

    #[test]
    fn test_undef_and_null_are_unset() {
        let s = settings(json!({ "host_address": "undef", "version": null }));
        assert_eq!(s.string("host_address").unwrap(), None);
        assert_eq!(s.string("version").unwrap(), None);
        assert_eq!(s.string("missing").unwrap(), None);
    }

    #[test]
    fn test_string_rejects_numbers() {
        let s = settings(json!({ "host_address": 1234 }));
        let err = s.string("host_address").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("ucp.host_address"));
    }

    #[test]
    fn test_boolean_validation() {
        let s = settings(json!({ "tracking": false, "usage": "invalid" }));
        assert!(!s.boolean("tracking", true).unwrap());
        assert!(s.boolean("external_ca", true).unwrap());
        let err = s.boolean("usage", true).unwrap_err();
        assert!(err.to_string().contains("is not a boolean"));
    }

    #[test]
    fn test_port_accepts_numeric_strings() {
        let s = settings(json!({ "swarm_port": 1000, "controller_port": "1001" }));
        assert_eq!(s.port("swarm_port").unwrap(), Some(1000));
        assert_eq!(s.port("controller_port").unwrap(), Some(1001));
    }

    #[test]
    fn test_port_rejects_garbage() {
        for bad in [json!("invalid"), json!(0), json!(70000), json!(true)] {
            let s = settings(json!({ "swarm_port": bad }));
            let err = s.port("swarm_port").unwrap_err();
            assert!(err.to_string().contains("expected an integer"));
        }
    }

    #[test]
    fn test_absolute_path() {
        let s = settings(json!({
            "license_file": "/path/to/file.lic",
            "docker_socket_path": "invalid",
        }));
        assert_eq!(
            s.absolute_path("license_file").unwrap(),
            Some(PathBuf::from("/path/to/file.lic"))
        );
        let err = s.absolute_path("docker_socket_path").unwrap_err();
        assert!(err.to_string().contains("is not an absolute path"));
    }

    #[test]
    fn test_list_normalization() {
        let s = settings(json!({
            "subject_alternative_names": "one",
            "dns_servers": ["1.dns", null, ["2.dns"]],
            "dns_options": null,
        }));
        assert_eq!(s.list("subject_alternative_names").unwrap(), vec!["one"]);
        assert_eq!(s.list("dns_servers").unwrap(), vec!["1.dns", "2.dns"]);
        assert!(s.list("dns_options").unwrap().is_empty());
        assert!(s.list("missing").unwrap().is_empty());
    }

    #[test]
    fn test_list_rejects_mappings() {
        let s = settings(json!({ "dns_servers": { "a": "b" } }));
        assert!(s.list("dns_servers").is_err());
    }

    #[test]
    fn test_non_mapping_section_is_rejected() {
        let err = Settings::from_value("dtr", json!(["a"])).unwrap_err();
        assert!(matches!(err, UcpError::ConfigParse(_)));
    }

    #[test]
    fn test_unknown_keys() {
        let s = settings(json!({ "tracking": true, "trackign": false }));
        assert_eq!(s.unknown_keys(&["tracking"]), vec!["trackign"]);
    }
}
