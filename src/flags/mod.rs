//! Command-line flag assembly
//!
//! Each builder turns a typed option struct into the argument string that is
//! appended to the `docker run ... <action>` template. Builders are pure:
//! the same options always produce the same string.

pub mod dtr;
pub mod install;
pub mod join;
pub mod uninstall;

pub use dtr::{dtr_install_flags, DtrOptions};
pub use install::{install_flags, InstallOptions, SwarmScheduler};
pub use join::{join_flags, swarm_join_flags, JoinOptions, SwarmJoinOptions};
pub use uninstall::{uninstall_flags, UninstallOptions};

use std::fmt;

/// Placeholder shown instead of secret values
pub const REDACTED: &str = "********";

/// Wrap `value` in single quotes for `sh -c`, escaping embedded quotes as `'\''`
pub fn shell_quote(value: impl fmt::Display) -> String {
    format!("'{}'", value.to_string().replace('\'', "'\\''"))
}

/// Ordered list of command-line tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    tokens: Vec<String>,
    /// Indices of tokens carrying credentials, with their masked rendering
    secrets: Vec<(usize, String)>,
}

impl Flags {
    /// Create an empty flag list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bare switch such as `--replica`
    pub fn switch(&mut self, name: &str) -> &mut Self {
        self.tokens.push(name.to_string());
        self
    }

    /// Append `name 'value'`
    pub fn quoted(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        self.tokens.push(format!("{} {}", name, shell_quote(value)));
        self
    }

    /// Append `name 'value'` when a value is present, masked in [`Flags::redacted`]
    pub fn secret_opt(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.secrets
                .push((self.tokens.len(), format!("{} '{}'", name, REDACTED)));
            self.quoted(name, value);
        }
        self
    }

    /// Append `name 'value'` when a value is present
    pub fn quoted_opt<T: fmt::Display>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.quoted(name, value);
        }
        self
    }

    /// Append one `name 'value'` per element, in order
    pub fn repeated<T: fmt::Display>(&mut self, name: &str, values: &[T]) -> &mut Self {
        for value in values {
            self.quoted(name, value);
        }
        self
    }

    /// Append tokens verbatim
    pub fn raw<S: AsRef<str>>(&mut self, params: &[S]) -> &mut Self {
        self.tokens
            .extend(params.iter().map(|param| param.as_ref().to_string()));
        self
    }

    /// Append a token verbatim
    pub fn push(&mut self, token: impl Into<String>) -> &mut Self {
        self.tokens.push(token.into());
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether a token equal to `token` was emitted
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Rendering safe for logs and plans, with secret values masked
    pub fn redacted(&self) -> String {
        let mut tokens: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        for (index, masked) in &self.secrets {
            tokens[*index] = masked.as_str();
        }
        tokens.join(" ")
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

impl From<Flags> for String {
    fn from(flags: Flags) -> Self {
        flags.to_string()
    }
}

/// Flags shared by the install and join builders for DNS and SAN settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkOptions {
    pub dns_servers: Vec<String>,
    pub dns_search_domains: Vec<String>,
    pub dns_options: Vec<String>,
    pub subject_alternative_names: Vec<String>,
}

impl NetworkOptions {
    /// Append `--dns`, `--dns-search`, the DNS option flag and `--san` in that order.
    ///
    /// The DNS option flag name differs between `install` (`--dns-opt`) and
    /// `join` (`--dns-option`), so callers pass it in.
    pub(crate) fn append_to(&self, flags: &mut Flags, dns_option_flag: &str) {
        flags
            .repeated("--dns", &self.dns_servers)
            .repeated("--dns-search", &self.dns_search_domains)
            .repeated(dns_option_flag, &self.dns_options)
            .repeated("--san", &self.subject_alternative_names);
    }
}
