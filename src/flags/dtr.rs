//! Flags for `docker/dtr install`, `join` and `remove`
//!
//! Released versions of this builder had two quirks that show up in the
//! generated command line:
//!
//! * a configured `dtr_version` contributed an empty token instead of a
//!   `--dtr-version` flag, and
//! * `--ucp-insecure-tls` was emitted unless the setting was explicitly
//!   `false`, so leaving it unset turned certificate checks off.
//!
//! [`DtrOptions::legacy`] keeps that output byte-for-byte. Turning it off
//! produces the flags the DTR bootstrapper actually documents.

use super::Flags;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtrOptions {
    pub dtr_external_url: Option<String>,
    pub dtr_version: Option<String>,
    pub ucp_node: Option<String>,
    pub ucp_username: Option<String>,
    pub ucp_password: Option<String>,
    pub ucp_insecure_tls: Option<bool>,
    pub dtr_ucp_url: Option<String>,
    pub replica_id: Option<String>,
    pub ucp_ca: Option<String>,
    /// Reproduce the historical output, quirks included
    pub legacy: bool,
}

impl Default for DtrOptions {
    fn default() -> Self {
        Self {
            dtr_external_url: None,
            dtr_version: None,
            ucp_node: None,
            ucp_username: None,
            ucp_password: None,
            ucp_insecure_tls: None,
            dtr_ucp_url: None,
            replica_id: None,
            ucp_ca: None,
            legacy: true,
        }
    }
}

impl DtrOptions {
    fn insecure_tls(&self) -> bool {
        if self.legacy {
            self.ucp_insecure_tls != Some(false)
        } else {
            self.ucp_insecure_tls == Some(true)
        }
    }
}

/// Build the argument string for the DTR bootstrapper
pub fn dtr_install_flags(opts: &DtrOptions) -> Flags {
    let mut flags = Flags::new();

    flags.quoted_opt("--dtr-external-url", opts.dtr_external_url.as_deref());

    if let Some(version) = opts.dtr_version.as_deref() {
        if opts.legacy {
            flags.push("");
        } else {
            flags.quoted("--dtr-version", version);
        }
    }

    flags
        .quoted_opt("--ucp-node", opts.ucp_node.as_deref())
        .quoted_opt("--ucp-username", opts.ucp_username.as_deref())
        .secret_opt("--ucp-password", opts.ucp_password.as_deref());

    if opts.insecure_tls() {
        flags.switch("--ucp-insecure-tls");
    }

    flags
        .quoted_opt("--ucp-url", opts.dtr_ucp_url.as_deref())
        .quoted_opt("--replica-id", opts.replica_id.as_deref())
        .quoted_opt("--ucp-ca", opts.ucp_ca.as_deref());
    flags
}
