//! Flags for `docker/ucp join`

use super::{shell_quote, Flags, NetworkOptions};

/// Options accepted when a node joins an existing control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOptions {
    pub host_address: Option<String>,
    pub tracking: bool,
    pub usage: bool,
    /// Join as a controller replica instead of a worker
    pub replica: bool,
    pub version: Option<String>,
    pub fingerprint: Option<String>,
    pub ucp_url: Option<String>,
    pub network: NetworkOptions,
    pub extra_parameters: Vec<String>,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            host_address: None,
            tracking: true,
            usage: true,
            replica: false,
            version: None,
            fingerprint: None,
            ucp_url: None,
            network: NetworkOptions::default(),
            extra_parameters: Vec::new(),
        }
    }
}

/// Options for joining through swarm mode (UCP 2.0 and later)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwarmJoinOptions {
    pub token: Option<String>,
    pub listen_address: Option<String>,
    pub advertise_address: Option<String>,
    /// Address of an existing manager, the positional argument
    pub ucp_manager: Option<String>,
    pub extra_parameters: Vec<String>,
}

/// Build the argument string for `docker swarm join`
pub fn swarm_join_flags(opts: &SwarmJoinOptions) -> Flags {
    let mut flags = Flags::new();

    flags
        .secret_opt("--token", opts.token.as_deref())
        .quoted_opt("--listen_addr", opts.listen_address.as_deref())
        .quoted_opt("--advertise_addr", opts.advertise_address.as_deref())
        .raw(&opts.extra_parameters);

    if let Some(manager) = opts.ucp_manager.as_deref() {
        flags.push(shell_quote(manager));
    }
    flags
}

/// Build the argument string for `join`
pub fn join_flags(opts: &JoinOptions) -> Flags {
    let mut flags = Flags::new();

    flags.quoted_opt("--host-address", opts.host_address.as_deref());

    if !opts.tracking {
        flags.switch("--disable-tracking");
    }
    if !opts.usage {
        flags.switch("--disable-usage");
    }
    if opts.replica {
        flags.switch("--replica");
    }

    flags
        .quoted_opt("--image-version", opts.version.as_deref())
        .quoted_opt("--fingerprint", opts.fingerprint.as_deref())
        .quoted_opt("--url", opts.ucp_url.as_deref());

    // The join command spells this one out; install uses --dns-opt.
    opts.network.append_to(&mut flags, "--dns-option");
    flags.raw(&opts.extra_parameters);
    flags
}
