//! Flags for `docker/ucp uninstall`

use super::Flags;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallOptions {
    pub preserve_certs_on_delete: bool,
    pub preserve_images_on_delete: bool,
    /// Identifier of the installation to remove
    pub ucp_id: Option<String>,
    pub extra_parameters: Vec<String>,
}

/// Build the argument string for `uninstall`
pub fn uninstall_flags(opts: &UninstallOptions) -> Flags {
    let mut flags = Flags::new();

    if opts.preserve_certs_on_delete {
        flags.switch("--preserve-certs");
    }
    if opts.preserve_images_on_delete {
        flags.switch("--preserve-images");
    }

    flags
        .quoted_opt("--id", opts.ucp_id.as_deref())
        .raw(&opts.extra_parameters);
    flags
}
