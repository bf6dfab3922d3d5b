//! Turning a resolved configuration into guarded commands
//!
//! An [`ExecSpec`] is everything needed to converge one product on this
//! host: a title for logs, the full command line, the guard deciding whether
//! it runs at all, and the retry policy.

use crate::config::{DtrConfig, Manifest, UcpConfig};
use crate::error::Result;
use crate::exec::RetryPolicy;
use crate::flags::{
    dtr_install_flags, install_flags, join_flags, swarm_join_flags, uninstall_flags, Flags,
};
use crate::gate::{DtrAction, Guard, JoinProtocol, UcpAction};
use serde::Serialize;
use std::fmt;

/// Socket path inside the bootstrapper container
const CONTAINER_SOCKET: &str = "/var/run/docker.sock";

/// License path inside the bootstrapper container
const CONTAINER_LICENSE: &str = "/docker_subscription.lic";

/// One guarded, retried command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecSpec {
    pub title: String,
    /// Command line handed to the shell
    #[serde(skip)]
    pub command: String,
    /// Command line with credentials masked, for logs and plans
    #[serde(rename = "command")]
    pub redacted: String,
    pub guard: Guard,
    pub retry: RetryPolicy,
    /// Log the command's output
    pub log_output: bool,
}

impl ExecSpec {
    fn new(title: &str, base: String, flags: &Flags, guard: Guard) -> Self {
        Self {
            title: title.to_string(),
            command: with_flags(&base, &flags.to_string()),
            redacted: with_flags(&base, &flags.redacted()),
            guard,
            retry: RetryPolicy::default(),
            log_output: true,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Validate `config` and build the control plane command
    pub fn ucp(config: &UcpConfig) -> Result<Self> {
        let action = UcpAction::select(config)?;
        let guard = action.guard(&config.marker_namespace);

        let (base, flags) = match action {
            UcpAction::Install => (
                ucp_run(config, "install", true),
                install_flags(&config.install_options()),
            ),
            UcpAction::Join(JoinProtocol::V1) => (
                ucp_run(config, "join", false),
                join_flags(&config.join_options()),
            ),
            UcpAction::Join(JoinProtocol::V2) => (
                "docker swarm join".to_string(),
                swarm_join_flags(&config.swarm_join_options()),
            ),
            UcpAction::Uninstall => (
                ucp_run(config, "uninstall", false),
                uninstall_flags(&config.uninstall_options()),
            ),
        };

        Ok(Self::new(action.title(), base, &flags, guard))
    }

    /// Validate `config` and build the registry command
    pub fn dtr(config: &DtrConfig) -> Result<Self> {
        let action = DtrAction::select(config)?;
        let guard = action.guard(config.replica_id.as_deref());
        let base = format!("docker run --rm {} {}", config.image(), action.subcommand());
        let flags = dtr_install_flags(&config.dtr_options());
        Ok(Self::new(action.title(), base, &flags, guard))
    }
}

impl fmt::Display for ExecSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {}", self.guard)?;
        writeln!(
            f,
            "  tries {}, sleep {}s",
            self.retry.tries,
            self.retry.try_sleep.as_secs()
        )?;
        write!(f, "  {}", self.redacted)
    }
}

fn ucp_run(config: &UcpConfig, subcommand: &str, mount_license: bool) -> String {
    let mut parts = vec![
        "docker run --rm".to_string(),
        format!("-v {}:{}", config.docker_socket_path.display(), CONTAINER_SOCKET),
    ];

    if mount_license {
        if let Some(license) = &config.license_file {
            parts.push(format!("-v {}:{}", license.display(), CONTAINER_LICENSE));
        }
    }

    parts.push(format!("--name ucp {} {}", config.ucp_image, subcommand));
    parts.join(" ")
}

fn with_flags(base: &str, flags: &str) -> String {
    if flags.is_empty() {
        base.to_string()
    } else {
        format!("{} {}", base, flags)
    }
}

/// Every command a manifest asks for, control plane first.
///
/// All sections are validated before anything is returned, so a bad `dtr`
/// section stops the control plane from being touched too.
pub fn plan_manifest(manifest: &Manifest, retry: RetryPolicy) -> Result<Vec<ExecSpec>> {
    let mut specs = Vec::new();

    if let Some(ucp) = manifest.ucp_config()? {
        specs.push(ExecSpec::ucp(&ucp)?.with_retry(retry));
    }
    if let Some(dtr) = manifest.dtr_config()? {
        specs.push(ExecSpec::dtr(&dtr)?.with_retry(retry));
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Ensure;
    use std::path::PathBuf;
    use std::time::Duration;

    fn ucp(f: impl FnOnce(&mut UcpConfig)) -> UcpConfig {
        let mut config = UcpConfig {
            marker_namespace: "foo".to_string(),
            ..Default::default()
        };
        f(&mut config);
        config
    }

    #[test]
    fn test_minimum_controller() {
        let spec = ExecSpec::ucp(&ucp(|c| c.controller = true)).unwrap();
        assert_eq!(spec.title, "Install Docker Universal Control Plane");
        assert!(spec.log_output);
        assert_eq!(spec.retry.tries, 3);
        assert_eq!(spec.retry.try_sleep, Duration::from_secs(5));
        assert_eq!(spec.guard.to_string(), "unless docker inspect foo/ucp-controller");
        assert_eq!(
            spec.command,
            "docker run --rm -v /var/run/docker.sock:/var/run/docker.sock --name ucp docker/ucp \
             install --admin-username 'admin' --admin-password 'orca'"
        );
        for absent in [
            "--disable-usage",
            "--disable-tracking",
            "--preserve-certs",
            "--external-ucp-ca",
            "docker_subscription.lic",
        ] {
            assert!(!spec.command.contains(absent), "{}", absent);
        }
    }

    #[test]
    fn test_license_file_mounted_on_install() {
        let spec = ExecSpec::ucp(&ucp(|c| {
            c.controller = true;
            c.license_file = Some(PathBuf::from("/path/to/file.lic"));
        }))
        .unwrap();
        assert!(spec
            .command
            .contains("-v /path/to/file.lic:/docker_subscription.lic --name ucp"));
    }

    #[test]
    fn test_join_v1_command() {
        let spec = ExecSpec::ucp(&ucp(|c| {
            c.version = Some("1.0".into());
            c.fingerprint = Some("12345".into());
            c.ucp_url = Some("https://ucp".into());
            c.license_file = Some(PathBuf::from("/path/to/file.lic"));
        }))
        .unwrap();
        assert_eq!(spec.title, "Join Docker Universal Control Plane v1");
        assert_eq!(
            spec.command,
            "docker run --rm -v /var/run/docker.sock:/var/run/docker.sock --name ucp docker/ucp \
             join --image-version '1.0' --fingerprint '12345' --url 'https://ucp'"
        );
        assert_eq!(spec.guard.to_string(), "unless docker inspect foo/ucp-proxy");
    }

    #[test]
    fn test_join_v2_command() {
        let spec = ExecSpec::ucp(&ucp(|c| {
            c.version = Some("2".into());
            c.token = Some("abc".into());
            c.listen_address = Some("192.168.1.1".into());
            c.advertise_address = Some("192.168.1.1".into());
            c.ucp_manager = Some("192.168.1.100".into());
        }))
        .unwrap();
        assert_eq!(spec.title, "Join Docker Universal Control Plane v2");
        assert_eq!(
            spec.command,
            "docker swarm join --token 'abc' --listen_addr '192.168.1.1' \
             --advertise_addr '192.168.1.1' '192.168.1.100'"
        );
        assert_eq!(spec.guard.to_string(), "unless docker inspect foo/ucp-proxy");
    }

    #[test]
    fn test_uninstall_command() {
        let spec = ExecSpec::ucp(&ucp(|c| {
            c.ensure = Ensure::Absent;
            c.ucp_id = Some("1".into());
        }))
        .unwrap();
        assert_eq!(spec.title, "Uninstall Docker Universal Control Plane");
        assert_eq!(
            spec.command,
            "docker run --rm -v /var/run/docker.sock:/var/run/docker.sock --name ucp docker/ucp \
             uninstall --id '1'"
        );
        assert_eq!(spec.guard.to_string(), "onlyif docker inspect foo/ucp-proxy");
    }

    #[test]
    fn test_credentials_masked_outside_the_command() {
        let spec = ExecSpec::ucp(&ucp(|c| {
            c.controller = true;
            c.password = "it's".into();
        }))
        .unwrap();
        assert!(spec.command.ends_with(r"--admin-password 'it'\''s'"));
        assert!(spec.redacted.ends_with("--admin-password '********'"));
        assert!(!spec.to_string().contains("it'"));

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["command"], spec.redacted.as_str());

        let join = ExecSpec::ucp(&ucp(|c| {
            c.version = Some("2".into());
            c.token = Some("SWMTKN-secret".into());
            c.ucp_manager = Some("10.0.0.1".into());
        }))
        .unwrap();
        assert_eq!(join.redacted, "docker swarm join --token '********' '10.0.0.1'");
    }

    #[test]
    fn test_validation_errors_propagate() {
        let err = ExecSpec::ucp(&ucp(|c| c.ensure = Ensure::Absent)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_dtr_commands() {
        let config = DtrConfig {
            install: true,
            dtr_version: Some("2.1.3".into()),
            dtr_external_url: Some("https://foo".into()),
            ucp_insecure_tls: Some(false),
            replica_id: Some("foobar".into()),
            ..Default::default()
        };
        let spec = ExecSpec::dtr(&config).unwrap();
        assert_eq!(spec.title, "Install dtr");
        assert_eq!(
            spec.command,
            "docker run --rm docker/dtr:2.1.3 install --dtr-external-url 'https://foo'  \
             --replica-id 'foobar'"
        );
        assert_eq!(spec.guard.to_string(), "unless docker inspect dtr-nginx-foobar");

        let remove = DtrConfig {
            ensure: Ensure::Absent,
            ucp_insecure_tls: Some(false),
            ..Default::default()
        };
        let spec = ExecSpec::dtr(&remove).unwrap();
        assert_eq!(spec.title, "Uninstall dtr");
        assert_eq!(spec.command, "docker run --rm docker/dtr remove");
    }

    #[test]
    fn test_plan_manifest_validates_everything_first() {
        let manifest = Manifest::parse_str(
            "ucp:\n  controller: true\ndtr:\n  install: true\n  join: true\n",
        )
        .unwrap();
        let err = plan_manifest(&manifest, RetryPolicy::default()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_plan_manifest_applies_retry_policy() {
        let manifest = Manifest::parse_str(
            "ucp:\n  controller: true\n  marker_namespace: foo\ndtr:\n  join: true\n",
        )
        .unwrap();
        let retry = RetryPolicy::new(5, Duration::from_secs(1));
        let specs = plan_manifest(&manifest, retry).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].title, "Install Docker Universal Control Plane");
        assert_eq!(specs[1].title, "Join dtr");
        assert!(specs.iter().all(|spec| spec.retry == retry));
    }

    #[test]
    fn test_display() {
        let spec = ExecSpec::ucp(&ucp(|c| c.controller = true)).unwrap();
        let rendered = spec.to_string();
        assert!(rendered.starts_with("Install Docker Universal Control Plane\n"));
        assert!(rendered.contains("unless docker inspect foo/ucp-controller"));
        assert!(rendered.contains("tries 3, sleep 5s"));
    }
}
