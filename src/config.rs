// Copyright 2024 Dmitry Tantsur <dtantsur@protonmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command line configuration.
//!
//! Credentials fall back to the usual `OS_*` environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::Parser;
use osauth::common::IdOrName;
use osauth::identity::Password;

use super::provision::{
    ProvisionRequest, StorageType, DEFAULT_AVAILABILITY_ZONE, DEFAULT_EPHEMERAL_AGGREGATE,
    DEFAULT_EPHEMERAL_FLAVOR, DEFAULT_PERSISTENT_AGGREGATE, DEFAULT_PERSISTENT_FLAVOR,
};
use super::{ApiVersion, Cloud, Error, ErrorKind, Result};

const MASK: &str = "***";

/// Configure host aggregates and flavors for ephemeral and persistent compute storage.
#[derive(Clone, Parser)]
#[command(name = "nova-ephemeral", version, about, long_about = None)]
pub struct Cli {
    /// Configure ephemeral (local disk) storage.
    #[arg(long)]
    pub ephemeral: bool,

    /// Configure persistent (RBD backed) storage.
    #[arg(long)]
    pub persistent: bool,

    /// Use all hypervisors when no hosts are provided.
    #[arg(long)]
    pub hosts_all: bool,

    /// Availability zone of newly created aggregates.
    #[arg(long, default_value = DEFAULT_AVAILABILITY_ZONE)]
    pub availability_zone: String,

    /// Name of the ephemeral storage aggregate.
    #[arg(long, default_value = DEFAULT_EPHEMERAL_AGGREGATE)]
    pub aggregate_name_ephemeral: String,

    /// Name of the persistent storage aggregate.
    #[arg(long, default_value = DEFAULT_PERSISTENT_AGGREGATE)]
    pub aggregate_name_persistent: String,

    /// Comma-separated hosts for ephemeral storage.
    #[arg(long, value_delimiter = ',')]
    pub hosts_ephemeral: Vec<String>,

    /// Comma-separated hosts for persistent storage.
    #[arg(long, value_delimiter = ',')]
    pub hosts_persistent: Vec<String>,

    /// Family prefix of ephemeral flavors.
    #[arg(long, default_value = DEFAULT_EPHEMERAL_FLAVOR)]
    pub ephemeral_flavor_name: String,

    /// Family prefix of persistent flavors.
    #[arg(long, default_value = DEFAULT_PERSISTENT_FLAVOR)]
    pub persistent_flavor_name: String,

    /// Identity service URL.
    #[arg(long, env = "OS_AUTH_URL")]
    pub os_auth_url: Option<String>,

    /// Region name.
    #[arg(long, env = "OS_REGION_NAME")]
    pub os_region_name: Option<String>,

    /// Project (tenant) name, `OS_PROJECT_NAME` is also accepted.
    #[arg(long, env = "OS_TENANT_NAME")]
    pub os_tenant_name: Option<String>,

    /// User name.
    #[arg(long, env = "OS_USERNAME")]
    pub os_username: Option<String>,

    /// Password.
    #[arg(long, env = "OS_PASSWORD", hide_env_values = true)]
    pub os_password: Option<String>,

    /// CA bundle (PEM) to verify TLS connections with.
    #[arg(long, env = "OS_CACERT")]
    pub os_cacert: Option<PathBuf>,

    /// Compute API version, e.g. 2 or 2.53.
    #[arg(long, env = "OS_COMPUTE_API_VERSION")]
    pub os_compute_api_version: Option<String>,

    /// Domain of the user.
    #[arg(long, env = "OS_USER_DOMAIN_NAME", default_value = "Default")]
    pub os_user_domain_name: String,

    /// Domain of the project.
    #[arg(long, env = "OS_PROJECT_DOMAIN_NAME", default_value = "Default")]
    pub os_project_domain_name: String,

    /// Cloud name in clouds.yaml (takes precedence over other credentials).
    #[arg(long, env = "OS_CLOUD")]
    pub os_cloud: Option<String>,

    /// Log progress and the effective configuration.
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file instead of the standard error.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("ephemeral", &self.ephemeral)
            .field("persistent", &self.persistent)
            .field("hosts_all", &self.hosts_all)
            .field("availability_zone", &self.availability_zone)
            .field("aggregate_name_ephemeral", &self.aggregate_name_ephemeral)
            .field("aggregate_name_persistent", &self.aggregate_name_persistent)
            .field("hosts_ephemeral", &self.hosts_ephemeral)
            .field("hosts_persistent", &self.hosts_persistent)
            .field("ephemeral_flavor_name", &self.ephemeral_flavor_name)
            .field("persistent_flavor_name", &self.persistent_flavor_name)
            .field("os_auth_url", &self.os_auth_url)
            .field("os_region_name", &self.os_region_name)
            .field("os_tenant_name", &self.project_name())
            .field("os_username", &self.os_username)
            .field("os_password", &self.os_password.as_ref().map(|_| MASK))
            .field("os_cacert", &self.os_cacert)
            .field("os_compute_api_version", &self.os_compute_api_version)
            .field("os_user_domain_name", &self.os_user_domain_name)
            .field("os_project_domain_name", &self.os_project_domain_name)
            .field("os_cloud", &self.os_cloud)
            .field("verbose", &self.verbose)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl Cli {
    /// Project name from the options or the environment.
    pub fn project_name(&self) -> Option<String> {
        self.os_tenant_name
            .clone()
            .or_else(|| std::env::var("OS_PROJECT_NAME").ok())
            .filter(|value| !value.is_empty())
    }

    /// Storage types to configure, in execution order.
    pub fn storage_types(&self) -> Vec<StorageType> {
        let mut result = Vec::new();
        if self.ephemeral {
            result.push(StorageType::Ephemeral);
        }
        if self.persistent {
            result.push(StorageType::Persistent);
        }
        result
    }

    /// Build a provisioning request for the storage type.
    pub fn request(&self, storage_type: StorageType) -> ProvisionRequest {
        let (aggregate_name, flavor_name, hosts) = match storage_type {
            StorageType::Ephemeral => (
                &self.aggregate_name_ephemeral,
                &self.ephemeral_flavor_name,
                &self.hosts_ephemeral,
            ),
            StorageType::Persistent => (
                &self.aggregate_name_persistent,
                &self.persistent_flavor_name,
                &self.hosts_persistent,
            ),
        };
        ProvisionRequest::new(storage_type)
            .with_aggregate_name(aggregate_name.clone())
            .with_availability_zone(self.availability_zone.clone())
            .with_flavor_name(flavor_name.clone())
            .with_hosts(normalize_hosts(hosts))
            .with_hosts_all(self.hosts_all)
            .with_verbose(self.verbose)
    }

    /// Compute API microversion to request (if any).
    pub fn compute_api_version(&self) -> Result<Option<ApiVersion>> {
        match self.os_compute_api_version {
            Some(ref value) => parse_compute_api_version(value),
            None => Ok(None),
        }
    }

    /// Connect to the cloud.
    ///
    /// `--os-cloud` selects an entry from clouds.yaml. Otherwise explicit
    /// credentials are used when the auth URL is known, falling back to
    /// osauth's own environment handling.
    pub async fn connect(&self) -> Result<Cloud> {
        let cloud = if let Some(ref name) = self.os_cloud {
            debug!("Using cloud {} from clouds.yaml", name);
            Cloud::from_config(name).await?
        } else if let Some(ref auth_url) = self.os_auth_url {
            let auth = self.password(auth_url)?;
            match self.os_cacert {
                Some(ref path) => Cloud::new_with_client(http_client(path)?, auth).await?,
                None => Cloud::new(auth).await?,
            }
        } else {
            debug!("No auth URL provided, using the environment");
            Cloud::from_env().await?
        };

        let cloud = match self.os_region_name {
            Some(ref region) if !region.is_empty() => cloud.with_region(region.clone()),
            _ => cloud,
        };

        Ok(match self.compute_api_version()? {
            Some(version) => cloud.with_compute_api_version(version),
            None => cloud,
        })
    }

    fn password(&self, auth_url: &str) -> Result<Password> {
        let username = self.os_username.as_ref().ok_or_else(|| {
            Error::new(ErrorKind::InvalidConfig, "User name (OS_USERNAME) is required")
        })?;
        let password = self.os_password.as_ref().ok_or_else(|| {
            Error::new(ErrorKind::InvalidConfig, "Password (OS_PASSWORD) is required")
        })?;
        let auth = Password::new(
            auth_url,
            username.as_str(),
            password.as_str(),
            self.os_user_domain_name.as_str(),
        )?;
        Ok(match self.project_name() {
            Some(project) => auth.with_project_scope(
                IdOrName::from_name(project),
                IdOrName::from_name(self.os_project_domain_name.clone()),
            ),
            None => auth,
        })
    }
}

/// Parse a compute API version.
///
/// Plain `2` selects the base API without a microversion.
pub fn parse_compute_api_version(value: &str) -> Result<Option<ApiVersion>> {
    let value = value.trim();
    let invalid = || {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Invalid compute API version {}, expected 2 or 2.X", value),
        )
    };

    let mut parts = value.split('.');
    let major: u16 = parts
        .next()
        .and_then(|item| item.parse().ok())
        .ok_or_else(invalid)?;
    if major != 2 {
        return Err(invalid());
    }
    match (parts.next(), parts.next()) {
        (None, _) => Ok(None),
        (Some(minor), None) => {
            let minor = minor.parse().map_err(|_| invalid())?;
            Ok(Some(ApiVersion(major, minor)))
        }
        _ => Err(invalid()),
    }
}

fn normalize_hosts(hosts: &[String]) -> Vec<String> {
    hosts
        .iter()
        .map(|host| host.trim())
        .filter(|host| !host.is_empty())
        .map(String::from)
        .collect()
}

fn http_client(cacert: &Path) -> Result<reqwest::Client> {
    let pem = std::fs::read(cacert).map_err(|err| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot read CA bundle {}: {}", cacert.display(), err),
        )
    })?;
    let cert = reqwest::Certificate::from_pem(&pem).map_err(|err| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Invalid CA bundle {}: {}", cacert.display(), err),
        )
    })?;
    reqwest::Client::builder()
        .add_root_certificate(cert)
        .build()
        .map_err(|err| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot build an HTTP client: {}", err),
            )
        })
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::{parse_compute_api_version, Cli};
    use crate::provision::StorageType;
    use crate::{ApiVersion, ErrorKind};

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["nova-ephemeral"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert!(!cli.ephemeral);
        assert!(!cli.persistent);
        assert!(!cli.hosts_all);
        assert_eq!(cli.availability_zone, "-");
        assert_eq!(cli.aggregate_name_ephemeral, "ephemeral-compute-storage");
        assert_eq!(cli.aggregate_name_persistent, "persistent-compute-storage");
        assert_eq!(cli.ephemeral_flavor_name, "e1");
        assert_eq!(cli.persistent_flavor_name, "m1");
        assert!(cli.hosts_ephemeral.is_empty());
        assert!(cli.storage_types().is_empty());
    }

    #[test]
    fn test_requests() {
        let cli = parse(&[
            "--ephemeral",
            "--persistent",
            "--hosts-ephemeral",
            "compute-1, compute-2,",
            "--hosts-persistent=compute-3",
            "--aggregate-name-persistent",
            "rbd",
            "--availability-zone",
            "az1",
            "-v",
        ]);
        assert_eq!(
            cli.storage_types(),
            vec![StorageType::Ephemeral, StorageType::Persistent]
        );

        let req = cli.request(StorageType::Ephemeral);
        assert_eq!(req.aggregate_name(), "ephemeral-compute-storage");
        assert_eq!(req.flavor_name(), "e1");
        assert_eq!(req.availability_zone(), "az1");
        assert_eq!(req.hosts(), &["compute-1".to_string(), "compute-2".to_string()]);

        let req = cli.request(StorageType::Persistent);
        assert_eq!(req.aggregate_name(), "rbd");
        assert_eq!(req.flavor_name(), "m1");
        assert_eq!(req.hosts(), &["compute-3".to_string()]);
    }

    #[test]
    fn test_password_masked() {
        let cli = parse(&["--os-password", "s3cr3t", "--os-username", "admin"]);
        let output = format!("{:?}", cli);
        assert!(!output.contains("s3cr3t"));
        assert!(output.contains("***"));
        assert!(output.contains("admin"));
    }

    #[test]
    fn test_compute_api_version() {
        assert_eq!(parse_compute_api_version("2").unwrap(), None);
        assert_eq!(
            parse_compute_api_version("2.53").unwrap(),
            Some(ApiVersion(2, 53))
        );
        for invalid in &["", "3", "2.x", "2.1.1", "latest"] {
            assert_eq!(
                parse_compute_api_version(invalid).unwrap_err().kind(),
                ErrorKind::InvalidConfig
            );
        }
    }
}
