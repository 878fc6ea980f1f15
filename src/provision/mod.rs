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

//! Provisioning of ephemeral and persistent compute storage.
//!
//! A run for one [StorageType](enum.StorageType.html):
//!
//! 1. creates (or reuses) the host aggregate,
//! 2. adds hosts to it, falling back to the `nova-compute` service host names
//!    for hosts Nova does not recognize,
//! 3. tags the aggregate with `<type>computestorage=true`,
//! 4. tags flavors without an ephemeral disk (persistent storage) or creates
//!    their ephemeral variants and tags those (ephemeral storage).
//!
//! Resources that already exist are reported as warnings and skipped, so
//! running the same request twice is safe.

mod backend;
pub mod flavors;
pub mod hosts;

#[cfg(test)]
mod fake;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub use self::backend::{AggregateSummary, ComputeBackend, FlavorSpec};

use crate::{Error, ErrorKind, Result};

/// Default name of the ephemeral storage aggregate.
pub const DEFAULT_EPHEMERAL_AGGREGATE: &str = "ephemeral-compute-storage";
/// Default name of the persistent storage aggregate.
pub const DEFAULT_PERSISTENT_AGGREGATE: &str = "persistent-compute-storage";
/// Default flavor family prefix for ephemeral flavors.
pub const DEFAULT_EPHEMERAL_FLAVOR: &str = "e1";
/// Default flavor family prefix for persistent flavors.
pub const DEFAULT_PERSISTENT_FLAVOR: &str = "m1";
/// Default availability zone of newly created aggregates.
pub const DEFAULT_AVAILABILITY_ZONE: &str = "-";

const METADATA_VALUE: &str = "true";

/// Kind of compute storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Local disks (RAID, LVM or JBOD), lost together with the host.
    Ephemeral,
    /// Volumes backed by RBD.
    Persistent,
}

impl StorageType {
    /// Lower-case name of the storage type.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Ephemeral => "ephemeral",
            StorageType::Persistent => "persistent",
        }
    }

    /// Metadata key used on aggregates and flavors.
    pub fn metadata_key(&self) -> String {
        format!("{}computestorage", self.as_str())
    }

    /// Metadata (aggregate) or extra specs (flavor) marking this storage type.
    pub fn metadata(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();
        let _ = result.insert(self.metadata_key(), METADATA_VALUE.to_string());
        result
    }

    /// Default aggregate name.
    pub fn default_aggregate_name(&self) -> &'static str {
        match self {
            StorageType::Ephemeral => DEFAULT_EPHEMERAL_AGGREGATE,
            StorageType::Persistent => DEFAULT_PERSISTENT_AGGREGATE,
        }
    }

    /// Default flavor family prefix.
    pub fn default_flavor_name(&self) -> &'static str {
        match self {
            StorageType::Ephemeral => DEFAULT_EPHEMERAL_FLAVOR,
            StorageType::Persistent => DEFAULT_PERSISTENT_FLAVOR,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<StorageType> {
        match s.to_lowercase().as_str() {
            "ephemeral" => Ok(StorageType::Ephemeral),
            "persistent" => Ok(StorageType::Persistent),
            other => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Unknown storage type {}", other),
            )),
        }
    }
}

/// Parameters of a provisioning run.
#[derive(Clone, Debug)]
pub struct ProvisionRequest {
    storage_type: StorageType,
    aggregate_name: String,
    availability_zone: String,
    flavor_name: String,
    hosts: Vec<String>,
    hosts_all: bool,
    verbose: bool,
}

impl ProvisionRequest {
    /// Create a request with default names for the storage type.
    pub fn new(storage_type: StorageType) -> ProvisionRequest {
        ProvisionRequest {
            storage_type,
            aggregate_name: storage_type.default_aggregate_name().to_string(),
            availability_zone: DEFAULT_AVAILABILITY_ZONE.to_string(),
            flavor_name: storage_type.default_flavor_name().to_string(),
            hosts: Vec::new(),
            hosts_all: false,
            verbose: false,
        }
    }

    /// Storage type.
    #[inline]
    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    /// Name of the aggregate to create or reuse.
    #[inline]
    pub fn aggregate_name(&self) -> &str {
        &self.aggregate_name
    }

    /// Availability zone for a new aggregate.
    #[inline]
    pub fn availability_zone(&self) -> &str {
        &self.availability_zone
    }

    /// Flavor family prefix.
    #[inline]
    pub fn flavor_name(&self) -> &str {
        &self.flavor_name
    }

    /// Explicitly requested hosts.
    #[inline]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Whether all hypervisors are used when no hosts are given.
    #[inline]
    pub fn hosts_all(&self) -> bool {
        self.hosts_all
    }

    /// Set the aggregate name.
    pub fn with_aggregate_name<S: Into<String>>(mut self, value: S) -> Self {
        self.aggregate_name = value.into();
        self
    }

    /// Set the availability zone for a new aggregate.
    ///
    /// Nova requires at least one character here.
    pub fn with_availability_zone<S: Into<String>>(mut self, value: S) -> Self {
        self.availability_zone = value.into();
        self
    }

    /// Set the flavor family prefix.
    pub fn with_flavor_name<S: Into<String>>(mut self, value: S) -> Self {
        self.flavor_name = value.into();
        self
    }

    /// Set the hosts to add to the aggregate.
    pub fn with_hosts(mut self, value: Vec<String>) -> Self {
        self.hosts = value;
        self
    }

    /// Use all hypervisors when no hosts are given.
    pub fn with_hosts_all(mut self, value: bool) -> Self {
        self.hosts_all = value;
        self
    }

    /// Log progress at the info level.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }
}

/// What a provisioning run did.
#[derive(Clone, Debug, Default)]
pub struct ProvisionReport {
    /// Aggregate that was created or reused.
    pub aggregate: Option<AggregateSummary>,
    /// Whether the aggregate was created by this run.
    pub aggregate_created: bool,
    /// Hosts added to the aggregate.
    pub added_hosts: Vec<String>,
    /// Hosts that already were in the aggregate.
    pub existing_hosts: Vec<String>,
    /// Hosts that neither Nova nor the compute service list knew.
    pub unresolved_hosts: Vec<String>,
    /// Whether the aggregate metadata was set by this run.
    pub aggregate_tagged: bool,
    /// Flavors created by this run.
    pub created_flavors: Vec<String>,
    /// Flavors that already existed.
    pub existing_flavors: Vec<String>,
    /// Flavors whose extra specs were set by this run.
    pub tagged_flavors: Vec<String>,
}

#[inline]
fn is_conflict(err: &Error) -> bool {
    err.kind() == ErrorKind::Conflict
}

/// Run provisioning for one storage type.
pub async fn provision<B>(backend: &B, request: &ProvisionRequest) -> Result<ProvisionReport>
where
    B: ComputeBackend + ?Sized,
{
    if request.hosts.is_empty() && !request.hosts_all {
        error!("Hosts list is empty and option --hosts-all=False (default value).");
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "No hosts provided and using all hypervisors was not requested",
        ));
    }

    if request.verbose {
        info!("Starting {} storage provisioning.", request.storage_type);
    }

    let mut report = ProvisionReport::default();
    let aggregate = ensure_aggregate(backend, request, &mut report).await?;

    let hosts = if request.hosts.is_empty() {
        let hosts = backend.list_hypervisor_hostnames().await?;
        if request.verbose {
            info!("No hosts provided, using all hypervisors");
            for host in &hosts {
                info!("Hypervisor host: {}", host);
            }
        }
        hosts
    } else {
        request.hosts.clone()
    };

    add_hosts(backend, request, &aggregate, &hosts, &mut report).await?;

    match backend
        .set_aggregate_metadata(&aggregate, request.storage_type.metadata())
        .await
    {
        Ok(()) => {
            debug!(
                "Set {} on aggregate {}",
                request.storage_type.metadata_key(),
                aggregate.name
            );
            report.aggregate_tagged = true;
        }
        Err(err) if is_conflict(&err) => {
            warn!("Aggregate {} already has metadata.", aggregate.name);
        }
        Err(err) => return Err(err),
    }
    report.aggregate = Some(aggregate);

    let candidates: Vec<FlavorSpec> = backend
        .list_flavors()
        .await?
        .into_iter()
        .filter(|flavor| flavor.ephemeral == 0)
        .collect();
    debug!(
        "Flavors without an ephemeral disk: {:?}",
        candidates.iter().map(|f| &f.name).collect::<Vec<_>>()
    );

    match request.storage_type {
        StorageType::Ephemeral => {
            for flavor in &candidates {
                let clone = flavors::ephemeral_clone(flavor, &request.flavor_name);
                let target = ensure_flavor(backend, clone, &mut report).await?;
                tag_flavor(backend, request.storage_type, &target, &mut report).await?;
            }
        }
        StorageType::Persistent => {
            for flavor in &candidates {
                tag_flavor(backend, request.storage_type, flavor, &mut report).await?;
            }
        }
    }

    if request.verbose {
        info!("Finished {} storage provisioning.", request.storage_type);
    }
    Ok(report)
}

/// Find a flavor by name (case-insensitive) or by ID.
///
/// Returns `None` when neither is provided, when nothing matches, or when
/// the flavors cannot be listed.
pub async fn find_flavor<B>(backend: &B, name: Option<&str>, id: Option<&str>) -> Option<FlavorSpec>
where
    B: ComputeBackend + ?Sized,
{
    if name.is_none() && id.is_none() {
        return None;
    }

    let name = name.map(str::to_lowercase);
    match backend.list_flavors().await {
        Ok(flavors) => flavors.into_iter().find(|flavor| {
            name.as_deref() == Some(flavor.name.to_lowercase().as_str())
                || id == Some(flavor.id.as_str())
        }),
        Err(err) => {
            error!("Failed to list flavors: {}", err);
            None
        }
    }
}

async fn ensure_aggregate<B>(
    backend: &B,
    request: &ProvisionRequest,
    report: &mut ProvisionReport,
) -> Result<AggregateSummary>
where
    B: ComputeBackend + ?Sized,
{
    let name = request.aggregate_name.as_str();
    let existing = backend.list_aggregates().await?;
    if let Some(aggregate) = existing.into_iter().find(|item| item.name == name) {
        debug!("Reusing aggregate {} ({})", aggregate.name, aggregate.id);
        return Ok(aggregate);
    }

    match backend
        .create_aggregate(name, &request.availability_zone)
        .await
    {
        Ok(aggregate) => {
            info!("Created aggregate {} ({})", aggregate.name, aggregate.id);
            report.aggregate_created = true;
            Ok(aggregate)
        }
        Err(err) if is_conflict(&err) => {
            // Created by somebody else since the listing.
            warn!("Aggregate {} already exists.", name);
            backend
                .list_aggregates()
                .await?
                .into_iter()
                .find(|item| item.name == name)
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::ResourceNotFound,
                        format!("Aggregate {} exists but cannot be found", name),
                    )
                })
        }
        Err(err) => Err(err),
    }
}

async fn add_hosts<B>(
    backend: &B,
    request: &ProvisionRequest,
    aggregate: &AggregateSummary,
    hosts: &[String],
    report: &mut ProvisionReport,
) -> Result<()>
where
    B: ComputeBackend + ?Sized,
{
    let mut missing = Vec::new();
    for host in hosts {
        match backend.add_aggregate_host(aggregate, host).await {
            Ok(()) => {
                info!("Added host {} to aggregate {}", host, aggregate.name);
                report.added_hosts.push(host.clone());
            }
            Err(err) if is_conflict(&err) => {
                warn!(
                    "Host aggregate {} for {} aggregate already exists (1).",
                    host, aggregate.name
                );
                report.existing_hosts.push(host.clone());
            }
            Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
                warn!(
                    "Host {} not found (hypervisor list is different from service host list).",
                    host
                );
                missing.push(host.clone());
            }
            Err(err) => return Err(err),
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    let service_hosts = backend.list_compute_service_hosts().await?;
    for host in self::hosts::unresolved(&missing, &service_hosts) {
        warn!("Host {} does not match any compute service host", host);
        report.unresolved_hosts.push(host);
    }

    for host in self::hosts::resolve_service_hosts(&missing, &service_hosts) {
        if request.verbose {
            info!("Retrying with compute service host name {}", host);
        }
        match backend.add_aggregate_host(aggregate, &host).await {
            Ok(()) => {
                info!("Added host {} to aggregate {}", host, aggregate.name);
                report.added_hosts.push(host);
            }
            Err(err) if is_conflict(&err) => {
                warn!(
                    "Host aggregate {} for {} aggregate already exists (2).",
                    host, aggregate.name
                );
                report.existing_hosts.push(host);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

async fn ensure_flavor<B>(
    backend: &B,
    flavor: FlavorSpec,
    report: &mut ProvisionReport,
) -> Result<FlavorSpec>
where
    B: ComputeBackend + ?Sized,
{
    match backend.create_flavor(&flavor).await {
        Ok(created) => {
            info!("Created flavor {} ({})", created.name, created.id);
            report.created_flavors.push(created.name.clone());
            Ok(created)
        }
        Err(err) if is_conflict(&err) => {
            warn!("Flavor {} already exists.", flavor.name);
            report.existing_flavors.push(flavor.name.clone());
            find_flavor(backend, Some(flavor.name.as_str()), Some(flavor.id.as_str()))
                .await
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::ResourceNotFound,
                        format!("Flavor {} exists but cannot be found", flavor.name),
                    )
                })
        }
        Err(err) => Err(err),
    }
}

async fn tag_flavor<B>(
    backend: &B,
    storage_type: StorageType,
    flavor: &FlavorSpec,
    report: &mut ProvisionReport,
) -> Result<()>
where
    B: ComputeBackend + ?Sized,
{
    match backend
        .set_flavor_extra_specs(flavor, storage_type.metadata())
        .await
    {
        Ok(()) => {
            debug!(
                "Set {} on flavor {}",
                storage_type.metadata_key(),
                flavor.name
            );
            report.tagged_flavors.push(flavor.name.clone());
            Ok(())
        }
        Err(err) if is_conflict(&err) => {
            warn!("Metadata for flavor {} already exists.", flavor.name);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::fake::{Call, FakeCompute};
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_storage_type() {
        assert_eq!(StorageType::Ephemeral.metadata_key(), "ephemeralcomputestorage");
        assert_eq!(StorageType::Persistent.metadata_key(), "persistentcomputestorage");
        assert_eq!(
            StorageType::Persistent
                .metadata()
                .get("persistentcomputestorage")
                .map(String::as_str),
            Some("true")
        );
        assert_eq!(StorageType::from_str("Ephemeral").unwrap(), StorageType::Ephemeral);
        assert_eq!(
            StorageType::from_str("cold").unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(StorageType::Ephemeral.to_string(), "ephemeral");
    }

    #[test]
    fn test_request_defaults() {
        let req = ProvisionRequest::new(StorageType::Ephemeral);
        assert_eq!(req.aggregate_name(), "ephemeral-compute-storage");
        assert_eq!(req.flavor_name(), "e1");
        assert_eq!(req.availability_zone(), "-");
        assert!(req.hosts().is_empty());
        assert!(!req.hosts_all());

        let req = ProvisionRequest::new(StorageType::Persistent);
        assert_eq!(req.aggregate_name(), "persistent-compute-storage");
        assert_eq!(req.flavor_name(), "m1");
    }

    #[tokio::test]
    async fn test_empty_hosts_rejected() {
        let fake = FakeCompute::new();
        let req = ProvisionRequest::new(StorageType::Ephemeral);
        let err = provision(&fake, &req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(fake.aggregates().is_empty());
    }

    #[tokio::test]
    async fn test_ephemeral_from_scratch() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_compute_host("compute-2")
            .with_flavor("1", "m1.tiny", 512, 1, 1, 0)
            .with_flavor("2", "m1.small", 2048, 1, 20, 0)
            .with_flavor("x1", "x1.big", 8192, 4, 80, 80);
        let req = ProvisionRequest::new(StorageType::Ephemeral)
            .with_hosts(strings(&["compute-1", "compute-2"]));

        let report = provision(&fake, &req).await.unwrap();
        assert!(report.aggregate_created);
        assert!(report.aggregate_tagged);
        assert_eq!(report.added_hosts, strings(&["compute-1", "compute-2"]));
        assert_eq!(report.created_flavors, strings(&["e1.tiny", "e1.small"]));
        assert_eq!(report.tagged_flavors, strings(&["e1.tiny", "e1.small"]));

        let aggregates = fake.aggregates();
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].name, "ephemeral-compute-storage");
        assert_eq!(aggregates[0].availability_zone, "-");
        assert_eq!(aggregates[0].hosts, strings(&["compute-1", "compute-2"]));
        assert_eq!(
            aggregates[0].metadata.get("ephemeralcomputestorage").map(String::as_str),
            Some("true")
        );

        let small = fake.flavor("e2").unwrap();
        assert_eq!(small.spec.name, "e1.small");
        assert_eq!(small.spec.disk, 20);
        assert_eq!(small.spec.ephemeral, 20);
        assert_eq!(small.spec.ram, 2048);
        assert_eq!(
            small.extra_specs.get("ephemeralcomputestorage").map(String::as_str),
            Some("true")
        );
        // Flavors with an ephemeral disk are not cloned.
        assert!(fake.flavor("ex1").is_none());
        // Originals are not tagged for ephemeral storage.
        assert!(fake.flavor("2").unwrap().extra_specs.is_empty());
    }

    #[tokio::test]
    async fn test_ephemeral_is_idempotent() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_flavor("2", "m1.small", 2048, 1, 20, 0);
        let req = ProvisionRequest::new(StorageType::Ephemeral)
            .with_hosts(strings(&["compute-1"]));

        let _ = provision(&fake, &req).await.unwrap();
        let report = provision(&fake, &req).await.unwrap();
        assert!(!report.aggregate_created);
        assert!(report.added_hosts.is_empty());
        assert_eq!(report.existing_hosts, strings(&["compute-1"]));
        assert!(report.created_flavors.is_empty());
        assert_eq!(report.existing_flavors, strings(&["e1.small"]));
        // The clone is found again and re-tagged.
        assert_eq!(report.tagged_flavors, strings(&["e1.small"]));
        assert_eq!(fake.aggregates().len(), 1);
        assert_eq!(fake.flavor_count(), 2);
    }

    #[tokio::test]
    async fn test_persistent_tags_originals() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-3")
            .with_flavor("1", "m1.tiny", 512, 1, 1, 0)
            .with_flavor("e1", "e1.tiny", 512, 1, 1, 1);
        let req = ProvisionRequest::new(StorageType::Persistent)
            .with_hosts(strings(&["compute-3"]));

        let report = provision(&fake, &req).await.unwrap();
        assert!(report.created_flavors.is_empty());
        assert_eq!(report.tagged_flavors, strings(&["m1.tiny"]));
        assert_eq!(
            fake.flavor("1")
                .unwrap()
                .extra_specs
                .get("persistentcomputestorage")
                .map(String::as_str),
            Some("true")
        );
        assert!(fake.flavor("e1").unwrap().extra_specs.is_empty());
        assert_eq!(fake.aggregates()[0].name, "persistent-compute-storage");
        assert_eq!(fake.flavor_count(), 2);
    }

    #[tokio::test]
    async fn test_hosts_from_hypervisors_with_fqdn_fallback() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_compute_host("compute-2")
            .with_hypervisor("compute-1.example.com")
            .with_hypervisor("compute-2")
            .with_hypervisor("ghost.example.com");
        let req = ProvisionRequest::new(StorageType::Persistent).with_hosts_all(true);

        let report = provision(&fake, &req).await.unwrap();
        assert_eq!(report.added_hosts, strings(&["compute-2", "compute-1"]));
        assert_eq!(report.unresolved_hosts, strings(&["ghost.example.com"]));
        assert_eq!(fake.aggregates()[0].hosts, strings(&["compute-2", "compute-1"]));
    }

    #[tokio::test]
    async fn test_existing_aggregate_reused() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_aggregate("ephemeral-compute-storage", &["compute-1"]);
        let req = ProvisionRequest::new(StorageType::Ephemeral)
            .with_hosts(strings(&["compute-1"]))
            .with_availability_zone("az1");

        let report = provision(&fake, &req).await.unwrap();
        assert!(!report.aggregate_created);
        assert_eq!(report.aggregate.unwrap().name, "ephemeral-compute-storage");
        assert_eq!(report.existing_hosts, strings(&["compute-1"]));
        assert_eq!(fake.aggregates().len(), 1);
        assert_eq!(fake.aggregates()[0].availability_zone, "nova");
    }

    #[tokio::test]
    async fn test_aggregate_created_concurrently() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_hidden_aggregate("ephemeral-compute-storage");
        let req = ProvisionRequest::new(StorageType::Ephemeral)
            .with_hosts(strings(&["compute-1"]));

        let report = provision(&fake, &req).await.unwrap();
        assert!(!report.aggregate_created);
        assert_eq!(report.added_hosts, strings(&["compute-1"]));
    }

    #[tokio::test]
    async fn test_unexpected_error_aborts() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_flavor("2", "m1.small", 2048, 1, 20, 0)
            .failing(Call::CreateFlavor, ErrorKind::InternalServerError);
        let req = ProvisionRequest::new(StorageType::Ephemeral)
            .with_hosts(strings(&["compute-1"]));

        let err = provision(&fake, &req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        // Everything before the failure has been done.
        assert_eq!(fake.aggregates()[0].hosts, strings(&["compute-1"]));
    }

    #[tokio::test]
    async fn test_metadata_conflicts_are_skipped() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_flavor("1", "m1.tiny", 512, 1, 1, 0)
            .failing(Call::SetAggregateMetadata, ErrorKind::Conflict)
            .failing(Call::SetFlavorExtraSpecs, ErrorKind::Conflict);
        let req = ProvisionRequest::new(StorageType::Persistent)
            .with_hosts(strings(&["compute-1"]));

        let report = provision(&fake, &req).await.unwrap();
        assert!(!report.aggregate_tagged);
        assert!(report.tagged_flavors.is_empty());
        assert_eq!(report.added_hosts, strings(&["compute-1"]));
        assert_eq!(report.aggregate.unwrap().name, "persistent-compute-storage");
    }

    #[tokio::test]
    async fn test_metadata_failure_aborts() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .failing(Call::SetAggregateMetadata, ErrorKind::AccessDenied);
        let req = ProvisionRequest::new(StorageType::Persistent)
            .with_hosts(strings(&["compute-1"]));

        let err = provision(&fake, &req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessDenied);
    }

    #[tokio::test]
    async fn test_service_host_already_in_aggregate() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_hypervisor("compute-1.example.com")
            .with_aggregate("persistent-compute-storage", &["compute-1"]);
        let req = ProvisionRequest::new(StorageType::Persistent).with_hosts_all(true);

        let report = provision(&fake, &req).await.unwrap();
        assert!(report.added_hosts.is_empty());
        assert_eq!(report.existing_hosts, strings(&["compute-1"]));
        assert!(report.unresolved_hosts.is_empty());
        assert!(report.aggregate_tagged);
        assert_eq!(fake.aggregates()[0].hosts, strings(&["compute-1"]));
    }

    #[tokio::test]
    async fn test_service_host_failure_aborts() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_hypervisor("compute-1.example.com")
            .failing_host("compute-1", ErrorKind::InternalServerError);
        let req = ProvisionRequest::new(StorageType::Persistent).with_hosts_all(true);

        let err = provision(&fake, &req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert!(fake.aggregates()[0].hosts.is_empty());
        assert!(fake.aggregates()[0].metadata.is_empty());
    }

    #[tokio::test]
    async fn test_conflicting_flavor_not_found() {
        let fake = FakeCompute::new()
            .with_compute_host("compute-1")
            .with_flavor("2", "m1.small", 2048, 1, 20, 0)
            .failing(Call::CreateFlavor, ErrorKind::Conflict);
        let req = ProvisionRequest::new(StorageType::Ephemeral)
            .with_hosts(strings(&["compute-1"]));

        let err = provision(&fake, &req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert_eq!(fake.flavor_count(), 1);
    }

    #[tokio::test]
    async fn test_find_flavor_listing_error() {
        let fake = FakeCompute::new()
            .with_flavor("1", "m1.tiny", 512, 1, 1, 0)
            .failing(Call::ListFlavors, ErrorKind::InternalServerError);

        assert!(find_flavor(&fake, Some("m1.tiny"), Some("1")).await.is_none());
    }

    #[tokio::test]
    async fn test_find_flavor() {
        let fake = FakeCompute::new()
            .with_flavor("1", "m1.tiny", 512, 1, 1, 0)
            .with_flavor("2", "M1.Small", 2048, 1, 20, 0);

        assert!(find_flavor(&fake, None, None).await.is_none());
        assert_eq!(
            find_flavor(&fake, Some("m1.small"), None).await.unwrap().id,
            "2"
        );
        assert_eq!(find_flavor(&fake, None, Some("1")).await.unwrap().name, "m1.tiny");
        assert!(find_flavor(&fake, Some("m1.huge"), Some("42")).await.is_none());
    }
}
