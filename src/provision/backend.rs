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

//! Compute operations the provisioning workflow relies on.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::Result;

/// A host aggregate as seen by the provisioning workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateSummary {
    /// Numeric ID of the aggregate.
    pub id: u64,
    /// Aggregate name.
    pub name: String,
    /// Hosts that belong to the aggregate.
    pub hosts: Vec<String>,
}

/// A flavor definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FlavorSpec {
    /// Flavor unique ID.
    pub id: String,
    /// Flavor name.
    pub name: String,
    /// RAM size in MiB.
    pub ram: u64,
    /// VCPU count.
    pub vcpus: u32,
    /// Root disk size in GiB.
    pub disk: u64,
    /// Ephemeral disk size in GiB.
    pub ephemeral: u64,
    /// Swap size in MiB.
    pub swap: u64,
    /// Network bandwidth factor.
    pub rxtx_factor: f32,
    /// Whether the flavor is public.
    pub is_public: bool,
}

/// Compute API calls used while provisioning.
///
/// Errors are expected to carry the usual kinds: `Conflict` for resources
/// that already exist and `ResourceNotFound` for unknown hosts.
#[async_trait]
pub trait ComputeBackend: Send + Sync {
    /// List all host aggregates.
    async fn list_aggregates(&self) -> Result<Vec<AggregateSummary>>;

    /// Create a host aggregate in the availability zone.
    async fn create_aggregate(
        &self,
        name: &str,
        availability_zone: &str,
    ) -> Result<AggregateSummary>;

    /// Add a host to the aggregate.
    async fn add_aggregate_host(&self, aggregate: &AggregateSummary, host: &str) -> Result<()>;

    /// Set (merge) metadata on the aggregate.
    async fn set_aggregate_metadata(
        &self,
        aggregate: &AggregateSummary,
        metadata: HashMap<String, String>,
    ) -> Result<()>;

    /// Host names of all hypervisors.
    async fn list_hypervisor_hostnames(&self) -> Result<Vec<String>>;

    /// Host names of all `nova-compute` services.
    async fn list_compute_service_hosts(&self) -> Result<Vec<String>>;

    /// List all (public) flavors.
    async fn list_flavors(&self) -> Result<Vec<FlavorSpec>>;

    /// Create a flavor.
    async fn create_flavor(&self, flavor: &FlavorSpec) -> Result<FlavorSpec>;

    /// Set (merge) extra specs on the flavor.
    async fn set_flavor_extra_specs(
        &self,
        flavor: &FlavorSpec,
        extra_specs: HashMap<String, String>,
    ) -> Result<()>;
}
