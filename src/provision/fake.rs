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

//! In-memory compute backend for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AggregateSummary, ComputeBackend, FlavorSpec};
use crate::{Error, ErrorKind, Result};

#[derive(Clone, Debug)]
pub struct FakeAggregate {
    pub id: u64,
    pub name: String,
    pub availability_zone: String,
    pub hosts: Vec<String>,
    pub metadata: HashMap<String, String>,
    hidden: bool,
}

impl FakeAggregate {
    fn summary(&self) -> AggregateSummary {
        AggregateSummary {
            id: self.id,
            name: self.name.clone(),
            hosts: self.hosts.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FakeFlavor {
    pub spec: FlavorSpec,
    pub extra_specs: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct State {
    aggregates: Vec<FakeAggregate>,
    flavors: Vec<FakeFlavor>,
    next_id: u64,
}

/// Calls that can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    SetAggregateMetadata,
    ListFlavors,
    CreateFlavor,
    SetFlavorExtraSpecs,
}

#[derive(Debug, Default)]
pub struct FakeCompute {
    state: Mutex<State>,
    compute_hosts: Vec<String>,
    hypervisors: Vec<String>,
    failures: HashMap<Call, ErrorKind>,
    host_failures: HashMap<String, ErrorKind>,
}

impl FakeCompute {
    pub fn new() -> FakeCompute {
        FakeCompute::default()
    }

    /// A host known to Nova under this name.
    pub fn with_compute_host(mut self, host: &str) -> Self {
        self.compute_hosts.push(host.to_string());
        self
    }

    pub fn with_hypervisor(mut self, hostname: &str) -> Self {
        self.hypervisors.push(hostname.to_string());
        self
    }

    pub fn with_flavor(
        self,
        id: &str,
        name: &str,
        ram: u64,
        vcpus: u32,
        disk: u64,
        ephemeral: u64,
    ) -> Self {
        self.state.lock().unwrap().flavors.push(FakeFlavor {
            spec: FlavorSpec {
                id: id.to_string(),
                name: name.to_string(),
                ram,
                vcpus,
                disk,
                ephemeral,
                swap: 0,
                rxtx_factor: 1.0,
                is_public: true,
            },
            extra_specs: HashMap::new(),
        });
        self
    }

    pub fn with_aggregate(self, name: &str, hosts: &[&str]) -> Self {
        self.push_aggregate(name, hosts, false);
        self
    }

    /// An aggregate that only shows up after a creation attempt.
    pub fn with_hidden_aggregate(self, name: &str) -> Self {
        self.push_aggregate(name, &[], true);
        self
    }

    /// Make every invocation of the call fail with the error kind.
    pub fn failing(mut self, call: Call, kind: ErrorKind) -> Self {
        let _ = self.failures.insert(call, kind);
        self
    }

    /// Make adding this host to any aggregate fail with the error kind.
    pub fn failing_host(mut self, host: &str, kind: ErrorKind) -> Self {
        let _ = self.host_failures.insert(host.to_string(), kind);
        self
    }

    pub fn aggregates(&self) -> Vec<FakeAggregate> {
        self.state.lock().unwrap().aggregates.clone()
    }

    pub fn flavor(&self, id: &str) -> Option<FakeFlavor> {
        self.state
            .lock()
            .unwrap()
            .flavors
            .iter()
            .find(|f| f.spec.id == id)
            .cloned()
    }

    pub fn flavor_count(&self) -> usize {
        self.state.lock().unwrap().flavors.len()
    }

    fn push_aggregate(&self, name: &str, hosts: &[&str], hidden: bool) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.aggregates.push(FakeAggregate {
            id,
            name: name.to_string(),
            availability_zone: "nova".to_string(),
            hosts: hosts.iter().map(|s| s.to_string()).collect(),
            metadata: HashMap::new(),
            hidden,
        });
    }

    fn check(&self, call: Call) -> Result<()> {
        match self.failures.get(&call) {
            Some(kind) => Err(Error::new(*kind, format!("{:?} failed", call))),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str) -> Error {
    Error::new(ErrorKind::ResourceNotFound, format!("{} not found", what))
}

fn conflict(what: &str) -> Error {
    Error::new(ErrorKind::Conflict, format!("{} already exists", what))
}

#[async_trait]
impl ComputeBackend for FakeCompute {
    async fn list_aggregates(&self) -> Result<Vec<AggregateSummary>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .aggregates
            .iter()
            .filter(|a| !a.hidden)
            .map(FakeAggregate::summary)
            .collect())
    }

    async fn create_aggregate(
        &self,
        name: &str,
        availability_zone: &str,
    ) -> Result<AggregateSummary> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.aggregates.iter_mut().find(|a| a.name == name) {
            existing.hidden = false;
            return Err(conflict(name));
        }
        state.next_id += 1;
        let aggregate = FakeAggregate {
            id: state.next_id,
            name: name.to_string(),
            availability_zone: availability_zone.to_string(),
            hosts: Vec::new(),
            metadata: HashMap::new(),
            hidden: false,
        };
        let summary = aggregate.summary();
        state.aggregates.push(aggregate);
        Ok(summary)
    }

    async fn add_aggregate_host(&self, aggregate: &AggregateSummary, host: &str) -> Result<()> {
        if let Some(kind) = self.host_failures.get(host) {
            return Err(Error::new(*kind, format!("adding {} failed", host)));
        }
        if !self.compute_hosts.iter().any(|h| h == host) {
            return Err(not_found(host));
        }
        let mut state = self.state.lock().unwrap();
        let target = state
            .aggregates
            .iter_mut()
            .find(|a| a.id == aggregate.id)
            .ok_or_else(|| not_found(&aggregate.name))?;
        if target.hosts.iter().any(|h| h == host) {
            return Err(conflict(host));
        }
        target.hosts.push(host.to_string());
        Ok(())
    }

    async fn set_aggregate_metadata(
        &self,
        aggregate: &AggregateSummary,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        self.check(Call::SetAggregateMetadata)?;
        let mut state = self.state.lock().unwrap();
        let target = state
            .aggregates
            .iter_mut()
            .find(|a| a.id == aggregate.id)
            .ok_or_else(|| not_found(&aggregate.name))?;
        target.metadata.extend(metadata);
        Ok(())
    }

    async fn list_hypervisor_hostnames(&self) -> Result<Vec<String>> {
        Ok(self.hypervisors.clone())
    }

    async fn list_compute_service_hosts(&self) -> Result<Vec<String>> {
        Ok(self.compute_hosts.clone())
    }

    async fn list_flavors(&self) -> Result<Vec<FlavorSpec>> {
        self.check(Call::ListFlavors)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .flavors
            .iter()
            .map(|f| f.spec.clone())
            .collect())
    }

    async fn create_flavor(&self, flavor: &FlavorSpec) -> Result<FlavorSpec> {
        self.check(Call::CreateFlavor)?;
        let mut state = self.state.lock().unwrap();
        if state
            .flavors
            .iter()
            .any(|f| f.spec.id == flavor.id || f.spec.name == flavor.name)
        {
            return Err(conflict(&flavor.name));
        }
        state.flavors.push(FakeFlavor {
            spec: flavor.clone(),
            extra_specs: HashMap::new(),
        });
        Ok(flavor.clone())
    }

    async fn set_flavor_extra_specs(
        &self,
        flavor: &FlavorSpec,
        extra_specs: HashMap<String, String>,
    ) -> Result<()> {
        self.check(Call::SetFlavorExtraSpecs)?;
        let mut state = self.state.lock().unwrap();
        let target = state
            .flavors
            .iter_mut()
            .find(|f| f.spec.id == flavor.id)
            .ok_or_else(|| not_found(&flavor.id))?;
        target.extra_specs.extend(extra_specs);
        Ok(())
    }
}
