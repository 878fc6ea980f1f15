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

//! Cloud API.

use std::collections::HashMap;

use async_trait::async_trait;
use osauth::AuthType;

use super::compute::{
    api, Aggregate, Flavor, Hypervisor, NewAggregate, NewFlavor, Service, COMPUTE_BINARY,
};
use super::provision::{AggregateSummary, ComputeBackend, FlavorSpec};
use super::session::Session;
use super::{ApiVersion, Result};

/// OpenStack cloud API.
///
/// Provides high-level API for the compute resources involved in storage
/// provisioning.
#[derive(Debug, Clone)]
pub struct Cloud {
    session: Session,
}

impl Cloud {
    /// Create a new cloud object with a given authentication plugin.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn cloud() -> nova_ephemeral::Result<nova_ephemeral::Cloud> {
    /// use osauth::common::IdOrName;
    /// let auth = osauth::identity::Password::new(
    ///         "https://cloud.example.com",
    ///         "user1", "pa$$word", "Default")?
    ///     .with_project_scope(IdOrName::from_name("project1"), IdOrName::from_name("Default"));
    /// nova_ephemeral::Cloud::new(auth).await
    /// # }
    /// # #[tokio::main]
    /// # async fn main() { cloud().await.unwrap(); }
    /// ```
    ///
    /// # See Also
    ///
    /// * [from_config](#method.from_config) to create a Cloud from clouds.yaml
    /// * [from_env](#method.from_env) to create a Cloud from environment variables
    pub async fn new<Auth: AuthType + 'static>(auth_type: Auth) -> Result<Cloud> {
        Ok(Cloud::new_session(osauth::Session::new(auth_type).await?))
    }

    /// Create a new cloud object using a custom HTTP client.
    ///
    /// Useful to trust an additional CA certificate.
    pub async fn new_with_client<Auth: AuthType + 'static>(
        client: reqwest::Client,
        auth_type: Auth,
    ) -> Result<Cloud> {
        Ok(Cloud::new_session(
            osauth::Session::new_with_client(client, auth_type).await?,
        ))
    }

    /// Create a new cloud object from a configuration file
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn cloud_from_config() -> nova_ephemeral::Result<()> {
    /// let os = nova_ephemeral::Cloud::from_config("cloud-1").await?;
    /// # Ok(()) }
    /// # #[tokio::main]
    /// # async fn main() { cloud_from_config().await.unwrap(); }
    /// ```
    pub async fn from_config<S: AsRef<str>>(cloud_name: S) -> Result<Cloud> {
        Ok(Cloud::new_session(
            osauth::Session::from_config(cloud_name).await?,
        ))
    }

    /// Create a new cloud object from environment variables.
    pub async fn from_env() -> Result<Cloud> {
        Ok(Cloud::new_session(osauth::Session::from_env().await?))
    }

    /// Create a new cloud object from an existing session.
    pub fn new_session(session: osauth::Session) -> Cloud {
        Cloud {
            session: Session::new(session),
        }
    }

    /// Convert this cloud into one using the given region.
    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.session.set_region(region);
        self
    }

    /// Convert this cloud into one sending the given compute API microversion.
    pub fn with_compute_api_version(mut self, version: ApiVersion) -> Self {
        self.session.set_compute_api_version(Some(version));
        self
    }

    /// Compute API microversion sent with requests (if any).
    #[inline]
    pub fn compute_api_version(&self) -> Option<ApiVersion> {
        self.session.compute_api_version()
    }

    /// Region used for endpoint lookup (if any).
    #[inline]
    pub fn region(&self) -> Option<&str> {
        self.session.region()
    }

    /// List all host aggregates.
    pub async fn list_aggregates(&self) -> Result<Vec<Aggregate>> {
        Ok(api::list_aggregates(&self.session)
            .await?
            .into_iter()
            .map(|item| Aggregate::from_inner(self.session.clone(), item))
            .collect())
    }

    /// Find a host aggregate by its name.
    pub async fn find_aggregate<S: AsRef<str>>(&self, name: S) -> Result<Option<Aggregate>> {
        let name = name.as_ref();
        Ok(self
            .list_aggregates()
            .await?
            .into_iter()
            .find(|item| item.name() == name))
    }

    /// Get a host aggregate by its ID.
    pub async fn get_aggregate(&self, id: u64) -> Result<Aggregate> {
        Aggregate::load(self.session.clone(), id).await
    }

    /// Prepare a new host aggregate for creation.
    pub fn new_aggregate<S: Into<String>>(&self, name: S) -> NewAggregate {
        NewAggregate::new(self.session.clone(), name.into())
    }

    /// List all public flavors with details.
    pub async fn list_flavors(&self) -> Result<Vec<Flavor>> {
        Ok(api::list_flavors(&self.session)
            .await?
            .into_iter()
            .map(|item| Flavor::from_inner(self.session.clone(), item))
            .collect())
    }

    /// Find a flavor by its name or ID.
    pub async fn get_flavor<Id: AsRef<str>>(&self, id_or_name: Id) -> Result<Flavor> {
        Flavor::load(self.session.clone(), id_or_name).await
    }

    /// Prepare a new flavor for creation.
    pub fn new_flavor<S: Into<String>>(&self, name: S) -> NewFlavor {
        NewFlavor::new(self.session.clone(), name.into())
    }

    /// List all hypervisors.
    pub async fn list_hypervisors(&self) -> Result<Vec<Hypervisor>> {
        Ok(api::list_hypervisors(&self.session)
            .await?
            .into_iter()
            .map(Hypervisor::from_inner)
            .collect())
    }

    /// List compute services, optionally only the ones with the given binary.
    pub async fn list_services(&self, binary: Option<&str>) -> Result<Vec<Service>> {
        Ok(api::list_services(&self.session, binary)
            .await?
            .into_iter()
            .map(Service::from_inner)
            .collect())
    }
}

impl From<&Aggregate> for AggregateSummary {
    fn from(value: &Aggregate) -> AggregateSummary {
        AggregateSummary {
            id: value.id(),
            name: value.name().clone(),
            hosts: value.hosts().clone(),
        }
    }
}

impl From<&Flavor> for FlavorSpec {
    fn from(value: &Flavor) -> FlavorSpec {
        FlavorSpec {
            id: value.id().clone(),
            name: value.name().clone(),
            ram: value.ram(),
            vcpus: value.vcpus(),
            disk: value.disk(),
            ephemeral: value.ephemeral(),
            swap: value.swap(),
            rxtx_factor: value.rxtx_factor(),
            is_public: value.is_public(),
        }
    }
}

#[async_trait]
impl ComputeBackend for Cloud {
    async fn list_aggregates(&self) -> Result<Vec<AggregateSummary>> {
        Ok(Cloud::list_aggregates(self)
            .await?
            .iter()
            .map(AggregateSummary::from)
            .collect())
    }

    async fn create_aggregate(
        &self,
        name: &str,
        availability_zone: &str,
    ) -> Result<AggregateSummary> {
        let aggregate = self
            .new_aggregate(name)
            .with_availability_zone(availability_zone)
            .create()
            .await?;
        Ok(AggregateSummary::from(&aggregate))
    }

    async fn add_aggregate_host(&self, aggregate: &AggregateSummary, host: &str) -> Result<()> {
        let _ = api::add_aggregate_host(&self.session, aggregate.id, host).await?;
        Ok(())
    }

    async fn set_aggregate_metadata(
        &self,
        aggregate: &AggregateSummary,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let _ = api::set_aggregate_metadata(&self.session, aggregate.id, metadata).await?;
        Ok(())
    }

    async fn list_hypervisor_hostnames(&self) -> Result<Vec<String>> {
        Ok(self
            .list_hypervisors()
            .await?
            .into_iter()
            .map(|item| item.hypervisor_hostname().clone())
            .collect())
    }

    async fn list_compute_service_hosts(&self) -> Result<Vec<String>> {
        Ok(self
            .list_services(Some(COMPUTE_BINARY))
            .await?
            .into_iter()
            .map(|item| item.host().clone())
            .collect())
    }

    async fn list_flavors(&self) -> Result<Vec<FlavorSpec>> {
        Ok(Cloud::list_flavors(self)
            .await?
            .iter()
            .map(FlavorSpec::from)
            .collect())
    }

    async fn create_flavor(&self, flavor: &FlavorSpec) -> Result<FlavorSpec> {
        let created = self
            .new_flavor(flavor.name.clone())
            .with_id(flavor.id.clone())
            .with_ram(flavor.ram)
            .with_vcpus(flavor.vcpus)
            .with_disk(flavor.disk)
            .with_ephemeral(flavor.ephemeral)
            .with_swap(flavor.swap)
            .with_rxtx_factor(flavor.rxtx_factor)
            .with_public(flavor.is_public)
            .create()
            .await?;
        Ok(FlavorSpec::from(&created))
    }

    async fn set_flavor_extra_specs(
        &self,
        flavor: &FlavorSpec,
        extra_specs: HashMap<String, String>,
    ) -> Result<()> {
        let _ = api::set_flavor_extra_specs(&self.session, &flavor.id, extra_specs).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use osauth::{ApiVersion, NoAuth};

    use super::Cloud;

    #[tokio::test]
    async fn test_cloud_with_custom_client() {
        let auth = NoAuth::new("http://127.0.0.1:8774/v2.1").unwrap();
        let os = Cloud::new_with_client(reqwest::Client::new(), auth)
            .await
            .unwrap();
        assert_eq!(os.compute_api_version(), None);
        assert_eq!(os.region(), None);

        let os = os
            .with_region("RegionOne")
            .with_compute_api_version(ApiVersion(2, 1));
        assert_eq!(os.compute_api_version(), Some(ApiVersion(2, 1)));
        assert_eq!(os.region(), Some("RegionOne"));
    }
}
