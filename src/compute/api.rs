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

//! Foundation bits exposing the Compute API.

use std::collections::HashMap;

use osauth::ErrorKind;

use super::super::session::Session;
use super::super::utils;
use super::super::Result;
use super::protocol::*;

/// Add a host to a host aggregate.
pub async fn add_aggregate_host<S: AsRef<str>>(
    session: &Session,
    id: u64,
    host: S,
) -> Result<Aggregate> {
    let id = id.to_string();
    trace!("Adding host {} to aggregate {}", host.as_ref(), id);
    let body = AggregateAction::AddHost(AddHost {
        host: host.as_ref().into(),
    });
    let root: AggregateRoot = session
        .post(&["os-aggregates", id.as_str(), "action"])
        .json(&body)
        .fetch()
        .await?;
    debug!("Added host {} to aggregate {}", host.as_ref(), id);
    Ok(root.aggregate)
}

/// Create a host aggregate.
pub async fn create_aggregate(session: &Session, request: AggregateCreate) -> Result<Aggregate> {
    debug!("Creating a host aggregate with {:?}", request);
    let body = AggregateCreateRoot { aggregate: request };
    let root: AggregateRoot = session
        .post(&["os-aggregates"])
        .json(&body)
        .fetch()
        .await?;
    debug!("Created host aggregate {:?}", root.aggregate);
    Ok(root.aggregate)
}

/// Create a flavor.
pub async fn create_flavor(session: &Session, request: Flavor) -> Result<Flavor> {
    debug!("Creating a flavor with {:?}", request);
    let body = FlavorCreateRoot { flavor: request };
    let root: FlavorRoot = session.post(&["flavors"]).json(&body).fetch().await?;
    debug!("Created flavor {:?}", root.flavor);
    Ok(root.flavor)
}

/// Get a flavor.
pub async fn get_flavor<S: AsRef<str>>(session: &Session, id_or_name: S) -> Result<Flavor> {
    let s = id_or_name.as_ref();
    match get_flavor_by_id(session, s).await {
        Ok(value) => Ok(value),
        Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
            get_flavor_by_name(session, s).await
        }
        Err(err) => Err(err),
    }
}

/// Get a flavor by its ID.
pub async fn get_flavor_by_id<S: AsRef<str>>(session: &Session, id: S) -> Result<Flavor> {
    trace!("Get compute flavor by ID {}", id.as_ref());
    let root: FlavorRoot = session.get(&["flavors", id.as_ref()]).fetch().await?;
    trace!("Received {:?}", root.flavor);
    Ok(root.flavor)
}

/// Get a flavor by its name.
///
/// Nova cannot filter flavors by name, so the detailed list is scanned.
pub async fn get_flavor_by_name<S: AsRef<str>>(session: &Session, name: S) -> Result<Flavor> {
    trace!("Get compute flavor by name {}", name.as_ref());
    let items = list_flavors(session)
        .await?
        .into_iter()
        .filter(|item| item.name == name.as_ref());
    utils::one(
        items,
        "Flavor with given name or ID not found",
        "Too many flavors found with given name",
    )
}

/// Get a host aggregate.
pub async fn get_aggregate(session: &Session, id: u64) -> Result<Aggregate> {
    let id = id.to_string();
    trace!("Get host aggregate {}", id);
    let root: AggregateRoot = session
        .get(&["os-aggregates", id.as_str()])
        .fetch()
        .await?;
    trace!("Received {:?}", root.aggregate);
    Ok(root.aggregate)
}

/// List host aggregates.
pub async fn list_aggregates(session: &Session) -> Result<Vec<Aggregate>> {
    trace!("Listing host aggregates");
    let root: AggregatesRoot = session.get(&["os-aggregates"]).fetch().await?;
    trace!("Received host aggregates: {:?}", root.aggregates);
    Ok(root.aggregates)
}

/// List flavors with details.
pub async fn list_flavors(session: &Session) -> Result<Vec<Flavor>> {
    trace!("Listing compute flavors");
    let root: FlavorsDetailRoot = session.get(&["flavors", "detail"]).fetch().await?;
    trace!("Received flavors: {:?}", root.flavors);
    Ok(root.flavors)
}

/// List hypervisors.
pub async fn list_hypervisors(session: &Session) -> Result<Vec<Hypervisor>> {
    trace!("Listing hypervisors");
    let root: HypervisorsRoot = session.get(&["os-hypervisors"]).fetch().await?;
    trace!("Received hypervisors: {:?}", root.hypervisors);
    Ok(root.hypervisors)
}

/// List compute services, optionally filtered by binary.
pub async fn list_services(session: &Session, binary: Option<&str>) -> Result<Vec<Service>> {
    trace!("Listing compute services with binary {:?}", binary);
    let mut request = session.get(&["os-services"]);
    if let Some(binary) = binary {
        request = request.query(&[("binary", binary)]);
    }
    let root: ServicesRoot = request.fetch().await?;
    trace!("Received services: {:?}", root.services);
    Ok(root.services)
}

/// Set metadata on a host aggregate.
pub async fn set_aggregate_metadata(
    session: &Session,
    id: u64,
    metadata: HashMap<String, String>,
) -> Result<Aggregate> {
    let id = id.to_string();
    trace!("Setting metadata {:?} on aggregate {}", metadata, id);
    let body = AggregateAction::SetMetadata(SetMetadata { metadata });
    let root: AggregateRoot = session
        .post(&["os-aggregates", id.as_str(), "action"])
        .json(&body)
        .fetch()
        .await?;
    debug!("Updated metadata of aggregate {}", id);
    Ok(root.aggregate)
}

/// Create or update extra specs of a flavor.
pub async fn set_flavor_extra_specs<S: AsRef<str>>(
    session: &Session,
    id: S,
    extra_specs: HashMap<String, String>,
) -> Result<HashMap<String, String>> {
    trace!("Setting extra specs {:?} on flavor {}", extra_specs, id.as_ref());
    let body = ExtraSpecsRoot { extra_specs };
    let root: ExtraSpecsRoot = session
        .post(&["flavors", id.as_ref(), "os-extra_specs"])
        .json(&body)
        .fetch()
        .await?;
    debug!("Updated extra specs of flavor {}", id.as_ref());
    Ok(root.extra_specs)
}
