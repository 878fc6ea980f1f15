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

//! JSON structures and protocol bits for the Compute API.

#![allow(missing_docs)]

use std::collections::HashMap;

use crate::utils::{empty_as_default, null_as_default};

#[derive(Clone, Debug, Deserialize)]
pub struct Aggregate {
    #[serde(default, deserialize_with = "empty_as_default")]
    pub availability_zone: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hosts: Vec<String>,
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
    pub name: String,
    #[serde(default)]
    pub uuid: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AggregateRoot {
    pub aggregate: Aggregate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AggregatesRoot {
    pub aggregates: Vec<Aggregate>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AggregateCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AggregateCreateRoot {
    pub aggregate: AggregateCreate,
}

#[derive(Clone, Debug, Serialize)]
pub struct AddHost {
    pub host: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SetMetadata {
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, Debug, Serialize)]
pub enum AggregateAction {
    #[serde(rename = "add_host")]
    AddHost(AddHost),
    #[serde(rename = "set_metadata")]
    SetMetadata(SetMetadata),
}

#[derive(Clone, Debug, Deserialize)]
pub struct Hypervisor {
    pub id: serde_json::Value,
    pub hypervisor_hostname: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct HypervisorsRoot {
    pub hypervisors: Vec<Hypervisor>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
    pub id: serde_json::Value,
    pub binary: String,
    pub host: String,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServicesRoot {
    pub services: Vec<Service>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Flavor {
    #[serde(rename = "OS-FLV-EXT-DATA:ephemeral", default)]
    pub ephemeral: u64,
    pub disk: u64,
    #[serde(default, skip_serializing)]
    pub extra_specs: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(
        rename = "os-flavor-access:is_public",
        default = "default_flavor_is_public"
    )]
    pub is_public: bool,
    pub name: String,
    pub ram: u64,
    #[serde(default = "default_rxtx_factor")]
    pub rxtx_factor: f32,
    #[serde(default, deserialize_with = "empty_as_default")]
    pub swap: u64,
    pub vcpus: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorRoot {
    pub flavor: Flavor,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FlavorsDetailRoot {
    pub flavors: Vec<Flavor>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FlavorCreateRoot {
    pub flavor: Flavor,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExtraSpecsRoot {
    pub extra_specs: HashMap<String, String>,
}

impl Flavor {
    pub fn new(name: String) -> Flavor {
        Flavor {
            ephemeral: 0,
            disk: 0,
            extra_specs: None,
            id: String::new(),
            is_public: true,
            name,
            ram: 0,
            rxtx_factor: default_rxtx_factor(),
            swap: 0,
            vcpus: 0,
        }
    }
}

#[inline]
fn default_flavor_is_public() -> bool {
    true
}

#[inline]
fn default_rxtx_factor() -> f32 {
    1.0
}
