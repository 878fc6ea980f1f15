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

//! Flavor management via Compute API.

use std::collections::HashMap;

use super::super::session::Session;
use super::super::Result;
use super::{api, protocol};

/// Structure representing a flavor.
#[derive(Clone, Debug)]
pub struct Flavor {
    session: Session,
    inner: protocol::Flavor,
}

/// A request to create a flavor.
#[derive(Clone, Debug)]
pub struct NewFlavor {
    session: Session,
    inner: protocol::Flavor,
}

impl Flavor {
    pub(crate) fn from_inner(session: Session, inner: protocol::Flavor) -> Flavor {
        Flavor { session, inner }
    }

    /// Load a Flavor object.
    pub(crate) async fn load<Id: AsRef<str>>(session: Session, id_or_name: Id) -> Result<Flavor> {
        let inner = api::get_flavor(&session, id_or_name).await?;
        Ok(Flavor { session, inner })
    }

    transparent_property! {
        #[doc = "Ephemeral disk size in GiB (0 when not requested)."]
        ephemeral: u64
    }

    transparent_property! {
        #[doc = "Root disk size in GiB."]
        disk: u64
    }

    transparent_property! {
        #[doc = "Extra specs (only returned by newer microversions)."]
        extra_specs: ref Option<HashMap<String, String>>
    }

    transparent_property! {
        #[doc = "Flavor unique ID."]
        id: ref String
    }

    transparent_property! {
        #[doc = "Whether the flavor is public."]
        is_public: bool
    }

    transparent_property! {
        #[doc = "Flavor name."]
        name: ref String
    }

    transparent_property! {
        #[doc = "RAM size in MiB."]
        ram: u64
    }

    transparent_property! {
        #[doc = "Network bandwidth factor."]
        rxtx_factor: f32
    }

    transparent_property! {
        #[doc = "Swap size in MiB (0 when not requested)."]
        swap: u64
    }

    transparent_property! {
        #[doc = "VCPU count."]
        vcpus: u32
    }

    /// Create or update extra specs (flavor metadata).
    ///
    /// Returns the extra specs as reported back by Nova.
    pub async fn set_extra_specs(
        &mut self,
        extra_specs: HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let result = api::set_flavor_extra_specs(&self.session, &self.inner.id, extra_specs).await?;
        let current = self.inner.extra_specs.get_or_insert_with(HashMap::new);
        current.extend(result.clone());
        Ok(result)
    }
}

impl NewFlavor {
    /// Start creating a flavor.
    pub(crate) fn new(session: Session, name: String) -> NewFlavor {
        NewFlavor {
            session,
            inner: protocol::Flavor::new(name),
        }
    }

    /// Request creation of the flavor.
    pub async fn create(self) -> Result<Flavor> {
        let inner = api::create_flavor(&self.session, self.inner).await?;
        Ok(Flavor {
            session: self.session,
            inner,
        })
    }

    creation_inner_field! {
        #[doc = "Set the root disk size in GiB."]
        set_disk, with_disk -> disk: u64
    }

    creation_inner_field! {
        #[doc = "Set the ephemeral disk size in GiB."]
        set_ephemeral, with_ephemeral -> ephemeral: u64
    }

    creation_inner_field! {
        #[doc = "Set the flavor ID (generated by Nova if empty)."]
        set_id, with_id -> id: String
    }

    creation_inner_field! {
        #[doc = "Set whether the flavor is public."]
        set_public, with_public -> is_public: bool
    }

    creation_inner_field! {
        #[doc = "Set the flavor name."]
        set_name, with_name -> name: String
    }

    creation_inner_field! {
        #[doc = "Set the RAM size in MiB."]
        set_ram, with_ram -> ram: u64
    }

    creation_inner_field! {
        #[doc = "Set the network bandwidth factor."]
        set_rxtx_factor, with_rxtx_factor -> rxtx_factor: f32
    }

    creation_inner_field! {
        #[doc = "Set the swap size in MiB."]
        set_swap, with_swap -> swap: u64
    }

    creation_inner_field! {
        #[doc = "Set the VCPU count."]
        set_vcpus, with_vcpus -> vcpus: u32
    }
}
