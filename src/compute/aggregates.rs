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

//! Host aggregate management via Compute API.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use super::super::session::Session;
use super::super::Result;
use super::{api, protocol};

/// Structure representing a host aggregate.
#[derive(Clone, Debug)]
pub struct Aggregate {
    session: Session,
    inner: protocol::Aggregate,
}

/// A request to create a host aggregate.
#[derive(Clone, Debug)]
pub struct NewAggregate {
    session: Session,
    inner: protocol::AggregateCreate,
}

impl Display for Aggregate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.inner.name, self.inner.id)
    }
}

impl Aggregate {
    pub(crate) fn from_inner(session: Session, inner: protocol::Aggregate) -> Aggregate {
        Aggregate { session, inner }
    }

    /// Load an aggregate by its ID.
    pub(crate) async fn load(session: Session, id: u64) -> Result<Aggregate> {
        let inner = api::get_aggregate(&session, id).await?;
        Ok(Aggregate { session, inner })
    }

    transparent_property! {
        #[doc = "Availability zone of the aggregate (if any)."]
        availability_zone: ref Option<String>
    }

    transparent_property! {
        #[doc = "Hosts that belong to the aggregate."]
        hosts: ref Vec<String>
    }

    transparent_property! {
        #[doc = "Numeric ID of the aggregate."]
        id: u64
    }

    transparent_property! {
        #[doc = "Aggregate metadata."]
        metadata: ref HashMap<String, String>
    }

    transparent_property! {
        #[doc = "Aggregate name."]
        name: ref String
    }

    transparent_property! {
        #[doc = "UUID of the aggregate (microversion 2.41 and newer)."]
        uuid: ref Option<String>
    }

    /// Add a host to the aggregate.
    ///
    /// Fails with `Conflict` if the host is already a member and with
    /// `ResourceNotFound` if Nova does not know a compute service with this name.
    pub async fn add_host<S: AsRef<str>>(&mut self, host: S) -> Result<()> {
        self.inner = api::add_aggregate_host(&self.session, self.inner.id, host).await?;
        Ok(())
    }

    /// Set (merge) metadata keys on the aggregate.
    pub async fn set_metadata(&mut self, metadata: HashMap<String, String>) -> Result<()> {
        self.inner = api::set_aggregate_metadata(&self.session, self.inner.id, metadata).await?;
        Ok(())
    }
}

impl NewAggregate {
    /// Start creating an aggregate.
    pub(crate) fn new(session: Session, name: String) -> NewAggregate {
        NewAggregate {
            session,
            inner: protocol::AggregateCreate {
                name,
                availability_zone: None,
            },
        }
    }

    /// Request creation of the aggregate.
    pub async fn create(self) -> Result<Aggregate> {
        let inner = api::create_aggregate(&self.session, self.inner).await?;
        Ok(Aggregate {
            session: self.session,
            inner,
        })
    }

    creation_inner_field! {
        #[doc = "Set the availability zone."]
        set_availability_zone, with_availability_zone -> availability_zone: optional String
    }
}
