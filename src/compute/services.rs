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

//! Compute services.

use super::protocol;

/// A Compute service (e.g. `nova-compute` running on a host).
#[derive(Clone, Debug)]
pub struct Service {
    inner: protocol::Service,
}

impl Service {
    pub(crate) fn from_inner(inner: protocol::Service) -> Service {
        Service { inner }
    }

    /// Service ID (an integer or a UUID depending on the microversion).
    pub fn id(&self) -> String {
        match self.inner.id {
            serde_json::Value::String(ref s) => s.clone(),
            ref other => other.to_string(),
        }
    }

    transparent_property! {
        #[doc = "Binary name, e.g. `nova-compute`."]
        binary: ref String
    }

    transparent_property! {
        #[doc = "Host name the service runs on (as known to the service list)."]
        host: ref String
    }

    transparent_property! {
        #[doc = "Service state (`up` or `down`)."]
        state: ref Option<String>
    }

    transparent_property! {
        #[doc = "Service status (`enabled` or `disabled`)."]
        status: ref Option<String>
    }

    transparent_property! {
        #[doc = "Availability zone of the service."]
        zone: ref Option<String>
    }
}
