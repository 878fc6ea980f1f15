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

//! Hypervisors known to the Compute service.

use super::protocol;

/// A hypervisor known to the Compute service.
#[derive(Clone, Debug)]
pub struct Hypervisor {
    inner: protocol::Hypervisor,
}

impl Hypervisor {
    pub(crate) fn from_inner(inner: protocol::Hypervisor) -> Hypervisor {
        Hypervisor { inner }
    }

    /// Hypervisor ID (an integer or a UUID depending on the microversion).
    pub fn id(&self) -> String {
        match self.inner.id {
            serde_json::Value::String(ref s) => s.clone(),
            ref other => other.to_string(),
        }
    }

    transparent_property! {
        #[doc = "Host name as reported by the hypervisor (often a FQDN)."]
        hypervisor_hostname: ref String
    }

    transparent_property! {
        #[doc = "Hypervisor state (`up` or `down`)."]
        state: ref Option<String>
    }

    transparent_property! {
        #[doc = "Hypervisor status (`enabled` or `disabled`)."]
        status: ref Option<String>
    }
}
