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

//! Session structure definition.
//!
//! The Session object wraps an osauth adapter bound to the Compute service,
//! optionally with a default microversion.

use osauth::services::{ComputeService, COMPUTE};
use osauth::{Adapter, ApiVersion, ServiceRequestBuilder};

/// An authenticated session bound to the Compute service.
#[derive(Debug, Clone)]
pub struct Session {
    adapter: Adapter<ComputeService>,
}

impl Session {
    /// Wrap an osauth session.
    pub fn new(inner: osauth::Session) -> Session {
        Session {
            adapter: Adapter::from_session(inner, COMPUTE),
        }
    }

    /// Compute API microversion sent with every request (if any).
    #[inline]
    pub fn compute_api_version(&self) -> Option<ApiVersion> {
        self.adapter.default_api_version()
    }

    /// Set the compute API microversion.
    #[inline]
    pub fn set_compute_api_version(&mut self, version: Option<ApiVersion>) {
        if let Some(version) = version {
            trace!("Using compute API version {}", version);
        }
        self.adapter.set_default_api_version(version);
    }

    /// Region used for endpoint lookup (if any).
    #[inline]
    pub fn region(&self) -> Option<&str> {
        self.adapter.endpoint_filters().region.as_deref()
    }

    /// Set the region to use for endpoint lookup.
    pub fn set_region<S: Into<String>>(&mut self, region: S) {
        self.adapter.endpoint_filters_mut().set_region(region);
    }

    /// Start a GET request to the compute service.
    #[inline]
    pub fn get<I>(&self, path: I) -> ServiceRequestBuilder<ComputeService>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.adapter.get(path)
    }

    /// Start a POST request to the compute service.
    #[inline]
    pub fn post<I>(&self, path: I) -> ServiceRequestBuilder<ComputeService>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.adapter.post(path)
    }
}
