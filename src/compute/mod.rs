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

//! Compute API support.
//!
//! Only the parts needed to manage host aggregates and flavors are covered:
//!
//! * host aggregates (list, create, add host, set metadata),
//! * flavors (list, get, create, set extra specs),
//! * hypervisors and compute services (list).
//!
//! Start with a [Cloud](../struct.Cloud.html) object, e.g.
//!
//! ```rust,no_run
//! # async fn example() -> nova_ephemeral::Result<()> {
//! let os = nova_ephemeral::Cloud::from_env().await?;
//! for aggregate in os.list_aggregates().await? {
//!     println!("{} has hosts {:?}", aggregate.name(), aggregate.hosts());
//! }
//! # Ok(()) }
//! # #[tokio::main]
//! # async fn main() { example().await.unwrap(); }
//! ```

mod aggregates;
pub(crate) mod api;
mod flavors;
mod hypervisors;
mod protocol;
mod services;

pub use self::aggregates::{Aggregate, NewAggregate};
pub use self::flavors::{Flavor, NewFlavor};
pub use self::hypervisors::Hypervisor;
pub use self::services::Service;

/// Binary name of the compute service running on hypervisor hosts.
pub const COMPUTE_BINARY: &str = "nova-compute";
