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

//! Ephemeral and persistent compute storage for OpenStack.
//!
//! Compute hosts with local (RAID, LVM or JBOD) disks and compute hosts backed
//! by RBD volumes are separated into two host aggregates. Both the aggregates
//! and the flavors are tagged with the `<type>computestorage` metadata key, so
//! that the scheduler can match flavors to hosts. For ephemeral storage every
//! flavor without an ephemeral disk is cloned into a variant with one.
//!
//! # Example
//!
//! ```rust,no_run
//! use nova_ephemeral::provision::{provision, ProvisionRequest, StorageType};
//!
//! # async fn example() -> nova_ephemeral::Result<()> {
//! let os = nova_ephemeral::Cloud::from_env().await?;
//! let request = ProvisionRequest::new(StorageType::Ephemeral)
//!     .with_hosts(vec!["compute-1".to_string(), "compute-2".to_string()]);
//! provision(&os, &request).await?;
//! # Ok(()) }
//! # #[tokio::main]
//! # async fn main() { example().await.unwrap(); }
//! ```

#![crate_name = "nova_ephemeral"]
#![crate_type = "lib"]
// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
// Taken from https://github.com/rust-unofficial/patterns/
#![deny(
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_import_braces,
    unused_parens,
    while_true
)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

#[macro_use]
mod utils;

mod cloud;
pub mod compute;
pub mod config;
pub mod provision;
mod session;

pub use osauth::{ApiVersion, Error, ErrorKind};

pub use crate::cloud::Cloud;

/// Result of an OpenStack call.
pub type Result<T> = std::result::Result<T, Error>;
