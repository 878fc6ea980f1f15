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

//! Host name resolution.
//!
//! Hypervisors may report fully qualified names while Nova only accepts the
//! host name of the `nova-compute` service when adding hosts to aggregates.

/// Whether `name` is a FQDN built on the service host name `short`.
#[inline]
pub fn is_fqdn_of(name: &str, short: &str) -> bool {
    name.contains(&format!("{}.", short))
}

/// Map host names unknown to Nova onto compute service host names.
///
/// Returns service hosts (in service order, without duplicates) that at least
/// one of the `missing` names was built on.
pub fn resolve_service_hosts<S: AsRef<str>>(missing: &[String], service_hosts: &[S]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for service_host in service_hosts {
        let service_host = service_host.as_ref();
        if result.iter().any(|item| item == service_host) {
            continue;
        }
        if missing.iter().any(|host| is_fqdn_of(host, service_host)) {
            trace!("Resolved service host {} from {:?}", service_host, missing);
            result.push(service_host.to_string());
        }
    }
    result
}

/// Names from `missing` that no service host resolves.
pub fn unresolved<S: AsRef<str>>(missing: &[String], service_hosts: &[S]) -> Vec<String> {
    missing
        .iter()
        .filter(|host| {
            !service_hosts
                .iter()
                .any(|service_host| is_fqdn_of(host, service_host.as_ref()))
        })
        .cloned()
        .collect()
}
