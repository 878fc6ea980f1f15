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

//! Deriving ephemeral flavor variants.

use super::FlavorSpec;

/// Name of the ephemeral variant of a flavor.
///
/// The family prefix (everything before the first dot) is replaced, so
/// `m1.small` becomes `e1.small`. Names without a family get one.
pub fn clone_name(prefix: &str, name: &str) -> String {
    match name.find('.') {
        Some(index) => format!("{}{}", prefix, &name[index..]),
        None => format!("{}.{}", prefix, name),
    }
}

/// ID of the ephemeral variant of a flavor.
#[inline]
pub fn clone_id(id: &str) -> String {
    format!("e{}", id)
}

/// Build the ephemeral variant of a flavor.
///
/// The ephemeral disk gets the size of the root disk, everything else is
/// copied as is.
pub fn ephemeral_clone(flavor: &FlavorSpec, prefix: &str) -> FlavorSpec {
    FlavorSpec {
        id: clone_id(&flavor.id),
        name: clone_name(prefix, &flavor.name),
        ephemeral: flavor.disk,
        ..flavor.clone()
    }
}

#[cfg(test)]
mod test {
    use super::super::FlavorSpec;
    use super::{clone_id, clone_name, ephemeral_clone};

    #[test]
    fn test_clone_name() {
        assert_eq!(clone_name("e1", "m1.small"), "e1.small");
        assert_eq!(clone_name("e1", "m1.xlarge.gpu"), "e1.xlarge.gpu");
        assert_eq!(clone_name("eph", ".tiny"), "eph.tiny");
        assert_eq!(clone_name("e1", "standalone"), "e1.standalone");
    }

    #[test]
    fn test_clone_id() {
        assert_eq!(clone_id("2"), "e2");
        assert_eq!(
            clone_id("7b1e0a2c-6b3f-4c2b-9f0e-1d2c3b4a5f60"),
            "e7b1e0a2c-6b3f-4c2b-9f0e-1d2c3b4a5f60"
        );
    }

    #[test]
    fn test_ephemeral_clone() {
        let flavor = FlavorSpec {
            id: "3".to_string(),
            name: "m1.medium".to_string(),
            ram: 4096,
            vcpus: 2,
            disk: 40,
            ephemeral: 0,
            swap: 512,
            rxtx_factor: 1.0,
            is_public: false,
        };
        let clone = ephemeral_clone(&flavor, "e1");
        assert_eq!(clone.id, "e3");
        assert_eq!(clone.name, "e1.medium");
        assert_eq!(clone.ram, 4096);
        assert_eq!(clone.vcpus, 2);
        assert_eq!(clone.disk, 40);
        assert_eq!(clone.ephemeral, 40);
        assert_eq!(clone.swap, 512);
        assert!(!clone.is_public);
    }
}
