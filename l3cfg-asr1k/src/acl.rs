//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use derive_new::new;
use l3cfg_utils::ip::Ipv4NetworkExt;

use crate::error::Error;
use crate::router::Port;

// Standard access list matching the addresses of an internal network.
#[derive(Clone, Debug, Eq, PartialEq, new)]
pub struct AclEntry {
    pub name: String,
    pub network: Ipv4Addr,
    pub hostmask: Ipv4Addr,
}

// Access policy consulted before ACL-gated commands are emitted.
pub trait AclPolicy: Send + Sync {
    // Returns whether the given ACL is already present on the device.
    fn acl_exists(&self, acl: &AclEntry) -> bool;
}

// Policy assuming no ACL is ever present on the device.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExistingAcls;

// ===== impl AclEntry =====

impl AclEntry {
    // Builds the ACL of an internal port, named after its VLAN and the
    // leading characters of its identifier.
    pub fn from_port(port: &Port) -> Result<AclEntry, Error> {
        let vlan = port.vlan()?;
        let cidr = port.ipv4_cidr()?;
        let port_prefix = port.id.chars().take(8).collect::<String>();
        Ok(AclEntry::new(
            format!("neutron_acl_{vlan}_{port_prefix}"),
            cidr.network(),
            cidr.hostmask(),
        ))
    }
}

// ===== impl NoExistingAcls =====

impl AclPolicy for NoExistingAcls {
    fn acl_exists(&self, _acl: &AclEntry) -> bool {
        false
    }
}

// ===== impl Fn =====

impl<F> AclPolicy for F
where
    F: Fn(&AclEntry) -> bool + Send + Sync,
{
    fn acl_exists(&self, acl: &AclEntry) -> bool {
        self(acl)
    }
}
