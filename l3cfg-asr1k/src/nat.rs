//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;
use l3cfg_utils::ip::Ipv4NetworkExt;

use crate::error::Error;
use crate::router::Port;

// Source NAT pool of a VRF.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NatPool {
    pub name: String,
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

// Secondary address bound to the external sub-interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SecondaryIp {
    pub addr: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

// ===== impl NatPool =====

impl NatPool {
    // Computes the NAT pool of the given gateway port.
    //
    // The pool spans from the third address of the source subnet up to the
    // last usable one. The source subnet is the first SNAT subnet, or else
    // the first extra subnet, or else the port's own subnet.
    pub fn from_port(vrf: &str, port: &Port) -> Result<NatPool, Error> {
        let hosting_info = port.hosting_info()?;
        let cidr = match (
            hosting_info.snat_subnets.first(),
            port.extra_subnets.first(),
        ) {
            (Some(snat_subnet), _) => snat_subnet.cidr,
            (None, Some(extra_subnet)) => extra_subnet.cidr,
            (None, None) => port.ipv4_cidr()?,
        };

        let (Some(start), Some(end)) =
            (cidr.from_network(2), cidr.from_broadcast(1))
        else {
            return Err(Error::PrefixTooSmall(port.id.clone(), cidr));
        };
        if start > end {
            return Err(Error::PrefixTooSmall(port.id.clone(), cidr));
        }

        Ok(NatPool {
            name: pool_name(vrf),
            start,
            end,
            netmask: cidr.mask(),
        })
    }
}

// ===== impl SecondaryIp =====

impl SecondaryIp {
    // Returns the secondary address derived from the port's first extra
    // subnet, if any.
    pub fn from_port(port: &Port) -> Result<Option<SecondaryIp>, Error> {
        let Some(extra_subnet) = port.extra_subnets.first() else {
            return Ok(None);
        };

        let cidr: Ipv4Network = extra_subnet.cidr;
        let addr = cidr
            .last_host()
            .filter(|addr| *addr != cidr.network())
            .ok_or_else(|| Error::PrefixTooSmall(port.id.clone(), cidr))?;
        Ok(Some(SecondaryIp {
            addr,
            netmask: cidr.mask(),
        }))
    }
}

// ===== global functions =====

// Returns the name of the NAT pool of a VRF.
pub fn pool_name(vrf: &str) -> String {
    format!("{vrf}_nat_pool")
}
