//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use ipnetwork::{IpNetwork, Ipv4Network};
use serde::{Deserialize, Serialize};

// Address Family identifier.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

// Extension methods for Ipv4Addr.
pub trait Ipv4AddrExt {
    // Returns the address located `offset` positions away from this one, or
    // `None` if the result falls outside the IPv4 address space.
    fn offset(&self, offset: i64) -> Option<Ipv4Addr>;
}

// Extension methods for IpNetwork.
pub trait IpNetworkExt {
    // Returns the address family of this network.
    fn address_family(&self) -> AddressFamily;

    // Returns the IPv4 network, if this is one.
    fn as_ipv4(&self) -> Option<Ipv4Network>;
}

// Extension methods for Ipv4Network.
pub trait Ipv4NetworkExt {
    // Returns the wildcard (host) mask, as used by IOS access lists.
    fn hostmask(&self) -> Ipv4Addr;

    // Returns the address `n` positions above the network address, provided
    // it's still part of this network.
    fn from_network(&self, n: u32) -> Option<Ipv4Addr>;

    // Returns the address `n` positions below the broadcast address, provided
    // it's still part of this network.
    fn from_broadcast(&self, n: u32) -> Option<Ipv4Addr>;

    // Returns the last usable host address (broadcast - 1).
    fn last_host(&self) -> Option<Ipv4Addr> {
        self.from_broadcast(1)
    }
}

// ===== impl AddressFamily =====

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

// ===== impl Ipv4Addr =====

impl Ipv4AddrExt for Ipv4Addr {
    fn offset(&self, offset: i64) -> Option<Ipv4Addr> {
        let value = i64::from(u32::from(*self)) + offset;
        u32::try_from(value).ok().map(Ipv4Addr::from)
    }
}

// ===== impl IpNetwork =====

impl IpNetworkExt for IpNetwork {
    fn address_family(&self) -> AddressFamily {
        match self {
            IpNetwork::V4(_) => AddressFamily::Ipv4,
            IpNetwork::V6(_) => AddressFamily::Ipv6,
        }
    }

    fn as_ipv4(&self) -> Option<Ipv4Network> {
        match self {
            IpNetwork::V4(network) => Some(*network),
            IpNetwork::V6(_) => None,
        }
    }
}

// ===== impl Ipv4Network =====

impl Ipv4NetworkExt for Ipv4Network {
    fn hostmask(&self) -> Ipv4Addr {
        !self.mask()
    }

    fn from_network(&self, n: u32) -> Option<Ipv4Addr> {
        self.network()
            .offset(i64::from(n))
            .filter(|addr| self.contains(*addr))
    }

    fn from_broadcast(&self, n: u32) -> Option<Ipv4Addr> {
        self.broadcast()
            .offset(-i64::from(n))
            .filter(|addr| self.contains(*addr))
    }
}

// ===== unit tests =====
