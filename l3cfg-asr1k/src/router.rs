//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv4Addr};

use ipnetwork::{IpNetwork, Ipv4Network};
use l3cfg_utils::ip::{AddressFamily, IpNetworkExt};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// Snapshot of a router, as known by the orchestration layer.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterInfo {
    // Router identifier.
    pub id: String,
    // Owning tenant. Used as the VRF name.
    pub tenant_id: String,
    // Router role.
    #[serde(default)]
    pub role: RouterRole,
    // High-availability settings.
    #[serde(default)]
    pub ha: HaSettings,
    // Floating IPs currently associated to the router.
    #[serde(default)]
    pub floating_ips: Vec<FloatingIp>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouterRole {
    // Router created on behalf of a tenant.
    #[default]
    UserVisible,
    // Standby peer of a user-visible router.
    Redundancy,
    // Router carrying the external gateways shared by the tenant routers.
    Global,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HaSettings {
    pub mode: HaMode,
    pub priority: u8,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HaMode {
    #[default]
    Disabled,
    Hsrp,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FloatingIp {
    pub floating_ip_address: Ipv4Addr,
    #[serde(default)]
    pub fixed_ip_address: Option<Ipv4Addr>,
}

// Router port, either tenant-facing or attached to the external network.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Port {
    pub id: String,
    // Primary address, along with its prefix length.
    #[serde(default)]
    pub ip_cidr: Option<IpNetwork>,
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub hosting_info: Option<HostingInfo>,
    #[serde(default)]
    pub ha_info: Option<HaInfo>,
    // Additional subnets whose addresses feed the NAT pool.
    #[serde(default)]
    pub extra_subnets: Vec<ExtraSubnet>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FixedIp {
    pub ip_address: IpAddr,
    #[serde(default)]
    pub subnet_id: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Subnet {
    pub cidr: IpNetwork,
    #[serde(default)]
    pub gateway_ip: Option<IpAddr>,
}

// Where and how the port is realized on the device.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostingInfo {
    pub physical_interface: String,
    pub segmentation_id: u16,
    // Transit network next-hop (internal transit ports only).
    #[serde(default)]
    pub gateway_ip: Option<Ipv4Addr>,
    // Local address on the transit network (internal transit ports only).
    #[serde(default)]
    pub cidr_exposed: Option<Ipv4Network>,
    // HSRP virtual IP on the transit network (internal transit ports only).
    #[serde(default)]
    pub vip: Option<Ipv4Addr>,
    #[serde(default)]
    pub snat_subnets: Vec<SnatSubnet>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SnatSubnet {
    pub id: String,
    pub cidr: Ipv4Network,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraSubnet {
    #[serde(default)]
    pub id: Option<String>,
    pub cidr: Ipv4Network,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HaInfo {
    // HSRP group number.
    pub group: u16,
    // Overrides the router's HA priority when present.
    #[serde(default)]
    pub priority: Option<u8>,
    // Virtual IP shared by the redundancy group.
    pub virtual_ip: Ipv4Addr,
}

// Transit attributes of an internal port.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transit {
    pub gateway_ip: Ipv4Addr,
    pub cidr_exposed: Ipv4Network,
    pub vip: Option<Ipv4Addr>,
}

// ===== impl RouterInfo =====

impl RouterInfo {
    pub fn is_global(&self) -> bool {
        self.role == RouterRole::Global
    }

    pub fn is_ha_enabled(&self) -> bool {
        self.ha.mode == HaMode::Hsrp
    }

    // Returns whether any floating IP other than the given one is still
    // associated to the router.
    pub fn has_other_floating_ips(&self, floating_ip: Ipv4Addr) -> bool {
        self.floating_ips
            .iter()
            .any(|fip| fip.floating_ip_address != floating_ip)
    }
}

// ===== impl Port =====

impl Port {
    pub fn hosting_info(&self) -> Result<&HostingInfo, Error> {
        self.hosting_info.as_ref().ok_or_else(|| {
            Error::MissingHostingInfo(self.id.clone(), "hosting_info")
        })
    }

    // Returns the VLAN sub-interface name (e.g. "GigabitEthernet0/0/0.317").
    pub fn sub_interface(&self) -> Result<String, Error> {
        let hosting_info = self.hosting_info()?;
        Ok(format!(
            "{}.{}",
            hosting_info.physical_interface, hosting_info.segmentation_id
        ))
    }

    pub fn vlan(&self) -> Result<u16, Error> {
        self.hosting_info().map(|info| info.segmentation_id)
    }

    pub fn ip_cidr(&self) -> Result<IpNetwork, Error> {
        self.ip_cidr.ok_or_else(|| Error::MissingCidr(self.id.clone()))
    }

    pub fn ipv4_cidr(&self) -> Result<Ipv4Network, Error> {
        self.ip_cidr()?.as_ipv4().ok_or_else(|| {
            Error::UnsupportedAddressFamily(
                self.id.clone(),
                AddressFamily::Ipv6,
            )
        })
    }

    pub fn is_ipv6(&self) -> bool {
        self.ip_cidr.is_some_and(|cidr| {
            cidr.address_family() == AddressFamily::Ipv6
        })
    }

    // Returns the gateway of the port's first subnet.
    pub fn gateway_ip(&self) -> Result<Ipv4Addr, Error> {
        match self.subnets.first().and_then(|subnet| subnet.gateway_ip) {
            Some(IpAddr::V4(addr)) => Ok(addr),
            Some(IpAddr::V6(_)) => Err(Error::UnsupportedAddressFamily(
                self.id.clone(),
                AddressFamily::Ipv6,
            )),
            None => Err(Error::MissingGatewayIp(self.id.clone())),
        }
    }

    // Returns the transit attributes of an internal port, or `None` for
    // gateway-style ports. Having only one of the two attributes is an
    // error.
    pub fn transit(&self) -> Result<Option<Transit>, Error> {
        let hosting_info = self.hosting_info()?;
        match (hosting_info.gateway_ip, hosting_info.cidr_exposed) {
            (Some(gateway_ip), Some(cidr_exposed)) => Ok(Some(Transit {
                gateway_ip,
                cidr_exposed,
                vip: hosting_info.vip,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::MissingHostingInfo(
                self.id.clone(),
                "cidr_exposed",
            )),
            (None, Some(_)) => {
                Err(Error::MissingHostingInfo(self.id.clone(), "gateway_ip"))
            }
        }
    }
}
