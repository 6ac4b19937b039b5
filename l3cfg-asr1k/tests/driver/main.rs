//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod floating;
mod internal;

use std::sync::Arc;

use const_addrs::ip4;
use l3cfg_asr1k::driver::RoutingDriver;
use l3cfg_asr1k::region::MultiRegion;
use l3cfg_asr1k::router::{
    ExtraSubnet, HaInfo, HaMode, HaSettings, HostingInfo, Port, RouterInfo,
    RouterRole, SnatSubnet, Subnet,
};
use l3cfg_asr1k::snippets::{
    ConfigCmd, Snippet, SnippetCatalog, TemplateResolver,
};
use l3cfg_asr1k::test::{RecordingSession, setup};

pub const PHY_INTF: &str = "GigabitEthernet0/0/0";
pub const TENANT_ID: &str = "c0ffee0123456789";
pub const REGION_ID: &str = "L3FR001";
pub const HA_PRIORITY: u8 = 100;

// ===== fixtures =====

pub fn router(ha: bool) -> RouterInfo {
    router_with_role(RouterRole::UserVisible, ha)
}

pub fn router_with_role(role: RouterRole, ha: bool) -> RouterInfo {
    RouterInfo {
        id: "router-1".to_owned(),
        tenant_id: TENANT_ID.to_owned(),
        role,
        ha: HaSettings {
            mode: if ha { HaMode::Hsrp } else { HaMode::Disabled },
            priority: HA_PRIORITY,
        },
        floating_ips: vec![],
    }
}

// Internal port attached through a transit network.
pub fn transit_port() -> Port {
    Port {
        id: "8f3a2b1c-transit".to_owned(),
        ip_cidr: Some("10.0.3.1/24".parse().unwrap()),
        fixed_ips: vec![],
        subnets: vec![Subnet {
            cidr: "10.0.3.0/24".parse().unwrap(),
            gateway_ip: Some(ip4!("10.0.3.1").into()),
        }],
        hosting_info: Some(HostingInfo {
            physical_interface: PHY_INTF.to_owned(),
            segmentation_id: 1035,
            gateway_ip: Some(ip4!("1.103.2.254")),
            cidr_exposed: Some("1.103.2.1/24".parse().unwrap()),
            vip: Some(ip4!("1.103.2.2")),
            snat_subnets: vec![],
        }),
        // Shares the redundancy group of the gateway port.
        ha_info: gateway_port().ha_info,
        extra_subnets: vec![],
    }
}

// Tenant port directly attached to the router.
pub fn tenant_port() -> Port {
    Port {
        id: "5d7e9f01-tenant".to_owned(),
        ip_cidr: Some("10.0.4.1/24".parse().unwrap()),
        fixed_ips: vec![],
        subnets: vec![Subnet {
            cidr: "10.0.4.0/24".parse().unwrap(),
            gateway_ip: Some(ip4!("10.0.4.1").into()),
        }],
        hosting_info: Some(HostingInfo {
            physical_interface: PHY_INTF.to_owned(),
            segmentation_id: 1036,
            gateway_ip: None,
            cidr_exposed: None,
            vip: None,
            snat_subnets: vec![],
        }),
        ha_info: Some(HaInfo {
            group: 1065,
            priority: None,
            virtual_ip: ip4!("10.0.4.254"),
        }),
        extra_subnets: vec![],
    }
}

// Port attached to the external network.
pub fn gateway_port() -> Port {
    Port {
        id: "a1b2c3d4-gateway".to_owned(),
        ip_cidr: Some("19.4.0.3/24".parse().unwrap()),
        fixed_ips: vec![],
        subnets: vec![Subnet {
            cidr: "19.4.0.0/24".parse().unwrap(),
            gateway_ip: Some(ip4!("19.4.0.1").into()),
        }],
        hosting_info: Some(HostingInfo {
            physical_interface: PHY_INTF.to_owned(),
            segmentation_id: 317,
            gateway_ip: None,
            cidr_exposed: None,
            vip: None,
            snat_subnets: vec![SnatSubnet {
                id: "snat-subnet-1".to_owned(),
                cidr: "20.0.0.0/24".parse().unwrap(),
            }],
        }),
        ha_info: Some(HaInfo {
            group: 1060,
            priority: None,
            virtual_ip: ip4!("19.4.0.2"),
        }),
        extra_subnets: vec![],
    }
}

// Gateway port whose NAT pool is fed by an extra subnet.
pub fn gateway_port_with_extra_subnet() -> Port {
    let mut port = gateway_port();
    port.extra_subnets.push(ExtraSubnet {
        id: Some("extra-subnet-1".to_owned()),
        cidr: "20.0.0.0/24".parse().unwrap(),
    });
    port
}

pub fn multi_region() -> MultiRegion {
    MultiRegion::enabled(REGION_ID)
}

pub fn vrf(region: &MultiRegion) -> String {
    region.vrf_name(TENANT_ID)
}

pub fn sub_interface(vlan: u16) -> String {
    format!("{PHY_INTF}.{vlan}")
}

// ===== helper functions =====

pub fn driver(session: &Arc<RecordingSession>) -> RoutingDriver {
    setup();
    RoutingDriver::new(
        "asr1k-1",
        session.clone(),
        Arc::new(SnippetCatalog::default()),
    )
}

pub fn expected(snippet: Snippet, params: &[&str]) -> String {
    let cmd = ConfigCmd::new(
        snippet,
        params.iter().map(ToString::to_string).collect(),
    );
    SnippetCatalog::default().resolve(&cmd).unwrap()
}

pub fn snippets(cmds: &[ConfigCmd]) -> Vec<Snippet> {
    cmds.iter().map(|cmd| cmd.snippet).collect()
}
