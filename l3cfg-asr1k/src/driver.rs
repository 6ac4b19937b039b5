//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, debug_span};

use crate::acl::{AclEntry, AclPolicy, NoExistingAcls};
use crate::debug::{Debug, PortIgnoredReason, SkipReason};
use crate::error::{Error, SessionError};
use crate::ha::{self, HsrpParams};
use crate::nat::{self, NatPool, SecondaryIp};
use crate::region::MultiRegion;
use crate::router::{Port, RouterInfo, Transit};
use crate::session::{CAP_ACL, DeviceSession};
use crate::snippets::{ConfigCmd, Snippet, TemplateResolver, cmd};

// Routing driver of an ASR1k device.
//
// The driver is stateless: every operation computes the commands it needs
// from its arguments alone, validates them in full, and only then applies
// them one at a time, in order. The first failure aborts the remaining
// commands of the operation.
pub struct RoutingDriver {
    // Device identifier.
    device_id: String,
    // Configuration session with the device.
    session: Arc<dyn DeviceSession>,
    // Command template resolver.
    resolver: Arc<dyn TemplateResolver>,
    // Policy consulted before creating access lists.
    acl_policy: Box<dyn AclPolicy>,
    // Maximum time to wait for each configuration change.
    timeout: Option<Duration>,
}

// Driver operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    RouterAdded,
    RouterRemoved,
    InternalNetworkAdded,
    InternalNetworkRemoved,
    ExternalGatewayAdded,
    ExternalGatewayRemoved,
    FloatingIpAdded,
    FloatingIpRemoved,
    EnableInternalNetworkNat,
    DisableInternalNetworkNat,
    RoutesUpdated,
    EnableRouterInterface,
    DisableRouterInterface,
}

// Extra (static) route of a router.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraRoute {
    pub destination: Ipv4Network,
    pub nexthop: Ipv4Addr,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteAction {
    Replace,
    Delete,
}

// ===== impl RoutingDriver =====

impl RoutingDriver {
    pub fn new(
        device_id: impl Into<String>,
        session: Arc<dyn DeviceSession>,
        resolver: Arc<dyn TemplateResolver>,
    ) -> RoutingDriver {
        RoutingDriver {
            device_id: device_id.into(),
            session,
            resolver,
            acl_policy: Box::new(NoExistingAcls),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_acl_policy(
        mut self,
        acl_policy: impl AclPolicy + 'static,
    ) -> RoutingDriver {
        self.acl_policy = Box::new(acl_policy);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> RoutingDriver {
        self.timeout = Some(timeout);
        self
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    // ----- VRF lifecycle -----

    pub async fn router_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
    ) -> Result<(), Error> {
        self.run(Operation::RouterAdded, router, || {
            Ok(self.plan_vrf(Snippet::CreateVrf, region, router))
        })
        .await
    }

    pub async fn router_removed(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
    ) -> Result<(), Error> {
        self.run(Operation::RouterRemoved, router, || {
            Ok(self.plan_vrf(Snippet::RemoveVrf, region, router))
        })
        .await
    }

    // ----- internal networks -----

    pub async fn internal_network_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::InternalNetworkAdded, router, || {
            self.plan_internal_network_added(region, router, port)
        })
        .await
    }

    pub async fn internal_network_removed(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::InternalNetworkRemoved, router, || {
            self.plan_internal_network_removed(region, router, port)
        })
        .await
    }

    // ----- external gateway -----

    pub async fn external_gateway_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::ExternalGatewayAdded, router, || {
            self.plan_external_gateway_added(region, router, ex_gw_port)
        })
        .await
    }

    pub async fn external_gateway_removed(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::ExternalGatewayRemoved, router, || {
            self.plan_external_gateway_removed(region, router, ex_gw_port)
        })
        .await
    }

    // ----- floating IPs -----

    pub async fn floating_ip_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
        floating_ip: Ipv4Addr,
        fixed_ip: Ipv4Addr,
    ) -> Result<(), Error> {
        self.run(Operation::FloatingIpAdded, router, || {
            self.plan_floating_ip_added(
                region,
                router,
                ex_gw_port,
                floating_ip,
                fixed_ip,
            )
        })
        .await
    }

    pub async fn floating_ip_removed(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
        floating_ip: Ipv4Addr,
        fixed_ip: Ipv4Addr,
    ) -> Result<(), Error> {
        self.run(Operation::FloatingIpRemoved, router, || {
            self.plan_floating_ip_removed(
                region,
                router,
                ex_gw_port,
                floating_ip,
                fixed_ip,
            )
        })
        .await
    }

    // ----- internal network NAT -----

    pub async fn enable_internal_network_nat(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
        ex_gw_port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::EnableInternalNetworkNat, router, || {
            self.plan_enable_internal_network_nat(
                region, router, port, ex_gw_port,
            )
        })
        .await
    }

    pub async fn disable_internal_network_nat(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
        _ex_gw_port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::DisableInternalNetworkNat, router, || {
            self.plan_disable_internal_network_nat(region, router, port)
        })
        .await
    }

    // ----- extra routes -----

    pub async fn routes_updated(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        action: RouteAction,
        route: &ExtraRoute,
    ) -> Result<(), Error> {
        self.run(Operation::RoutesUpdated, router, || {
            let vrf = region.vrf_name(&router.tenant_id);
            let snippet = match action {
                RouteAction::Replace => Snippet::SetIpRoute,
                RouteAction::Delete => Snippet::RemoveIpRoute,
            };
            Ok(vec![cmd!(
                snippet,
                vrf,
                route.destination.network(),
                route.destination.mask(),
                route.nexthop
            )])
        })
        .await
    }

    // ----- interface admin state -----

    pub async fn enable_router_interface(
        &self,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::EnableRouterInterface, router, || {
            Ok(vec![cmd!(Snippet::EnableIntf, port.sub_interface()?)])
        })
        .await
    }

    pub async fn disable_router_interface(
        &self,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<(), Error> {
        self.run(Operation::DisableRouterInterface, router, || {
            Ok(vec![cmd!(Snippet::DisableIntf, port.sub_interface()?)])
        })
        .await
    }

    // ===== command planning =====

    fn plan_vrf(
        &self,
        snippet: Snippet,
        region: &MultiRegion,
        router: &RouterInfo,
    ) -> Vec<ConfigCmd> {
        // Every role, global routers included, owns a tenant VRF.
        vec![cmd!(snippet, region.vrf_name(&router.tenant_id))]
    }

    pub fn plan_internal_network_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<Vec<ConfigCmd>, Error> {
        if port.is_ipv6() {
            Debug::PortIgnored(&port.id, PortIgnoredReason::Ipv6).log();
            return Ok(vec![]);
        }

        match port.transit()? {
            Some(transit) => {
                self.plan_transit_network_added(region, router, port, transit)
            }
            None if router.is_global() => {
                self.plan_external_gateway_added(region, router, port)
            }
            None => self.plan_subinterface_added(region, router, port),
        }
    }

    // Tenant network reached through a transit network: route the tenant
    // subnet via the transit gateway, then bring up the transit
    // sub-interface.
    fn plan_transit_network_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
        transit: Transit,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let sub_interface = port.sub_interface()?;
        let vlan = port.vlan()?;
        let cidr = port.ipv4_cidr()?;
        // The redundancy group is shared, but the virtual IP is the transit
        // one.
        let hsrp = match ha::hsrp_params(router, port)? {
            Some(params) => {
                let virtual_ip = transit.vip.ok_or_else(|| {
                    Error::MissingHostingInfo(port.id.clone(), "vip")
                })?;
                Some(HsrpParams {
                    virtual_ip,
                    ..params
                })
            }
            None => None,
        };

        let mut cmds = Vec::with_capacity(3);
        let params = vec![
            vrf.clone(),
            cidr.network().to_string(),
            cidr.mask().to_string(),
            sub_interface.clone(),
            transit.gateway_ip.to_string(),
        ];
        cmds.push(ConfigCmd::new(
            region.tenant_route_snippet(),
            region.tag_params(params, 3),
        ));
        let params = vec![
            sub_interface.clone(),
            vlan.to_string(),
            vrf,
            transit.cidr_exposed.ip().to_string(),
            transit.cidr_exposed.mask().to_string(),
        ];
        cmds.push(ConfigCmd::new(
            region.subinterface_snippet(),
            region.tag_params(params, 0),
        ));
        if let Some(hsrp) = hsrp {
            cmds.push(ha::hsrp_cmd(&sub_interface, vlan, &hsrp));
        }

        Ok(cmds)
    }

    // Tenant network directly attached to the router.
    fn plan_subinterface_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let sub_interface = port.sub_interface()?;
        let vlan = port.vlan()?;
        let cidr = port.ipv4_cidr()?;
        let hsrp = ha::hsrp_params(router, port)?;

        let mut cmds = Vec::with_capacity(2);
        let params = vec![
            sub_interface.clone(),
            vlan.to_string(),
            vrf,
            cidr.ip().to_string(),
            cidr.mask().to_string(),
        ];
        cmds.push(ConfigCmd::new(
            region.subinterface_snippet(),
            region.tag_params(params, 0),
        ));
        if let Some(hsrp) = hsrp {
            cmds.push(ha::hsrp_cmd(&sub_interface, vlan, &hsrp));
        }

        Ok(cmds)
    }

    pub fn plan_internal_network_removed(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<Vec<ConfigCmd>, Error> {
        if port.is_ipv6() {
            Debug::PortIgnored(&port.id, PortIgnoredReason::Ipv6).log();
            return Ok(vec![]);
        }

        match port.transit()? {
            // Transit sub-interfaces are shared and managed elsewhere.
            Some(_) => {
                Debug::SubInterfaceRetained(&port.id).log();
                Ok(vec![])
            }
            None if router.is_global() => {
                self.plan_external_gateway_removed(region, router, port)
            }
            None => Ok(vec![cmd!(
                Snippet::RemoveSubinterface,
                port.sub_interface()?
            )]),
        }
    }

    pub fn plan_external_gateway_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let sub_interface = ex_gw_port.sub_interface()?;
        let vlan = ex_gw_port.vlan()?;
        let pool = NatPool::from_port(&vrf, ex_gw_port)?;
        let gateway_ip = ex_gw_port.gateway_ip()?;
        let hsrp = ha::hsrp_params(router, ex_gw_port)?;

        let mut cmds = Vec::with_capacity(4);
        cmds.push(cmd!(Snippet::EnableIntf, sub_interface));
        if let Some(hsrp) = hsrp {
            cmds.push(ha::hsrp_cmd(&sub_interface, vlan, &hsrp));
        }
        cmds.push(cmd!(
            Snippet::CreateNatPool,
            pool.name,
            pool.start,
            pool.end,
            pool.netmask
        ));
        cmds.push(cmd!(
            Snippet::SetDefaultRouteWithIntf,
            vrf,
            sub_interface,
            gateway_ip
        ));

        Ok(cmds)
    }

    pub fn plan_external_gateway_removed(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let sub_interface = ex_gw_port.sub_interface()?;
        let pool = NatPool::from_port(&vrf, ex_gw_port)?;
        let gateway_ip = ex_gw_port.gateway_ip()?;

        // The pool goes first, the default route last.
        Ok(vec![
            cmd!(
                Snippet::DeleteNatPool,
                pool.name,
                pool.start,
                pool.end,
                pool.netmask
            ),
            cmd!(
                Snippet::RemoveDefaultRouteWithIntf,
                vrf,
                sub_interface,
                gateway_ip
            ),
        ])
    }

    pub fn plan_floating_ip_added(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
        floating_ip: Ipv4Addr,
        fixed_ip: Ipv4Addr,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let vlan = ex_gw_port.vlan()?;
        let group = ha::hsrp_group(ex_gw_port);
        let secondary_ip = SecondaryIp::from_port(ex_gw_port)?;

        let mut cmds = vec![cmd!(
            Snippet::SetStaticSrcTrlNoVrfMatch,
            fixed_ip,
            floating_ip,
            vrf,
            group,
            vlan
        )];
        if let Some(secondary_ip) = secondary_ip {
            cmds.push(cmd!(
                Snippet::AddSecondaryIp,
                ex_gw_port.sub_interface()?,
                secondary_ip.addr,
                secondary_ip.netmask
            ));
        }

        Ok(cmds)
    }

    pub fn plan_floating_ip_removed(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        ex_gw_port: &Port,
        floating_ip: Ipv4Addr,
        fixed_ip: Ipv4Addr,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let vlan = ex_gw_port.vlan()?;
        let group = ha::hsrp_group(ex_gw_port);
        let secondary_ip = SecondaryIp::from_port(ex_gw_port)?;

        let mut cmds = vec![cmd!(
            Snippet::RemoveStaticSrcTrlNoVrfMatch,
            fixed_ip,
            floating_ip,
            vrf,
            group,
            vlan
        )];
        if let Some(secondary_ip) = secondary_ip {
            // The secondary address is kept while other floating IPs remain.
            if router.has_other_floating_ips(floating_ip) {
                Debug::SecondaryIpRetained(secondary_ip.addr).log();
            } else {
                cmds.push(cmd!(
                    Snippet::RemoveSecondaryIp,
                    ex_gw_port.sub_interface()?,
                    secondary_ip.addr,
                    secondary_ip.netmask
                ));
            }
        }

        Ok(cmds)
    }

    pub fn plan_enable_internal_network_nat(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
        ex_gw_port: &Port,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let acl = AclEntry::from_port(port)?;
        let inner_intf = port.sub_interface()?;
        let outer_intf = ex_gw_port.sub_interface()?;

        let mut cmds = Vec::with_capacity(4);
        if self.acl_supported(Snippet::CreateAcl) {
            if self.acl_policy.acl_exists(&acl) {
                Debug::ConfigSkipped(
                    Snippet::CreateAcl,
                    SkipReason::AlreadyPresent,
                )
                .log();
            } else {
                cmds.push(cmd!(
                    Snippet::CreateAcl,
                    acl.name,
                    acl.network,
                    acl.hostmask
                ));
            }
        }
        cmds.push(cmd!(
            Snippet::SetDynSrcTrlPool,
            acl.name,
            nat::pool_name(&vrf),
            vrf
        ));
        cmds.push(cmd!(Snippet::SetNat, inner_intf, "inside"));
        cmds.push(cmd!(Snippet::SetNat, outer_intf, "outside"));

        Ok(cmds)
    }

    pub fn plan_disable_internal_network_nat(
        &self,
        region: &MultiRegion,
        router: &RouterInfo,
        port: &Port,
    ) -> Result<Vec<ConfigCmd>, Error> {
        let vrf = region.vrf_name(&router.tenant_id);
        let acl = AclEntry::from_port(port)?;

        let mut cmds = vec![cmd!(
            Snippet::RemoveDynSrcTrlPool,
            acl.name,
            nat::pool_name(&vrf),
            vrf
        )];
        if self.acl_supported(Snippet::RemoveAcl) {
            cmds.push(cmd!(Snippet::RemoveAcl, acl.name));
        }

        Ok(cmds)
    }

    // ===== command execution =====

    // Returns whether the device supports access lists, logging the skipped
    // command otherwise.
    fn acl_supported(&self, snippet: Snippet) -> bool {
        let supported = self.session.has_capability(CAP_ACL);
        if !supported {
            Debug::ConfigSkipped(
                snippet,
                SkipReason::MissingCapability(CAP_ACL),
            )
            .log();
        }
        supported
    }

    async fn run<F>(
        &self,
        operation: Operation,
        router: &RouterInfo,
        plan: F,
    ) -> Result<(), Error>
    where
        F: FnOnce() -> Result<Vec<ConfigCmd>, Error>,
    {
        let span = debug_span!(
            "router",
            device = %self.device_id,
            id = %router.id,
            %operation
        );
        let cmds = span.in_scope(plan)?;
        self.execute(operation, cmds).instrument(span).await
    }

    async fn execute(
        &self,
        operation: Operation,
        cmds: Vec<ConfigCmd>,
    ) -> Result<(), Error> {
        // Render everything before touching the device.
        let configs = cmds
            .iter()
            .map(|cmd| self.resolver.resolve(cmd).map(|config| (cmd, config)))
            .collect::<Result<Vec<_>, _>>()?;

        Debug::OperationStart(operation, configs.len()).log();
        for (cmd, config) in &configs {
            Debug::ConfigApply(cmd).log();
            self.edit_config(config)
                .await
                .map_err(|error| Error::ConfigApply(cmd.snippet, error))?;
        }
        Debug::OperationDone(operation).log();

        Ok(())
    }

    async fn edit_config(&self, config: &str) -> Result<(), SessionError> {
        let edit = self.session.edit_config(config);
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, edit)
                .await
                .unwrap_or(Err(SessionError::Timeout)),
            None => edit.await,
        }
    }
}

impl std::fmt::Debug for RoutingDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingDriver")
            .field("device_id", &self.device_id)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ===== impl Operation =====

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::RouterAdded => "router-added",
            Operation::RouterRemoved => "router-removed",
            Operation::InternalNetworkAdded => "internal-network-added",
            Operation::InternalNetworkRemoved => "internal-network-removed",
            Operation::ExternalGatewayAdded => "external-gateway-added",
            Operation::ExternalGatewayRemoved => "external-gateway-removed",
            Operation::FloatingIpAdded => "floating-ip-added",
            Operation::FloatingIpRemoved => "floating-ip-removed",
            Operation::EnableInternalNetworkNat => {
                "enable-internal-network-nat"
            }
            Operation::DisableInternalNetworkNat => {
                "disable-internal-network-nat"
            }
            Operation::RoutesUpdated => "routes-updated",
            Operation::EnableRouterInterface => "enable-router-interface",
            Operation::DisableRouterInterface => "disable-router-interface",
        };
        write!(f, "{name}")
    }
}
