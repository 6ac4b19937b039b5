//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::driver::{ExtraRoute, RouteAction, RoutingDriver};
use crate::error::Error;
use crate::region::MultiRegion;
use crate::router::{Port, RouterInfo};

// Network intent, as delivered by the orchestration layer.
//
// Intents are self-contained snapshots: each one carries the router state
// and the ports the operation needs.
#[derive(Clone, Debug)]
#[derive(Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Intent {
    RouterAdded {
        router: RouterInfo,
    },
    RouterRemoved {
        router: RouterInfo,
    },
    InternalNetworkAdded {
        router: RouterInfo,
        port: Port,
    },
    InternalNetworkRemoved {
        router: RouterInfo,
        port: Port,
    },
    ExternalGatewayAdded {
        router: RouterInfo,
        ex_gw_port: Port,
    },
    ExternalGatewayRemoved {
        router: RouterInfo,
        ex_gw_port: Port,
    },
    FloatingIpAdded {
        router: RouterInfo,
        ex_gw_port: Port,
        floating_ip: Ipv4Addr,
        fixed_ip: Ipv4Addr,
    },
    FloatingIpRemoved {
        router: RouterInfo,
        ex_gw_port: Port,
        floating_ip: Ipv4Addr,
        fixed_ip: Ipv4Addr,
    },
    EnableInternalNetworkNat {
        router: RouterInfo,
        port: Port,
        ex_gw_port: Port,
    },
    DisableInternalNetworkNat {
        router: RouterInfo,
        port: Port,
        ex_gw_port: Port,
    },
    RoutesUpdated {
        router: RouterInfo,
        action: RouteAction,
        route: ExtraRoute,
    },
    EnableRouterInterface {
        router: RouterInfo,
        port: Port,
    },
    DisableRouterInterface {
        router: RouterInfo,
        port: Port,
    },
}

// ===== impl Intent =====

impl Intent {
    pub fn router(&self) -> &RouterInfo {
        match self {
            Intent::RouterAdded { router }
            | Intent::RouterRemoved { router }
            | Intent::InternalNetworkAdded { router, .. }
            | Intent::InternalNetworkRemoved { router, .. }
            | Intent::ExternalGatewayAdded { router, .. }
            | Intent::ExternalGatewayRemoved { router, .. }
            | Intent::FloatingIpAdded { router, .. }
            | Intent::FloatingIpRemoved { router, .. }
            | Intent::EnableInternalNetworkNat { router, .. }
            | Intent::DisableInternalNetworkNat { router, .. }
            | Intent::RoutesUpdated { router, .. }
            | Intent::EnableRouterInterface { router, .. }
            | Intent::DisableRouterInterface { router, .. } => router,
        }
    }
}

// ===== impl RoutingDriver =====

impl RoutingDriver {
    // Dispatches a network intent to the corresponding driver operation.
    pub async fn process_intent(
        &self,
        region: &MultiRegion,
        intent: &Intent,
    ) -> Result<(), Error> {
        match intent {
            Intent::RouterAdded { router } => {
                self.router_added(region, router).await
            }
            Intent::RouterRemoved { router } => {
                self.router_removed(region, router).await
            }
            Intent::InternalNetworkAdded { router, port } => {
                self.internal_network_added(region, router, port).await
            }
            Intent::InternalNetworkRemoved { router, port } => {
                self.internal_network_removed(region, router, port).await
            }
            Intent::ExternalGatewayAdded { router, ex_gw_port } => {
                self.external_gateway_added(region, router, ex_gw_port)
                    .await
            }
            Intent::ExternalGatewayRemoved { router, ex_gw_port } => {
                self.external_gateway_removed(region, router, ex_gw_port)
                    .await
            }
            Intent::FloatingIpAdded {
                router,
                ex_gw_port,
                floating_ip,
                fixed_ip,
            } => {
                self.floating_ip_added(
                    region,
                    router,
                    ex_gw_port,
                    *floating_ip,
                    *fixed_ip,
                )
                .await
            }
            Intent::FloatingIpRemoved {
                router,
                ex_gw_port,
                floating_ip,
                fixed_ip,
            } => {
                self.floating_ip_removed(
                    region,
                    router,
                    ex_gw_port,
                    *floating_ip,
                    *fixed_ip,
                )
                .await
            }
            Intent::EnableInternalNetworkNat {
                router,
                port,
                ex_gw_port,
            } => {
                self.enable_internal_network_nat(
                    region, router, port, ex_gw_port,
                )
                .await
            }
            Intent::DisableInternalNetworkNat {
                router,
                port,
                ex_gw_port,
            } => {
                self.disable_internal_network_nat(
                    region, router, port, ex_gw_port,
                )
                .await
            }
            Intent::RoutesUpdated {
                router,
                action,
                route,
            } => self.routes_updated(region, router, *action, route).await,
            Intent::EnableRouterInterface { router, port } => {
                self.enable_router_interface(router, port).await
            }
            Intent::DisableRouterInterface { router, port } => {
                self.disable_router_interface(router, port).await
            }
        }
    }
}

// ===== unit tests =====
