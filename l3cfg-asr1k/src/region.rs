//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};

use crate::snippets::Snippet;

// Multi-region settings, passed explicitly to every driver operation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiRegion {
    pub enable_multi_region: bool,
    pub region_id: String,
}

// ===== impl MultiRegion =====

impl MultiRegion {
    pub const DFLT_REGION_ID: &'static str = "L3FR001";

    pub fn enabled(region_id: &str) -> MultiRegion {
        MultiRegion {
            enable_multi_region: true,
            region_id: region_id.to_owned(),
        }
    }

    // Returns the region identifier when multi-region is enabled.
    pub fn region_id(&self) -> Option<&str> {
        self.enable_multi_region.then_some(self.region_id.as_str())
    }

    // Derives the VRF name of a tenant.
    pub fn vrf_name(&self, tenant_id: &str) -> String {
        match self.region_id() {
            Some(region_id) => format!("{tenant_id}-{region_id}"),
            None => tenant_id.to_owned(),
        }
    }

    // Selects the sub-interface creation template. The region-aware variant
    // takes the region id right after the interface name.
    pub(crate) fn subinterface_snippet(&self) -> Snippet {
        match self.enable_multi_region {
            true => Snippet::CreateSubinterfaceRegionIdWithId,
            false => Snippet::CreateSubinterfaceWithId,
        }
    }

    // Selects the tenant route template. The region-aware variant takes the
    // region id right after the interface name.
    pub(crate) fn tenant_route_snippet(&self) -> Snippet {
        match self.enable_multi_region {
            true => Snippet::SetTenantRouteWithIntfRegionId,
            false => Snippet::SetTenantRouteWithIntf,
        }
    }

    // Inserts the region id (if any) right after the interface parameter,
    // which must be at position `intf_pos`.
    pub(crate) fn tag_params(
        &self,
        mut params: Vec<String>,
        intf_pos: usize,
    ) -> Vec<String> {
        if let Some(region_id) = self.region_id() {
            params.insert(intf_pos + 1, region_id.to_owned());
        }
        params
    }
}

impl Default for MultiRegion {
    fn default() -> MultiRegion {
        MultiRegion {
            enable_multi_region: false,
            region_id: MultiRegion::DFLT_REGION_ID.to_owned(),
        }
    }
}

// ===== unit tests =====
