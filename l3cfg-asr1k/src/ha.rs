//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use crate::error::Error;
use crate::router::{Port, RouterInfo};
use crate::snippets::{ConfigCmd, Snippet, cmd};

// HSRP group used when the port carries no HA information.
pub const DFLT_HSRP_GROUP: u16 = 0;

// HSRP parameters of a redundancy-guarded port.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HsrpParams {
    pub group: u16,
    pub priority: u8,
    pub virtual_ip: Ipv4Addr,
}

// ===== global functions =====

// Returns the HSRP group of the given port.
//
// Static translations reference the redundancy group even on routers that
// don't run HSRP, hence the fallback to the default group.
pub fn hsrp_group(port: &Port) -> u16 {
    port.ha_info
        .as_ref()
        .map(|ha_info| ha_info.group)
        .unwrap_or(DFLT_HSRP_GROUP)
}

// Computes the HSRP parameters of the given port, or `None` when the router
// isn't HA-enabled.
pub fn hsrp_params(
    router: &RouterInfo,
    port: &Port,
) -> Result<Option<HsrpParams>, Error> {
    if !router.is_ha_enabled() {
        return Ok(None);
    }

    let ha_info = port
        .ha_info
        .as_ref()
        .ok_or_else(|| Error::MissingHaInfo(port.id.clone()))?;
    Ok(Some(HsrpParams {
        group: ha_info.group,
        priority: ha_info.priority.unwrap_or(router.ha.priority),
        virtual_ip: ha_info.virtual_ip,
    }))
}

// Builds the HSRP configuration command of a sub-interface.
pub(crate) fn hsrp_cmd(
    sub_interface: &str,
    vlan: u16,
    params: &HsrpParams,
) -> ConfigCmd {
    cmd!(
        Snippet::SetIntcAsrHsrpExternal,
        sub_interface,
        params.group,
        params.priority,
        params.virtual_ip,
        vlan
    )
}
