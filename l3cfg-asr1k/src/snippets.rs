//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock as Lazy;

use derive_new::new;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

// Positional placeholder used by the templates (e.g. "{0}").
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([0-9]+)\}").unwrap());

// Identifiers of the configuration templates known to the driver.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Snippet {
    // VRFs
    CreateVrf,
    RemoveVrf,
    // Interfaces
    EnableIntf,
    DisableIntf,
    CreateSubinterfaceWithId,
    CreateSubinterfaceRegionIdWithId,
    RemoveSubinterface,
    AddSecondaryIp,
    RemoveSecondaryIp,
    // Redundancy
    SetIntcAsrHsrpExternal,
    // Routes
    SetTenantRouteWithIntf,
    SetTenantRouteWithIntfRegionId,
    SetDefaultRouteWithIntf,
    RemoveDefaultRouteWithIntf,
    SetIpRoute,
    RemoveIpRoute,
    // NAT
    CreateNatPool,
    DeleteNatPool,
    SetStaticSrcTrlNoVrfMatch,
    RemoveStaticSrcTrlNoVrfMatch,
    SetDynSrcTrlPool,
    RemoveDynSrcTrlPool,
    SetNat,
    // Access lists
    CreateAcl,
    RemoveAcl,
}

// A configuration command: a template identifier along with its ordered
// parameters.
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct ConfigCmd {
    pub snippet: Snippet,
    pub params: Vec<String>,
}

// Maps configuration commands to the literal text sent to the device.
pub trait TemplateResolver: Send + Sync {
    fn resolve(&self, cmd: &ConfigCmd) -> Result<String, TemplateError>;
}

// Template catalog backed by the built-in IOS-XE snippets, optionally
// overridden per identifier.
#[derive(Clone, Debug, Default)]
pub struct SnippetCatalog {
    overrides: BTreeMap<Snippet, String>,
}

// Builds a `ConfigCmd`, converting every parameter to its textual form.
macro_rules! cmd {
    ($snippet:expr $(, $param:expr)* $(,)?) => {
        $crate::snippets::ConfigCmd::new(
            $snippet,
            vec![$($param.to_string()),*],
        )
    };
}
pub(crate) use cmd;

// Wraps CLI lines into a NETCONF edit-config payload.
macro_rules! cli_config {
    ($($line:literal),+ $(,)?) => {
        concat!(
            "<config>\n",
            "  <cli-config-data>\n",
            $("    <cmd>", $line, "</cmd>\n",)+
            "  </cli-config-data>\n",
            "</config>\n",
        )
    };
}

// ===== impl Snippet =====

impl Snippet {
    pub const ALL: [Snippet; 25] = [
        Snippet::CreateVrf,
        Snippet::RemoveVrf,
        Snippet::EnableIntf,
        Snippet::DisableIntf,
        Snippet::CreateSubinterfaceWithId,
        Snippet::CreateSubinterfaceRegionIdWithId,
        Snippet::RemoveSubinterface,
        Snippet::AddSecondaryIp,
        Snippet::RemoveSecondaryIp,
        Snippet::SetIntcAsrHsrpExternal,
        Snippet::SetTenantRouteWithIntf,
        Snippet::SetTenantRouteWithIntfRegionId,
        Snippet::SetDefaultRouteWithIntf,
        Snippet::RemoveDefaultRouteWithIntf,
        Snippet::SetIpRoute,
        Snippet::RemoveIpRoute,
        Snippet::CreateNatPool,
        Snippet::DeleteNatPool,
        Snippet::SetStaticSrcTrlNoVrfMatch,
        Snippet::RemoveStaticSrcTrlNoVrfMatch,
        Snippet::SetDynSrcTrlPool,
        Snippet::RemoveDynSrcTrlPool,
        Snippet::SetNat,
        Snippet::CreateAcl,
        Snippet::RemoveAcl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Snippet::CreateVrf => "CREATE_VRF",
            Snippet::RemoveVrf => "REMOVE_VRF",
            Snippet::EnableIntf => "ENABLE_INTF",
            Snippet::DisableIntf => "DISABLE_INTF",
            Snippet::CreateSubinterfaceWithId => "CREATE_SUBINTERFACE_WITH_ID",
            Snippet::CreateSubinterfaceRegionIdWithId => {
                "CREATE_SUBINTERFACE_REGION_ID_WITH_ID"
            }
            Snippet::RemoveSubinterface => "REMOVE_SUBINTERFACE",
            Snippet::AddSecondaryIp => "ADD_SECONDARY_IP",
            Snippet::RemoveSecondaryIp => "REMOVE_SECONDARY_IP",
            Snippet::SetIntcAsrHsrpExternal => "SET_INTC_ASR_HSRP_EXTERNAL",
            Snippet::SetTenantRouteWithIntf => "SET_TENANT_ROUTE_WITH_INTF",
            Snippet::SetTenantRouteWithIntfRegionId => {
                "SET_TENANT_ROUTE_WITH_INTF_REGION_ID"
            }
            Snippet::SetDefaultRouteWithIntf => "SET_DEFAULT_ROUTE_WITH_INTF",
            Snippet::RemoveDefaultRouteWithIntf => {
                "REMOVE_DEFAULT_ROUTE_WITH_INTF"
            }
            Snippet::SetIpRoute => "SET_IP_ROUTE",
            Snippet::RemoveIpRoute => "REMOVE_IP_ROUTE",
            Snippet::CreateNatPool => "CREATE_NAT_POOL",
            Snippet::DeleteNatPool => "DELETE_NAT_POOL",
            Snippet::SetStaticSrcTrlNoVrfMatch => {
                "SET_STATIC_SRC_TRL_NO_VRF_MATCH"
            }
            Snippet::RemoveStaticSrcTrlNoVrfMatch => {
                "REMOVE_STATIC_SRC_TRL_NO_VRF_MATCH"
            }
            Snippet::SetDynSrcTrlPool => "SET_DYN_SRC_TRL_POOL",
            Snippet::RemoveDynSrcTrlPool => "REMOVE_DYN_SRC_TRL_POOL",
            Snippet::SetNat => "SET_NAT",
            Snippet::CreateAcl => "CREATE_ACL",
            Snippet::RemoveAcl => "REMOVE_ACL",
        }
    }

    // Returns the built-in template text.
    pub fn template(&self) -> &'static str {
        match self {
            Snippet::CreateVrf => cli_config!(
                "vrf definition {0}",
                "address-family ipv4",
                "exit-address-family",
                "address-family ipv6",
                "exit-address-family",
            ),
            Snippet::RemoveVrf => cli_config!("no vrf definition {0}"),
            Snippet::EnableIntf => {
                cli_config!("interface {0}", "no shutdown")
            }
            Snippet::DisableIntf => cli_config!("interface {0}", "shutdown"),
            Snippet::CreateSubinterfaceWithId => cli_config!(
                "interface {0}",
                "description OPENSTACK_NEUTRON_INTF",
                "encapsulation dot1Q {1}",
                "vrf forwarding {2}",
                "ip address {3} {4}",
            ),
            Snippet::CreateSubinterfaceRegionIdWithId => cli_config!(
                "interface {0}",
                "description OPENSTACK_NEUTRON-{1}_INTF",
                "encapsulation dot1Q {2}",
                "vrf forwarding {3}",
                "ip address {4} {5}",
            ),
            Snippet::RemoveSubinterface => cli_config!("no interface {0}"),
            Snippet::AddSecondaryIp => cli_config!(
                "interface {0}",
                "ip address {1} {2} secondary",
            ),
            Snippet::RemoveSecondaryIp => cli_config!(
                "interface {0}",
                "no ip address {1} {2} secondary",
            ),
            Snippet::SetIntcAsrHsrpExternal => cli_config!(
                "interface {0}",
                "standby version 2",
                "standby delay minimum 30 reload 60",
                "standby {1} priority {2}",
                "standby {1} ip {3}",
                "standby {1} timers 1 3",
                "standby {1} name neutron-hsrp-{1}-{4}",
            ),
            Snippet::SetTenantRouteWithIntf => {
                cli_config!("ip route vrf {0} {1} {2} {3} {4}")
            }
            Snippet::SetTenantRouteWithIntfRegionId => cli_config!(
                "ip route vrf {0} {1} {2} {3} {5} name OPENSTACK_NEUTRON-{4}"
            ),
            Snippet::SetDefaultRouteWithIntf => {
                cli_config!("ip route vrf {0} 0.0.0.0 0.0.0.0 {1} {2}")
            }
            Snippet::RemoveDefaultRouteWithIntf => {
                cli_config!("no ip route vrf {0} 0.0.0.0 0.0.0.0 {1} {2}")
            }
            Snippet::SetIpRoute => cli_config!("ip route vrf {0} {1} {2} {3}"),
            Snippet::RemoveIpRoute => {
                cli_config!("no ip route vrf {0} {1} {2} {3}")
            }
            Snippet::CreateNatPool => {
                cli_config!("ip nat pool {0} {1} {2} netmask {3}")
            }
            Snippet::DeleteNatPool => {
                cli_config!("no ip nat pool {0} {1} {2} netmask {3}")
            }
            Snippet::SetStaticSrcTrlNoVrfMatch => cli_config!(
                "ip nat inside source static {0} {1} vrf {2} \
                 redundancy neutron-hsrp-{3}-{4}"
            ),
            Snippet::RemoveStaticSrcTrlNoVrfMatch => cli_config!(
                "no ip nat inside source static {0} {1} vrf {2} \
                 redundancy neutron-hsrp-{3}-{4}"
            ),
            Snippet::SetDynSrcTrlPool => cli_config!(
                "ip nat inside source list {0} pool {1} vrf {2} overload"
            ),
            Snippet::RemoveDynSrcTrlPool => cli_config!(
                "no ip nat inside source list {0} pool {1} vrf {2} overload"
            ),
            Snippet::SetNat => cli_config!("interface {0}", "ip nat {1}"),
            Snippet::CreateAcl => cli_config!(
                "ip access-list standard {0}",
                "permit {1} {2}",
            ),
            Snippet::RemoveAcl => {
                cli_config!("no ip access-list standard {0}")
            }
        }
    }
}

impl std::fmt::Display for Snippet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Snippet {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snippet::ALL
            .into_iter()
            .find(|snippet| snippet.name() == s)
            .ok_or_else(|| TemplateError::UnknownSnippet(s.to_owned()))
    }
}

// ===== impl ConfigCmd =====

impl std::fmt::Display for ConfigCmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.snippet, self.params.join(", "))
    }
}

// ===== impl SnippetCatalog =====

impl SnippetCatalog {
    // Creates a catalog whose templates are replaced by the given ones,
    // keyed by snippet name.
    pub fn with_overrides(
        overrides: &BTreeMap<String, String>,
    ) -> Result<SnippetCatalog, TemplateError> {
        let overrides = overrides
            .iter()
            .map(|(name, template)| {
                let snippet = Snippet::from_str(name)?;
                Ok((snippet, template.clone()))
            })
            .collect::<Result<_, TemplateError>>()?;
        Ok(SnippetCatalog { overrides })
    }

    pub fn template(&self, snippet: Snippet) -> &str {
        self.overrides
            .get(&snippet)
            .map(String::as_str)
            .unwrap_or_else(|| snippet.template())
    }
}

impl TemplateResolver for SnippetCatalog {
    fn resolve(&self, cmd: &ConfigCmd) -> Result<String, TemplateError> {
        render(cmd.snippet, self.template(cmd.snippet), &cmd.params)
    }
}

// ===== global functions =====

// Substitutes every positional placeholder of the template.
fn render(
    snippet: Snippet,
    template: &str,
    params: &[String],
) -> Result<String, TemplateError> {
    let mut missing = None;
    let text = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        let index = caps[1].parse::<usize>().unwrap_or(usize::MAX);
        match params.get(index) {
            Some(param) => param.clone(),
            None => {
                missing.get_or_insert(index);
                String::new()
            }
        }
    });

    match missing {
        Some(index) => Err(TemplateError::MissingParam(snippet, index)),
        None => Ok(text.into_owned()),
    }
}

// ===== unit tests =====
