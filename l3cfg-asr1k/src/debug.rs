//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use tracing::{debug, debug_span};

use crate::driver::Operation;
use crate::snippets::{ConfigCmd, Snippet};

// Driver debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    OperationStart(Operation, usize),
    OperationDone(Operation),
    ConfigApply(&'a ConfigCmd),
    ConfigSkipped(Snippet, SkipReason),
    PortIgnored(&'a str, PortIgnoredReason),
    SubInterfaceRetained(&'a str),
    SecondaryIpRetained(Ipv4Addr),
    DryRunEditConfig(&'a str),
}

// Reason why a capability-gated command was skipped.
#[derive(Debug)]
pub enum SkipReason {
    MissingCapability(&'static str),
    AlreadyPresent,
}

// Reason why a port was ignored.
#[derive(Debug)]
pub enum PortIgnoredReason {
    Ipv6,
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::OperationStart(_, count) => {
                // Parent span(s): router
                debug!(%count, "{}", self);
            }
            Debug::OperationDone(_) => {
                // Parent span(s): router
                debug!("{}", self);
            }
            Debug::ConfigApply(cmd) => {
                // Parent span(s): router
                debug_span!("device").in_scope(|| {
                    let data = serde_json::to_string(cmd).unwrap();
                    debug!(snippet = %cmd.snippet, %data, "{}", self);
                })
            }
            Debug::ConfigSkipped(snippet, reason) => {
                // Parent span(s): router
                debug!(%snippet, %reason, "{}", self);
            }
            Debug::PortIgnored(port_id, reason) => {
                // Parent span(s): router
                debug!(%port_id, %reason, "{}", self);
            }
            Debug::SubInterfaceRetained(port_id) => {
                // Parent span(s): router
                debug!(%port_id, "{}", self);
            }
            Debug::SecondaryIpRetained(addr) => {
                // Parent span(s): router
                debug!(%addr, "{}", self);
            }
            Debug::DryRunEditConfig(config) => {
                debug_span!("dry-run").in_scope(|| {
                    debug!(%config, "{}", self);
                })
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::OperationStart(operation, ..) => {
                write!(f, "{operation}: starting")
            }
            Debug::OperationDone(operation) => {
                write!(f, "{operation}: done")
            }
            Debug::ConfigApply(..) => {
                write!(f, "applying configuration")
            }
            Debug::ConfigSkipped(..) => {
                write!(f, "skipping configuration")
            }
            Debug::PortIgnored(..) => {
                write!(f, "ignoring port")
            }
            Debug::SubInterfaceRetained(..) => {
                write!(f, "transit sub-interface retained")
            }
            Debug::SecondaryIpRetained(..) => {
                write!(f, "secondary address still referenced")
            }
            Debug::DryRunEditConfig(..) => {
                write!(f, "edit-config")
            }
        }
    }
}

// ===== impl SkipReason =====

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingCapability(capability) => {
                write!(f, "device lacks the {capability} capability")
            }
            SkipReason::AlreadyPresent => {
                write!(f, "already present on the device")
            }
        }
    }
}

// ===== impl PortIgnoredReason =====

impl std::fmt::Display for PortIgnoredReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortIgnoredReason::Ipv6 => {
                write!(f, "IPv6 ports aren't supported")
            }
        }
    }
}
