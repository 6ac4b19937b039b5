//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::debug::Debug;
use crate::error::SessionError;

// Capability advertised by devices supporting access lists.
pub const CAP_ACL: &str = "acl";

// Configuration session with a managed device.
#[async_trait]
pub trait DeviceSession: Send + Sync {
    // Applies the given configuration text to the running configuration.
    async fn edit_config(&self, config: &str) -> Result<(), SessionError>;

    // Returns whether the device supports the given capability.
    fn has_capability(&self, capability: &str) -> bool;
}

// Session that accepts every configuration without contacting any device,
// logging the configuration text instead.
#[derive(Debug, Default)]
pub struct DryRunSession {
    capabilities: BTreeSet<String>,
}

// ===== impl DryRunSession =====

impl DryRunSession {
    pub fn new<I, S>(capabilities: I) -> DryRunSession
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DryRunSession {
            capabilities: capabilities.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl DeviceSession for DryRunSession {
    async fn edit_config(&self, config: &str) -> Result<(), SessionError> {
        Debug::DryRunEditConfig(config).log();
        Ok(())
    }

    fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}
