//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use enum_as_inner::EnumAsInner;
use ipnetwork::Ipv4Network;
use l3cfg_utils::ip::AddressFamily;
use tracing::{warn, warn_span};

use crate::snippets::Snippet;

// Driver errors.
#[derive(Debug, EnumAsInner)]
pub enum Error {
    // Device errors
    ConfigApply(Snippet, SessionError),
    Template(TemplateError),

    // Input errors
    MissingHostingInfo(String, &'static str),
    MissingCidr(String),
    MissingGatewayIp(String),
    MissingHaInfo(String),
    UnsupportedAddressFamily(String, AddressFamily),
    PrefixTooSmall(String, Ipv4Network),
}

// Device session errors.
#[derive(Debug)]
pub enum SessionError {
    Rejected(String),
    Transport(std::io::Error),
    Timeout,
}

// Command template errors.
#[derive(Debug, Eq, PartialEq)]
pub enum TemplateError {
    UnknownSnippet(String),
    MissingParam(Snippet, usize),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::ConfigApply(snippet, error) => {
                warn_span!("device").in_scope(|| {
                    warn!(%snippet, error = %with_source(error), "{}", self);
                });
            }
            Error::Template(error) => {
                warn!(%error, "{}", self);
            }
            Error::MissingHostingInfo(port_id, field) => {
                warn_span!("input").in_scope(|| {
                    warn!(%port_id, %field, "{}", self);
                });
            }
            Error::MissingCidr(port_id)
            | Error::MissingGatewayIp(port_id)
            | Error::MissingHaInfo(port_id) => {
                warn_span!("input").in_scope(|| {
                    warn!(%port_id, "{}", self);
                });
            }
            Error::UnsupportedAddressFamily(port_id, af) => {
                warn_span!("input").in_scope(|| {
                    warn!(%port_id, %af, "{}", self);
                });
            }
            Error::PrefixTooSmall(port_id, prefix) => {
                warn_span!("input").in_scope(|| {
                    warn!(%port_id, %prefix, "{}", self);
                });
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ConfigApply(..) => {
                write!(f, "failed to apply configuration")
            }
            Error::Template(..) => {
                write!(f, "failed to render configuration template")
            }
            Error::MissingHostingInfo(..) => {
                write!(f, "port is missing hosting information")
            }
            Error::MissingCidr(..) => {
                write!(f, "port is missing its primary address")
            }
            Error::MissingGatewayIp(..) => {
                write!(f, "port subnet is missing a gateway address")
            }
            Error::MissingHaInfo(..) => {
                write!(f, "port is missing HA information on an HA router")
            }
            Error::UnsupportedAddressFamily(..) => {
                write!(f, "unsupported address family")
            }
            Error::PrefixTooSmall(..) => {
                write!(f, "prefix too small to allocate addresses from")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigApply(_, error) => Some(error),
            Error::Template(error) => Some(error),
            _ => None,
        }
    }
}

impl From<TemplateError> for Error {
    fn from(error: TemplateError) -> Error {
        Error::Template(error)
    }
}

// ===== impl SessionError =====

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Rejected(reply) => {
                write!(f, "configuration rejected by the device: {reply}")
            }
            SessionError::Transport(..) => {
                write!(f, "device transport failure")
            }
            SessionError::Timeout => {
                write!(f, "timed out waiting for the device")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Transport(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(error: std::io::Error) -> SessionError {
        SessionError::Transport(error)
    }
}

// ===== impl TemplateError =====

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::UnknownSnippet(name) => {
                write!(f, "unknown configuration snippet: {name}")
            }
            TemplateError::MissingParam(snippet, index) => {
                write!(
                    f,
                    "snippet {snippet} references missing parameter {index}"
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}

// ===== global functions =====

fn with_source<E: std::error::Error>(error: E) -> String {
    if let Some(source) = error.source() {
        format!("{} ({})", error, with_source(source))
    } else {
        error.to_string()
    }
}
