//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![cfg_attr(
    feature = "testing",
    allow(dead_code, unused_variables, unused_imports)
)]

pub mod acl;
pub mod debug;
pub mod driver;
pub mod error;
pub mod ha;
pub mod intent;
pub mod nat;
pub mod region;
pub mod router;
pub mod session;
pub mod snippets;
