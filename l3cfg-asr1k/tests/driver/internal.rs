//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;

use l3cfg_asr1k::error::Error;
use l3cfg_asr1k::region::MultiRegion;
use l3cfg_asr1k::router::RouterRole;
use l3cfg_asr1k::snippets::Snippet;
use l3cfg_asr1k::test::RecordingSession;

use super::*;

#[tokio::test]
async fn transit_port_added_ha() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();
    let vrf = vrf(&region);
    let sub = sub_interface(1035);

    driver
        .internal_network_added(&region, &router(true), &transit_port())
        .await
        .unwrap();

    assert_eq!(
        session.configs(),
        vec![
            expected(
                Snippet::SetTenantRouteWithIntf,
                &[&vrf, "10.0.3.0", "255.255.255.0", &sub, "1.103.2.254"]
            ),
            expected(
                Snippet::CreateSubinterfaceWithId,
                &[&sub, "1035", &vrf, "1.103.2.1", "255.255.255.0"]
            ),
            expected(
                Snippet::SetIntcAsrHsrpExternal,
                &[&sub, "1060", "100", "1.103.2.2", "1035"]
            ),
        ]
    );
}

#[tokio::test]
async fn transit_hsrp_uses_transit_vip() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let port = transit_port();
    assert_eq!(port.ha_info, gateway_port().ha_info);

    let cmds = driver
        .plan_internal_network_added(
            &MultiRegion::default(),
            &router(true),
            &port,
        )
        .unwrap();

    assert_eq!(cmds[2].snippet, Snippet::SetIntcAsrHsrpExternal);
    assert_eq!(
        cmds[2].params,
        vec![
            sub_interface(1035),
            "1060".to_owned(),
            "100".to_owned(),
            "1.103.2.2".to_owned(),
            "1035".to_owned(),
        ]
    );
}

#[tokio::test]
async fn transit_port_without_vip() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let mut port = transit_port();
    if let Some(hosting_info) = port.hosting_info.as_mut() {
        hosting_info.vip = None;
    }

    // Only HA routers need the transit virtual IP.
    let cmds = driver
        .plan_internal_network_added(
            &MultiRegion::default(),
            &router(false),
            &port,
        )
        .unwrap();
    assert_eq!(cmds.len(), 2);

    let error = driver
        .internal_network_added(&MultiRegion::default(), &router(true), &port)
        .await
        .unwrap_err();
    assert!(matches!(error, Error::MissingHostingInfo(_, "vip")));
    assert!(session.configs().is_empty());
}

#[tokio::test]
async fn transit_port_added_non_ha() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();

    driver
        .internal_network_added(&region, &router(false), &transit_port())
        .await
        .unwrap();

    let configs = session.configs();
    assert_eq!(configs.len(), 2);
    assert!(configs.iter().all(|config| !config.contains("standby")));
}

#[tokio::test]
async fn transit_port_added_multi_region() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = multi_region();
    let vrf = vrf(&region);
    let sub = sub_interface(1035);
    assert_eq!(vrf, format!("{TENANT_ID}-{REGION_ID}"));

    driver
        .internal_network_added(&region, &router(true), &transit_port())
        .await
        .unwrap();

    assert_eq!(
        session.configs(),
        vec![
            expected(
                Snippet::SetTenantRouteWithIntfRegionId,
                &[
                    &vrf,
                    "10.0.3.0",
                    "255.255.255.0",
                    &sub,
                    REGION_ID,
                    "1.103.2.254"
                ]
            ),
            expected(
                Snippet::CreateSubinterfaceRegionIdWithId,
                &[&sub, REGION_ID, "1035", &vrf, "1.103.2.1", "255.255.255.0"]
            ),
            expected(
                Snippet::SetIntcAsrHsrpExternal,
                &[&sub, "1060", "100", "1.103.2.2", "1035"]
            ),
        ]
    );
}

#[tokio::test]
async fn multi_region_toggle_takes_effect_immediately() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let router = router(false);
    let port = transit_port();

    driver
        .internal_network_added(&multi_region(), &router, &port)
        .await
        .unwrap();
    driver
        .internal_network_added(&MultiRegion::default(), &router, &port)
        .await
        .unwrap();

    let configs = session.take();
    assert_eq!(configs.len(), 4);
    assert!(configs[..2].iter().all(|config| config.contains(REGION_ID)));
    assert!(configs[2..].iter().all(|config| !config.contains(REGION_ID)));
}

#[tokio::test]
async fn ha_priority_from_port() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let mut port = transit_port();
    if let Some(ha_info) = port.ha_info.as_mut() {
        ha_info.priority = Some(50);
    }

    let cmds = driver
        .plan_internal_network_added(
            &MultiRegion::default(),
            &router(true),
            &port,
        )
        .unwrap();
    assert_eq!(cmds[2].snippet, Snippet::SetIntcAsrHsrpExternal);
    assert_eq!(cmds[2].params[2], "50");
}

#[tokio::test]
async fn tenant_port_added() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();
    let vrf = vrf(&region);
    let sub = sub_interface(1036);

    driver
        .internal_network_added(&region, &router(true), &tenant_port())
        .await
        .unwrap();

    assert_eq!(
        session.configs(),
        vec![
            expected(
                Snippet::CreateSubinterfaceWithId,
                &[&sub, "1036", &vrf, "10.0.4.1", "255.255.255.0"]
            ),
            expected(
                Snippet::SetIntcAsrHsrpExternal,
                &[&sub, "1065", "100", "10.0.4.254", "1036"]
            ),
        ]
    );
}

#[tokio::test]
async fn gateway_port_added_to_global_router() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();
    let router = router_with_role(RouterRole::Global, true);
    let port = gateway_port();

    let internal = driver
        .plan_internal_network_added(&region, &router, &port)
        .unwrap();
    let external = driver
        .plan_external_gateway_added(&region, &router, &port)
        .unwrap();
    assert_eq!(internal, external);

    driver
        .internal_network_added(&region, &router, &port)
        .await
        .unwrap();
    assert_eq!(session.configs().len(), 4);
}

#[tokio::test]
async fn transit_port_removed() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);

    for ha in [true, false] {
        driver
            .internal_network_removed(
                &MultiRegion::default(),
                &router(ha),
                &transit_port(),
            )
            .await
            .unwrap();
    }

    assert!(session.configs().is_empty());
}

#[tokio::test]
async fn tenant_port_removed() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);

    driver
        .internal_network_removed(
            &MultiRegion::default(),
            &router(true),
            &tenant_port(),
        )
        .await
        .unwrap();

    assert_eq!(
        session.configs(),
        vec![expected(Snippet::RemoveSubinterface, &[&sub_interface(1036)])]
    );
}

#[tokio::test]
async fn gateway_port_removed_from_global_router() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let router = router_with_role(RouterRole::Global, false);

    let cmds = driver
        .plan_internal_network_removed(
            &MultiRegion::default(),
            &router,
            &gateway_port(),
        )
        .unwrap();
    assert_eq!(
        snippets(&cmds),
        vec![Snippet::DeleteNatPool, Snippet::RemoveDefaultRouteWithIntf]
    );
}

#[tokio::test]
async fn ipv6_port_ignored() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let mut port = tenant_port();
    port.ip_cidr = Some("2001:db8::1/64".parse().unwrap());

    driver
        .internal_network_added(&MultiRegion::default(), &router(true), &port)
        .await
        .unwrap();
    driver
        .internal_network_removed(&MultiRegion::default(), &router(true), &port)
        .await
        .unwrap();

    assert!(session.configs().is_empty());
}

#[tokio::test]
async fn ha_router_without_ha_info() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let mut port = transit_port();
    port.ha_info = None;

    let error = driver
        .internal_network_added(&MultiRegion::default(), &router(true), &port)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::MissingHaInfo(ref id) if *id == port.id));
    assert!(session.configs().is_empty());
}

#[tokio::test]
async fn incomplete_transit_info() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let mut port = transit_port();
    if let Some(hosting_info) = port.hosting_info.as_mut() {
        hosting_info.cidr_exposed = None;
    }

    let error = driver
        .internal_network_added(&MultiRegion::default(), &router(false), &port)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        Error::MissingHostingInfo(_, "cidr_exposed")
    ));
    assert!(session.configs().is_empty());
}
