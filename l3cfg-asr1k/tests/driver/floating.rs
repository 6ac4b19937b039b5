//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::sync::Arc;

use const_addrs::ip4;
use l3cfg_asr1k::region::MultiRegion;
use l3cfg_asr1k::router::{FloatingIp, RouterInfo};
use l3cfg_asr1k::snippets::Snippet;
use l3cfg_asr1k::test::RecordingSession;

use super::*;

const FIXED_IP: Ipv4Addr = ip4!("10.0.4.5");
const FLOATING_IP_1: Ipv4Addr = ip4!("19.4.0.6");
const FLOATING_IP_2: Ipv4Addr = ip4!("19.4.0.7");

fn router_with_fips(fips: &[Ipv4Addr]) -> RouterInfo {
    let mut router = router(true);
    router.floating_ips = fips
        .iter()
        .map(|fip| FloatingIp {
            floating_ip_address: *fip,
            fixed_ip_address: Some(FIXED_IP),
        })
        .collect();
    router
}

#[tokio::test]
async fn floating_ip_added() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();
    let vrf = vrf(&region);

    driver
        .floating_ip_added(
            &region,
            &router_with_fips(&[FLOATING_IP_1]),
            &gateway_port(),
            FLOATING_IP_1,
            FIXED_IP,
        )
        .await
        .unwrap();

    assert_eq!(
        session.configs(),
        vec![expected(
            Snippet::SetStaticSrcTrlNoVrfMatch,
            &["10.0.4.5", "19.4.0.6", &vrf, "1060", "317"]
        )]
    );
}

#[tokio::test]
async fn floating_ip_added_non_ha() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let mut port = gateway_port();
    port.ha_info = None;

    let cmds = driver
        .plan_floating_ip_added(
            &MultiRegion::default(),
            &router(false),
            &port,
            FLOATING_IP_1,
            FIXED_IP,
        )
        .unwrap();

    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].params[3], "0");
}

#[tokio::test]
async fn floating_ips_added_with_extra_subnets() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();
    let vrf = vrf(&region);
    let sub = sub_interface(317);
    let router = router_with_fips(&[FLOATING_IP_1, FLOATING_IP_2]);
    let port = gateway_port_with_extra_subnet();

    for fip in [FLOATING_IP_1, FLOATING_IP_2] {
        driver
            .floating_ip_added(&region, &router, &port, fip, FIXED_IP)
            .await
            .unwrap();
    }

    let secondary_ip = expected(
        Snippet::AddSecondaryIp,
        &[&sub, "20.0.0.254", "255.255.255.0"],
    );
    assert_eq!(
        session.configs(),
        vec![
            expected(
                Snippet::SetStaticSrcTrlNoVrfMatch,
                &["10.0.4.5", "19.4.0.6", &vrf, "1060", "317"]
            ),
            secondary_ip.clone(),
            expected(
                Snippet::SetStaticSrcTrlNoVrfMatch,
                &["10.0.4.5", "19.4.0.7", &vrf, "1060", "317"]
            ),
            secondary_ip,
        ]
    );
}

#[tokio::test]
async fn floating_ip_removed_not_last() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();
    let vrf = vrf(&region);

    driver
        .floating_ip_removed(
            &region,
            &router_with_fips(&[FLOATING_IP_1, FLOATING_IP_2]),
            &gateway_port_with_extra_subnet(),
            FLOATING_IP_1,
            FIXED_IP,
        )
        .await
        .unwrap();

    assert_eq!(
        session.configs(),
        vec![expected(
            Snippet::RemoveStaticSrcTrlNoVrfMatch,
            &["10.0.4.5", "19.4.0.6", &vrf, "1060", "317"]
        )]
    );
}

#[tokio::test]
async fn floating_ip_removed_last() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = MultiRegion::default();
    let vrf = vrf(&region);
    let sub = sub_interface(317);

    // Whether or not the caller already dropped the address from the list.
    for fips in [vec![FLOATING_IP_2], vec![]] {
        driver
            .floating_ip_removed(
                &region,
                &router_with_fips(&fips),
                &gateway_port_with_extra_subnet(),
                FLOATING_IP_2,
                FIXED_IP,
            )
            .await
            .unwrap();

        assert_eq!(
            session.take(),
            vec![
                expected(
                    Snippet::RemoveStaticSrcTrlNoVrfMatch,
                    &["10.0.4.5", "19.4.0.7", &vrf, "1060", "317"]
                ),
                expected(
                    Snippet::RemoveSecondaryIp,
                    &[&sub, "20.0.0.254", "255.255.255.0"]
                ),
            ]
        );
    }
}

#[tokio::test]
async fn floating_ip_added_and_removed_multi_region() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);
    let region = multi_region();
    let vrf = format!("{TENANT_ID}-{REGION_ID}");
    let sub = sub_interface(317);
    let port = gateway_port_with_extra_subnet();

    driver
        .floating_ip_added(
            &region,
            &router_with_fips(&[FLOATING_IP_1]),
            &port,
            FLOATING_IP_1,
            FIXED_IP,
        )
        .await
        .unwrap();
    driver
        .floating_ip_removed(
            &region,
            &router_with_fips(&[FLOATING_IP_1]),
            &port,
            FLOATING_IP_1,
            FIXED_IP,
        )
        .await
        .unwrap();

    assert_eq!(
        session.configs(),
        vec![
            expected(
                Snippet::SetStaticSrcTrlNoVrfMatch,
                &["10.0.4.5", "19.4.0.6", &vrf, "1060", "317"]
            ),
            expected(
                Snippet::AddSecondaryIp,
                &[&sub, "20.0.0.254", "255.255.255.0"]
            ),
            expected(
                Snippet::RemoveStaticSrcTrlNoVrfMatch,
                &["10.0.4.5", "19.4.0.6", &vrf, "1060", "317"]
            ),
            expected(
                Snippet::RemoveSecondaryIp,
                &[&sub, "20.0.0.254", "255.255.255.0"]
            ),
        ]
    );
}

#[tokio::test]
async fn floating_ip_removed_without_extra_subnets() {
    let session = Arc::new(RecordingSession::new());
    let driver = driver(&session);

    let cmds = driver
        .plan_floating_ip_removed(
            &MultiRegion::default(),
            &router_with_fips(&[]),
            &gateway_port(),
            FLOATING_IP_1,
            FIXED_IP,
        )
        .unwrap();

    assert_eq!(snippets(&cmds), vec![Snippet::RemoveStaticSrcTrlNoVrfMatch]);
}
