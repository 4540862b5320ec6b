// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery loop behavior against a scripted gateway, on a virtual clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use zapsend_core::{Contact, DeliveryResult, GatewayError, MediaAttachment, MediaKind};
use zapsend_dispatch::{DeliveryDispatcher, DispatchPlan};
use zapsend_test_utils::{GatewayCall, MockGateway};

const SESSION: &str = "business_sender";

fn dispatcher(gateway: &MockGateway, cancel: CancellationToken) -> DeliveryDispatcher {
    DeliveryDispatcher::new(Arc::new(gateway.clone()), SESSION, cancel)
}

fn contacts() -> Vec<Contact> {
    vec![
        Contact::new("Padaria Central", "61911111111"),
        Contact::new("Oficina do Zé", "61922222222"),
        Contact::new("Floricultura", "61933333333"),
    ]
}

fn plan(delay_secs: u64) -> DispatchPlan {
    DispatchPlan::new("Olá {name}!")
        .with_delay(Duration::from_secs(delay_secs))
        .with_verify(true)
}

#[tokio::test(start_paused = true)]
async fn unverifiable_recipient_is_skipped() {
    let gateway = MockGateway::new().with_unreachable("61922222222");

    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&contacts(), &plan(5))
        .await;

    assert_eq!(summary.sent(), 2);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.total(), 3);
    assert_eq!(
        summary.records()[1].result,
        DeliveryResult::Skipped("no messaging capability".into())
    );

    let sends = gateway.sends().await;
    assert_eq!(sends.len(), 2);
    assert_eq!(
        sends[0],
        GatewayCall::SendText {
            session: SESSION.into(),
            phone: "61911111111".into(),
            text: "Olá Padaria Central!".into(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn single_send_failure_does_not_stop_the_run() {
    let gateway = MockGateway::new()
        .with_send_failure("61911111111", GatewayError::status(500, "Internal Server Error"));

    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&contacts(), &plan(1))
        .await;

    assert_eq!(summary.sent(), 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.total(), 3);
    assert!(!summary.cancelled());
    match &summary.records()[0].result {
        DeliveryResult::Failed(detail) => assert!(detail.contains("Internal Server Error")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(gateway.sends().await.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn delay_applies_between_attempts_but_not_after_last() {
    let gateway = MockGateway::new();

    let start = Instant::now();
    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&contacts(), &plan(5))
        .await;

    assert_eq!(summary.sent(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(10));

    let instants = gateway.send_instants().await;
    assert_eq!(instants[1] - instants[0], Duration::from_secs(5));
    assert_eq!(instants[2] - instants[1], Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn skipped_contacts_do_not_consume_delay() {
    let gateway = MockGateway::new()
        .with_unreachable("61911111111")
        .with_unreachable("61922222222");

    let start = Instant::now();
    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&contacts(), &plan(5))
        .await;

    assert_eq!(summary.skipped(), 2);
    assert_eq!(summary.sent(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn verification_off_sends_without_checking() {
    let gateway = MockGateway::new().with_unreachable("61922222222");

    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&contacts(), &plan(0).with_verify(false))
        .await;

    assert_eq!(summary.sent(), 3);
    assert_eq!(
        gateway
            .count(|c| matches!(c, GatewayCall::ValidateRecipient { .. }))
            .await,
        0
    );
}

#[tokio::test(start_paused = true)]
async fn non_dispatchable_contacts_are_skipped_without_calls() {
    let gateway = MockGateway::new();
    let batch = vec![
        Contact::new("Sem telefone", "N/A"),
        Contact::new("", "61944444444"),
        Contact::new("Padaria", "61911111111"),
    ];

    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&batch, &plan(5))
        .await;

    assert_eq!(summary.skipped(), 2);
    assert_eq!(summary.sent(), 1);
    assert_eq!(
        summary.records()[0].result,
        DeliveryResult::Skipped("missing name or phone".into())
    );
    assert_eq!(gateway.calls().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn media_plan_sends_rendered_caption() {
    let gateway = MockGateway::new();
    let media = MediaAttachment {
        url: "https://cdn.example/flyer.png".into(),
        kind: MediaKind::Image,
    };

    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&contacts()[..1], &plan(5).with_media(media))
        .await;

    assert_eq!(summary.sent(), 1);
    assert_eq!(
        gateway.sends().await,
        vec![GatewayCall::SendMedia {
            session: SESSION.into(),
            phone: "61911111111".into(),
            url: "https://cdn.example/flyer.png".into(),
            kind: MediaKind::Image,
            caption: "Olá Padaria Central!".into(),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_delay_stops_the_run() {
    let gateway = MockGateway::new();
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        trigger.cancel();
    });

    let summary = dispatcher(&gateway, cancel)
        .dispatch(&contacts(), &plan(10))
        .await;

    assert!(summary.cancelled());
    assert_eq!(summary.total(), 1);
    assert_eq!(summary.sent(), 1);
    assert_eq!(gateway.sends().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn empty_batch_yields_empty_summary() {
    let gateway = MockGateway::new();
    let summary = dispatcher(&gateway, CancellationToken::new())
        .dispatch(&[], &plan(5))
        .await;
    assert_eq!(summary.total(), 0);
    assert!(!summary.cancelled());
}
