use peerlink_client::{NegotiationError, SessionNegotiator};
use peerlink_core::SessionDescription;

use crate::integration::init_tracing;
use crate::utils::{MockMediaEngine, SessionOp};

#[tokio::test]
async fn test_negotiator_drives_the_session() {
    init_tracing();

    let engine = MockMediaEngine::new();
    let (negotiator, _events) = SessionNegotiator::open(engine.as_ref())
        .await
        .expect("open failed");

    let offer = negotiator.create_offer().await.expect("offer failed");
    assert_eq!(offer.sdp, "mock-offer-sdp");

    negotiator
        .set_remote_description(SessionDescription::answer("remote-answer"))
        .await
        .expect("set_remote_description failed");

    let ops = engine.last_session().ops();
    assert_eq!(
        ops,
        vec![
            SessionOp::CreateOffer,
            SessionOp::SetRemoteDescription(SessionDescription::answer("remote-answer")),
        ]
    );
}

#[tokio::test]
async fn test_close_is_idempotent_and_fences_later_calls() {
    init_tracing();

    let engine = MockMediaEngine::new();
    let (mut negotiator, _events) = SessionNegotiator::open(engine.as_ref())
        .await
        .expect("open failed");
    let session = engine.last_session();

    negotiator.close().await;
    negotiator.close().await;
    assert_eq!(session.close_count(), 1);

    let err = negotiator
        .create_offer()
        .await
        .expect_err("closed negotiator must refuse work");
    assert!(matches!(err, NegotiationError::EngineUnavailable), "got {err:?}");
    assert_eq!(session.close_count(), 1);
}
