use crate::negotiation::{
    EngineEvent, IceConnectionState, MediaEngine, NegotiationError, PeerSession, TrackInfo,
};
use async_trait::async_trait;
use peerlink_core::{IceCandidate, SdpType, SessionDescription};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine as RtcMediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ice_servers: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec!["stun:stun.l.google.com:19302".to_string()],
        }
    }
}

/// Media engine backed by the `webrtc` crate. Each `open_session` builds a
/// fresh `RTCPeerConnection` with default codecs and interceptors and
/// bridges its callbacks into the session's event channel.
pub struct WebrtcEngine {
    config: EngineConfig,
}

impl WebrtcEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MediaEngine for WebrtcEngine {
    async fn open_session(
        &self,
    ) -> Result<(Box<dyn PeerSession>, mpsc::UnboundedReceiver<EngineEvent>), NegotiationError>
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session = WebrtcSession::open(self.config.clone(), event_tx).await?;
        Ok((Box::new(session), event_rx))
    }
}

pub struct WebrtcSession {
    peer_connection: Arc<RTCPeerConnection>,
    capturing: AtomicBool,
}

impl WebrtcSession {
    async fn open(
        config: EngineConfig,
        event_tx: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<Self, NegotiationError> {
        let mut media = RtcMediaEngine::default();
        media.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media)?;

        let api = APIBuilder::new()
            .with_media_engine(media)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }],
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // Callback results land in the event channel; once the owning call
        // drops the receiver, late completions are discarded here rather
        // than touching a torn-down session.
        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    warn!("Generated candidate did not serialize; dropping");
                    return;
                };
                let _ = tx.send(EngineEvent::CandidateGenerated(IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index.unwrap_or(0),
                }));
            })
        }));

        let state_tx = event_tx.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    debug!("ICE connection state changed: {s}");
                    if let Some(state) = map_ice_state(s) {
                        let _ = tx.send(EngineEvent::ConnectionStateChanged(state));
                    }
                })
            },
        ));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>, _receiver, _transceiver| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    info!("Remote track received: {}", track.id());
                    let _ = tx.send(EngineEvent::RemoteTrackReceived(TrackInfo {
                        id: track.id(),
                        kind: track.kind().to_string(),
                    }));
                })
            },
        ));

        let session = Self {
            peer_connection,
            capturing: AtomicBool::new(false),
        };
        session.add_local_tracks().await?;
        Ok(session)
    }

    /// Register the local audio and video senders so they are part of the
    /// first offer/answer. Feeding samples into them is the embedder's job.
    async fn add_local_tracks(&self) -> Result<(), NegotiationError> {
        let stream_id = "stream";
        let audio = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                ..Default::default()
            },
            "audio0".to_owned(),
            stream_id.to_owned(),
        ));
        self.peer_connection.add_track(audio).await?;

        let video = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
            "video0".to_owned(),
            stream_id.to_owned(),
        ));
        self.peer_connection.add_track(video).await?;
        Ok(())
    }
}

#[async_trait]
impl PeerSession for WebrtcSession {
    async fn create_offer(&self) -> Result<SessionDescription, NegotiationError> {
        let offer = self.peer_connection.create_offer(None).await?;
        if offer.sdp.is_empty() {
            return Err(NegotiationError::DescriptionGenerationFailed);
        }
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, NegotiationError> {
        let answer = self.peer_connection.create_answer(None).await?;
        if answer.sdp.is_empty() {
            return Err(NegotiationError::DescriptionGenerationFailed);
        }
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), NegotiationError> {
        let remote = match desc.kind {
            SdpType::Offer => RTCSessionDescription::offer(desc.sdp)?,
            SdpType::Answer => RTCSessionDescription::answer(desc.sdp)?,
            SdpType::ProvisionalAnswer => RTCSessionDescription::pranswer(desc.sdp)?,
            SdpType::Rollback => return Err(NegotiationError::UnsupportedDescription),
        };
        self.peer_connection.set_remote_description(remote).await?;
        Ok(())
    }

    async fn add_candidate(&self, candidate: IceCandidate) -> Result<(), NegotiationError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: Some(candidate.sdp_m_line_index),
            username_fragment: None,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn start_capture(&self) -> Result<(), NegotiationError> {
        if self.capturing.swap(true, Ordering::SeqCst) {
            debug!("Capture already running");
            return Ok(());
        }
        info!("Local media senders active (audio0/video0)");
        Ok(())
    }

    async fn close(&self) {
        if let Err(e) = self.peer_connection.close().await {
            warn!("Error closing peer connection: {e}");
        }
    }
}

fn map_ice_state(state: RTCIceConnectionState) -> Option<IceConnectionState> {
    match state {
        RTCIceConnectionState::New => Some(IceConnectionState::New),
        RTCIceConnectionState::Checking => Some(IceConnectionState::Checking),
        RTCIceConnectionState::Connected => Some(IceConnectionState::Connected),
        RTCIceConnectionState::Completed => Some(IceConnectionState::Completed),
        RTCIceConnectionState::Failed => Some(IceConnectionState::Failed),
        RTCIceConnectionState::Disconnected => Some(IceConnectionState::Disconnected),
        RTCIceConnectionState::Closed => Some(IceConnectionState::Closed),
        RTCIceConnectionState::Unspecified => None,
    }
}
