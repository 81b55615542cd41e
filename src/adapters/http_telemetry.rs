//! Telemetry transport posting events to the stats endpoint.

use std::sync::Arc;
use tokio::runtime::Handle;

use crate::config::TelemetryConfig;
use crate::error::TransportError;
use crate::telemetry::ConnectionEvent;
use crate::traits::{Headers, HttpClient, TelemetryTransport};

/// Posts each event as JSON through an [`HttpClient`].
///
/// [`flush_event`](TelemetryTransport::flush_event) spawns the request on the
/// current tokio runtime and only logs failures.
#[derive(Clone)]
pub struct HttpTelemetryTransport {
    client: Arc<dyn HttpClient>,
    url: String,
    measurement_group: String,
}

impl HttpTelemetryTransport {
    pub fn new(client: Arc<dyn HttpClient>, config: &TelemetryConfig) -> Self {
        Self {
            client,
            url: config.stats_url(),
            measurement_group: config.measurement_group.clone(),
        }
    }

    /// Post one event and wait for the response.
    pub async fn send_event(&self, event: &ConnectionEvent) -> Result<(), TransportError> {
        let body = serde_json::to_string(&event.to_payload(&self.measurement_group))?;
        let response = self.client.post_json(&self.url, &body, &Headers::new()).await?;

        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                message: response.text_lossy(),
            });
        }
        Ok(())
    }
}

impl TelemetryTransport for HttpTelemetryTransport {
    fn flush_event(&self, event: ConnectionEvent) {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("No async runtime available, dropping telemetry event");
            return;
        };

        let transport = self.clone();
        runtime.spawn(async move {
            match transport.send_event(&event).await {
                Ok(()) => tracing::debug!("Telemetry event {} sent", event.event.event_name()),
                Err(e) => tracing::warn!("Failed to send telemetry event: {}", e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::connection::VpnProtocol;
    use crate::telemetry::{
        ConnectionEventType, NetworkType, Outcome, TelemetryDimensions, UserTier, VpnStatus,
    };
    use crate::traits::{HttpError, Response};
    use bytes::Bytes;
    use std::time::Duration;

    fn event() -> ConnectionEvent {
        ConnectionEvent::new(
            ConnectionEventType::VpnDisconnection {
                session_length: Duration::from_secs(5),
            },
            TelemetryDimensions {
                outcome: Outcome::Aborted,
                user_tier: UserTier::Free,
                vpn_status: VpnStatus::On,
                vpn_trigger: None,
                network_type: NetworkType::Mobile,
                server_features: vec![],
                vpn_country: "NL".to_string(),
                user_country: String::new(),
                protocol: VpnProtocol::WireGuardTcp,
                server: "NL-FREE#3".to_string(),
                port: "443".to_string(),
                isp: String::new(),
                is_server_free: true,
            },
        )
    }

    fn transport(client: &MockHttpClient) -> HttpTelemetryTransport {
        let config = TelemetryConfig {
            base_url: "https://api.test".to_string(),
            ..TelemetryConfig::default()
        };
        HttpTelemetryTransport::new(Arc::new(client.clone()), &config)
    }

    #[tokio::test]
    async fn test_send_event_posts_payload() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Success(Response::new(200, Bytes::new())));

        transport(&client).send_event(&event()).await.unwrap();

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://api.test/data/v1/stats");
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["Event"], "vpn_disconnection");
        assert_eq!(body["Values"]["session_length"], 5000);
        assert_eq!(body["Dimensions"]["outcome"], "aborted");
        assert!(body["Dimensions"].get("vpn_trigger").is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Success(Response::new(
            422,
            Bytes::from("bad dimension"),
        )));

        let err = transport(&client).send_event(&event()).await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 422, .. }));
    }

    #[tokio::test]
    async fn test_http_error_is_propagated() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));

        let err = transport(&client).send_event(&event()).await.unwrap_err();
        assert!(matches!(err, TransportError::Http(HttpError::ConnectionFailed(_))));
    }

    #[test]
    fn test_flush_without_runtime_drops_event() {
        let client = MockHttpClient::new();
        transport(&client).flush_event(event());
        assert!(client.get_requests().is_empty());
    }
}
