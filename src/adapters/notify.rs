use crate::config::NotificationConfig;
use crate::domain::ports::{DeliveryAck, NotificationChannel};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// ntfy 主題推播：`POST {endpoint}/{topic}`，Bearer token，純文字內容
#[derive(Clone)]
pub struct NtfyChannel {
    client: Client,
    topic_url: String,
    token: String,
}

impl NtfyChannel {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            client: Client::new(),
            topic_url: config.topic_url(),
            token: config.token.clone(),
        }
    }

    pub fn topic_url(&self) -> &str {
        &self.topic_url
    }
}

#[async_trait]
impl NotificationChannel for NtfyChannel {
    async fn deliver(&self, message: &str) -> Result<DeliveryAck> {
        tracing::debug!("📣 Posting notification to {}", self.topic_url);

        let response = self
            .client
            .post(&self.topic_url)
            .bearer_auth(&self.token)
            .body(message.to_string())
            .send()
            .await?;

        Ok(DeliveryAck {
            status: response.status().as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(endpoint: String) -> NotificationConfig {
        NotificationConfig {
            endpoint,
            topic: "lunch".to_string(),
            token: "tk_123".to_string(),
            message: None,
        }
    }

    #[tokio::test]
    async fn test_deliver_posts_message_with_bearer_token() {
        let server = MockServer::start();
        let ntfy_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/lunch")
                .header("Authorization", "Bearer tk_123")
                .body("Done. Found 2 menu files.");
            then.status(200);
        });

        let channel = NtfyChannel::new(&config(server.base_url()));
        let ack = channel.deliver("Done. Found 2 menu files.").await.unwrap();

        ntfy_mock.assert();
        assert!(ack.is_success());
    }

    #[tokio::test]
    async fn test_deliver_reports_rejection_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/lunch");
            then.status(403);
        });

        let channel = NtfyChannel::new(&config(server.base_url()));
        let ack = channel.deliver("hello").await.unwrap();

        assert_eq!(ack.status, 403);
        assert!(!ack.is_success());
    }
}
