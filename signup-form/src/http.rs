use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// A response whose body has been read, whatever its status.
#[derive(Debug, Clone)]
pub struct ReceivedResponse<T> {
    pub status_code: u16,
    pub body: T,
}

impl<T> ReceivedResponse<T> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[async_trait]
pub trait ResponseExt {
    /// Read the JSON body without rejecting non-success statuses, the endpoint
    /// reports its errors in the body of those.
    async fn json_any_status<T: DeserializeOwned + Send>(
        self,
    ) -> Result<ReceivedResponse<T>, Error>
    where
        Self: Sized;
}

#[async_trait]
impl ResponseExt for Response {
    async fn json_any_status<T: DeserializeOwned + Send>(
        self,
    ) -> Result<ReceivedResponse<T>, Error> {
        let status_code = self.status().as_u16();
        let text = self.text().await?;
        let body = serde_json::from_str(&text).map_err(|e| {
            tracing::debug!("undecodable body with status {}: {}", status_code, e);
            Error::Decode(e.to_string())
        })?;
        Ok(ReceivedResponse { status_code, body })
    }
}
