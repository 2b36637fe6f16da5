use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use review::{Identity, Verifier, VerifyError};

/// Verifies tokens against an external auth service.
///
/// The token is forwarded as a bearer token to `GET <url>`, which answers
/// with the `{id, name}` of its owner. 401 and 403 mean the token is invalid.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    url: String,
    client: Client,
}

impl HttpVerifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn verify(&self, token: &'_ str) -> Result<Option<Identity>, VerifyError> {
        let resp = self
            .client
            .get(&self.url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let identity = resp
                    .json::<Identity>()
                    .await
                    .map_err(anyhow::Error::from)?;

                Ok(Some(identity))
            }
            status => Err(anyhow::anyhow!("auth service responded with {status}").into()),
        }
    }
}
