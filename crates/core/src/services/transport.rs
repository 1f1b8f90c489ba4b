use crate::error::{HarvestError, HarvestResult};

/// Status and body of a completed HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// Only a plain `200 OK` counts; `204`/`206` and friends carry no usable body.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Blocking GET-only HTTP seam.
///
/// A non-success status is a normal response, not an error; only failures to
/// obtain any response surface as [`HarvestError::Transport`].
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> HarvestResult<HttpResponse>;
}

/// `reqwest` blocking client with the library's default timeouts and no retries.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> HarvestResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|e| HarvestError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> HarvestResult<HttpResponse> {
        let transport_err =
            |e: reqwest::Error| HarvestError::Transport { url: url.to_string(), message: e.to_string() };

        let response = self.client.get(url).send().map_err(transport_err)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(transport_err)?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
