//! HTTP client implementation for the Chaoxing portal.
//!
//! This module provides a reqwest-based implementation of the
//! [`ChaoxingClient`](crate::ChaoxingClient) trait.

use crate::{ChaoxingClient, ChaoxingError, V2Response};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Desktop browser identity the portal's web endpoints expect.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Base URLs of the three portal hosts a scan talks to.
#[derive(Clone, Debug)]
pub struct Endpoints {
    /// Login handshake host.
    pub passport: String,
    /// Course listing host.
    pub portal: String,
    /// Activity widget and `/v2/apis` host.
    pub mobile: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            passport: "https://passport2.chaoxing.com".into(),
            portal: "http://mooc1-1.chaoxing.com".into(),
            mobile: "https://mobilelearn.chaoxing.com".into(),
        }
    }
}

impl Endpoints {
    /// Point every host at one base URL. Used by tests against a mock server.
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            passport: base.clone(),
            portal: base.clone(),
            mobile: base,
        }
    }
}

/// Client for the Chaoxing portal using reqwest.
///
/// Session cookies issued during [`login`](ChaoxingClient::login) live in the
/// client's cookie store and are shared read-only by every concurrent scan
/// worker.
#[derive(Clone, Debug)]
pub struct ReqwestChaoxingClient {
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl ReqwestChaoxingClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `endpoints` - base URLs of the portal hosts
    /// * `request_timeout` - fixed timeout applied to every request
    pub fn new(endpoints: Endpoints, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .expect("reqwest client build should not fail");
        let endpoints = Endpoints {
            passport: endpoints.passport.trim_end_matches('/').to_string(),
            portal: endpoints.portal.trim_end_matches('/').to_string(),
            mobile: endpoints.mobile.trim_end_matches('/').to_string(),
        };
        Self { endpoints, client }
    }

    /// Execute a request and expect a text response.
    async fn execute_text(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, ChaoxingError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(resp.text().await?)
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ChaoxingError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(resp: reqwest::Response) -> ChaoxingError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        ChaoxingError::UnexpectedResponse(format!("status {status}: {body_snippet}"))
    }
}

#[async_trait]
impl ChaoxingClient for ReqwestChaoxingClient {
    async fn login(&self, phone: &str, password: &SecretString) -> Result<(), ChaoxingError> {
        // Warm-up request so the passport host seeds its pre-login cookies.
        let warmup = format!("{}/login", self.endpoints.passport);
        let _ = self.client.get(&warmup).send().await?;

        #[derive(serde::Deserialize)]
        struct LoginPayload {
            #[serde(default)]
            status: bool,
            #[serde(default)]
            msg2: Option<String>,
        }

        let url = format!("{}/fanyalogin", self.endpoints.passport);
        let form = [
            ("fid", "-1"),
            ("uname", phone),
            ("password", password.expose_secret()),
            ("refer", "https://i.chaoxing.com"),
            ("t", "true"),
        ];
        let payload: LoginPayload = self
            .execute_json(self.client.post(&url).form(&form))
            .await?;
        if !payload.status {
            return Err(ChaoxingError::Auth(
                payload.msg2.unwrap_or_else(|| "未知错误".into()),
            ));
        }
        tracing::debug!("login accepted");
        Ok(())
    }

    async fn course_list_page(&self) -> Result<String, ChaoxingError> {
        let url = format!("{}/visit/courselistdata", self.endpoints.portal);
        let form = [
            ("courseType", "1"),
            ("courseFolderId", "0"),
            ("courseFolderSize", "0"),
        ];
        self.execute_text(self.client.post(&url).form(&form)).await
    }

    async fn activity_page(
        &self,
        course_id: &str,
        class_id: &str,
    ) -> Result<String, ChaoxingError> {
        let url = format!("{}/widget/pcpick/stu/index", self.endpoints.mobile);
        let request = self
            .client
            .get(&url)
            .query(&[("courseId", course_id), ("jclassId", class_id)]);
        self.execute_text(request).await
    }

    async fn answer_result(&self, active_id: &str) -> Result<V2Response, ChaoxingError> {
        let url = format!(
            "{}/v2/apis/studentQuestion/getAnswerResult",
            self.endpoints.mobile
        );
        self.execute_json(self.client.get(&url).query(&[("activeId", active_id)]))
            .await
    }

    async fn sign_state(&self, active_id: &str) -> Result<V2Response, ChaoxingError> {
        let url = format!("{}/v2/apis/sign/signIn", self.endpoints.mobile);
        self.execute_json(self.client.get(&url).query(&[("activeId", active_id)]))
            .await
    }

    async fn active_end_time(&self, active_id: &str) -> Result<V2Response, ChaoxingError> {
        let url = format!("{}/v2/apis/active/getActiveEndtime", self.endpoints.mobile);
        let request = self.client.get(&url).query(&[
            ("DB_STRATEGY", "PRIMARY_KEY"),
            ("STRATEGY_PARA", "activeId"),
            ("activeId", active_id),
        ]);
        self.execute_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_single_trims_trailing_slash() {
        let eps = Endpoints::single("http://localhost:9999/");
        assert_eq!(eps.passport, "http://localhost:9999");
        assert_eq!(eps.portal, "http://localhost:9999");
        assert_eq!(eps.mobile, "http://localhost:9999");
    }

    #[tokio::test]
    async fn client_builds_with_defaults() {
        let client = ReqwestChaoxingClient::new(Endpoints::default(), Duration::from_secs(8));
        let _ = client;
    }
}
