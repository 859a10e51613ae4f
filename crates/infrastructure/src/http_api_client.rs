use grantline_core::{AppError, AppResult};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Authenticated JSON client shared by the HTTP adapters.
#[derive(Clone)]
pub struct HttpApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpApiClient {
    /// Creates a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_token: api_token.into(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) async fn get_json<T>(&self, path: &str, operation: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .get(self.endpoint(path))
            .bearer_auth(self.api_token.as_str())
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("failed to {operation}: {error}")))?;

        let response = ensure_success(response, operation).await?;
        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to parse response body to {operation}: {error}"
            ))
        })
    }

    pub(crate) async fn send_json<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        operation: &str,
    ) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .http_client
            .request(method, self.endpoint(path))
            .bearer_auth(self.api_token.as_str())
            .json(body)
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("failed to {operation}: {error}")))?;

        ensure_success(response, operation).await.map(|_| ())
    }
}

async fn ensure_success(response: Response, operation: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());
    Err(status_error(status, operation, body.as_str()))
}

pub(crate) fn status_error(status: StatusCode, operation: &str, body: &str) -> AppError {
    let message = format!(
        "{operation} returned status {}: {body}",
        status.as_u16()
    );

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    }
}

#[cfg(test)]
mod tests {
    use grantline_core::AppError;
    use reqwest::StatusCode;

    use super::{HttpApiClient, status_error};

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = HttpApiClient::new(reqwest::Client::new(), "http://localhost:8080/", "t");
        assert_eq!(
            client.endpoint("/api/v1/subscription"),
            "http://localhost:8080/api/v1/subscription"
        );
    }

    #[test]
    fn status_codes_map_to_error_categories() {
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "update roles", ""),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, "update roles", ""),
            AppError::Validation(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "update roles", ""),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn status_error_keeps_body_text() {
        let error = status_error(StatusCode::NOT_FOUND, "list roles", "no such project");
        assert_eq!(
            error.to_string(),
            "not found: list roles returned status 404: no such project"
        );
    }
}
