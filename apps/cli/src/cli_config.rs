use std::env;
use std::str::FromStr;
use std::time::Duration;

use grantline_core::{AppError, AppResult, IdentityId, ProjectId};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub project_id: ProjectId,
    pub identity_id: IdentityId,
    pub default_role_slug: String,
    pub http_timeout: Duration,
}

impl CliConfig {
    pub fn load() -> AppResult<Self> {
        let api_base_url = env::var("GRANTLINE_API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_owned());
        let api_base_url = parse_base_url(api_base_url.as_str())?;
        let api_token = required_non_empty_env("GRANTLINE_API_TOKEN")?;
        let project_id = ProjectId::from_str(required_non_empty_env("GRANTLINE_PROJECT_ID")?.as_str())?;
        let identity_id =
            IdentityId::from_str(required_non_empty_env("GRANTLINE_IDENTITY_ID")?.as_str())?;
        let default_role_slug = env::var("GRANTLINE_DEFAULT_ROLE")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "member".to_owned());
        let http_timeout_secs = parse_env_u64("GRANTLINE_HTTP_TIMEOUT_SECS", 15)?;

        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "GRANTLINE_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token,
            project_id,
            identity_id,
            default_role_slug,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_base_url(value: &str) -> AppResult<String> {
    let url = Url::parse(value.trim()).map_err(|error| {
        AppError::Validation(format!("invalid GRANTLINE_API_BASE_URL '{value}': {error}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "GRANTLINE_API_BASE_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_owned())
}

fn required_non_empty_env(name: &str) -> AppResult<String> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
