use std::env;
use std::time::Duration;

use bella_application::MissingRolePolicy;
use bella_core::AppError;
use bella_domain::{DEFAULT_PAGE_SIZE, ResourceKind};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

/// Where screen data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The salon REST API.
    Http,
    /// Seeded in-process data.
    Memory,
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub api_timeout: Duration,
    pub auth_token: Option<String>,
    pub user_role: Option<String>,
    pub missing_role_policy: MissingRolePolicy,
    pub backend: BackendKind,
    pub resource: ResourceKind,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl ConsoleConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = non_empty("BELLA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        Url::parse(api_url.as_str()).map_err(|error| {
            AppError::Validation(format!("BELLA_API_URL '{api_url}' is not a valid URL: {error}"))
        })?;
        let api_url = api_url.trim_end_matches('/').to_owned();

        let api_timeout_ms = positive(
            "BELLA_API_TIMEOUT_MS",
            non_empty("BELLA_API_TIMEOUT_MS"),
            DEFAULT_API_TIMEOUT_MS,
        )?;

        let missing_role_policy = non_empty("BELLA_MISSING_ROLE_POLICY")
            .map(|value| {
                value.parse::<MissingRolePolicy>().map_err(|error| {
                    AppError::Validation(format!("invalid BELLA_MISSING_ROLE_POLICY: {error}"))
                })
            })
            .transpose()?
            .unwrap_or_default();

        let backend = match non_empty("BELLA_BACKEND")
            .unwrap_or_else(|| "http".to_owned())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "http" => BackendKind::Http,
            "memory" => BackendKind::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "BELLA_BACKEND must be either 'http' or 'memory', got '{other}'"
                )));
            }
        };

        let resource = non_empty("BELLA_RESOURCE")
            .map(|value| {
                value.parse::<ResourceKind>().map_err(|error| {
                    AppError::Validation(format!("invalid BELLA_RESOURCE: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(ResourceKind::Appointments);

        let page = positive("BELLA_PAGE", non_empty("BELLA_PAGE"), 1)?;
        let page_size = positive(
            "BELLA_PAGE_SIZE",
            non_empty("BELLA_PAGE_SIZE"),
            DEFAULT_PAGE_SIZE as u64,
        )?;

        Ok(Self {
            api_url,
            api_timeout: Duration::from_millis(api_timeout_ms),
            auth_token: non_empty("BELLA_AUTH_TOKEN"),
            user_role: non_empty("BELLA_USER_ROLE"),
            missing_role_policy,
            backend,
            resource,
            search: non_empty("BELLA_SEARCH"),
            sort: non_empty("BELLA_SORT"),
            page: usize::try_from(page).unwrap_or(usize::MAX),
            page_size: usize::try_from(page_size).unwrap_or(usize::MAX),
        })
    }
}

fn positive(name: &str, value: Option<String>, default: u64) -> Result<u64, AppError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(AppError::Validation(format!(
            "{name} must be a positive integer, got '{value}'"
        ))),
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

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use bella_application::MissingRolePolicy;
    use bella_core::{AppError, UserRole};
    use bella_domain::ResourceKind;

    use super::{BackendKind, ConsoleConfig};

    fn load(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_target_the_local_api() {
        let config = load(&[]).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_url, "http://localhost:8080/api/v1");
        assert_eq!(config.api_timeout, Duration::from_millis(10_000));
        assert_eq!(config.backend, BackendKind::Http);
        assert_eq!(config.resource, ResourceKind::Appointments);
        assert_eq!(config.missing_role_policy, MissingRolePolicy::Deny);
        assert_eq!((config.page, config.page_size), (1, 10));
        assert_eq!(config.auth_token, None);
    }

    #[test]
    fn explicit_values_are_read() {
        let config = load(&[
            ("BELLA_API_URL", "https://salon.example.com/api/"),
            ("BELLA_BACKEND", "Memory"),
            ("BELLA_RESOURCE", "inventory"),
            ("BELLA_MISSING_ROLE_POLICY", "assume:admin"),
            ("BELLA_AUTH_TOKEN", "jwt"),
            ("BELLA_SEARCH", "  "),
            ("BELLA_SORT", "price"),
            ("BELLA_PAGE", "2"),
            ("BELLA_PAGE_SIZE", "25"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_url, "https://salon.example.com/api");
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.resource, ResourceKind::Inventory);
        assert_eq!(
            config.missing_role_policy,
            MissingRolePolicy::Assume(UserRole::Admin)
        );
        assert_eq!(config.auth_token.as_deref(), Some("jwt"));
        assert_eq!(config.search, None);
        assert_eq!(config.sort.as_deref(), Some("price"));
        assert_eq!((config.page, config.page_size), (2, 25));
    }

    #[test]
    fn invalid_values_name_their_variable() {
        for (name, value) in [
            ("BELLA_API_URL", "not a url"),
            ("BELLA_API_TIMEOUT_MS", "0"),
            ("BELLA_BACKEND", "postgres"),
            ("BELLA_RESOURCE", "invoices"),
            ("BELLA_MISSING_ROLE_POLICY", "allow"),
            ("BELLA_PAGE_SIZE", "-3"),
        ] {
            let error = load(&[(name, value)])
                .err()
                .unwrap_or_else(|| unreachable!());
            assert!(
                matches!(&error, AppError::Validation(message) if message.contains(name)),
                "unexpected error for {name}: {error}"
            );
        }
    }
}
