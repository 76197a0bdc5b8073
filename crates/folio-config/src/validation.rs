//! Configuration validation.
//!
//! Collects every problem in one pass so a misconfigured deployment reports
//! all of them at once.

use crate::AppConfig;
use std::fmt::Write as _;
use thiserror::Error;
use url::Url;

/// One problem found in an [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("database pool min_connections ({min}) exceeds max_connections ({max})")]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("pool size {value} is above the ceiling of {maximum}")]
    PoolSizeTooLarge { value: u32, maximum: u32 },

    /// `url_type` is `database` or `redis`.
    #[error("{url_type} URL rejected: {message}")]
    InvalidUrl { url_type: String, message: String },

    /// A timeout or TTL set to zero seconds.
    #[error("'{name}' must be at least one second")]
    ZeroDuration { name: String },

    #[error("'{name}' is {value}, expected 1..={maximum}")]
    InvalidPageSize { name: String, value: u32, maximum: u32 },

    #[error("log level '{value}' is not one of trace, debug, info, warn, error, off")]
    InvalidLogLevel { value: String },
}

/// Checks an [`AppConfig`] before anything connects with it.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Hard ceiling for any page size setting.
    const MAX_PAGE_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] =
        &["trace", "debug", "info", "warn", "error", "off"];

    /// Validates the entire application configuration.
    ///
    /// # Errors
    ///
    /// Returns every validation error found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_database(&config.database, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_pagination(&config.pagination, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        match Url::parse(&config.url) {
            Ok(url) if url.scheme() == "mysql" => {}
            Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: format!("unsupported scheme '{}', expected mysql://", url.scheme()),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: e.to_string(),
            }),
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::ZeroDuration {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::ZeroDuration {
                name: "database.idle_timeout_secs".to_string(),
            });
        }
    }

    fn validate_redis(config: &crate::RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        match Url::parse(&config.url) {
            Ok(url) if url.scheme() == "redis" || url.scheme() == "rediss" => {}
            Ok(_) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: e.to_string(),
            }),
        }

        if config.pool_size > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
        if config.default_ttl_secs == 0 {
            errors.push(ConfigValidationError::ZeroDuration {
                name: "redis.default_ttl_secs".to_string(),
            });
        }
    }

    fn validate_pagination(
        config: &crate::PaginationConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let mut check = |name: &str, value: u32, maximum: u32| {
            if value == 0 || value > maximum {
                errors.push(ConfigValidationError::InvalidPageSize {
                    name: name.to_string(),
                    value,
                    maximum,
                });
            }
        };

        check("pagination.max_page_size", config.max_page_size, Self::MAX_PAGE_SIZE);
        check(
            "pagination.default_page_size",
            config.default_page_size,
            config.max_page_size,
        );
        check(
            "pagination.max_keyset_limit",
            config.max_keyset_limit,
            Self::MAX_PAGE_SIZE,
        );
        check(
            "pagination.default_keyset_limit",
            config.default_keyset_limit,
            config.max_keyset_limit,
        );
    }

    fn validate_observability(
        config: &crate::ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        // Directives look like `info` or `info,folio=debug,sqlx=warn`.
        let valid = config.log_level.split(',').all(|directive| {
            let level = directive
                .rsplit_once('=')
                .map_or(directive, |(_, level)| level)
                .trim()
                .to_lowercase();
            Self::VALID_LOG_LEVELS.contains(&level.as_str())
        });

        if !valid {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}

/// Renders a numbered list for the startup error message.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    errors.iter().enumerate().fold(
        String::from("Configuration validation failed:\n"),
        |mut output, (i, error)| {
            let _ = writeln!(output, "  {}. {error}", i + 1);
            output
        },
    )
}
