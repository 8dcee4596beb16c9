use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::{
    engine::{RetryPolicy, SessionConfig},
    entities::Coordinate,
    error::{config_error, Error},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub bind: SocketAddr,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub pickup: Coordinate,
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
    pub app_name: String,
}

impl Config {
    /// Reads the environment, after loading a `.env` file if there is one.
    pub fn from_env() -> Result<Self, Error> {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!("no .env file loaded: {:?}", err);
        }

        let bind = optional("HACKNEY_BIND")
            .unwrap_or_else(|| "127.0.0.1:3000".into())
            .parse()
            .map_err(|_| config_error("HACKNEY_BIND is not a socket address"))?;

        let pickup = Coordinate::parse(&env::var("HACKNEY_PICKUP")?)
            .map_err(|_| config_error("HACKNEY_PICKUP must be `latitude,longitude`"))?;

        Ok(Self {
            bind,
            database_url: optional("DATABASE_URL"),
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,
            google_maps_api_base: optional("GOOGLE_MAPS_API_BASE")
                .unwrap_or_else(|| "maps.googleapis.com".into()),
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")?,
            pickup,
            retry_attempts: parsed("HACKNEY_RETRY_ATTEMPTS", 3)?,
            retry_backoff: Duration::from_millis(parsed("HACKNEY_RETRY_BACKOFF_MS", 100)?),
            app_name: optional("HACKNEY_APP_NAME").unwrap_or_else(|| "UberClone".into()),
        })
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            app_name: self.app_name.clone(),
            retry: RetryPolicy::new(self.retry_attempts, self.retry_backoff),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, Error> {
    match optional(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| config_error(format!("{} is not valid", key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_numbers_fall_back_to_defaults() {
        assert_eq!(parsed::<u32>("HACKNEY_TEST_UNSET_NUMBER", 7).unwrap(), 7);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        env::set_var("HACKNEY_TEST_BAD_NUMBER", "three");
        assert_eq!(parsed::<u32>("HACKNEY_TEST_BAD_NUMBER", 3).unwrap_err().code, 1);
        env::remove_var("HACKNEY_TEST_BAD_NUMBER");
    }
}
