use crate::error::Error;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub type SharedConfig = Arc<Config>;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.cloudflare.com/client/v4";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 100;

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct Config {
    pub api_token: String,
    pub account_id: String,
    pub zone_id: String,
    pub domain: String,
    #[serde(default = "default_bind_addr")]
    pub api_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_timeout")]
    pub api_timeout: Duration,
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Config {
    /// Load a [`Config`] from a JSON file, or return an Error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the file can't be read, [`Error::InvalidJSON`] if it isn't a
    /// valid config document, and [`Error::MissingConfig`] if a required value is blank.
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.required_values_present()?;
        Ok(conf)
    }

    /// Load a [`Config`] from the process environment.
    ///
    /// Env vars:
    /// - `CF_API_TOKEN`, `CF_ACCOUNT_ID`, `CF_ZONE_ID`, `DOMAIN` \[required\]
    /// - `PORT` (default: 3000)
    /// - `CF_API_BASE_URL` (default: <https://api.cloudflare.com/client/v4>)
    /// - `API_TIMEOUT_SECS` (default: 30)
    /// - `CF_PAGE_SIZE` (default: 100)
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] naming the first absent required variable, or
    /// [`Error::InvalidConfig`] for an unparseable optional one.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a [`Config`] from an arbitrary key lookup using the same variable names as
    /// [`Config::from_env`].
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, Error> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingConfig(name))
        };
        let optional = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_token = required("CF_API_TOKEN")?;
        let account_id = required("CF_ACCOUNT_ID")?;
        let zone_id = required("CF_ZONE_ID")?;
        let domain = required("DOMAIN")?;

        let port = match optional("PORT") {
            Some(raw) => parse_value("PORT", &raw)?,
            None => DEFAULT_PORT,
        };
        let timeout_secs = match optional("API_TIMEOUT_SECS") {
            Some(raw) => parse_value("API_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let page_size = match optional("CF_PAGE_SIZE") {
            Some(raw) => parse_value("CF_PAGE_SIZE", &raw)?,
            None => DEFAULT_PAGE_SIZE,
        };
        let upstream_url = optional("CF_API_BASE_URL").unwrap_or_else(default_upstream_url);

        Ok(Config {
            api_token,
            account_id,
            zone_id,
            domain,
            api_bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            api_timeout: Duration::from_secs(timeout_secs),
            upstream_url,
            page_size,
        })
    }

    /// Collection path for the account's verified destination addresses.
    #[must_use]
    pub fn addresses_path(&self) -> String {
        format!("/accounts/{}/email/routing/addresses", self.account_id)
    }

    #[must_use]
    pub fn address_path(&self, id: &str) -> String {
        format!("{}/{}", self.addresses_path(), urlencoding::encode(id))
    }

    /// Collection path for the zone's routing rules.
    #[must_use]
    pub fn rules_path(&self) -> String {
        format!("/zones/{}/email/routing/rules", self.zone_id)
    }

    #[must_use]
    pub fn rule_path(&self, id: &str) -> String {
        format!("{}/{}", self.rules_path(), urlencoding::encode(id))
    }

    #[must_use]
    pub fn routing_dns_path(&self) -> String {
        format!("/zones/{}/email/routing/dns", self.zone_id)
    }

    fn required_values_present(&self) -> Result<(), Error> {
        let checks = [
            ("CF_API_TOKEN", &self.api_token),
            ("CF_ACCOUNT_ID", &self.account_id),
            ("CF_ZONE_ID", &self.zone_id),
            ("DOMAIN", &self.domain),
        ];
        match checks.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((name, _)) => Err(Error::MissingConfig(*name)),
            None => Ok(()),
        }
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, Error> {
    raw.trim().parse().map_err(|_| Error::InvalidConfig {
        name,
        value: raw.to_string(),
    })
}

// Hand-written so the API token never lands in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("zone_id", &self.zone_id)
            .field("domain", &self.domain)
            .field("api_bind_addr", &self.api_bind_addr)
            .field("api_timeout", &self.api_timeout)
            .field("upstream_url", &self.upstream_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}
