use url::Url;

use crate::cli::Cli;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Database/retention-policy API of InfluxDB 1.x.
    V1,
    /// Bucket/organization API of InfluxDB 2.x.
    V2,
}

/// When the v2 writer attaches credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum V2AuthRule {
    /// Exactly when a username is given.
    #[default]
    WhenUserSet,
    /// Exactly when no username is given. Older releases behaved this way.
    Inverted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// v1 rule: credentials travel only with a non-empty username.
    pub fn for_v1(&self) -> Option<&Credentials> {
        (!self.username.is_empty()).then_some(self)
    }

    pub fn for_v2(&self, rule: V2AuthRule) -> Option<&Credentials> {
        let attach = match rule {
            V2AuthRule::WhenUserSet => !self.username.is_empty(),
            V2AuthRule::Inverted => self.username.is_empty(),
        };
        attach.then_some(self)
    }
}

/// Everything one run needs, read once from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: Url,
    /// InfluxDB base URL without a trailing slash.
    pub target: String,
    pub protocol: Protocol,
    pub credentials: Credentials,
    pub v2_auth: V2AuthRule,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let source = parse_url("source", &cli.source)?;
        let target = parse_url("url", &cli.url)?;

        Ok(Self {
            source,
            target: target.as_str().trim_end_matches('/').to_string(),
            protocol: if cli.v2 { Protocol::V2 } else { Protocol::V1 },
            credentials: Credentials::new(&cli.user, &cli.password),
            v2_auth: if cli.v2_inverted_auth {
                V2AuthRule::Inverted
            } else {
                V2AuthRule::WhenUserSet
            },
        })
    }
}

fn parse_url(flag: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| Error::Config(format!("--{flag} {value:?}: {e}")))
}
