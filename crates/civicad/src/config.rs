//! Configuration for civicad.
//!
//! The environment is read once at process start into an explicit
//! `Config` that is passed down to the mailer; nothing reads env vars
//! ad hoc after startup.

use civica_common::DEFAULT_TOKEN_TTL_SECS;
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Default directory for file-backend emails
pub const DEFAULT_EMAIL_OUTPUT_DIR: &str = "sent_emails";

/// Development email backend stand-ins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevBackend {
    /// Print the would-be email to stdout
    Console,
    /// Write the would-be email to a file under the output dir
    File,
}

impl DevBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "console" => Some(Self::Console),
            "file" => Some(Self::File),
            "" => None,
            other => {
                warn!("Unknown DEV_EMAIL_BACKEND '{}', ignoring", other);
                None
            }
        }
    }
}

/// Process-wide configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_use_tls: bool,
    /// Falls back to SMTP_USERNAME when SENDER_EMAIL is unset
    pub sender_email: Option<String>,
    pub admin_emails: Vec<String>,
    pub token_ttl_secs: u64,
    pub dev_email_backend: Option<DevBackend>,
    pub email_output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: None,
            smtp_username: None,
            smtp_password: None,
            smtp_use_tls: true,
            sender_email: None,
            admin_emails: Vec::new(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            dev_email_backend: None,
            email_output_dir: PathBuf::from(DEFAULT_EMAIL_OUTPUT_DIR),
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from a variable lookup. Split out from `load`
    /// so tests can inject an environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let smtp_username = non_empty(lookup("SMTP_USERNAME"));
        let sender_email = non_empty(lookup("SENDER_EMAIL")).or_else(|| smtp_username.clone());

        Self {
            smtp_host: non_empty(lookup("SMTP_HOST")),
            smtp_port: non_empty(lookup("SMTP_PORT"))
                .and_then(|s| parse_or_warn::<u16>("SMTP_PORT", &s)),
            smtp_username,
            smtp_password: non_empty(lookup("SMTP_PASSWORD")),
            smtp_use_tls: lookup("SMTP_USE_TLS")
                .map(|s| parse_bool(&s))
                .unwrap_or(true),
            sender_email,
            admin_emails: lookup("ADMIN_EMAILS")
                .map(|s| split_admin_list(&s))
                .unwrap_or_default(),
            token_ttl_secs: non_empty(lookup("TOKEN_TTL_SECONDS"))
                .and_then(|s| parse_or_warn::<u64>("TOKEN_TTL_SECONDS", &s))
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            dev_email_backend: lookup("DEV_EMAIL_BACKEND").and_then(|s| DevBackend::parse(&s)),
            email_output_dir: lookup("EMAIL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EMAIL_OUTPUT_DIR)),
        }
    }

    /// Names of the SMTP variables still missing for a complete setup
    pub fn missing_smtp(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.smtp_host.is_none() {
            missing.push("SMTP_HOST");
        }
        if self.smtp_port.is_none() {
            missing.push("SMTP_PORT");
        }
        if self.smtp_username.is_none() {
            missing.push("SMTP_USERNAME");
        }
        if self.smtp_password.is_none() {
            missing.push("SMTP_PASSWORD");
        }
        if self.sender_email.is_none() {
            missing.push("SENDER_EMAIL");
        }
        missing
    }

    pub fn smtp_complete(&self) -> bool {
        self.missing_smtp().is_empty()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Truthy spellings accepted for boolean variables: 1 / true / yes
fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Unparseable {} value '{}', using default", name, value);
            None
        }
    }
}

fn split_admin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}
