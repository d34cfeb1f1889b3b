//! Environment-driven runtime configuration.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::message_sender::SmtpConfig;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    /// Present only when all SMTP variables are set; otherwise sends are
    /// logged instead of delivered.
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("NURSERY_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
            .into();
        let bind_addr = env::var("NURSERY_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("NURSERY_BIND_ADDR must be host:port")?;
        let cors_origin =
            env::var("NURSERY_CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());
        let smtp = smtp_from_env()?;
        Ok(Self {
            data_dir,
            bind_addr,
            cors_origin,
            smtp,
        })
    }
}

fn smtp_from_env() -> Result<Option<SmtpConfig>> {
    let Ok(smtp_server) = env::var("SMTP_SERVER") else {
        return Ok(None);
    };
    let smtp_port = env::var("SMTP_PORT")
        .unwrap_or_else(|_| "587".to_string())
        .parse()
        .context("SMTP_PORT must be a port number")?;
    let username = env::var("SMTP_USERNAME").context("SMTP_USERNAME is required with SMTP_SERVER")?;
    let password = env::var("SMTP_PASSWORD").context("SMTP_PASSWORD is required with SMTP_SERVER")?;
    let from_email = env::var("SMTP_FROM").context("SMTP_FROM is required with SMTP_SERVER")?;
    Ok(Some(SmtpConfig {
        smtp_server,
        smtp_port,
        username,
        password,
        from_email,
    }))
}
