use anyhow::Result;
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use rocket::data::{ByteUnit, ToByteUnit};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::path::PathBuf;

lazy_static! {
    pub static ref API_UPSTREAM: String = env::var("API_UPSTREAM")
        .unwrap_or_else(|_| "https://maverick-server1.onrender.com/api".to_string());
    pub static ref PY_UPSTREAM: String =
        env::var("PY_UPSTREAM").unwrap_or_else(|_| "http://localhost:5102".to_string());
    pub static ref STATIC_DIR: String =
        env::var("STATIC_DIR").unwrap_or_else(|_| "frontend/dist".to_string());
    pub static ref FRONTEND_ORIGIN: String =
        env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());
    pub static ref BODY_LIMIT_MIB: u64 = env::var("BODY_LIMIT_MIB")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or(100);
}

pub fn init_logger() {
    // Tests build several servers in one process, so a second init is not an error.
    let _ = Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

/// Everything the proxy server needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub api_upstream: String,
    pub py_upstream: String,
    pub static_dir: PathBuf,
    pub frontend_origin: String,
    pub body_limit: ByteUnit,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_upstream: API_UPSTREAM.clone(),
            py_upstream: PY_UPSTREAM.clone(),
            static_dir: PathBuf::from(STATIC_DIR.as_str()),
            frontend_origin: FRONTEND_ORIGIN.clone(),
            body_limit: BODY_LIMIT_MIB.mebibytes(),
        };
        info!(
            "Proxying /api -> {}, /api/py -> {}, static files from {}",
            config.api_upstream,
            config.py_upstream,
            config.static_dir.display()
        );
        config
    }
}

pub fn create_cors(frontend_origin: &str) -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[frontend_origin]))
        .allowed_methods(
            vec![
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Patch,
                Method::Delete,
                Method::Options,
            ]
            .into_iter()
            .map(From::from)
            .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&[
            "Authorization",
            "Accept",
            "Content-Type",
        ]))
        .allow_credentials(true)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_a_single_origin() {
        assert!(create_cors("http://localhost:8080").is_ok());
    }

    #[test]
    fn environment_overrides_are_optional() {
        let config = ProxyConfig::from_env();
        assert!(!config.api_upstream.is_empty());
        assert!(config.body_limit > 0.bytes());
    }
}
