use lazy_static::lazy_static;
use web_sys::window;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_PREDICTION_SOCKET_URL: &str = "http://localhost:5000";
const DEFAULT_GENERATE_URL: &str = "http://localhost:5102/api/py/generate";
const DEFAULT_APP_NAME: &str = "ISL Learning Platform";

lazy_static! {
    pub static ref API_BASE_URL: String = get_api_base_url();
    pub static ref PREDICTION_SOCKET_URL: String = get_prediction_socket_url();
    pub static ref GENERATE_URL: String = get_generate_url();
}

pub fn get_env_var(key: &str) -> Option<String> {
    let window = window()?;

    // Get the ENV_CONFIG object
    let env_config = js_sys::Reflect::get(&window, &"ENV_CONFIG".into()).ok()?;

    // Check if env_config is undefined
    if env_config.is_undefined() {
        log::warn!("ENV_CONFIG is undefined - environment variables not loaded");
        return None;
    }

    let value = js_sys::Reflect::get(&env_config, &key.into()).ok()?;

    if !value.is_undefined() {
        value.as_string().filter(|v| !v.trim().is_empty())
    } else {
        log::debug!("Environment variable '{}' is undefined", key);
        None
    }
}

pub fn get_api_base_url() -> String {
    get_env_var("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

pub fn get_prediction_socket_url() -> String {
    get_env_var("PREDICTION_SOCKET_URL")
        .unwrap_or_else(|| DEFAULT_PREDICTION_SOCKET_URL.to_string())
}

pub fn get_generate_url() -> String {
    get_env_var("GENERATE_URL").unwrap_or_else(|| DEFAULT_GENERATE_URL.to_string())
}

pub fn get_app_name() -> String {
    get_env_var("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
}

pub fn is_debug_mode() -> bool {
    parse_flag(get_env_var("DEBUG_MODE").as_deref())
}

fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        Some(value) => value.eq_ignore_ascii_case("true") || value == "1",
        None => false,
    }
}
