// handlers/cookies.rs - session cookies set by login, refresh and logout

use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::auth::{ACCESS_TOKEN_COOKIE, LOGGED_IN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::config::CookieConfig;

fn session_cookie(
    config: &CookieConfig,
    name: &'static str,
    value: String,
    max_age_minutes: i64,
    http_only: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .domain(config.domain.clone())
        .secure(config.secure)
        .http_only(http_only)
        .max_age(time::Duration::seconds(max_age_minutes * 60))
        .build()
}

pub fn with_access_token(jar: CookieJar, config: &CookieConfig, token: String, max_age_minutes: i64) -> CookieJar {
    jar.add(session_cookie(config, ACCESS_TOKEN_COOKIE, token, max_age_minutes, true))
        .add(session_cookie(config, LOGGED_IN_COOKIE, "true".to_string(), max_age_minutes, false))
}

pub fn with_refresh_token(jar: CookieJar, config: &CookieConfig, token: String, max_age_minutes: i64) -> CookieJar {
    jar.add(session_cookie(config, REFRESH_TOKEN_COOKIE, token, max_age_minutes, true))
}

/// Overwrite all three session cookies with empty, already expired values.
pub fn cleared(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    jar.add(session_cookie(config, ACCESS_TOKEN_COOKIE, String::new(), 0, true))
        .add(session_cookie(config, REFRESH_TOKEN_COOKIE, String::new(), 0, true))
        .add(session_cookie(config, LOGGED_IN_COOKIE, String::new(), 0, false))
}
