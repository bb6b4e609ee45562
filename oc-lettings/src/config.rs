//! Runtime settings.
//!
//! Values are layered: built-in defaults, then `Rocket.toml` and `ROCKET_*`
//! variables, then `DATABASE_URL` (also read from `.env`).

use rocket::figment::{providers::Serialized, Figment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    /// Mounts the `/admin/` pages.
    pub admin_enabled: bool,
    /// Mounts `/sentry-debug/`, which always fails with a 500.
    pub debug_error_route: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite:oc-lettings.sqlite3?mode=rwc".to_string(),
            max_connections: 5,
            admin_enabled: true,
            debug_error_route: false,
        }
    }
}

impl Settings {
    pub fn figment() -> Figment {
        dotenv::dotenv().ok();
        let figment = rocket::Config::figment().join(Serialized::defaults(Settings::default()));
        match std::env::var("DATABASE_URL") {
            Ok(url) => figment.merge(("database_url", url)),
            Err(_) => figment,
        }
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, rocket::figment::Error> {
        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(("admin_enabled", false));
        let settings = Settings::from_figment(&figment).unwrap();
        assert!(!settings.admin_enabled);
        assert!(!settings.debug_error_route);
        assert_eq!(settings.max_connections, 5);
    }
}
