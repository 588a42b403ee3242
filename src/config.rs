use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub users_collection: String,
    pub posts_collection: String,
}

/// How stored passwords are produced and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Stored and compared verbatim.
    Plain,
    Argon2,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub mongo: MongoConfig,
    pub jwt: JwtConfig,
    pub password_scheme: PasswordScheme,
    pub admin_routes_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required =
            |key: &str| lookup(key).with_context(|| format!("missing environment variable {key}"));

        let users_collection = required("COLLECTION_NAME")?;
        let mongo = MongoConfig {
            uri: required("MONGO_URI")?,
            database: required("DB_NAME")?,
            posts_collection: lookup("POSTS_COLLECTION_NAME")
                .unwrap_or_else(|| users_collection.clone()),
            users_collection,
        };

        let jwt = JwtConfig {
            secret: required("TOKEN_KEY")?,
            ttl_hours: lookup("TOKEN_TTL_HOURS")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(24),
        };

        let password_scheme = match lookup("PASSWORD_SCHEME").as_deref() {
            None | Some("plain") => PasswordScheme::Plain,
            Some("argon2") => PasswordScheme::Argon2,
            Some(other) => anyhow::bail!("unknown PASSWORD_SCHEME {other:?}"),
        };

        let admin_routes_enabled = lookup("ADMIN_ROUTES_ENABLED")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            mongo,
            jwt,
            password_scheme,
            admin_routes_enabled,
        })
    }
}
