use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{verifier_for, CredentialVerifier};
use crate::config::AppConfig;
use crate::storage::{mongo::MongoStore, DocumentStore};

/// Process-scoped dependencies, read-only once built.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(MongoStore::connect(&config.mongo).await?) as Arc<dyn DocumentStore>;
        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn DocumentStore>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            keys: JwtKeys::new(&config.jwt),
            credentials: verifier_for(config.password_scheme),
            config,
        }
    }

    #[cfg(test)]
    pub fn fake_with(
        store: Arc<crate::storage::memory::MemoryStore>,
        password_scheme: crate::config::PasswordScheme,
        admin_routes_enabled: bool,
    ) -> Self {
        use crate::config::{JwtConfig, MongoConfig};

        let config = Arc::new(AppConfig {
            mongo: MongoConfig {
                uri: "mongodb://localhost:27017".into(),
                database: "test".into(),
                users_collection: "users".into(),
                posts_collection: "users".into(),
            },
            jwt: JwtConfig {
                secret: "test".into(),
                ttl_hours: 24,
            },
            password_scheme,
            admin_routes_enabled,
        });
        Self::from_parts(store, config)
    }
}
