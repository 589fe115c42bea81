//! Builds the HTTP state from settings: store, cache, hasher and gate.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use tracing::{info, warn};

use profile_backend::domain::ports::{SecretHasher, UserCache, UserStore};
use profile_backend::domain::{
    CredentialGate, TokenSecret, UserAccountService, UserOrchestrator,
};
use profile_backend::inbound::http::state::HttpState;
use profile_backend::outbound::cache::{
    CachePoolConfig, DisabledUserCache, RedisPool, RedisUserCache,
};
use profile_backend::outbound::hashing::Argon2SecretHasher;
use profile_backend::outbound::memory::MemoryUserStore;
use profile_backend::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};

use super::config::AppSettings;

/// Resolve the signing secret, generating one only when explicitly allowed.
pub(crate) fn resolve_token_secret(
    configured: Option<&str>,
    allow_ephemeral: bool,
) -> Result<TokenSecret> {
    match configured {
        Some(raw) => TokenSecret::new(raw.as_bytes().to_vec())
            .ok_or_else(|| eyre!("token secret must not be empty")),
        None if allow_ephemeral => {
            warn!("no token secret configured; using an ephemeral secret (tokens die with the process)");
            Ok(TokenSecret::generate())
        }
        None => Err(eyre!(
            "no token secret configured; set PROFILE_TOKEN_SECRET or PROFILE_ALLOW_EPHEMERAL_TOKEN_SECRET"
        )),
    }
}

async fn build_store(settings: &AppSettings) -> Result<Arc<dyn UserStore>> {
    match settings.database_url.as_deref() {
        Some(url) => {
            let config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
            let pool = DbPool::new(config)
                .await
                .wrap_err("building database pool")?;
            info!(max_size = settings.db_max_connections(), "using PostgreSQL user store");
            Ok(Arc::new(DieselUserStore::new(pool)))
        }
        None => {
            warn!("no database configured; users are held in process memory");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

fn build_cache(settings: &AppSettings) -> Result<Arc<dyn UserCache>> {
    match settings.redis_url.as_deref() {
        Some(url) => {
            let config = CachePoolConfig::new(url)
                .with_max_active(settings.cache_max_active())
                .with_min_idle(settings.cache_min_idle)
                .with_idle_timeout(settings.cache_idle_timeout())
                .with_connection_timeout(settings.cache_connection_timeout());
            let pool = RedisPool::new(&config).wrap_err("building Redis pool")?;
            info!(max_active = settings.cache_max_active(), "using Redis user cache");
            Ok(Arc::new(RedisUserCache::new(pool)))
        }
        None => {
            info!("no Redis configured; caching disabled");
            Ok(Arc::new(DisabledUserCache))
        }
    }
}

/// Build every port implementation the handlers need.
///
/// # Errors
/// Fails when a pool cannot be built, the secret is missing, or the read
/// policy name is unknown.
pub async fn build_http_state(settings: &AppSettings) -> Result<HttpState> {
    let secret = resolve_token_secret(
        settings.token_secret.as_deref(),
        settings.allow_ephemeral_token_secret,
    )?;
    info!(fingerprint = %secret.fingerprint(), "token secret loaded");
    let gate = CredentialGate::new(&secret, Arc::new(DefaultClock));

    let policy = settings.read_policy()?;
    let users = UserOrchestrator::new(build_store(settings).await?, build_cache(settings)?)
        .with_read_policy(policy);
    info!(read_policy = %policy, "user orchestrator ready");

    let hasher: Arc<dyn SecretHasher> = Arc::new(Argon2SecretHasher);
    let service = Arc::new(UserAccountService::new(users, hasher));
    Ok(HttpState::new(service.clone(), service, gate)
        .with_request_timeout(settings.request_timeout()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn configured_secret_is_used() {
        let secret = resolve_token_secret(Some("abc"), false).expect("secret");
        let again = resolve_token_secret(Some("abc"), false).expect("secret");
        assert_eq!(secret.fingerprint(), again.fingerprint());
    }

    #[rstest]
    #[case(Some(""), true)]
    #[case(None, false)]
    fn unusable_secret_is_refused(#[case] configured: Option<&str>, #[case] allow: bool) {
        assert!(resolve_token_secret(configured, allow).is_err());
    }

    #[rstest]
    fn ephemeral_secret_requires_opt_in() {
        let first = resolve_token_secret(None, true).expect("ephemeral");
        let second = resolve_token_secret(None, true).expect("ephemeral");
        assert_ne!(first.fingerprint(), second.fingerprint());
    }
}
