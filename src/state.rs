use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::JwtService;
use crate::cache::TrendingCache;
use crate::store::EventStore;
use crate::trending::TrendingGate;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub trending: TrendingGate,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn EventStore>,
        cache: Arc<dyn TrendingCache>,
        jwt: JwtService,
    ) -> Self {
        let trending = TrendingGate::new(Arc::clone(&store), cache);
        Self {
            store,
            trending,
            jwt,
        }
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
