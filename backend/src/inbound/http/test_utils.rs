//! Helpers shared by handler tests.

use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::test as actix_test;
use mockable::DefaultClock;
use serde_json::Value;

use crate::domain::{SectionComponentService, UserProgressService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryLearningStore;

/// Handler state wired to a fresh in-memory store.
pub(crate) fn in_memory_state() -> HttpState {
    let store = Arc::new(InMemoryLearningStore::new());
    let users = Arc::new(UserProgressService::new(store.clone()));
    let curriculum = Arc::new(SectionComponentService::new(
        store.clone(),
        store,
        Arc::new(DefaultClock),
    ));
    HttpState::new(
        users.clone(),
        users,
        curriculum.clone(),
        curriculum.clone(),
        curriculum,
    )
}

/// Decode a JSON response body; empty bodies become `Value::Null`.
pub(crate) async fn json_body(response: ServiceResponse) -> Value {
    let bytes = actix_test::read_body(response).await;
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("JSON response body")
}
