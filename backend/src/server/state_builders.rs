//! Wiring of driving ports onto a storage backend.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use studyquest::domain::ports::{ExerciseRepository, SectionRepository, UserRepository};
use studyquest::domain::{SectionComponentService, UserProgressService};
use studyquest::inbound::http::state::HttpState;
use studyquest::outbound::memory::InMemoryLearningStore;
use studyquest::outbound::persistence::{
    DbPool, DieselExerciseRepository, DieselSectionRepository, DieselUserRepository,
};

use super::ServerConfig;

fn wire<U, S, E>(users: Arc<U>, sections: Arc<S>, exercises: Arc<E>) -> HttpState
where
    U: UserRepository + 'static,
    S: SectionRepository + 'static,
    E: ExerciseRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let progress = Arc::new(UserProgressService::new(users));
    let curriculum = Arc::new(SectionComponentService::new(sections, exercises, clock));
    HttpState::new(
        progress.clone(),
        progress,
        curriculum.clone(),
        curriculum.clone(),
        curriculum,
    )
}

fn diesel_state(pool: &DbPool) -> HttpState {
    wire(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselSectionRepository::new(pool.clone())),
        Arc::new(DieselExerciseRepository::new(pool.clone())),
    )
}

fn memory_state() -> HttpState {
    let store = Arc::new(InMemoryLearningStore::new());
    wire(store.clone(), store.clone(), store)
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a process-local store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => diesel_state(pool),
        None => {
            info!("no database configured; using the in-memory store");
            memory_state()
        }
    };
    web::Data::new(state)
}
