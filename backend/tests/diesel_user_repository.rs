//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.

use rstest::{fixture, rstest};
use studyquest::domain::ports::{UserPersistenceError, UserRepository};
use studyquest::domain::{PointsTotal, Progress, User, UserChanges, UserId};
use studyquest::outbound::persistence::DieselUserRepository;

mod support;

use support::embedded_postgres::{MigratedDatabase, migrated_database};
use support::handle_cluster_setup_failure;

struct TestContext {
    database: MigratedDatabase,
    repository: DieselUserRepository,
}

impl TestContext {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.database.runtime.block_on(future)
    }
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match migrated_database() {
        Ok(database) => {
            let repository = DieselUserRepository::new(database.pool.clone());
            Some(TestContext {
                database,
                repository,
            })
        }
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[fixture]
fn ada() -> User {
    User::register(UserId::random(), "Ada", "ada@example.com")
}

#[rstest]
fn changes_are_written_together(repo_context: Option<TestContext>, ada: User) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: changes_are_written_together skipped");
        return;
    };
    context
        .block_on(context.repository.insert(&ada))
        .expect("insert user");

    let progress = Progress::from_total(PointsTotal::new(250).expect("positive"));
    let changes = UserChanges {
        name: Some("Ada L.".to_owned()),
        email: None,
        progress: Some(progress),
    };
    let updated = context
        .block_on(context.repository.apply_changes(ada.id(), &changes))
        .expect("apply changes")
        .expect("user exists");
    assert_eq!(updated.name(), "Ada L.");
    assert_eq!(updated.email(), "ada@example.com");
    assert_eq!(updated.progress(), progress);

    let stored = context
        .block_on(context.repository.find_by_id(ada.id()))
        .expect("find user");
    assert_eq!(stored, Some(updated));
}

#[rstest]
fn duplicate_email_is_reported(repo_context: Option<TestContext>, ada: User) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_email_is_reported skipped");
        return;
    };
    context
        .block_on(context.repository.insert(&ada))
        .expect("insert user");

    let twin = User::register(UserId::random(), "Augusta", "ada@example.com");
    let error = context
        .block_on(context.repository.insert(&twin))
        .expect_err("email is taken");
    assert!(
        matches!(error, UserPersistenceError::DuplicateEmail { ref email, .. } if email == "ada@example.com"),
        "unexpected error: {error:?}"
    );
}

#[rstest]
fn unknown_user_is_not_updated(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_user_is_not_updated skipped");
        return;
    };
    let changes = UserChanges {
        name: Some("Nobody".to_owned()),
        ..UserChanges::default()
    };
    let updated = context
        .block_on(
            context
                .repository
                .apply_changes(&UserId::random(), &changes),
        )
        .expect("apply changes");
    assert_eq!(updated, None);
}
