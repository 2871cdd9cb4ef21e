//! Integration tests for `DieselUserStore` against a real PostgreSQL database.
//!
//! Point `TEST_DATABASE_URL` at a disposable database to run them; the
//! migrations under `backend/migrations` are applied once per process. Without
//! the variable every test prints a `SKIP-TEST-CLUSTER` marker and passes.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rstest::{fixture, rstest};
use uuid::Uuid;

use simplecrm::domain::ports::{
    CreateUserCommand, CreateUserRequest, UserCreationError, UserLookupError, UserLookupQuery,
    UserStore, UserStoreError,
};
use simplecrm::domain::{EmailAddress, NewUser, PersonName, UserCreationService, UserId};
use simplecrm::outbound::events::UserCreatedEventChannel;
use simplecrm::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

static MIGRATED: OnceLock<Result<(), String>> = OnceLock::new();

fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-CLUSTER: TEST_DATABASE_URL is not set");
            None
        }
    }
}

fn migrate(url: &str) {
    let outcome = MIGRATED.get_or_init(|| {
        let mut conn = PgConnection::establish(url).map_err(|err| err.to_string())?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| err.to_string())
    });
    if let Err(reason) = outcome {
        panic!("migrations failed: {reason}");
    }
}

async fn store(url: &str) -> DieselUserStore {
    migrate(url);
    let config = PoolConfig::new(url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = DbPool::new(config).await.expect("pool builds");
    DieselUserStore::new(pool)
}

/// Emails are unique per test run so reruns against one database still pass.
#[fixture]
fn email() -> EmailAddress {
    EmailAddress::new(format!("{}@example.com", Uuid::new_v4())).expect("valid email")
}

fn new_user(email: &EmailAddress) -> NewUser {
    NewUser {
        id: UserId::random(),
        first_name: PersonName::first("Grace").expect("first name"),
        last_name: PersonName::last("Hopper").expect("last name"),
        email: email.clone(),
    }
}

#[rstest]
#[tokio::test]
async fn committed_insert_is_visible_to_direct_reads(email: EmailAddress) {
    let Some(url) = database_url() else { return };
    let store = store(&url).await;
    let draft = new_user(&email);

    let mut scope = store.begin().await.expect("begin");
    let inserted = scope.insert_returning(&draft).await.expect("insert");
    scope.commit().await.expect("commit");

    assert_eq!(inserted.id(), &draft.id);
    assert_eq!(inserted.email(), &email);

    let mut conn = store.connect().await.expect("connect");
    let fetched = conn.fetch_by_id(&draft.id).await.expect("fetch");
    assert_eq!(fetched, inserted);
}

#[rstest]
#[tokio::test]
async fn rolled_back_insert_leaves_no_row(email: EmailAddress) {
    let Some(url) = database_url() else { return };
    let store = store(&url).await;
    let draft = new_user(&email);

    let mut scope = store.begin().await.expect("begin");
    scope.insert_returning(&draft).await.expect("insert");
    scope.rollback().await.expect("rollback");

    let mut conn = store.connect().await.expect("connect");
    let result = conn.fetch_by_id(&draft.id).await;
    assert!(matches!(result, Err(UserStoreError::NotFound { .. })));
}

#[rstest]
#[tokio::test]
async fn duplicate_email_is_reported_distinctly(email: EmailAddress) {
    let Some(url) = database_url() else { return };
    let store = store(&url).await;

    let mut first = store.begin().await.expect("begin");
    first
        .insert_returning(&new_user(&email))
        .await
        .expect("first insert");
    first.commit().await.expect("commit");

    let mut second = store.begin().await.expect("begin");
    let result = second.insert_returning(&new_user(&email)).await;
    second.rollback().await.expect("rollback");

    assert_eq!(
        result,
        Err(UserStoreError::DuplicateEmail {
            email: email.as_ref().to_owned()
        })
    );
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let Some(url) = database_url() else { return };
    let store = store(&url).await;

    let mut conn = store.connect().await.expect("connect");
    let id = UserId::new("unknown-id").expect("id");
    let result = conn.fetch_by_id(&id).await;

    assert!(matches!(result, Err(UserStoreError::NotFound { .. })));
}

#[rstest]
#[tokio::test]
async fn service_creates_publishes_and_rejects_duplicates(email: EmailAddress) {
    let Some(url) = database_url() else { return };
    let channel = Arc::new(UserCreatedEventChannel::new(4, Duration::from_millis(100)));
    let service = UserCreationService::new(Arc::new(store(&url).await), Arc::clone(&channel));
    let request = || CreateUserRequest {
        first_name: PersonName::first("Grace").expect("first name"),
        last_name: PersonName::last("Hopper").expect("last name"),
        email: email.clone(),
    };

    let user = service.create_user(request()).await.expect("created");
    assert_eq!(channel.len(), 1);
    assert_eq!(service.fetch_user(user.id()).await.expect("found"), user);

    let duplicate = service.create_user(request()).await;
    assert_eq!(
        duplicate,
        Err(UserCreationError::ConstraintViolation {
            email: email.as_ref().to_owned()
        })
    );
    assert_eq!(channel.len(), 1);

    let missing = UserId::random();
    assert_eq!(
        service.fetch_user(&missing).await,
        Err(UserLookupError::NotFound {
            id: missing.clone()
        })
    );
}
