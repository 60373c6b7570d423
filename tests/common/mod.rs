use killrvideo_collections::video::schema;
use killrvideo_collections::{MemorySession, Session};

/// A memory session with the `killrvideo` schema created and selected.
pub async fn session_with_schema() -> MemorySession {
    killrvideo_collections::logging::init_test();
    let session = MemorySession::new();
    schema::create_schema(&session, schema::KEYSPACE_NAME, 1)
        .await
        .unwrap();
    session
}

#[allow(dead_code)]
pub async fn execute<S: Session>(
    session: &S,
    statement: impl Into<killrvideo_collections::Statement>,
) {
    session.execute(&statement.into()).await.unwrap();
}
