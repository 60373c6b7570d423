//! The `videos` table and `video_format` type, and helpers creating them.

use tracing::info;

use crate::core::{CqlError, DataType, UserType};
use crate::query::{self, Statement};
use crate::session::Session;

pub const KEYSPACE_NAME: &str = "killrvideo";

pub const VIDEO_TABLENAME: &str = "videos";
pub const VIDEO_VIDEOID: &str = "videoid";
pub const VIDEO_TITLE: &str = "title";
pub const VIDEO_UPLOAD: &str = "upload";
pub const VIDEO_USER_EMAIL: &str = "email";
pub const VIDEO_URL: &str = "url";
pub const VIDEO_TAGS: &str = "tags";
pub const VIDEO_FRAMES: &str = "frames";
pub const VIDEO_FORMAT: &str = "formats";

pub const UDT_VIDEO_FORMAT_NAME: &str = "video_format";
pub const UDT_VIDEO_FORMAT_WIDTH: &str = "width";
pub const UDT_VIDEO_FORMAT_HEIGHT: &str = "height";

pub fn video_format_type() -> UserType {
    UserType::new(UDT_VIDEO_FORMAT_NAME)
        .field(UDT_VIDEO_FORMAT_WIDTH, DataType::Int)
        .field(UDT_VIDEO_FORMAT_HEIGHT, DataType::Int)
}

/// `CREATE TABLE IF NOT EXISTS videos (...)`
pub fn video_table() -> Statement {
    query::create_table(VIDEO_TABLENAME)
        .partition_key(VIDEO_VIDEOID, DataType::Uuid)
        .column(VIDEO_TITLE, DataType::Text)
        .column(VIDEO_UPLOAD, DataType::Timestamp)
        .column(VIDEO_USER_EMAIL, DataType::Text)
        .column(VIDEO_URL, DataType::Text)
        .column(VIDEO_TAGS, DataType::set_of(DataType::Text))
        .column(VIDEO_FRAMES, DataType::list_of(DataType::Int))
        .column(
            VIDEO_FORMAT,
            DataType::map_of(DataType::Text, DataType::udt(UDT_VIDEO_FORMAT_NAME)),
        )
        .build()
}

pub async fn create_keyspace<S: Session>(
    session: &S,
    keyspace: &str,
    replication_factor: u32,
) -> Result<(), CqlError> {
    session
        .execute(&query::create_keyspace(keyspace, replication_factor))
        .await?;
    info!("+ Keyspace '{keyspace}' created (if needed)");
    Ok(())
}

pub async fn create_udt_video_format<S: Session>(session: &S) -> Result<(), CqlError> {
    session
        .execute(&query::create_type(&video_format_type()))
        .await?;
    info!("+ Type '{UDT_VIDEO_FORMAT_NAME}' created (if needed)");
    Ok(())
}

pub async fn create_table_video<S: Session>(session: &S) -> Result<(), CqlError> {
    session.execute(&video_table()).await?;
    info!("+ Table '{VIDEO_TABLENAME}' created (if needed)");
    Ok(())
}

pub async fn truncate_table<S: Session>(session: &S, table: &str) -> Result<(), CqlError> {
    session.execute(&query::truncate(table)).await?;
    info!("+ Table '{table}' truncated");
    Ok(())
}

/// Creates the keyspace, switches to it, then creates the type and table.
pub async fn create_schema<S: Session>(
    session: &S,
    keyspace: &str,
    replication_factor: u32,
) -> Result<(), CqlError> {
    create_keyspace(session, keyspace, replication_factor).await?;
    session.use_keyspace(keyspace).await?;
    create_udt_video_format(session).await?;
    create_table_video(session).await
}
