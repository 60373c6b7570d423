mod common;

use std::collections::{BTreeMap, BTreeSet};

use killrvideo_collections::sample::sample_video;
use killrvideo_collections::video::schema::{self, video_format_type};
use killrvideo_collections::{
    CqlError, MemorySession, Session, Value, Video, VideoFormat, VideoRepository,
};
use uuid::Uuid;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_create_and_read_back() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();
    let video = sample_video(id);
    repo.create_video(&video).await.unwrap();

    assert_eq!(repo.list_tags(id).await.unwrap(), set(&["accelerate", "cassandra"]));
    assert_eq!(repo.list_frames(id).await.unwrap(), vec![2, 3, 5, 8, 13, 21]);
    let formats = repo.list_formats(id).await.unwrap();
    assert_eq!(formats.len(), 2);
    assert_eq!(formats["mp4"], VideoFormat::new(640, 480));

    let found = repo.find_video(id).await.unwrap().unwrap();
    assert_eq!(found, video);
}

#[tokio::test]
async fn test_absent_row_reads_empty() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();

    assert!(repo.list_tags(id).await.unwrap().is_empty());
    assert!(repo.list_frames(id).await.unwrap().is_empty());
    assert!(repo.list_formats(id).await.unwrap().is_empty());
    assert!(repo.list_formats_with_codec(id).await.unwrap().is_empty());
    assert!(repo.find_video(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_tags_are_a_set() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();
    repo.create_video(&sample_video(id)).await.unwrap();

    repo.add_tag(id, "OK").await.unwrap();
    repo.add_tag(id, "OK").await.unwrap();
    assert_eq!(repo.list_tags(id).await.unwrap(), set(&["OK", "accelerate", "cassandra"]));

    repo.remove_tag(id, "accelerate").await.unwrap();
    repo.remove_tag(id, "never-there").await.unwrap();
    assert_eq!(repo.list_tags(id).await.unwrap(), set(&["OK", "cassandra"]));
}

#[tokio::test]
async fn test_frames_keep_order() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();
    repo.create_video(&sample_video(id)).await.unwrap();

    repo.replace_frames(id, &[1, 2, 3]).await.unwrap();
    repo.append_frame(id, 4).await.unwrap();
    repo.append_frame(id, 4).await.unwrap();
    repo.prepend_frame(id, 0).await.unwrap();
    assert_eq!(repo.list_frames(id).await.unwrap(), vec![0, 1, 2, 3, 4, 4]);

    repo.update_frame(id, 2, 128).await.unwrap();
    assert_eq!(repo.list_frames(id).await.unwrap(), vec![0, 1, 128, 3, 4, 4]);
}

#[tokio::test]
async fn test_update_frame_out_of_bounds() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();
    repo.create_video(&sample_video(id)).await.unwrap();
    repo.replace_frames(id, &[1, 2, 3]).await.unwrap();

    let err = repo.update_frame(id, 3, 9).await.unwrap_err();
    assert!(matches!(
        &err,
        CqlError::InvalidRequest(msg) if msg == "Invalid index 3 (list size 3)"
    ));
    assert_eq!(repo.list_frames(id).await.unwrap(), vec![1, 2, 3]);

    // No list at all on a fresh row.
    let other = Uuid::new_v4();
    assert!(matches!(
        repo.update_frame(other, 0, 1).await,
        Err(CqlError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_formats_upsert_and_remove() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();
    repo.create_video(&sample_video(id)).await.unwrap();

    repo.add_format(id, "hd", VideoFormat::new(1920, 1080)).await.unwrap();
    repo.add_format(id, "mp4", VideoFormat::new(1280, 720)).await.unwrap();
    repo.remove_format(id, "ogg").await.unwrap();
    repo.remove_format(id, "ogg").await.unwrap();

    let expected = BTreeMap::from([
        ("hd".to_string(), VideoFormat::new(1920, 1080)),
        ("mp4".to_string(), VideoFormat::new(1280, 720)),
    ]);
    assert_eq!(repo.list_formats(id).await.unwrap(), expected);
    assert_eq!(repo.list_formats_with_codec(id).await.unwrap(), expected);

    let raw = repo.list_formats_raw(id).await.unwrap();
    assert_eq!(raw["hd"].type_name, "video_format");
    assert_eq!(raw["hd"].get_int("width").unwrap(), 1920);
}

#[tokio::test]
async fn test_create_overwrites_existing_row() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();
    repo.create_video(&sample_video(id)).await.unwrap();
    repo.add_tag(id, "OK").await.unwrap();

    let mut replacement = Video::with_id(id);
    replacement.title = Some("second".to_string());
    replacement.tags.insert("only".to_string());
    repo.create_video(&replacement).await.unwrap();

    let collections = repo.read_collections(id).await.unwrap();
    assert_eq!(collections.tags, set(&["only"]));
    assert!(collections.frames.is_empty());
    assert!(collections.formats.is_empty());
    let found = repo.find_video(id).await.unwrap().unwrap();
    assert_eq!(found.title.as_deref(), Some("second"));
    assert_eq!(found.url, None);
}

#[tokio::test]
async fn test_update_creates_row() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();

    repo.add_tag(id, "orphan").await.unwrap();
    assert_eq!(repo.list_tags(id).await.unwrap(), set(&["orphan"]));

    // Only the tag kept the row alive.
    repo.remove_tag(id, "orphan").await.unwrap();
    assert!(repo.find_video(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_video_format_metadata() {
    let session = common::session_with_schema().await;
    let fetched = session.user_type("video_format").await.unwrap();
    assert_eq!(fetched, video_format_type());
    let names: Vec<&str> = fetched.fields.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["width", "height"]);

    let qualified = session.user_type("killrvideo.video_format").await.unwrap();
    assert_eq!(qualified, fetched);

    assert!(matches!(
        session.user_type("address").await,
        Err(CqlError::TypeNotFound(name)) if name == "killrvideo.address"
    ));
    assert!(matches!(
        MemorySession::new().user_type("video_format").await,
        Err(CqlError::NoKeyspace)
    ));
}

#[tokio::test]
async fn test_prepare_requires_video_format_type() {
    killrvideo_collections::logging::init_test();
    let session = MemorySession::new();
    schema::create_keyspace(&session, schema::KEYSPACE_NAME, 1)
        .await
        .unwrap();
    session.use_keyspace(schema::KEYSPACE_NAME).await.unwrap();

    assert!(matches!(
        VideoRepository::prepare(&session).await,
        Err(CqlError::TypeNotFound(_))
    ));
}

#[tokio::test]
async fn test_format_built_from_metadata_matches_codec() {
    let session = common::session_with_schema().await;
    let repo = VideoRepository::prepare(&session).await.unwrap();
    let id = Uuid::new_v4();
    repo.create_video(&sample_video(id)).await.unwrap();
    repo.add_format(id, "ogg", VideoFormat::new(640, 480)).await.unwrap();

    // The metadata-built value and the codec-encoded one are the same UDT.
    let raw = repo.list_formats_raw(id).await.unwrap();
    assert_eq!(Value::Udt(raw["ogg"].clone()), Value::from(VideoFormat::new(640, 480)));
    assert_eq!(raw["ogg"], raw["mp4"]);
}
