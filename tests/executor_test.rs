mod common;

use std::collections::BTreeSet;

use killrvideo_collections::query::{
    add_all, append_all, bind_marker, create_keyspace, create_table, insert_into, named_marker,
    prepend_all, put, put_all, remove_all, select, set, truncate, update,
};
use killrvideo_collections::video::schema::{VIDEO_TABLENAME, video_table};
use killrvideo_collections::{CqlError, DataType, MemorySession, Session, Value};
use uuid::Uuid;

#[tokio::test]
async fn test_unqualified_names_need_a_keyspace() {
    let session = MemorySession::new();
    let err = session.execute(&truncate("videos")).await.unwrap_err();
    assert!(matches!(err, CqlError::NoKeyspace));

    assert!(matches!(
        session.use_keyspace("killrvideo").await,
        Err(CqlError::KeyspaceNotFound(_))
    ));
}

#[tokio::test]
async fn test_ddl_if_not_exists_and_duplicates() {
    let session = common::session_with_schema().await;
    // IF NOT EXISTS is a no-op the second time.
    session.execute(&video_table()).await.unwrap();

    let plain = killrvideo_collections::Statement::CreateKeyspace {
        name: "killrvideo".to_string(),
        replication_factor: 1,
        if_not_exists: false,
    };
    assert!(matches!(session.execute(&plain).await, Err(CqlError::AlreadyExists(_))));

    let unknown_type = create_table("broken")
        .partition_key("id", DataType::Int)
        .column("f", DataType::udt("missing"))
        .build();
    assert!(matches!(
        session.execute(&unknown_type).await,
        Err(CqlError::TypeNotFound(_))
    ));

    session.execute(&create_keyspace("other", 3)).await.unwrap();
    assert_eq!(session.current_keyspace().as_deref(), Some("killrvideo"));
}

#[tokio::test]
async fn test_qualified_table_names() {
    let session = common::session_with_schema().await;
    let id = Uuid::new_v4();
    common::execute(
        &session,
        insert_into("killrvideo.videos")
            .value("videoid", id)
            .value("title", "qualified"),
    )
    .await;
    let rows = session
        .execute(&select(VIDEO_TABLENAME).column("title").where_eq("videoid", id).build())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.one().unwrap().get::<String>("title").unwrap(), "qualified");
}

#[tokio::test]
async fn test_type_checking() {
    let session = common::session_with_schema().await;
    let id = Uuid::new_v4();

    let wrong_element = update(VIDEO_TABLENAME)
        .with(set("frames", vec!["a", "b"]))
        .where_eq("videoid", id)
        .build();
    assert!(matches!(
        session.execute(&wrong_element).await,
        Err(CqlError::TypeMismatch { .. })
    ));

    let wrong_udt = update(VIDEO_TABLENAME)
        .with(put("formats", "hd", 42))
        .where_eq("videoid", id)
        .build();
    assert!(session.execute(&wrong_udt).await.is_err());

    let unknown_column = insert_into(VIDEO_TABLENAME)
        .value("videoid", id)
        .value("rating", 5)
        .build();
    assert!(matches!(
        session.execute(&unknown_column).await,
        Err(CqlError::ColumnNotFound(_))
    ));

    let missing_key = insert_into(VIDEO_TABLENAME).value("title", "no key").build();
    assert!(matches!(
        session.execute(&missing_key).await,
        Err(CqlError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_collection_arithmetic() {
    let session = common::session_with_schema().await;
    let id = Uuid::new_v4();
    common::execute(&session, insert_into(VIDEO_TABLENAME).value("videoid", id)).await;

    let tags: BTreeSet<&str> = ["a", "b", "c"].into_iter().collect();
    common::execute(
        &session,
        update(VIDEO_TABLENAME)
            .with(add_all("tags", tags))
            .with(append_all("frames", vec![1, 2, 1, 3]))
            .where_eq("videoid", id),
    )
    .await;
    common::execute(
        &session,
        update(VIDEO_TABLENAME)
            .with(remove_all("tags", BTreeSet::from(["a", "z"])))
            .with(remove_all("frames", vec![1]))
            .with(prepend_all("frames", vec![7, 8]))
            .where_eq("videoid", id),
    )
    .await;

    let row = session
        .execute(&select(VIDEO_TABLENAME).where_eq("videoid", id).build())
        .await
        .unwrap()
        .into_one()
        .unwrap();
    assert_eq!(
        row.get::<BTreeSet<String>>("tags").unwrap(),
        BTreeSet::from(["b".to_string(), "c".to_string()])
    );
    // Assignments apply in order: remove the 1s, then prepend.
    assert_eq!(row.get::<Vec<i32>>("frames").unwrap(), vec![7, 8, 2, 3]);
}

#[tokio::test]
async fn test_emptied_collection_reads_null() {
    let session = common::session_with_schema().await;
    let id = Uuid::new_v4();
    common::execute(
        &session,
        insert_into(VIDEO_TABLENAME)
            .value("videoid", id)
            .value("tags", BTreeSet::from(["only"])),
    )
    .await;
    common::execute(
        &session,
        update(VIDEO_TABLENAME)
            .with(killrvideo_collections::query::remove("tags", "only"))
            .where_eq("videoid", id),
    )
    .await;

    let row = session
        .execute(&select(VIDEO_TABLENAME).column("tags").where_eq("videoid", id).build())
        .await
        .unwrap()
        .into_one()
        .unwrap();
    // The inserted row survives with a null cell.
    assert_eq!(row.value("tags").unwrap(), &Value::Null);
}

#[tokio::test]
async fn test_map_merge_and_null_put() {
    let session = common::session_with_schema().await;
    let id = Uuid::new_v4();
    let hd = killrvideo_collections::VideoFormat::new(1920, 1080);
    let sd = killrvideo_collections::VideoFormat::new(640, 480);

    common::execute(
        &session,
        update(VIDEO_TABLENAME)
            .with(put_all(
                "formats",
                std::collections::BTreeMap::from([("hd", hd), ("sd", sd)]),
            ))
            .where_eq("videoid", id),
    )
    .await;
    common::execute(
        &session,
        update(VIDEO_TABLENAME)
            .with(put("formats", "sd", Value::Null))
            .where_eq("videoid", id),
    )
    .await;

    let row = session
        .execute(&select(VIDEO_TABLENAME).column("formats").where_eq("videoid", id).build())
        .await
        .unwrap()
        .into_one()
        .unwrap();
    let formats: std::collections::BTreeMap<String, killrvideo_collections::VideoFormat> =
        row.get("formats").unwrap();
    assert_eq!(formats.len(), 1);
    assert_eq!(formats["hd"], hd);
}

#[tokio::test]
async fn test_where_clause_rules() {
    let session = common::session_with_schema().await;
    let by_title = select(VIDEO_TABLENAME).where_eq("title", "x").build();
    assert!(matches!(
        session.execute(&by_title).await,
        Err(CqlError::InvalidRequest(_))
    ));

    let set_key = update(VIDEO_TABLENAME)
        .with(set("videoid", Uuid::new_v4()))
        .where_eq("videoid", Uuid::new_v4())
        .build();
    assert!(matches!(
        session.execute(&set_key).await,
        Err(CqlError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_prepared_statements() {
    let session = common::session_with_schema().await;
    let insert = session
        .prepare(
            insert_into(VIDEO_TABLENAME)
                .value("videoid", named_marker("id"))
                .value("frames", named_marker("frames"))
                .build(),
        )
        .await
        .unwrap();
    let read = session
        .prepare(
            select(VIDEO_TABLENAME)
                .column("frames")
                .where_eq("videoid", bind_marker())
                .build(),
        )
        .await
        .unwrap();

    let id = Uuid::new_v4();
    let unbound = insert.bind().set("id", id).unwrap();
    assert!(matches!(
        session.execute_prepared(&unbound).await,
        Err(CqlError::UnboundMarker(name)) if name == "frames"
    ));

    let bound = unbound.set("frames", vec![5, 6]).unwrap();
    session.execute_prepared(&bound).await.unwrap();
    let rows = session
        .execute_prepared(&read.bind_values([id]).unwrap())
        .await
        .unwrap();
    assert_eq!(rows.one().unwrap().get::<Vec<i32>>("frames").unwrap(), vec![5, 6]);

    // Executing a statement with markers directly is rejected.
    let raw = select(VIDEO_TABLENAME).where_eq("videoid", bind_marker()).build();
    assert!(matches!(session.execute(&raw).await, Err(CqlError::UnboundMarker(_))));

    // Preparing against a missing table fails early.
    assert!(matches!(
        session.prepare(select("nope").build()).await,
        Err(CqlError::TableNotFound(_))
    ));
}

#[tokio::test]
async fn test_truncate_and_full_scan() {
    let session = common::session_with_schema().await;
    for _ in 0..3 {
        let insert = insert_into(VIDEO_TABLENAME).value("videoid", Uuid::new_v4());
        common::execute(&session, insert).await;
    }
    let all = session.execute(&select(VIDEO_TABLENAME).build()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all.columns.len(), 8);

    session.execute(&truncate(VIDEO_TABLENAME)).await.unwrap();
    let all = session.execute(&select(VIDEO_TABLENAME).build()).await.unwrap();
    assert!(all.is_empty());
}
