use std::collections::{BTreeMap, BTreeSet};

use killrvideo_collections::{MemorySession, SampleConfig, Session, VideoFormat, sample};

#[tokio::test]
async fn test_walkthrough_final_state() {
    killrvideo_collections::logging::init_test();
    let session = MemorySession::new();
    let report = sample::run(&session, &SampleConfig::default()).await.unwrap();

    let last = report.last().unwrap();
    assert_eq!(
        last.tags,
        BTreeSet::from(["OK".to_string(), "cassandra".to_string()])
    );
    assert_eq!(
        last.formats,
        BTreeMap::from([
            ("hd".to_string(), VideoFormat::new(1920, 1080)),
            ("mp4".to_string(), VideoFormat::new(640, 480)),
        ])
    );
    assert_eq!(last.frames, vec![1, 128, 3, 4]);

    let video = report.video.unwrap();
    assert_eq!(video.videoid, report.videoid);
    assert_eq!(video.email.as_deref(), Some("clun@sample.com"));
}

#[tokio::test]
async fn test_walkthrough_steps_in_order() {
    let session = MemorySession::new();
    let report = sample::run(&session, &SampleConfig::default()).await.unwrap();
    let labels: Vec<&str> = report.steps.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Created",
            "Tags after adding 'OK'",
            "Tags after removing 'accelerate'",
            "Formats after adding 'hd'",
            "Formats after removing 'ogg'",
            "Frames after update all",
            "Frames after append 4",
            "Frames after changing idx=1 per 128",
        ]
    );
    assert_eq!(report.steps[0].collections.frames, vec![2, 3, 5, 8, 13, 21]);
    assert_eq!(report.steps[3].collections.formats.len(), 3);
}

#[tokio::test]
async fn test_walkthrough_truncates_between_runs() {
    let session = MemorySession::new();
    let config = SampleConfig::default();
    sample::run(&session, &config).await.unwrap();
    sample::run(&session, &config).await.unwrap();
    let rows = session
        .execute(&killrvideo_collections::query::select("videos").build())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let keep = SampleConfig {
        truncate: false,
        ..SampleConfig::default()
    };
    sample::run(&session, &keep).await.unwrap();
    let rows = session
        .execute(&killrvideo_collections::query::select("videos").build())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}
