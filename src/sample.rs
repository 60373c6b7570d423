//! The scripted walkthrough: one video, then every kind of collection update,
//! logging the state after each step.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::SampleConfig;
use crate::core::CqlError;
use crate::session::Session;
use crate::video::schema::{self, VIDEO_TABLENAME};
use crate::video::{Video, VideoCollections, VideoFormat, VideoRepository};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub label: String,
    pub collections: VideoCollections,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkthroughReport {
    pub videoid: Uuid,
    pub steps: Vec<Step>,
    /// The row as read back at the end.
    pub video: Option<Video>,
}

impl WalkthroughReport {
    pub fn last(&self) -> Option<&VideoCollections> {
        self.steps.last().map(|s| &s.collections)
    }
}

/// The video inserted at the start of the walkthrough.
pub fn sample_video(videoid: Uuid) -> Video {
    let mut video = Video::with_id(videoid);
    video.title = Some(
        "The World’s Largest Apache Cassandra™ NoSQL Event | DataStax Accelerate 2020".to_string(),
    );
    video.url = Some("https://www.youtube.com/watch?v=7afxKEH7t8Q".to_string());
    video.email = Some("clun@sample.com".to_string());
    video.tags.insert("cassandra".to_string());
    video.frames.extend([2, 3, 5, 8, 13, 21]);
    video.tags.insert("accelerate".to_string());
    video.formats.insert("mp4".to_string(), VideoFormat::new(640, 480));
    video.formats.insert("ogg".to_string(), VideoFormat::new(640, 480));
    video
}

struct Recorder<'r, 'a, S: Session> {
    repository: &'r VideoRepository<'a, S>,
    videoid: Uuid,
    steps: Vec<Step>,
}

impl<S: Session> Recorder<'_, '_, S> {
    async fn record(&mut self, label: &str) -> Result<(), CqlError> {
        let collections = self.repository.read_collections(self.videoid).await?;
        info!(
            "+ {label}: tags {:?}, formats {:?}, frames {:?}",
            collections.tags, collections.formats, collections.frames
        );
        self.steps.push(Step {
            label: label.to_string(),
            collections,
        });
        Ok(())
    }
}

pub async fn run<S: Session>(
    session: &S,
    config: &SampleConfig,
) -> Result<WalkthroughReport, CqlError> {
    schema::create_schema(session, &config.keyspace, config.replication_factor).await?;
    if config.truncate {
        schema::truncate_table(session, VIDEO_TABLENAME).await?;
    }

    let repository = VideoRepository::prepare(session).await?;
    info!("[OK] Statements prepared");

    // ========= CREATE ============
    let videoid = Uuid::new_v4();
    repository.create_video(&sample_video(videoid)).await?;
    info!("+ Video '{videoid}' created");

    let mut recorder = Recorder {
        repository: &repository,
        videoid,
        steps: Vec::new(),
    };
    recorder.record("Created").await?;

    // Operations on SET (add/remove)
    repository.add_tag(videoid, "OK").await?;
    recorder.record("Tags after adding 'OK'").await?;
    repository.remove_tag(videoid, "accelerate").await?;
    recorder.record("Tags after removing 'accelerate'").await?;

    // Operations on MAP (put/remove)
    repository
        .add_format(videoid, "hd", VideoFormat::new(1920, 1080))
        .await?;
    recorder.record("Formats after adding 'hd'").await?;
    repository.remove_format(videoid, "ogg").await?;
    recorder.record("Formats after removing 'ogg'").await?;
    let decoded = repository.list_formats_with_codec(videoid).await?;
    info!("+ Formats read through the codec {decoded:?}");

    // Operations on LIST (replace all, append, replace one)
    repository.replace_frames(videoid, &[1, 2, 3]).await?;
    recorder.record("Frames after update all").await?;
    repository.append_frame(videoid, 4).await?;
    recorder.record("Frames after append 4").await?;
    repository.update_frame(videoid, 1, 128).await?;
    recorder.record("Frames after changing idx=1 per 128").await?;

    let steps = recorder.steps;
    let video = repository.find_video(videoid).await?;
    Ok(WalkthroughReport {
        videoid,
        steps,
        video,
    })
}
