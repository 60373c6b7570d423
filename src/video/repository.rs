use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};
use uuid::Uuid;

use super::dto::{Video, VideoCollections, VideoFormat};
use super::schema::{
    UDT_VIDEO_FORMAT_HEIGHT, UDT_VIDEO_FORMAT_NAME, UDT_VIDEO_FORMAT_WIDTH, VIDEO_FORMAT,
    VIDEO_FRAMES, VIDEO_TABLENAME, VIDEO_TAGS, VIDEO_TITLE, VIDEO_UPLOAD, VIDEO_URL,
    VIDEO_USER_EMAIL, VIDEO_VIDEOID,
};
use crate::core::{CqlError, Row, UdtValue, UserType};
use crate::query::{self, Assignment, bind_marker, named_marker};
use crate::session::{PreparedStatement, Session};

/// Operations on the collection columns of `videos`.
///
/// The insert and the reads are prepared once in [`VideoRepository::prepare`],
/// which also fetches the `video_format` type from the schema metadata.
/// Collection updates are built per call.
pub struct VideoRepository<'a, S: Session> {
    session: &'a S,
    video_format: UserType,
    stmt_create_video: PreparedStatement,
    stmt_read_collections: PreparedStatement,
    stmt_read_video: PreparedStatement,
}

impl<'a, S: Session> VideoRepository<'a, S> {
    pub async fn prepare(session: &'a S) -> Result<Self, CqlError> {
        let video_format = session.user_type(UDT_VIDEO_FORMAT_NAME).await?;
        info!("[OK] UserDefinedType retrieved");
        let stmt_create_video = session
            .prepare(
                query::insert_into(VIDEO_TABLENAME)
                    .value(VIDEO_VIDEOID, named_marker(VIDEO_VIDEOID))
                    .value(VIDEO_TITLE, named_marker(VIDEO_TITLE))
                    .value(VIDEO_USER_EMAIL, named_marker(VIDEO_USER_EMAIL))
                    .value(VIDEO_UPLOAD, named_marker(VIDEO_UPLOAD))
                    .value(VIDEO_URL, named_marker(VIDEO_URL))
                    .value(VIDEO_TAGS, named_marker(VIDEO_TAGS))
                    .value(VIDEO_FRAMES, named_marker(VIDEO_FRAMES))
                    .value(VIDEO_FORMAT, named_marker(VIDEO_FORMAT))
                    .build(),
            )
            .await?;
        let stmt_read_collections = session
            .prepare(
                query::select(VIDEO_TABLENAME)
                    .column(VIDEO_TAGS)
                    .column(VIDEO_FORMAT)
                    .column(VIDEO_FRAMES)
                    .where_eq(VIDEO_VIDEOID, bind_marker())
                    .build(),
            )
            .await?;
        let stmt_read_video = session
            .prepare(
                query::select(VIDEO_TABLENAME)
                    .where_eq(VIDEO_VIDEOID, bind_marker())
                    .build(),
            )
            .await?;
        Ok(Self {
            session,
            video_format,
            stmt_create_video,
            stmt_read_collections,
            stmt_read_video,
        })
    }

    /// Inserts the whole row, replacing any row with the same id. Formats go
    /// through the [`UdtCodec`](super::codec::UdtCodec) of [`VideoFormat`].
    pub async fn create_video(&self, video: &Video) -> Result<(), CqlError> {
        let bound = self
            .stmt_create_video
            .bind()
            .set(VIDEO_VIDEOID, video.videoid)?
            .set(VIDEO_TITLE, video.title.clone())?
            .set(VIDEO_USER_EMAIL, video.email.clone())?
            .set(VIDEO_UPLOAD, video.upload)?
            .set(VIDEO_URL, video.url.clone())?
            .set(VIDEO_TAGS, video.tags.clone())?
            .set(VIDEO_FRAMES, video.frames.clone())?
            .set(VIDEO_FORMAT, video.formats.clone())?;
        self.session.execute_prepared(&bound).await?;
        debug!(videoid = %video.videoid, "video created");
        Ok(())
    }

    // SET

    pub async fn add_tag(&self, videoid: Uuid, tag: &str) -> Result<(), CqlError> {
        self.update(videoid, query::add(VIDEO_TAGS, tag)).await?;
        debug!(%videoid, tag, "tag added");
        Ok(())
    }

    pub async fn remove_tag(&self, videoid: Uuid, tag: &str) -> Result<(), CqlError> {
        self.update(videoid, query::remove(VIDEO_TAGS, tag)).await?;
        debug!(%videoid, tag, "tag removed");
        Ok(())
    }

    // LIST

    pub async fn replace_frames(&self, videoid: Uuid, frames: &[i32]) -> Result<(), CqlError> {
        self.update(videoid, query::set(VIDEO_FRAMES, frames.to_vec()))
            .await?;
        debug!(%videoid, count = frames.len(), "frames replaced");
        Ok(())
    }

    pub async fn append_frame(&self, videoid: Uuid, frame: i32) -> Result<(), CqlError> {
        self.update(videoid, query::append(VIDEO_FRAMES, frame)).await?;
        debug!(%videoid, frame, "frame appended");
        Ok(())
    }

    pub async fn prepend_frame(&self, videoid: Uuid, frame: i32) -> Result<(), CqlError> {
        self.update(videoid, query::prepend(VIDEO_FRAMES, frame)).await?;
        debug!(%videoid, frame, "frame prepended");
        Ok(())
    }

    /// Replaces the frame at `index`. Fails when the index is out of bounds.
    pub async fn update_frame(
        &self,
        videoid: Uuid,
        index: usize,
        frame: i32,
    ) -> Result<(), CqlError> {
        let position = i32::try_from(index)
            .map_err(|_| CqlError::InvalidRequest(format!("Invalid index {index}")))?;
        self.update(videoid, query::set_idx(VIDEO_FRAMES, position, frame))
            .await?;
        debug!(%videoid, index, frame, "frame updated");
        Ok(())
    }

    // MAP of UDT

    /// Puts one format, overwriting the key if present. The value is built
    /// from the type metadata fetched at prepare time.
    pub async fn add_format(
        &self,
        videoid: Uuid,
        key: &str,
        format: VideoFormat,
    ) -> Result<(), CqlError> {
        let value = self
            .video_format
            .new_value()
            .set_int(UDT_VIDEO_FORMAT_WIDTH, format.width)?
            .set_int(UDT_VIDEO_FORMAT_HEIGHT, format.height)?;
        self.update(videoid, query::put(VIDEO_FORMAT, key, value)).await?;
        debug!(%videoid, key, %format, "format added");
        Ok(())
    }

    pub async fn remove_format(&self, videoid: Uuid, key: &str) -> Result<(), CqlError> {
        self.update(videoid, query::remove_key(VIDEO_FORMAT, key))
            .await?;
        debug!(%videoid, key, "format removed");
        Ok(())
    }

    // READ

    pub async fn list_tags(&self, videoid: Uuid) -> Result<BTreeSet<String>, CqlError> {
        match self.read_collections_row(videoid).await? {
            Some(row) => row.get(VIDEO_TAGS),
            None => Ok(BTreeSet::new()),
        }
    }

    pub async fn list_frames(&self, videoid: Uuid) -> Result<Vec<i32>, CqlError> {
        match self.read_collections_row(videoid).await? {
            Some(row) => row.get(VIDEO_FRAMES),
            None => Ok(Vec::new()),
        }
    }

    /// Formats read as raw UDT values and mapped field by field.
    pub async fn list_formats(
        &self,
        videoid: Uuid,
    ) -> Result<BTreeMap<String, VideoFormat>, CqlError> {
        self.list_formats_raw(videoid)
            .await?
            .into_iter()
            .map(|(key, udt)| -> Result<_, CqlError> {
                let format = VideoFormat::new(
                    udt.get_int(UDT_VIDEO_FORMAT_WIDTH)?,
                    udt.get_int(UDT_VIDEO_FORMAT_HEIGHT)?,
                );
                Ok((key, format))
            })
            .collect()
    }

    pub async fn list_formats_raw(
        &self,
        videoid: Uuid,
    ) -> Result<BTreeMap<String, UdtValue>, CqlError> {
        match self.read_collections_row(videoid).await? {
            Some(row) => row.get(VIDEO_FORMAT),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Formats decoded straight through the [`UdtCodec`](super::codec::UdtCodec)
    /// of [`VideoFormat`].
    pub async fn list_formats_with_codec(
        &self,
        videoid: Uuid,
    ) -> Result<BTreeMap<String, VideoFormat>, CqlError> {
        match self.read_collections_row(videoid).await? {
            Some(row) => row.get(VIDEO_FORMAT),
            None => Ok(BTreeMap::new()),
        }
    }

    /// All three collections in one read; empty when the row is absent.
    pub async fn read_collections(&self, videoid: Uuid) -> Result<VideoCollections, CqlError> {
        let Some(row) = self.read_collections_row(videoid).await? else {
            return Ok(VideoCollections::default());
        };
        Ok(VideoCollections {
            tags: row.get(VIDEO_TAGS)?,
            frames: row.get(VIDEO_FRAMES)?,
            formats: row.get(VIDEO_FORMAT)?,
        })
    }

    pub async fn find_video(&self, videoid: Uuid) -> Result<Option<Video>, CqlError> {
        let bound = self.stmt_read_video.bind_values([videoid])?;
        let Some(row) = self.session.execute_prepared(&bound).await?.into_one() else {
            return Ok(None);
        };
        Ok(Some(Video {
            videoid: row.get(VIDEO_VIDEOID)?,
            title: row.get(VIDEO_TITLE)?,
            upload: row.get::<DateTime<Utc>>(VIDEO_UPLOAD)?,
            email: row.get(VIDEO_USER_EMAIL)?,
            url: row.get(VIDEO_URL)?,
            tags: row.get(VIDEO_TAGS)?,
            frames: row.get(VIDEO_FRAMES)?,
            formats: row.get(VIDEO_FORMAT)?,
        }))
    }

    async fn read_collections_row(&self, videoid: Uuid) -> Result<Option<Row>, CqlError> {
        let bound = self.stmt_read_collections.bind_values([videoid])?;
        Ok(self.session.execute_prepared(&bound).await?.into_one())
    }

    async fn update(&self, videoid: Uuid, assignment: Assignment) -> Result<(), CqlError> {
        let statement = query::update(VIDEO_TABLENAME)
            .with(assignment)
            .where_eq(VIDEO_VIDEOID, videoid)
            .build();
        self.session.execute(&statement).await?;
        Ok(())
    }
}
