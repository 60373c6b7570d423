use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// A `video_format` value: frame dimensions of one encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VideoFormat {
    pub width: i32,
    pub height: i32,
}

impl VideoFormat {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One row of `videos`, every column included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub videoid: Uuid,
    pub title: Option<String>,
    pub upload: DateTime<Utc>,
    pub email: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub frames: Vec<i32>,
    #[serde(default)]
    pub formats: BTreeMap<String, VideoFormat>,
}

impl Video {
    /// New video with a random id, uploaded now, no metadata. The upload time
    /// is kept at millisecond precision, the resolution of a CQL timestamp.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(videoid: Uuid) -> Self {
        Self {
            videoid,
            title: None,
            upload: Utc::now().trunc_subsecs(3),
            email: None,
            url: None,
            tags: BTreeSet::new(),
            frames: Vec::new(),
            formats: BTreeMap::new(),
        }
    }
}

impl Default for Video {
    fn default() -> Self {
        Self::new()
    }
}

/// The three collection columns of a video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCollections {
    pub tags: BTreeSet<String>,
    pub frames: Vec<i32>,
    pub formats: BTreeMap<String, VideoFormat>,
}
