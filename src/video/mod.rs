//! The `videos` domain: schema, DTOs, the `video_format` codec and the
//! repository running collection operations.

pub mod schema;
pub mod dto;
pub mod codec;
pub mod repository;

pub use codec::UdtCodec;
pub use dto::{Video, VideoCollections, VideoFormat};
pub use repository::VideoRepository;
