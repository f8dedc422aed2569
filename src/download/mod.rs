//! Download management: yt-dlp invocation, metadata and format
//! projection, media fetching, and the metadata cache.

pub mod cache;
pub mod errors;
pub mod fetch;
pub mod formats;
pub mod metadata;
pub mod ytdlp;

pub use errors::DownloadError;
pub use fetch::download_media;
pub use metadata::{fetch_video_info, VideoInfo};
