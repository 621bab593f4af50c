//! File service contract.
//!
//! The backend answers stat and read requests; streaming media is fetched
//! by the media element directly from [`stream_url`], never through here.

use async_trait::async_trait;

use crate::error::FileServiceError;
use crate::types::{FileInfo, FullFile};

#[async_trait(?Send)]
pub trait FileService {
    /// `StatFile(path)`.
    async fn stat_file(&self, path: &str) -> Result<FileInfo, FileServiceError>;

    /// `ReadFile(path)`. The payload comes back base64-encoded.
    async fn read_file(&self, path: &str) -> Result<FullFile, FileServiceError>;
}

/// Direct byte-stream URL for a path: `<backend>/stream-file?path=<encoded>`.
pub fn stream_url(backend_url: &str, path: &str) -> String {
    format!(
        "{}/stream-file?path={}",
        backend_url.trim_end_matches('/'),
        urlencoding::encode(path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_encodes_path() {
        assert_eq!(
            stream_url("http://127.0.0.1:1719", "/home/me/My Movie.mp4"),
            "http://127.0.0.1:1719/stream-file?path=%2Fhome%2Fme%2FMy%20Movie.mp4"
        );
    }

    #[test]
    fn test_stream_url_tolerates_trailing_slash() {
        assert_eq!(
            stream_url("http://host/", "a&b"),
            "http://host/stream-file?path=a%26b"
        );
    }
}
