//! View dispatch - which preview to show for a resolved file.
//!
//! Pure functions of (mime type, stat). Precedence, first match wins:
//!
//! 1. pdf / video / audio / image -> streaming view (bytes never decoded)
//! 2. no stat -> not found
//! 3. size over the limit -> too large
//! 4. `text/markdown` -> markdown
//! 5. `text/*` or json/yaml/toml application types -> read-only code
//! 6. `directory` -> directory listing
//! 7. anything else -> unsupported

use crate::types::FileInfo;
use crate::view::{Icon, MediaKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Streaming,
    NotFound,
    TooLarge,
    Markdown,
    Code,
    Directory,
    Unsupported,
}

/// Media element for a streamable mime type.
pub fn media_kind(mime_type: &str) -> Option<MediaKind> {
    if mime_type == "application/pdf" {
        Some(MediaKind::Pdf)
    } else if mime_type.starts_with("video/") {
        Some(MediaKind::Video)
    } else if mime_type.starts_with("audio/") {
        Some(MediaKind::Audio)
    } else if mime_type.starts_with("image/") {
        Some(MediaKind::Image)
    } else {
        None
    }
}

/// Text-like types shown in the code view.
pub fn is_code_mime(mime_type: &str) -> bool {
    mime_type.starts_with("text/")
        || (mime_type.starts_with("application/")
            && (mime_type.contains("json")
                || mime_type.contains("yaml")
                || mime_type.contains("toml")))
}

/// Pick the preview for a file. An absent mime type is passed as `""`.
pub fn dispatch(mime_type: &str, info: Option<&FileInfo>, max_size: u64) -> PreviewKind {
    if media_kind(mime_type).is_some() {
        return PreviewKind::Streaming;
    }
    let Some(info) = info else {
        return PreviewKind::NotFound;
    };
    if info.size > max_size {
        PreviewKind::TooLarge
    } else if mime_type == "text/markdown" {
        PreviewKind::Markdown
    } else if is_code_mime(mime_type) {
        PreviewKind::Code
    } else if mime_type == "directory" {
        PreviewKind::Directory
    } else {
        PreviewKind::Unsupported
    }
}

/// Icon for a file, from its mime type and displayed name.
pub fn icon_for_file(mime_type: &str, file_name: Option<&str>) -> Icon {
    if mime_type == "application/pdf" {
        Icon::FilePdf
    } else if mime_type.starts_with("image/") {
        Icon::Image
    } else if mime_type.starts_with("video/") {
        Icon::Film
    } else if mime_type.starts_with("audio/") {
        Icon::Headphones
    } else if mime_type.starts_with("text/markdown") {
        Icon::FileLines
    } else if is_code_mime(mime_type) {
        Icon::FileCode
    } else if mime_type == "directory" {
        match file_name {
            Some("~") | Some("~/") => Icon::Home,
            _ => Icon::Folder,
        }
    } else {
        Icon::File
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PREVIEW_SIZE;

    fn info(mime: &str, size: u64) -> FileInfo {
        FileInfo::new("/f", mime, size)
    }

    #[test]
    fn test_streaming_types_win_over_everything() {
        for mime in ["application/pdf", "video/mp4", "audio/mpeg", "image/png"] {
            assert_eq!(dispatch(mime, None, MAX_PREVIEW_SIZE), PreviewKind::Streaming);
            assert_eq!(
                dispatch(mime, Some(&info(mime, u64::MAX)), MAX_PREVIEW_SIZE),
                PreviewKind::Streaming,
                "{mime} streams regardless of size"
            );
        }
    }

    #[test]
    fn test_missing_stat_is_not_found() {
        assert_eq!(dispatch("", None, MAX_PREVIEW_SIZE), PreviewKind::NotFound);
    }

    #[test]
    fn test_size_guard_before_content_types() {
        let big = info("text/plain", MAX_PREVIEW_SIZE + 1);
        assert_eq!(
            dispatch("text/plain", Some(&big), MAX_PREVIEW_SIZE),
            PreviewKind::TooLarge
        );
        let exact = info("text/plain", MAX_PREVIEW_SIZE);
        assert_eq!(
            dispatch("text/plain", Some(&exact), MAX_PREVIEW_SIZE),
            PreviewKind::Code
        );
    }

    #[test]
    fn test_text_types() {
        let f = info("x", 10);
        assert_eq!(dispatch("text/markdown", Some(&f), 100), PreviewKind::Markdown);
        assert_eq!(dispatch("text/x-rust", Some(&f), 100), PreviewKind::Code);
        assert_eq!(dispatch("application/json", Some(&f), 100), PreviewKind::Code);
        assert_eq!(dispatch("application/x-yaml", Some(&f), 100), PreviewKind::Code);
        assert_eq!(dispatch("application/toml", Some(&f), 100), PreviewKind::Code);
        assert_eq!(dispatch("directory", Some(&f), 100), PreviewKind::Directory);
        assert_eq!(
            dispatch("application/octet-stream", Some(&f), 100),
            PreviewKind::Unsupported
        );
        assert_eq!(dispatch("", Some(&f), 100), PreviewKind::Unsupported);
    }

    #[test]
    fn test_icons() {
        assert_eq!(icon_for_file("directory", Some("~")), Icon::Home);
        assert_eq!(icon_for_file("directory", Some("~/")), Icon::Home);
        assert_eq!(icon_for_file("directory", Some("/home/me")), Icon::Folder);
        assert_eq!(icon_for_file("application/pdf", None), Icon::FilePdf);
        assert_eq!(icon_for_file("image/gif", None), Icon::Image);
        assert_eq!(icon_for_file("video/webm", None), Icon::Film);
        assert_eq!(icon_for_file("audio/ogg", None), Icon::Headphones);
        assert_eq!(icon_for_file("text/markdown", None), Icon::FileLines);
        assert_eq!(icon_for_file("text/plain", None), Icon::FileCode);
        assert_eq!(icon_for_file("application/json", None), Icon::FileCode);
        assert_eq!(icon_for_file("application/zip", None), Icon::File);
        assert_eq!(icon_for_file("", None), Icon::File);
    }
}
