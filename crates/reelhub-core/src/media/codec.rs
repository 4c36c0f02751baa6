//! Bidirectional mapping between storage paths and public URLs.
//!
//! Public URLs have the layout
//! `{base}/storage/v1/object/public/{bucket}/{path}`.

use super::model::AssetKind;
use crate::error::{ReelhubError, Result};
use reqwest::Url;

const PUBLIC_OBJECT_PREFIX: &str = "storage/v1/object/public";

/// Converts storage paths to public URLs and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrlCodec {
    base: Url,
}

impl PublicUrlCodec {
    /// Creates a codec for the given project base URL.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the URL cannot be parsed or cannot carry
    /// a path (e.g. `mailto:`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ReelhubError::config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ReelhubError::config(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }
        Ok(Self { base })
    }

    /// The project base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn bucket_prefix(&self, kind: AssetKind) -> String {
        format!(
            "{}/{}/{}/",
            self.base.path().trim_end_matches('/'),
            PUBLIC_OBJECT_PREFIX,
            kind.bucket()
        )
    }

    /// Derives the public URL of a stored object.
    pub fn public_url(&self, kind: AssetKind, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base.as_str().trim_end_matches('/'),
            PUBLIC_OBJECT_PREFIX,
            kind.bucket(),
            path
        )
    }

    /// Recovers the storage path from a public URL.
    ///
    /// Returns `None` for anything that is not a public URL of this project
    /// and bucket: unparseable input, a different origin, a different bucket,
    /// an empty path, or a path with percent-escapes (never generated here).
    pub fn resolve_path(&self, kind: AssetKind, public_url: &str) -> Option<String> {
        let url = Url::parse(public_url).ok()?;
        if url.origin() != self.base.origin() {
            return None;
        }
        let prefix = self.bucket_prefix(kind);
        let path = url.path().strip_prefix(prefix.as_str())?;
        if !is_well_formed_path(path) {
            return None;
        }
        Some(path.to_string())
    }
}

/// A path made of non-empty segments of `[A-Za-z0-9._-]`, none of them
/// `.` or `..`.
pub fn is_well_formed_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::model::storage_path;

    fn codec() -> PublicUrlCodec {
        PublicUrlCodec::new("https://project.example.co").unwrap()
    }

    #[test]
    fn test_public_url_layout() {
        let url = codec().public_url(AssetKind::Avatar, "avatars/u-1-a.png");
        assert_eq!(
            url,
            "https://project.example.co/storage/v1/object/public/avatars/avatars/u-1-a.png"
        );
    }

    #[test]
    fn test_round_trip_for_generated_paths() {
        let codec = codec();
        let names = ["a.png", "my photo.jpg", "..", "x/y/z.gif", "ünï.webp", ""];
        for kind in [AssetKind::Avatar, AssetKind::Banner] {
            for (i, name) in names.iter().enumerate() {
                let path = storage_path(kind, "owner-7", 1_700_000_000_000 + i as i64, name);
                assert!(is_well_formed_path(&path), "{path}");
                let url = codec.public_url(kind, &path);
                assert_eq!(codec.resolve_path(kind, &url), Some(path));
            }
        }
    }

    #[test]
    fn test_round_trip_for_unusual_owner_ids() {
        let codec = codec();
        for owner in ["ada@example.com", "team/lead", "", ".hidden", "名前"] {
            let path = storage_path(AssetKind::Avatar, owner, 1_700_000_000_000, "a.png");
            assert!(is_well_formed_path(&path), "{path}");
            let url = codec.public_url(AssetKind::Avatar, &path);
            assert_eq!(codec.resolve_path(AssetKind::Avatar, &url), Some(path));
        }
    }

    #[test]
    fn test_base_with_path_round_trips() {
        let codec = PublicUrlCodec::new("http://localhost:54321/proxy/").unwrap();
        let url = codec.public_url(AssetKind::Banner, "banners/o-1-b.png");
        assert_eq!(
            url,
            "http://localhost:54321/proxy/storage/v1/object/public/banners/banners/o-1-b.png"
        );
        assert_eq!(
            codec.resolve_path(AssetKind::Banner, &url).as_deref(),
            Some("banners/o-1-b.png")
        );
    }

    #[test]
    fn test_malformed_urls_do_not_match() {
        let codec = codec();
        let inputs = [
            "",
            "not a url",
            "https://",
            "https://project.example.co",
            "https://project.example.co/storage/v1/object/public/avatars/",
            "https://project.example.co/storage/v1/object/public/banners/banners/x.png",
            "https://evil.example.com/storage/v1/object/public/avatars/avatars/x.png",
            "https://project.example.co/storage/v1/object/public/avatars/avatars/a%20b.png",
            "https://project.example.co/storage/v1/object/public/avatars/avatars//x.png",
        ];
        for input in inputs {
            assert_eq!(codec.resolve_path(AssetKind::Avatar, input), None, "{input}");
        }
    }

    #[test]
    fn test_query_string_is_ignored() {
        let codec = codec();
        let url = format!(
            "{}?t=123",
            codec.public_url(AssetKind::Avatar, "avatars/o-1-a.png")
        );
        assert_eq!(
            codec.resolve_path(AssetKind::Avatar, &url).as_deref(),
            Some("avatars/o-1-a.png")
        );
    }

    #[test]
    fn test_invalid_base_is_config_error() {
        assert!(PublicUrlCodec::new("::nope").is_err());
        assert!(PublicUrlCodec::new("mailto:someone@example.com").is_err());
    }
}
