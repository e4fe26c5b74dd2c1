//! Raw input reader
//!
//! Lists the objects under the source location, skips marker and hidden
//! files, and decodes each remaining file into containers.

use crate::decode::ContainerDecoder;
use crate::error::{Error, Result};
use crate::storage::StorageLocation;
use crate::types::JsonValue;
use object_store::path::{Path as ObjectPath, PathPart};
use tracing::debug;

/// Containers decoded from a single source object
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Printable location of the object
    pub path: String,
    /// Containers held by the object, in file order
    pub containers: Vec<JsonValue>,
}

/// Reader over every listing file in a source location
pub struct ListingSource {
    location: StorageLocation,
    decoder: Box<dyn ContainerDecoder>,
}

impl ListingSource {
    /// Create a new source reader
    pub fn new(location: StorageLocation, decoder: Box<dyn ContainerDecoder>) -> Self {
        Self { location, decoder }
    }

    /// Location this source reads from
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Read and decode every data file
    ///
    /// An empty location yields an empty list. Any unreadable or undecodable
    /// file fails the whole read.
    pub async fn read_all(&self) -> Result<Vec<SourceFile>> {
        let paths = self.location.list().await?;
        let root = ObjectPath::from(self.location.prefix());
        let mut files = Vec::with_capacity(paths.len());

        for path in paths.iter().filter(|p| is_data_file(p, &root)) {
            let file_url = self.location.display(path);
            let bytes = self.location.get(path).await?;
            let body = std::str::from_utf8(&bytes)
                .map_err(|e| Error::decode(format!("{file_url} is not valid UTF-8: {e}")))?;

            let containers = self.decoder.decode(body).map_err(|e| match e {
                Error::Decode { message } => Error::decode(format!("{file_url}: {message}")),
                other => other,
            })?;

            debug!(path = %file_url, containers = containers.len(), "Decoded source file");
            files.push(SourceFile {
                path: file_url,
                containers,
            });
        }

        Ok(files)
    }
}

/// Skip `_SUCCESS`-style markers, dotfiles and anything under `_`/`.` directories
///
/// Only segments below `root` are checked, so the source prefix itself may
/// start with `_`.
fn is_data_file(path: &ObjectPath, root: &ObjectPath) -> bool {
    let hidden = |part: PathPart<'_>| {
        let name = part.as_ref();
        name.starts_with('.') || name.starts_with('_')
    };
    match path.prefix_match(root) {
        Some(mut rest) => !rest.any(hidden),
        None => !path.parts().any(hidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{build_decoder, DecoderFormat};
    use bytes::Bytes;
    use object_store::memory::InMemory;
    use std::sync::Arc;

    fn memory_source(prefix: &str) -> (StorageLocation, ListingSource) {
        let location = StorageLocation::from_store(Arc::new(InMemory::new()), prefix);
        let source = ListingSource::new(location.clone(), build_decoder(DecoderFormat::Auto));
        (location, source)
    }

    #[test]
    fn test_is_data_file() {
        let root = ObjectPath::from("raw");
        assert!(is_data_file(&ObjectPath::from("raw/2023-05-14.json"), &root));
        assert!(is_data_file(&ObjectPath::from("raw/2023/05/a.json"), &root));
        assert!(!is_data_file(&ObjectPath::from("raw/_SUCCESS"), &root));
        assert!(!is_data_file(&ObjectPath::from("raw/.DS_Store"), &root));
        assert!(!is_data_file(&ObjectPath::from("raw/_temporary/0/b.json"), &root));
        assert!(!is_data_file(&ObjectPath::from("raw/.cache/b.json"), &root));
    }

    #[test]
    fn test_is_data_file_underscore_root() {
        let root = ObjectPath::from("_staging/raw");
        assert!(is_data_file(&ObjectPath::from("_staging/raw/a.json"), &root));
        assert!(!is_data_file(&ObjectPath::from("_staging/raw/_SUCCESS"), &root));
    }

    #[tokio::test]
    async fn test_read_all_skips_marker_directories() {
        let (location, source) = memory_source("raw");
        location
            .put("a.json", Bytes::from(r#"{"items": []}"#))
            .await
            .unwrap();
        location
            .put("_temporary/0/b.json", Bytes::from(r#"{"items": []}"#))
            .await
            .unwrap();
        location
            .put(".staging/c.json", Bytes::from("{{{"))
            .await
            .unwrap();

        let files = source.read_all().await.unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["memory://raw/a.json"]);
    }

    #[tokio::test]
    async fn test_read_all_decodes_each_file() {
        let (location, source) = memory_source("raw");
        location
            .put("a.json", Bytes::from(r#"{"items": [{"id": "1"}]}"#))
            .await
            .unwrap();
        location
            .put("b.jsonl", Bytes::from("{\"items\": []}\n{\"items\": []}\n"))
            .await
            .unwrap();
        location.put("_SUCCESS", Bytes::new()).await.unwrap();

        let files = source.read_all().await.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].containers.len(), 1);
        assert_eq!(files[1].containers.len(), 2);
        assert!(files[0].path.ends_with("raw/a.json"));
    }

    #[tokio::test]
    async fn test_read_all_empty_location() {
        let (_, source) = memory_source("raw");
        assert!(source.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_all_bad_file_names_path() {
        let (location, source) = memory_source("raw");
        location.put("bad.json", Bytes::from("{{{")).await.unwrap();

        let err = source.read_all().await.unwrap_err();
        assert!(err.is_input_error());
        assert!(err.to_string().contains("bad.json"));
    }
}
