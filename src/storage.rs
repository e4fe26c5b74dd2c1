//! Object storage locations (S3, R2, GCS, Azure, local)
//!
//! Both ends of the pipeline are opaque URLs. A [`StorageLocation`] resolves
//! one into an `object_store` implementation plus a key prefix inside it.

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;

/// A bucket/container/directory plus a key prefix
#[derive(Debug, Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Key prefix within the bucket/container
    prefix: String,
    /// URL scheme (s3, r2, gs, az, file, memory)
    scheme: String,
    /// Printable root, e.g. `s3://bucket` or a local directory
    root: String,
    /// Set when a local URL points at a single file instead of a directory
    single_file: Option<String>,
}

impl StorageLocation {
    /// Open an existing location for reading
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/`, `./path/` or `file:///path/` - Local directory or file
    pub fn open(url: &str) -> Result<Self> {
        Self::parse(url, false)
    }

    /// Open a location for writing, creating a local directory if needed
    pub fn create(url: &str) -> Result<Self> {
        Self::parse(url, true)
    }

    /// Wrap an existing store, e.g. `object_store::memory::InMemory` in tests
    pub fn from_store(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
            scheme: "memory".to_string(),
            root: "memory:/".to_string(),
            single_file: None,
        }
    }

    fn parse(url: &str, create: bool) -> Result<Self> {
        if let Some(rest) = url.strip_prefix("s3://") {
            Self::parse_s3(rest, false)
        } else if let Some(rest) = url.strip_prefix("r2://") {
            Self::parse_s3(rest, true)
        } else if let Some(rest) = url.strip_prefix("gs://") {
            Self::parse_gcs(rest)
        } else if let Some(rest) = url.strip_prefix("az://") {
            Self::parse_azure(rest)
        } else {
            Self::parse_local(url.strip_prefix("file://").unwrap_or(url), create)
        }
    }

    /// Parse S3 or R2 URL (scheme already stripped)
    fn parse_s3(without_scheme: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, prefix) = split_bucket(without_scheme);
        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket in {scheme} URL")));
        }

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: scheme.to_string(),
            root: format!("{scheme}://{bucket}"),
            single_file: None,
        })
    }

    /// Parse GCS URL (scheme already stripped)
    fn parse_gcs(without_scheme: &str) -> Result<Self> {
        let (bucket, prefix) = split_bucket(without_scheme);
        if bucket.is_empty() {
            return Err(Error::config("Missing bucket in gs URL"));
        }

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
            root: format!("gs://{bucket}"),
            single_file: None,
        })
    }

    /// Parse Azure Blob URL (scheme already stripped)
    fn parse_azure(without_scheme: &str) -> Result<Self> {
        let (container, prefix) = split_bucket(without_scheme);
        if container.is_empty() {
            return Err(Error::config("Missing container in az URL"));
        }

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
            root: format!("az://{container}"),
            single_file: None,
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str, create: bool) -> Result<Self> {
        let fs_path = Path::new(path);

        if create && fs_path.is_file() {
            return Err(Error::config(format!(
                "Output path {path} is a file, expected a directory"
            )));
        }

        let (dir, single_file) = if fs_path.is_file() {
            let name = fs_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| Error::config(format!("Invalid file path: {path}")))?;
            let parent = fs_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            (parent.to_path_buf(), Some(name))
        } else if fs_path.is_dir() {
            (fs_path.to_path_buf(), None)
        } else if create {
            std::fs::create_dir_all(fs_path)
                .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
            (fs_path.to_path_buf(), None)
        } else {
            return Err(Error::FileNotFound {
                path: path.to_string(),
            });
        };

        let store = LocalFileSystem::new_with_prefix(&dir)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            root: dir.to_string_lossy().trim_end_matches('/').to_string(),
            single_file,
        })
    }

    /// Check if this is a cloud location (not local or in-memory)
    pub fn is_cloud(&self) -> bool {
        !matches!(self.scheme.as_str(), "file" | "memory")
    }

    /// Get the scheme (s3, r2, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Key prefix inside the store
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a key relative to this location's prefix
    pub fn key_path(&self, key: &str) -> ObjectPath {
        let key = key.trim_start_matches('/');
        if self.prefix.is_empty() {
            ObjectPath::from(key)
        } else {
            ObjectPath::from(format!("{}/{key}", self.prefix.trim_end_matches('/')))
        }
    }

    /// Printable URL of the location itself
    pub fn url(&self) -> String {
        if let Some(name) = &self.single_file {
            format!("{}/{name}", self.root)
        } else if self.prefix.is_empty() {
            self.root.clone()
        } else {
            format!("{}/{}", self.root, self.prefix)
        }
    }

    /// Printable URL for an object in this location
    pub fn display(&self, path: &ObjectPath) -> String {
        format!("{}/{path}", self.root)
    }

    /// List every object under this location, sorted by key
    pub async fn list(&self) -> Result<Vec<ObjectPath>> {
        if let Some(name) = &self.single_file {
            return Ok(vec![ObjectPath::from(name.as_str())]);
        }

        let prefix = (!self.prefix.is_empty()).then(|| ObjectPath::from(self.prefix.as_str()));
        let mut paths: Vec<ObjectPath> = self
            .store
            .list(prefix.as_ref())
            .map_ok(|meta| meta.location)
            .try_collect()
            .await
            .map_err(|e| Error::storage(format!("Failed to list {}: {e}", self.root)))?;

        paths.sort();
        Ok(paths)
    }

    /// Read a whole object
    pub async fn get(&self, path: &ObjectPath) -> Result<Bytes> {
        let result = self
            .store
            .get(path)
            .await
            .map_err(|e| Error::storage(format!("Failed to read {}: {e}", self.display(path))))?;
        Ok(result.bytes().await?)
    }

    /// Write bytes under `key`, returning the printable URL of the object
    pub async fn put(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.key_path(key);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {}: {e}", self.display(&path))))?;

        Ok(self.display(&path))
    }
}

/// Split `bucket/some/prefix/` into `("bucket", "some/prefix")`
fn split_bucket(without_scheme: &str) -> (&str, String) {
    match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].trim_matches('/').to_string(),
        ),
        None => (without_scheme, String::new()),
    }
}
