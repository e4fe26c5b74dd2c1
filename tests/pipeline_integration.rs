//! Integration tests against a local object store
//!
//! Tests the full end-to-end flow: raw JSON files → normalize → partitioned Parquet

use jobfeed_etl::decode::DecoderFormat;
use jobfeed_etl::output::{batch_to_listings, decode_parquet};
use jobfeed_etl::partition::HIVE_DEFAULT_PARTITION;
use jobfeed_etl::{CleanedListing, Error, Pipeline, PipelineConfig, RunOptions};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

struct Workspace {
    _dir: tempfile::TempDir,
    raw: PathBuf,
    out: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let out = dir.path().join("out");
        fs::create_dir_all(&raw).unwrap();
        Self {
            _dir: dir,
            raw,
            out,
        }
    }

    fn write_raw(&self, name: &str, body: &str) {
        fs::write(self.raw.join(name), body).unwrap();
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_source(self.raw.to_str().unwrap())
            .with_destination(self.out.to_str().unwrap())
    }
}

/// Every Parquet file under `root`, sorted, relative to `root`
fn parquet_files(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, found: &mut Vec<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, found);
            } else if path.extension().is_some_and(|e| e == "parquet") {
                let rel = path.strip_prefix(root).unwrap();
                found.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut found = Vec::new();
    walk(root, root, &mut found);
    found.sort();
    found
}

fn read_listings(path: &Path) -> Vec<CleanedListing> {
    let data = bytes::Bytes::from(fs::read(path).unwrap());
    decode_parquet(data)
        .unwrap()
        .iter()
        .flat_map(|batch| batch_to_listings(batch).unwrap())
        .collect()
}

fn sample_page() -> String {
    json!({
        "count": 3,
        "items": [
            {
                "id": "4123",
                "title": "Data Engineer",
                "company": {"display_name": "Acme Ltd"},
                "category": {"label": "IT Jobs"},
                "redirect_url": "https://example.com/4123",
                "created": "2023-05-14T10:00:00Z",
                "location": {"display_name": "London, Greater London, UK"}
            },
            {
                "id": "4124",
                "title": "Nurse",
                "category": {"label": "Healthcare & Nursing Jobs"},
                "created": "2023-06-02T08:30:00Z",
                "location": {"display_name": "Remote"}
            },
            {
                "id": "4125",
                "title": "Mystery",
                "created": "not a date"
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_end_to_end_hive_layout() {
    let ws = Workspace::new();
    ws.write_raw("page-1.json", &sample_page());
    ws.write_raw("_SUCCESS", "");

    let mut pipeline = Pipeline::from_config(&ws.config(), RunOptions::default()).unwrap();
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.files_read, 1);
    assert_eq!(stats.listings_written(), 3);
    assert_eq!(stats.normalize.unparsable_created, 1);

    let files = parquet_files(&ws.out);
    assert_eq!(files.len(), 3);
    let find = |prefix: &str| {
        files
            .iter()
            .find(|f| f.starts_with(prefix))
            .unwrap_or_else(|| panic!("no file under {prefix} in {files:?}"))
    };
    let may_file = find("year=2023/month=5/part-");
    let june_file = find("year=2023/month=6/part-");
    let unknown_file = find(&format!(
        "year={HIVE_DEFAULT_PARTITION}/month={HIVE_DEFAULT_PARTITION}/part-"
    ));

    let may = read_listings(&ws.out.join(may_file));
    assert_eq!(may.len(), 1);
    let london = &may[0];
    assert_eq!(london.job_id.as_deref(), Some("4123"));
    assert_eq!(london.job_category.as_deref(), Some("IT"));
    assert_eq!(london.job_city.as_deref(), Some("London"));
    assert_eq!(london.job_region.as_deref(), Some("Greater London"));
    assert_eq!(london.year, None);

    let june = read_listings(&ws.out.join(june_file));
    assert_eq!(june[0].job_category.as_deref(), Some("Healthcare & Nursing"));
    assert_eq!(june[0].job_city.as_deref(), Some("Remote"));
    assert_eq!(june[0].job_region, None);

    let unknown = read_listings(&ws.out.join(unknown_file));
    assert_eq!(unknown[0].job_id.as_deref(), Some("4125"));
    assert_eq!(unknown[0].job_created, None);
}

#[tokio::test]
async fn test_duplicates_across_files() {
    let ws = Workspace::new();
    ws.write_raw("page-1.json", &sample_page());
    ws.write_raw("page-2.json", &sample_page());

    let mut pipeline = Pipeline::from_config(&ws.config(), RunOptions::default()).unwrap();
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.normalize.rows_flattened, 6);
    assert_eq!(stats.normalize.duplicates_dropped, 3);

    let mut ids: Vec<String> = parquet_files(&ws.out)
        .iter()
        .flat_map(|f| read_listings(&ws.out.join(f)))
        .filter_map(|l| l.job_id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["4123", "4124", "4125"]);
}

#[tokio::test]
async fn test_jsonl_source() {
    let ws = Workspace::new();
    let body = [
        json!({"items": [{"id": "1", "created": "2024-01-15 09:00:00"}]}).to_string(),
        json!({"items": [{"id": "2", "created": "2024-01-20"}]}).to_string(),
    ]
    .join("\n");
    ws.write_raw("pages.jsonl", &body);

    let config = ws.config().with_format(DecoderFormat::Jsonl);
    let mut pipeline = Pipeline::from_config(&config, RunOptions::default()).unwrap();
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.normalize.containers, 2);
    let files = parquet_files(&ws.out);
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("year=2024/month=1/"));
    assert_eq!(read_listings(&ws.out.join(&files[0])).len(), 2);
}

#[tokio::test]
async fn test_runs_append_without_overwriting() {
    let ws = Workspace::new();
    ws.write_raw("page-1.json", &sample_page());

    for _ in 0..2 {
        let mut pipeline = Pipeline::from_config(&ws.config(), RunOptions::default()).unwrap();
        pipeline.run().await.unwrap();
    }

    let files = parquet_files(&ws.out);
    assert_eq!(files.len(), 6);
    let may: Vec<&String> = files
        .iter()
        .filter(|f| f.starts_with("year=2023/month=5/"))
        .collect();
    assert_eq!(may.len(), 2);
    assert_ne!(may[0], may[1]);
}

#[tokio::test]
async fn test_missing_items_leaves_destination_untouched() {
    let ws = Workspace::new();
    ws.write_raw("page-1.json", &sample_page());
    ws.write_raw("page-2.json", &json!({"results": []}).to_string());

    let mut pipeline = Pipeline::from_config(&ws.config(), RunOptions::default()).unwrap();
    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(err, Error::MissingField { ref field } if field == "items"));
    assert_eq!(
        err.to_string(),
        "Missing required field 'items' in source data"
    );
    assert!(parquet_files(&ws.out).is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_fatal() {
    let ws = Workspace::new();
    ws.write_raw("page-1.json", &sample_page());
    ws.write_raw("page-2.json", "{\"items\": [");

    let mut pipeline = Pipeline::from_config(&ws.config(), RunOptions::default()).unwrap();
    let err = pipeline.run().await.unwrap_err();

    assert!(err.is_input_error());
    assert!(parquet_files(&ws.out).is_empty());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let ws = Workspace::new();
    ws.write_raw("page-1.json", &sample_page());

    let options = RunOptions::new().with_dry_run(true);
    let mut pipeline = Pipeline::from_config(&ws.config(), options).unwrap();
    let stats = pipeline.run().await.unwrap();

    assert!(stats.dry_run);
    assert_eq!(stats.partitions_written(), 3);
    assert!(!ws.out.exists());
}

#[tokio::test]
async fn test_single_file_source() {
    let ws = Workspace::new();
    ws.write_raw("page-1.json", &sample_page());

    let config = PipelineConfig::default()
        .with_source(ws.raw.join("page-1.json").to_str().unwrap())
        .with_destination(ws.out.to_str().unwrap());
    let mut pipeline = Pipeline::from_config(&config, RunOptions::default()).unwrap();
    let stats = pipeline.run().await.unwrap();

    assert_eq!(stats.files_read, 1);
    assert_eq!(parquet_files(&ws.out).len(), 3);
}

#[test]
fn test_missing_source_is_an_error() {
    let ws = Workspace::new();
    let config = PipelineConfig::default()
        .with_source(ws.raw.join("nope").to_str().unwrap())
        .with_destination(ws.out.to_str().unwrap());

    let result = Pipeline::from_config(&config, RunOptions::default());
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}
