//! Source retrieval: turn a configured path into raw CSV text.
//!
//! Paths are resolved against a data root that is either a directory on disk
//! or an `http(s)://` base URL. Absolute URLs in the path itself bypass the
//! root.

use std::path::PathBuf;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::error::{AppError, FetchError};

/// Anything that can produce the text behind a configured path.
///
/// `Sync` so independent files can be fetched from the rayon pool.
pub trait Fetcher: Sync {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Where relative paths are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRoot {
    Dir(PathBuf),
    Url(Url),
}

impl DataRoot {
    /// Parse a root given on the command line or in a config file.
    pub fn parse(root: &str) -> Result<Self, AppError> {
        if is_url(root) {
            // `Url::join` replaces the last segment unless the base ends in '/'.
            let base = if root.ends_with('/') {
                root.to_string()
            } else {
                format!("{root}/")
            };
            let url = Url::parse(&base)
                .map_err(|e| AppError::new(2, format!("Invalid data root URL '{root}': {e}")))?;
            Ok(DataRoot::Url(url))
        } else {
            Ok(DataRoot::Dir(PathBuf::from(root)))
        }
    }
}

/// Default fetcher: local files or HTTP GET, depending on the root.
pub struct SourceFetcher {
    root: DataRoot,
    client: Client,
}

impl SourceFetcher {
    pub fn new(root: DataRoot) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { root, client })
    }

    pub fn root(&self) -> &DataRoot {
        &self.root
    }

    fn fetch_url(&self, path: &str, url: Url) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().map_err(|source| FetchError::Request {
            path: path.to_string(),
            source,
        })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.text().map_err(|source| FetchError::Request {
            path: path.to_string(),
            source,
        })
    }

    /// Invalid UTF-8 is replaced, as the HTTP path does, so one badly
    /// encoded row cannot hide the rest of the file.
    fn fetch_file(&self, path: &str, file: PathBuf) -> Result<String, FetchError> {
        let bytes = std::fs::read(&file).map_err(|source| FetchError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Fetcher for SourceFetcher {
    fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        if is_url(path) {
            let url = Url::parse(path).map_err(|e| FetchError::InvalidUrl {
                path: path.to_string(),
                message: e.to_string(),
            })?;
            return self.fetch_url(path, url);
        }

        match &self.root {
            DataRoot::Url(base) => {
                let url = base.join(path).map_err(|e| FetchError::InvalidUrl {
                    path: path.to_string(),
                    message: e.to_string(),
                })?;
                self.fetch_url(path, url)
            }
            DataRoot::Dir(dir) => self.fetch_file(path, dir.join(path)),
        }
    }
}

/// Split fetched text into data rows.
///
/// The first line is always treated as the header and dropped, whatever it
/// contains.
pub fn split_rows(text: &str) -> Vec<&str> {
    text.split('\n').skip(1).collect()
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_rows_drops_exactly_the_first_line() {
        let rows = split_rows("Colombia,COL,2021,5.0\nBrazil,BRA,2021,9.0\n");
        assert_eq!(rows, vec!["Brazil,BRA,2021,9.0", ""]);

        let rows = split_rows("Entity,Code,Year,Value");
        assert!(rows.is_empty());

        let rows = split_rows("");
        assert!(rows.is_empty());
    }

    #[test]
    fn data_root_adds_trailing_slash_to_urls() {
        let root = DataRoot::parse("https://example.org/data").unwrap();
        let DataRoot::Url(url) = root else {
            panic!("expected url root");
        };
        let joined = url.join("08 wind-generation.csv").unwrap();
        assert_eq!(joined.as_str(), "https://example.org/data/08%20wind-generation.csv");
    }

    #[test]
    fn data_root_treats_plain_paths_as_directories() {
        let root = DataRoot::parse("../../PUBLICO/DATES").unwrap();
        assert_eq!(root, DataRoot::Dir(PathBuf::from("../../PUBLICO/DATES")));
    }

    #[test]
    fn reads_files_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wind.csv"), "Entity,Code,Year,Value\nChina,CHN,2020,1.5\n").unwrap();

        let fetcher = SourceFetcher::new(DataRoot::Dir(dir.path().to_path_buf())).unwrap();
        let text = fetcher.fetch_text("wind.csv").unwrap();
        assert!(text.contains("China,CHN,2020,1.5"));
    }

    #[test]
    fn invalid_utf8_does_not_hide_clean_rows() {
        use crate::data::aggregate_or_empty;
        use crate::domain::{AggregationMode, RowFilter, YearFilter};

        let dir = tempfile::tempdir().unwrap();
        let mut body = b"Entity,Code,Year,Value\n".to_vec();
        body.extend_from_slice(b"C\xf4te d'Ivoire,CIV,2021,1.0\n");
        body.extend_from_slice(b"Colombia,COL,2021,5.0\n");
        std::fs::write(dir.path().join("latin1.csv"), body).unwrap();

        let fetcher = SourceFetcher::new(DataRoot::Dir(dir.path().to_path_buf())).unwrap();
        let text = fetcher.fetch_text("latin1.csv").unwrap();
        assert!(text.contains("C\u{fffd}te d'Ivoire"));

        let filter = RowFilter::new("Colombia", YearFilter::Exact(2021), AggregationMode::Sum);
        let agg = aggregate_or_empty(&fetcher, "latin1.csv", &filter);
        assert_eq!(agg.get("2021"), Some(5.0));
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = SourceFetcher::new(DataRoot::Dir(dir.path().to_path_buf())).unwrap();

        let err = fetcher.fetch_text("17 installed-geothermal-capacity").unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert_eq!(err.path(), "17 installed-geothermal-capacity");
    }
}
