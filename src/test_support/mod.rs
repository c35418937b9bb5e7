//! Test utilities and mocks for pluginsync unit tests.
//!
//! This module provides mock implementations of the remote boundary so the
//! resolver, collector and orchestrator can be exercised without network
//! access.
//!
//! # Example
//!
//! ```rust,ignore
//! use pluginsync::test_support::{commit, MockRemote};
//!
//! #[test]
//! fn test_example() {
//!     let remote = MockRemote::new()
//!         .with_file("main", "backstage.json", r#"{"version": "1.46.0"}"#)
//!         .with_history("backstage.json", vec![commit("c1", "1.45.0")]);
//!
//!     // Use the mock in a resolver...
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use url::Url;

use crate::core::{DirectoryEntry, EntryKind, RepositoryCoordinate};
use crate::sources::{
    CommitDescriptor, HttpResponse, HttpTransport, RawFile, RemoteError, RemoteRepository,
};

/// Mock HTTP response for testing the GitHub remote.
#[derive(Debug, Clone)]
pub struct MockHttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockHttpResponse {
    /// Create a successful response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        MockHttpResponse {
            status: 200,
            body: body.into(),
        }
    }

    /// Create a not found response.
    pub fn not_found() -> Self {
        MockHttpResponse {
            status: 404,
            body: b"404: Not Found".to_vec(),
        }
    }

    /// Create a response with an arbitrary status and body.
    pub fn with_status(status: u16, body: &str) -> Self {
        MockHttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }
}

/// A request seen by [`MockHttpClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Full request URL.
    pub url: String,
    /// Headers sent with the request.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Get a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check if a header was sent with the given value.
    pub fn has_header(&self, name: &str, value: &str) -> bool {
        self.header(name) == Some(value)
    }
}

/// Mock HTTP client implementing [`HttpTransport`].
#[derive(Debug, Default)]
pub struct MockHttpClient {
    responses: HashMap<String, MockHttpResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Option<MockHttpResponse>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        MockHttpClient::default()
    }

    /// Add a response for a URL. Also matches URLs that start with it.
    pub fn mock_url(&mut self, url: &str, response: MockHttpResponse) -> &mut Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Set a default response for unmatched URLs.
    pub fn set_default(&mut self, response: MockHttpResponse) -> &mut Self {
        self.default_response = Some(response);
        self
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl HttpTransport for MockHttpClient {
    fn get(
        &self,
        url: &Url,
        headers: &[(&'static str, String)],
    ) -> Result<HttpResponse, RemoteError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            });
        }

        let url = url.as_str();
        let response = self
            .responses
            .get(url)
            .or_else(|| {
                self.responses
                    .iter()
                    .find(|(pattern, _)| url.starts_with(pattern.as_str()))
                    .map(|(_, r)| r)
            })
            .or(self.default_response.as_ref());

        match response {
            Some(r) => Ok(HttpResponse {
                status: r.status,
                body: r.body.clone(),
            }),
            None => Err(RemoteError::Transport {
                url: url.to_string(),
                message: "no mock response".to_string(),
            }),
        }
    }
}

/// Build a commit descriptor with a synthetic date and message.
pub fn commit(sha: &str, message: &str) -> CommitDescriptor {
    CommitDescriptor::new(sha, Some("2025-01-01T00:00:00Z"), Some(message))
}

/// Build a directory listing entry.
pub fn dir_entry(parent: &str, name: &str) -> DirectoryEntry {
    DirectoryEntry::new(name, format!("{}/{}", parent, name), EntryKind::Directory)
}

/// Build a file listing entry.
pub fn file_entry(parent: &str, name: &str) -> DirectoryEntry {
    DirectoryEntry::new(name, format!("{}/{}", parent, name), EntryKind::File)
}

/// In-memory [`RemoteRepository`].
///
/// Files are keyed by `(reference, path)`, file histories by path (newest
/// commit first) and directory listings by `(reference, path)`. Every call
/// is recorded as a short string so tests can assert on traffic:
///
/// ```text
/// commits:{path}:page={n}
/// raw:{reference}:{path}
/// contents:{reference}:{path}
/// ```
#[derive(Debug, Default)]
pub struct MockRemote {
    files: HashMap<(String, String), String>,
    histories: HashMap<String, Vec<CommitDescriptor>>,
    directories: HashMap<(String, String), Vec<DirectoryEntry>>,
    failing: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl MockRemote {
    /// Create an empty mock remote.
    pub fn new() -> Self {
        MockRemote::default()
    }

    /// Add file content at a reference or sha.
    pub fn with_file(mut self, reference: &str, path: &str, body: &str) -> Self {
        self.files
            .insert((reference.to_string(), path.to_string()), body.to_string());
        self
    }

    /// Set the commit history of a file, newest first.
    pub fn with_history(mut self, path: &str, commits: Vec<CommitDescriptor>) -> Self {
        self.histories.insert(path.to_string(), commits);
        self
    }

    /// Add a directory listing at a reference or sha.
    pub fn with_directory(
        mut self,
        reference: &str,
        path: &str,
        entries: Vec<DirectoryEntry>,
    ) -> Self {
        self.directories
            .insert((reference.to_string(), path.to_string()), entries);
        self
    }

    /// Make every listing call for `path` answer 403.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Get all recorded calls.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Count recorded calls starting with a prefix.
    pub fn count(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    fn record(&self, request: String) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }

    fn rate_limited(&self, url: String) -> RemoteError {
        RemoteError::Status {
            url,
            status: 403,
            body: "API rate limit exceeded".to_string(),
        }
    }
}

impl RemoteRepository for MockRemote {
    fn list_commits(
        &self,
        _coord: &RepositoryCoordinate,
        _reference: &str,
        path: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<CommitDescriptor>, RemoteError> {
        self.record(format!("commits:{}:page={}", path, page));

        if self.failing.contains(path) {
            return Err(self.rate_limited(format!("commits:{}", path)));
        }

        let history = self.histories.get(path).map(Vec::as_slice).unwrap_or(&[]);
        let per_page = per_page.max(1) as usize;
        let start = (page.saturating_sub(1) as usize) * per_page;

        Ok(history.iter().skip(start).take(per_page).cloned().collect())
    }

    fn fetch_raw(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
    ) -> Result<RawFile, RemoteError> {
        self.record(format!("raw:{}:{}", reference, path));

        let url = format!(
            "https://raw.example.com/{}/{}/{}/{}",
            coord.owner(),
            coord.repo(),
            reference,
            path
        );

        match self.files.get(&(reference.to_string(), path.to_string())) {
            Some(body) => Ok(RawFile {
                url,
                body: body.clone(),
            }),
            None => Err(RemoteError::Status {
                url,
                status: 404,
                body: "404: Not Found".to_string(),
            }),
        }
    }

    fn list_directory(
        &self,
        _coord: &RepositoryCoordinate,
        path: &str,
        reference: &str,
    ) -> Result<Vec<DirectoryEntry>, RemoteError> {
        self.record(format!("contents:{}:{}", reference, path));

        if self.failing.contains(path) {
            return Err(self.rate_limited(format!("contents:{}", path)));
        }

        Ok(self
            .directories
            .get(&(reference.to_string(), path.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    /// Assert that a result is Ok and return the value.
    pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {:?}", e),
        }
    }

    /// Assert that a result is Err and return the error.
    pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
        match result {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord() -> RepositoryCoordinate {
        RepositoryCoordinate::new("o", "r")
    }

    #[test]
    fn test_mock_remote_paginates_history() {
        let history = (0..5).map(|i| commit(&format!("c{}", i), "msg")).collect();
        let remote = MockRemote::new().with_history("f.json", history);

        let page1 = remote.list_commits(&coord(), "main", "f.json", 2, 1).unwrap();
        let page3 = remote.list_commits(&coord(), "main", "f.json", 2, 3).unwrap();
        let page4 = remote.list_commits(&coord(), "main", "f.json", 2, 4).unwrap();

        assert_eq!(page1.len(), 2);
        assert_eq!(page1[0].sha, "c0");
        assert_eq!(page3.len(), 1);
        assert_eq!(page3[0].sha, "c4");
        assert!(page4.is_empty());
        assert_eq!(remote.count("commits:"), 3);
    }

    #[test]
    fn test_mock_remote_missing_file_is_404() {
        let remote = MockRemote::new().with_file("main", "a.json", "{}");

        assert!(remote.fetch_raw(&coord(), "main", "a.json").is_ok());
        let err = remote.fetch_raw(&coord(), "main", "b.json").unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_mock_http_client_prefix_match() {
        let mut client = MockHttpClient::new();
        client.mock_url("https://example.com/", MockHttpResponse::ok("body"));

        let url = Url::parse("https://example.com/a/b").unwrap();
        let response = client.get(&url, &[]).unwrap();
        assert!(response.is_success());
        assert_eq!(response.text(), "body");
        assert_eq!(client.requests().len(), 1);
    }

    #[test]
    fn test_mock_http_client_unmatched() {
        let client = MockHttpClient::new();
        let url = Url::parse("https://example.com/").unwrap();
        assert!(client.get(&url, &[]).is_err());
    }

    #[test]
    fn test_assertions() {
        use assertions::*;

        let ok_result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(ok_result), 42);

        let err_result: Result<i32, &str> = Err("error");
        assert_eq!(assert_err(err_result), "error");
    }
}
