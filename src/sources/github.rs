//! GitHub remote - commit history, raw content and directory listings.
//!
//! Three endpoints are used:
//!
//! ```text
//! GET {api}/repos/{owner}/{repo}/commits?sha={ref}&path={path}&per_page={n}&page={p}
//! GET {api}/repos/{owner}/{repo}/contents/{path}?ref={ref}
//! GET {raw}/{owner}/{repo}/{ref}/{path}
//! ```
//!
//! API calls carry the GitHub media type, a fixed `User-Agent` (anonymous
//! requests without one are rejected with 403) and, when a token is
//! configured, a bearer `Authorization` header. Raw content requests never
//! carry the token.

use serde_json::Value;
use url::Url;

use crate::core::{DirectoryEntry, RepositoryCoordinate};
use crate::sources::remote::{CommitDescriptor, RawFile, RemoteError, RemoteRepository};
use crate::sources::transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default raw content base URL.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = "pluginsync-workspace-version-finder";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// A [`RemoteRepository`] backed by GitHub.
#[derive(Debug, Clone)]
pub struct GitHubRemote<T = ReqwestTransport> {
    transport: T,
    api_url: Url,
    raw_url: Url,
    user_agent: String,
    token: Option<String>,
}

impl<T: HttpTransport> GitHubRemote<T> {
    /// Create a remote against the given API and raw content hosts.
    pub fn new(transport: T, api_url: Url, raw_url: Url) -> Self {
        GitHubRemote {
            transport,
            api_url,
            raw_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token: None,
        }
    }

    /// Create a remote against the public GitHub hosts.
    pub fn public(transport: T) -> Result<Self, url::ParseError> {
        Ok(Self::new(
            transport,
            Url::parse(DEFAULT_API_URL)?,
            Url::parse(DEFAULT_RAW_URL)?,
        ))
    }

    /// Set the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Authenticate API calls with a bearer token. Empty tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Whether API calls are authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Raw content URL for a file at a reference.
    pub fn raw_url(&self, coord: &RepositoryCoordinate, reference: &str, path: &str) -> Url {
        let mut segments = vec![coord.owner(), coord.repo()];
        segments.extend(reference.split('/'));
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        with_segments(&self.raw_url, &segments)
    }

    /// Commit-listing URL for one page of a file's history.
    pub fn commits_url(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
        per_page: u32,
        page: u32,
    ) -> Url {
        let mut url = with_segments(
            &self.api_url,
            &["repos", coord.owner(), coord.repo(), "commits"],
        );
        url.query_pairs_mut()
            .append_pair("sha", reference)
            .append_pair("path", path)
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        url
    }

    /// Contents URL for a directory at a reference.
    pub fn contents_url(&self, coord: &RepositoryCoordinate, path: &str, reference: &str) -> Url {
        let mut segments = vec!["repos", coord.owner(), coord.repo(), "contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let mut url = with_segments(&self.api_url, &segments);
        url.query_pairs_mut().append_pair("ref", reference);
        url
    }

    fn api_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Accept", GITHUB_MEDIA_TYPE.to_string()),
            ("User-Agent", self.user_agent.clone()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }
        headers
    }

    /// GET an API endpoint and decode its JSON body. Non-2xx is an error.
    fn api_json(&self, url: &Url) -> Result<Value, RemoteError> {
        tracing::debug!("GET {}", url);
        let response = self.transport.get(url, &self.api_headers())?;
        let response = check_status(url, response)?;

        serde_json::from_slice(&response.body).map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl<T: HttpTransport> RemoteRepository for GitHubRemote<T> {
    fn list_commits(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<CommitDescriptor>, RemoteError> {
        let url = self.commits_url(coord, reference, path, per_page, page);
        let body = self.api_json(&url)?;

        if !body.is_array() {
            tracing::debug!("commit listing at {} is not an array, treating as empty", url);
            return Ok(Vec::new());
        }

        serde_json::from_value(body).map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn fetch_raw(
        &self,
        coord: &RepositoryCoordinate,
        reference: &str,
        path: &str,
    ) -> Result<RawFile, RemoteError> {
        let url = self.raw_url(coord, reference, path);
        tracing::debug!("GET {}", url);

        let headers = [("User-Agent", self.user_agent.clone())];
        let response = self.transport.get(&url, &headers)?;
        let response = check_status(&url, response)?;

        Ok(RawFile {
            url: url.to_string(),
            body: response.text(),
        })
    }

    fn list_directory(
        &self,
        coord: &RepositoryCoordinate,
        path: &str,
        reference: &str,
    ) -> Result<Vec<DirectoryEntry>, RemoteError> {
        let url = self.contents_url(coord, path, reference);
        let body = self.api_json(&url)?;

        // A file path returns a single object rather than a listing
        if !body.is_array() {
            tracing::debug!("contents at {} is not a directory, treating as empty", url);
            return Ok(Vec::new());
        }

        serde_json::from_value(body).map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn check_status(url: &Url, response: HttpResponse) -> Result<HttpResponse, RemoteError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::Status {
            url: url.to_string(),
            status: response.status,
            body: response.text(),
        })
    }
}
