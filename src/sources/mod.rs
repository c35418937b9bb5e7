//! Remote repository access.
//!
//! The resolver and collector only talk to a [`RemoteRepository`]. The
//! production implementation is [`GitHubRemote`], which speaks the GitHub
//! REST API and raw content host over an [`HttpTransport`].

pub mod github;
pub mod remote;
pub mod transport;

pub use github::GitHubRemote;
pub use remote::{CommitDescriptor, RawFile, RemoteError, RemoteRepository};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
