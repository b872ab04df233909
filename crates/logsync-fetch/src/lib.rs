//! logsync fetch - obtaining manifest and history text from sources
//!
//! A source handle is either a local directory or a remote host. Local
//! sources are scanned in-process; remote sources are reached by running an
//! external program (by default `ssh`). [`fetch_pair`] fetches both sides of
//! a run concurrently under a timeout.

pub mod command;
pub mod error;
pub mod fetcher;
pub mod local;
pub mod pair;
pub mod route;
pub mod source;

pub use command::{CommandConfig, CommandFetcher};
pub use error::FetchError;
pub use fetcher::{FetchMode, ManifestFetcher};
pub use local::LocalDirFetcher;
pub use pair::{fetch_pair, fetch_side, FetchOptions, FetchedPair};
pub use route::SourceFetcher;
pub use source::SourceSpec;
