//! Core module - inventory records, import normalization, sync and reports

pub mod backup;
pub mod config;
pub mod headers;
pub mod item;
pub mod normalize;
pub mod remote;
pub mod report;
pub mod session;
pub mod source;
pub mod store;
pub mod workspace;

pub use backup::BackupError;
pub use config::Config;
pub use headers::{HeaderError, HeaderMap};
pub use item::{Field, Item, NewItem};
pub use normalize::{ImportError, ImportReport, Normalizer, RawTable};
pub use remote::{HttpSheet, RemoteError, RemoteSettings, RemoteSheet};
pub use report::{ReportError, ReportOptions, ReportRenderer};
pub use session::{ImportOutcome, NullView, Session, View};
pub use store::{Change, RecordStore, StoreError};
pub use workspace::{Workspace, WorkspaceError};
