//! Request and response types of the HTTP API

pub mod convert;
pub mod error;
pub mod video;

pub use convert::ConvertResponse;
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use video::DownloadQuery;
