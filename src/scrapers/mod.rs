pub mod file;
pub mod http;
pub mod traits;
pub mod types;

pub use file::FileDetailsSource;
pub use http::HttpDetailsSource;
pub use traits::{fetch_or_empty, DetailsSource};
pub use types::DetailsRequest;
