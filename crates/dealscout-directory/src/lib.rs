pub mod backend;
pub mod debounce;
pub mod error;
pub mod file;
pub mod resolver;
pub mod rest;

pub use backend::{ConfiguredDirectory, DealerDirectory};
pub use debounce::{SuggestionDebouncer, Suggestions};
pub use error::{DirectoryError, ResolveError};
pub use file::FileDirectory;
pub use resolver::{DealerResolver, SUGGESTION_LIMIT};
pub use rest::RestDirectory;
