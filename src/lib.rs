pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface and interactive browser
pub mod core; // Sorting, pagination, filtering and view state
pub mod storage; // Configuration persistence

/// Support modules (used across layers)
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod report; // Report model, charts and export
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
