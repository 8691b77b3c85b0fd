//! Error types for the timetable service

use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or serving the composite
#[derive(Error, Debug)]
pub enum Error {
    /// The DSB API was unreachable, rejected the login or returned garbage
    #[error("Failed to fetch timetables: {0}")]
    FetchError(String),

    /// The API answered, but there is nothing to show
    #[error("No timetables found")]
    EmptyTimetable,

    /// Downloading a single plan image failed
    #[error("Image download failed: {0}")]
    ImageDownloadError(String),

    /// A downloaded body could not be decoded as a raster image
    #[error("Image decode failed: {0}")]
    ImageDecodeError(String),

    /// Entries were selected but none of their images could be loaded
    #[error("No images could be loaded for the selected timetables")]
    NoImages,

    /// Encoding the composite failed
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Binding the HTTP listener failed
    #[error("Failed to listen on {0}")]
    ListenError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl Error {
    /// Process exit status for an error that ends startup.
    ///
    /// An empty timetable is not a failure: the service simply has nothing
    /// to serve and exits cleanly without binding a port.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::EmptyTimetable => 0,
            _ => 1,
        }
    }
}
