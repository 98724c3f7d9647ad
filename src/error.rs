use thiserror::Error;

/// Errors raised by the message model and its body-stream collaborator.
///
/// Every variant is a programming-contract violation surfaced synchronously
/// at the offending call. Nothing is retried and nothing is recovered
/// internally; errors propagate to the immediate caller.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A protocol version outside the supported set.
    #[error("invalid protocol version: {0}")]
    InvalidProtocolVersion(String),

    /// A method token outside the supported verb set, after upper-casing.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// A status code missing from the reason-phrase registry.
    #[error("invalid status code: {0}")]
    InvalidStatusCode(u16),

    /// A URI string that does not parse.
    #[error("invalid uri: {0}")]
    InvalidUri(#[from] url::ParseError),

    /// The raw uploaded-files value is not a mapping of field names.
    #[error("uploaded files must be a mapping of field names")]
    InvalidUploadedFileRoot,

    /// A field's raw descriptor is missing one of the five file properties.
    #[error("invalid uploaded file descriptor in {0:?}")]
    InvalidUploadedFileDescriptor(String),

    /// A parallel-array descriptor whose property maps disagree on key
    /// structure at some path.
    #[error("invalid {property:?} format of uploaded files in {field:?}")]
    InvalidUploadedFile {
        property: &'static str,
        field: String,
    },

    /// Stream operation on a detached body.
    #[error("no resource available")]
    NoResource,

    #[error("stream is not readable")]
    NotReadable,

    #[error("stream is not writable")]
    NotWritable,

    #[error("stream is not seekable")]
    NotSeekable,

    #[error("stream i/o error: {0}")]
    Io(#[from] std::io::Error),
}
