/// Core error type for the blog bot.
///
/// Adapter crates map their specific errors into this type so handlers can
/// treat failures consistently (user-facing notice vs. log-and-continue).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Transport failure or non-success HTTP status while fetching posts.
    #[error("source unreachable: {0}")]
    SourceUnreachable(String),

    /// The fetched body could not be parsed at all.
    #[error("malformed source: {0}")]
    MalformedSource(String),

    /// The publish destination rejected the result message.
    #[error("destination unreachable: {0}")]
    DestinationUnreachable(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
