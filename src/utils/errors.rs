#![forbid(unsafe_code)]

use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("dex_server input parameters:\n{}", .0)]
    InputParms(String),

    /// Log4rs console appender could not be configured.
    #[error("Unable to initialize log4rs: {}", .0)]
    Log4rsInitialization(String),

    /// The embedded page template failed to parse.
    #[error("Unable to parse page template: {}", .0)]
    TemplateParseError(String),

    /// The upstream detail lookup failed; this aborts the whole request.
    #[error("Unable to fetch pokemon {}: {}", .0, .1)]
    UpstreamFetchError(u64, String),

    /// The page template failed to render.
    #[error("Unable to render page: {}", .0)]
    RenderError(String),
}
