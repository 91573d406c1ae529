/// Local errors raised while building or validating a movie document.
///
/// These are precondition failures: they are detected before any request
/// is sent to the rendering service.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Property {0} does not exist")]
    InvalidProperty(String),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("Invalid element: {0}")]
    InvalidElement(String),

    #[error("Invalid API Key")]
    InvalidApiKey,

    #[error("Project ID not set")]
    MissingProject,

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}
