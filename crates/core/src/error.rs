use healthrecs_types::TextError;

/// Failure talking to one of the remote services.
///
/// Every variant is shown to users as the same message, see [`ApiError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// Direction of the failed operation, used to pick the notice wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiAction {
    Load,
    Save,
}

impl ApiError {
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    /// The single user-visible message shown for any service failure.
    pub fn user_message(&self, action: ApiAction) -> &'static str {
        match action {
            ApiAction::Load => "Failed to load data. Please try again.",
            ApiAction::Save => "Failed to save data. Please try again.",
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] TextError),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("not logged in")]
    NotAuthenticated,
    #[error("the {role} role cannot open {page}")]
    AccessDenied { role: String, page: String },
    #[error("Patient not found")]
    PatientNotFound,
    #[error("Registration number is missing.")]
    MissingRegNo,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("selected file is not an image: {0}")]
    NotAnImage(String),
    #[error("no image selected")]
    NoImageSelected,
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to create state directory: {0}")]
    StateDirCreation(std::io::Error),
    #[error("failed to serialize local store: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize local store: {0}")]
    Deserialization(serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type RecordsResult<T> = std::result::Result<T, RecordsError>;
