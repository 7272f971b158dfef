use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Missing column in event table: {column}")]
    MissingColumn { column: String },

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Home and away team share the same id: {team_id}")]
    DuplicateTeam { team_id: u64 },

    #[error("Invalid xT grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid event {id}: {reason}")]
    InvalidEvent { id: u64, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// Schema and configuration problems abort the whole pipeline.
    pub fn is_fatal(&self) -> bool {
        match self {
            AnalyticsError::MissingColumn { .. } => true,
            AnalyticsError::MissingConfiguration(_) => true,
            AnalyticsError::DuplicateTeam { .. } => true,
            AnalyticsError::InvalidGrid(_) => true,
            AnalyticsError::InvalidEvent { .. } => false,
            AnalyticsError::Json(_) => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
