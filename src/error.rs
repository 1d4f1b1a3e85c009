use thiserror::Error;

pub type Result<T> = std::result::Result<T, SosensError>;

/// Chyby tréningu a práce s artefaktmi
#[derive(Error, Debug)]
pub enum SosensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid dataset: {0}")]
    Data(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Checksum mismatch - expected: {expected:08x}, actual: {actual:08x}")]
    Checksum { expected: u32, actual: u32 },

    #[error("Matrix error: {0}")]
    Matrix(String),
}

impl From<bincode::Error> for SosensError {
    fn from(err: bincode::Error) -> Self {
        SosensError::Serialization(err.to_string())
    }
}

/// Chyby na ceste požiadavky o predikciu.
///
/// `InvalidPayload`, `MissingFeature` a `InvalidValue` sú chyby klienta, `ServiceUnavailable`
/// znamená, že služba nemá načítaný konzistentný bundle artefaktov.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Missing feature in payload: '{0}'")]
    MissingFeature(String),

    #[error("Invalid payload value for '{feature}': {reason}")]
    InvalidValue { feature: String, reason: String },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl PredictionError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PredictionError::ServiceUnavailable(_))
    }

    /// Stavový kód v štýle HTTP pre transportnú vrstvu
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            503
        }
    }

    /// Názov chybného kľúča, ak sa chyba viaže na konkrétny príznak
    pub fn feature(&self) -> Option<&str> {
        match self {
            PredictionError::MissingFeature(name) => Some(name),
            PredictionError::InvalidValue { feature, .. } => Some(feature),
            PredictionError::InvalidPayload(_) | PredictionError::ServiceUnavailable(_) => None,
        }
    }
}
