use thiserror::Error;

use crate::flows::SlotTransitionError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid dimension format `{0}` (expected <width>x<height> in centimetres)")]
    InvalidDimensionFormat(String),
    #[error(transparent)]
    SlotTransition(#[from] SlotTransitionError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("malformed catalog record: {0}")]
    MalformedRecord(String),
    #[error("catalog rejected the request: {0}")]
    Rejected(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// `item` names what was looked for, as shown to the user (e.g. "motore Somfy").
    #[error("no catalog item matches {item}")]
    NoMatchFound { item: String },
    #[error("configuration failure: {0}")]
    Configuration(String),
}

/// Coarse recovery class of a failure, used to pick the user-facing reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInputFormat,
    CatalogUnavailable,
    NoMatchFound,
    Internal,
}

impl FailureKind {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::InvalidInputFormat => {
                "Non ho capito il valore inserito. Puoi ripeterlo nel formato corretto?"
            }
            Self::CatalogUnavailable => {
                "Il catalogo prodotti non è raggiungibile in questo momento. Riprova tra poco."
            }
            Self::NoMatchFound => {
                "Non ho trovato un prodotto adatto. Vuoi vedere delle alternative?"
            }
            Self::Internal => "Si è verificato un errore imprevisto.",
        }
    }
}

impl ApplicationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_) => FailureKind::InvalidInputFormat,
            Self::Catalog(CatalogError::Unavailable(_))
            | Self::Catalog(CatalogError::MalformedRecord(_))
            | Self::Catalog(CatalogError::Rejected(_)) => FailureKind::CatalogUnavailable,
            Self::NoMatchFound { .. } => FailureKind::NoMatchFound,
            Self::Configuration(_) => FailureKind::Internal,
        }
    }

    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::BadRequest { .. } => FailureKind::InvalidInputFormat,
            Self::NotFound { .. } => FailureKind::NoMatchFound,
            Self::ServiceUnavailable { .. } => FailureKind::CatalogUnavailable,
            Self::Internal { .. } => FailureKind::Internal,
        }
    }

    /// Not-found replies name the missing item; every other class has a fixed reply.
    pub fn user_message(&self) -> &str {
        match self {
            Self::NotFound { message, .. } => message,
            other => other.kind().user_message(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let message = match &value {
            ApplicationError::NoMatchFound { item } => {
                format!("Non ho trovato un {item} adatto per questa tapparella.")
            }
            other => other.to_string(),
        };
        let correlation_id = "unassigned".to_owned();
        match value.kind() {
            FailureKind::InvalidInputFormat => Self::BadRequest { message, correlation_id },
            FailureKind::NoMatchFound => Self::NotFound { message, correlation_id },
            FailureKind::CatalogUnavailable => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            FailureKind::Internal => Self::Internal { message, correlation_id },
        }
    }
}
