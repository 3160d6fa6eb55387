use thiserror::Error;

/// Unified result type for the projection engine.
pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Errors surfaced while binding strategies or projecting records.
///
/// These are configuration and integration faults. They are reported
/// synchronously and never defaulted into a partial tree.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("record type `{type_name}` has no describable fields: {reason}")]
    Schema {
        type_name: &'static str,
        reason: String,
    },
    #[error("record {index} does not match schema of `{type_name}`: {detail}")]
    SchemaMismatch {
        type_name: &'static str,
        index: usize,
        detail: String,
    },
    #[error("no layout strategy bound for `{0}`")]
    UnboundType(&'static str),
    #[error("`{type_name}` is already bound to strategy `{existing}`")]
    Rebind {
        type_name: &'static str,
        existing: String,
    },
    #[error("registry is sealed; cannot bind `{0}`")]
    RegistrySealed(&'static str),
    #[error("registry lock poisoned")]
    Poisoned,
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProjectionError {
    /// True for the faults a caller caused by misconfiguring bindings.
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            ProjectionError::Rebind { .. } | ProjectionError::RegistrySealed(_)
        )
    }

    /// Short machine-readable kind used in structured logs and shell responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectionError::Schema { .. } => "schema",
            ProjectionError::SchemaMismatch { .. } => "schema_mismatch",
            ProjectionError::UnboundType(_) => "unbound_type",
            ProjectionError::Rebind { .. } => "rebind",
            ProjectionError::RegistrySealed(_) => "registry_sealed",
            ProjectionError::Poisoned => "poisoned",
            ProjectionError::Serialization(_) => "serialization",
            ProjectionError::Io(_) => "io",
        }
    }
}
