use thiserror::Error;

/// Top-level error type for radial build processing.
#[derive(Debug, Error)]
pub enum RadialBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Errors in the declarative build description or its options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} = {value} must be positive and finite")]
    DegenerateRadius { name: &'static str, value: f64 },

    #[error("layer '{layer}' has invalid thickness {value}")]
    InvalidThickness { layer: String, value: f64 },

    #[error("layer '{0}' has no thickness; geometry requires one")]
    MissingThickness(String),

    #[error("layer name '{0}' appears more than once")]
    DuplicateLayer(String),

    #[error("layer name must not be empty")]
    EmptyLayerName,

    #[error("layer name '{0}' is reserved")]
    ReservedLayerName(String),

    #[error("invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error("invalid option {option}: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("{axis} = {value} is not one of the sampled angles")]
    AngleNotFound { axis: &'static str, value: f64 },

    #[error("thickness matrix of component '{0}' does not cover the angle grid")]
    MalformedThicknessMatrix(String),
}

/// Errors from geometric construction and queries.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("geometry has no finite bounding box")]
    Unbounded,
}

/// Errors from looking up materials by name.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("material name must not be empty")]
    EmptyName,

    #[error("material '{name}' not found in material store")]
    MaterialNotFound { name: String },

    #[error("material '{name}' is defined {count} times in material store")]
    AmbiguousMaterial { name: String, count: usize },
}

/// Errors from the schematic layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("palette exhausted: {requested} colors requested, {available} available")]
    PaletteExhausted { requested: usize, available: usize },
}

/// Convenience type alias for results using [`RadialBuildError`].
pub type Result<T> = std::result::Result<T, RadialBuildError>;
