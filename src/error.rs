use thiserror::Error;

/// Rejected scene configuration, reported at scene-build time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("object `{object}`: {positions} vertex positions but {normals} normals")]
    NormalCountMismatch {
        object: String,
        positions: usize,
        normals: usize,
    },

    #[error("object `{object}`: index count {count} is not a multiple of 3")]
    IncompleteTriangle { object: String, count: usize },

    #[error("object `{object}`: index {index} at position {position} references a missing vertex (vertex count {vertex_count})")]
    IndexOutOfRange {
        object: String,
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("object `{object}`: {what} contains a non-finite value")]
    NonFinite { object: String, what: &'static str },
}

/// Fatal start-up failures. None of these are retried.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("no global `window`")]
    NoWindow,

    #[error("no document on window")]
    NoDocument,

    #[error("unable to obtain a canvas: {0}")]
    Canvas(String),

    #[error("browser call failed: {0}")]
    Browser(String),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),
}
