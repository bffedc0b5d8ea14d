//! Shader catalog for shader-deliver.
//!
//! Discovers `*.fxc` shader sources, assigns each one a shader-model bucket
//! from its name, and persists the result as the shader list file. Once the
//! file exists it is the source of truth: the per-shader `enabled` and
//! `dynamic` flags are edited by hand and never recomputed.

pub mod classify;
pub mod error;
pub mod model;
pub mod scan;
pub mod store;

pub use classify::ShaderModel;
pub use error::CatalogError;
pub use model::{CatalogDocument, ShaderRecord, VersionBucket};
pub use scan::{SHADER_SOURCE_EXTENSION, scan};
pub use store::{SHADER_LIST_FILE_NAME, ShaderCatalog};
