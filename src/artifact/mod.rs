//! Artifact production
//!
//! # Components
//!
//! - `naming`: filename derivation and the storable content-type table
//! - `store`: per-site output folders and raw binary saves
//! - `renderer`: the page-to-document renderer collaborator

mod naming;
mod renderer;
mod store;

pub use naming::{
    binary_filename, document_filename, extension_for_content_type, page_base_name,
    DOCUMENT_EXTENSION,
};
pub use renderer::{render_document, CommandRenderer, RenderSession, Renderer};
pub use store::{Artifact, ArtifactKind, ArtifactStore};
