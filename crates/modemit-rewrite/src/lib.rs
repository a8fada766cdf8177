pub mod error;
pub mod shadow;
pub mod traits;

pub use error::RewriteError;
pub use shadow::{ShadowRename, SHADOW_MARKER};
pub use traits::{ClassTransform, RenamedClass, TransformReport};
