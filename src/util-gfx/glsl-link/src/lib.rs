//! A bundler for GLSL modules linked together with `#pragma glslify` directives.

// Here's our bundling algorithm:
//
// - Order the modules so that every module comes after the modules it imports.
// - Preprocess each module: tokenize it, classify its identifiers, and strip its directives while
//   remembering where each import has to be spliced back in.
// - Resolve every entry module. Resolving a module against a set of bindings yields one
//   instantiation of it with every module-scoped name suffixed by a hash of those bindings. Imports
//   are resolved first and their instantiations are spliced in place of their directives. An
//   instantiation which was already emitted during the run is replaced by nothing.
// - Trim and stringify the concatenated tokens and inject the `GLSLIFY` define.
//

pub mod bundle;
pub mod directive;
pub mod driver;
pub mod error;
pub mod graph;
pub mod module;
pub mod preprocess;
pub mod resolve;

pub use self::{
    bundle::{bundle, BundleOptions},
    error::BundleError,
    module::{Binding, Module},
};
