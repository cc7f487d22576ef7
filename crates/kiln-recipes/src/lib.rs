//! Built-in kiln recipes.
//!
//! Each module packages one third-party C++ library. Recipes are flat
//! descriptors: all the interesting work happens in the upstream source
//! trees and the external build tools; a recipe only wires options,
//! dependencies and paths together.

pub mod spdlog;
pub mod wxpdfdoc;
pub mod wxsqlite3;

use kiln_core::Recipe;

pub use spdlog::Spdlog;
pub use wxpdfdoc::WxPdfDoc;
pub use wxsqlite3::WxSqlite3;

/// All built-in recipes.
pub fn builtin() -> Vec<Box<dyn Recipe>> {
    vec![
        Box::new(Spdlog),
        Box::new(WxPdfDoc),
        Box::new(WxSqlite3),
    ]
}

/// Look up a built-in recipe by name.
pub fn find(name: &str) -> Option<Box<dyn Recipe>> {
    builtin().into_iter().find(|r| r.name() == name)
}
