//! Domain services for the studio site.
//!
//! Services contain logic that operates on domain models without touching
//! the store.

pub mod theme_provider;

pub use theme_provider::{ThemeMessage, ThemeProvider};
