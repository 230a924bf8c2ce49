//! User preference stores, independent of the authentication session.

pub mod theme;

pub use theme::{Theme, ThemeStore};
