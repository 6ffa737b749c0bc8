//! Request handlers

pub mod analyze;
pub mod health;
pub mod upload;

pub use analyze::analyze_image;
pub use health::health;
pub use upload::upload_image;
