//! External API integrations

pub mod image_send;

pub use image_send::{ImageContext, ImageSendClient};
