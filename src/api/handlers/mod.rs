mod admin;
mod images;

pub use admin::{admin_purge, health, stats};
pub use images::{delete_image, get_image, list_images, upload_image};
