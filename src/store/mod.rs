mod images;
pub mod models;

pub use images::ImageStore;
pub use models::{Dimensions, ImageMime, ImageRecord, ImageView, StoreStats};
