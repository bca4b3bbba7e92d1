//! Structured storage helpers: config loading, JSON / binary persistence,
//! directory creation, file sizes and base64 images.

pub mod config_box;
pub mod files;
pub mod images;

pub use config_box::{ConfigBox, read_config};
pub use files::{
    create_directories, get_size, load_bin, load_json, load_json_as, save_bin, save_json,
};
pub use images::{decode_image, encode_image_into_base64};
