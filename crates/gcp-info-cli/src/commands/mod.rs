mod info;

pub use info::{InfoOptions, info};
