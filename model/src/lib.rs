mod label;

pub use label::LabelEncoder;

/// Languages the pretrained models know, in training order.
pub const LANG_CLASSES: [&str; 6] = ["en", "de", "fr", "es", "ru", "it"];
