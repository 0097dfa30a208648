// DOM wiring constants for the web front-end.

// Element id mounted automatically by the wasm start function
pub const AUTO_MOUNT_ID: &str = "pixel-blast";

// Canvas fills the container; backing size is set separately from CSS size
pub const CANVAS_STYLE: &str = "width:100%;height:100%;display:block;";

pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";

/// Attribute name carrying a configuration key, e.g. `pixel-size` -> `data-pixel-size`.
pub fn data_attribute(key: &str) -> String {
    format!("{DATA_ATTRIBUTE_PREFIX}{key}")
}
