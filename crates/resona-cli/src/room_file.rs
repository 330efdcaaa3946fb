//! Room description files.
//!
//! Rooms are described as JSON; surface materials may reference built-in
//! presets by name:
//!
//! ```json
//! {
//!   "name": "living room",
//!   "width_m": 5.0,
//!   "length_m": 7.0,
//!   "height_m": 3.0,
//!   "surfaces": [
//!     { "name": "floor", "area_m2": 35.0, "material": "carpet" },
//!     { "name": "ceiling", "area_m2": 35.0, "material": "plaster" }
//!   ]
//! }
//! ```

use anyhow::Context;
use resona_acoustics::RoomModel;
use std::path::Path;

/// Load and validate a room description from a JSON file.
pub fn load_room(path: &Path) -> anyhow::Result<RoomModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading room file {}", path.display()))?;
    let room: RoomModel = serde_json::from_str(&text)
        .with_context(|| format!("parsing room file {}", path.display()))?;
    room.validate()
        .with_context(|| format!("validating room file {}", path.display()))?;
    Ok(room)
}
