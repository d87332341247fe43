use serde::{Deserialize, Serialize};

/// Logical response keys. Physical key-code aliases that map onto these live
/// in the experiment crate's key map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKey {
    A,
    S,
    K,
    L,
    Space,
}

impl ResponseKey {
    pub fn as_char(&self) -> char {
        match self {
            ResponseKey::A => 'a',
            ResponseKey::S => 's',
            ResponseKey::K => 'k',
            ResponseKey::L => 'l',
            ResponseKey::Space => ' ',
        }
    }
}
