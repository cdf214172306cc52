use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Which shelf face of a bay a cell belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    Front,
    Back,
}

impl Face {
    /// Front for positive z, back otherwise.
    pub fn of_z(z: f64) -> Face {
        if z > 0.0 { Face::Front } else { Face::Back }
    }

    /// `+1` for the front face, `-1` for the back face.
    pub fn sign(self) -> f64 {
        match self {
            Face::Front => 1.0,
            Face::Back => -1.0,
        }
    }
}

/// Shelf reference as produced by the locator: a 0-based index or a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShelfRef {
    Index(usize),
    Label(String),
}

/// Descriptive certificate metadata carried alongside a located box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_range: Option<String>,
}

/// Search result handed over by the locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub bay: u32,
    pub shelf: ShelfRef,
    pub row: u32,
    /// Box number shown to staff.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BoxMetadata>,
}

/// A highlight resolved against the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetCell {
    pub bay: u32,
    /// 0-based shelf index spanning front then back shelves.
    pub shelf: usize,
    pub row: u32,
    pub position: Vec3,
    pub face: Face,
    pub label: String,
    pub shelf_label: Option<String>,
    pub row_label: Option<String>,
    pub metadata: Option<BoxMetadata>,
}

impl TargetCell {
    pub fn height(&self) -> f64 {
        self.position.y
    }
}

#[cfg(test)]
mod tests {
    use super::{Face, Highlight, ShelfRef};

    #[test]
    fn face_from_z_sign() {
        assert_eq!(Face::of_z(0.3), Face::Front);
        assert_eq!(Face::of_z(-0.3), Face::Back);
        assert_eq!(Face::Back.sign(), -1.0);
    }

    #[test]
    fn highlight_accepts_index_or_label_shelves() {
        let by_label: Highlight =
            serde_json::from_str(r#"{"bay":2,"shelf":"C","row":1,"label":"0042"}"#)
                .expect("parse label highlight");
        assert_eq!(by_label.shelf, ShelfRef::Label("C".to_string()));
        assert!(by_label.metadata.is_none());

        let by_index: Highlight = serde_json::from_str(
            r#"{"bay":1,"shelf":3,"row":0,"label":"7","metadata":{"certificate_type":"birth","year":1987}}"#,
        )
        .expect("parse index highlight");
        assert_eq!(by_index.shelf, ShelfRef::Index(3));
        assert_eq!(by_index.metadata.and_then(|m| m.year), Some(1987));
    }
}
