/// Tag catalog and the tag list attached to a capture

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Area tags offered in the popup, each with its subject tags.
/// Order is the order the popup lists them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TagCatalog {
    pub areas: IndexMap<String, Vec<String>>,
}

impl TagCatalog {
    pub fn area_names(&self) -> impl Iterator<Item = &str> {
        self.areas.keys().map(String::as_str)
    }

    /// Subjects for an area; `None` for the placeholder or an unknown area
    pub fn subjects(&self, area: &str) -> Option<&[String]> {
        self.areas.get(area).map(Vec::as_slice)
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        let areas: [(&str, &[&str]); 8] = [
            ("home", &["furniture", "homeware", "clothing", "workshop", "inspiration"]),
            (
                "library",
                &["music", "film", "television", "animation", "comics", "manga", "books", "adult"],
            ),
            (
                "visual",
                &[
                    "painting", "illustration", "graphicdesign", "typography", "photography",
                    "filmmaking", "3d&vfx", "sculpture", "fashion", "inspiration",
                ],
            ),
            (
                "physical",
                &["woodworking", "electronics", "3dprinting&laser", "metalwork", "3d&cad", "inspiration"],
            ),
            (
                "audio",
                &[
                    "gear", "studio", "production", "songwriting", "sounddesign", "sampling",
                    "arrangement", "recording&mixing", "musictheory", "musicology", "practice",
                    "inspiration",
                ],
            ),
            (
                "textual",
                &[
                    "copywriting", "technical", "creativewriting", "screenwriting", "worldbuilding",
                    "storytelling", "inspiration",
                ],
            ),
            ("health", &["mental", "physcial", "fitness"]),
            ("wealth", &["career", "freelancing", "resume", "investment", "entrepreneurship"]),
        ];

        TagCatalog {
            areas: areas
                .iter()
                .map(|(area, subjects)| {
                    (area.to_string(), subjects.iter().map(|s| s.to_string()).collect())
                })
                .collect(),
        }
    }
}

/// What the user picked in the popup before saving
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSelection {
    pub area: String,
    pub subjects: Vec<String>,
}

impl TagSelection {
    /// Flatten into the tag list stored on every captured item.
    ///
    /// The area comes first and is dropped when it is still the placeholder.
    /// Subject sentinels and blank values are filtered out.
    pub fn tags(&self, area_placeholder: &str, subject_sentinels: &[String]) -> Vec<String> {
        let area = self.area.trim();
        let area = (!area.is_empty() && self.area != area_placeholder).then(|| area.to_string());

        let subjects = self
            .subjects
            .iter()
            .filter(|s| !subject_sentinels.iter().any(|sentinel| sentinel == *s))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        area.into_iter().chain(subjects).collect()
    }
}
