//! Person record types

use serde::{Deserialize, Serialize};

/// A calendar year that may be unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<i32>", into = "Option<i32>")]
pub enum Year {
    Known(i32),
    #[default]
    Unknown,
}

impl Year {
    pub fn known(self) -> Option<i32> {
        match self {
            Self::Known(y) => Some(y),
            Self::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<Option<i32>> for Year {
    fn from(value: Option<i32>) -> Self {
        value.map(Self::Known).unwrap_or(Self::Unknown)
    }
}

impl From<Year> for Option<i32> {
    fn from(year: Year) -> Self {
        year.known()
    }
}

impl From<i32> for Year {
    fn from(y: i32) -> Self {
        Self::Known(y)
    }
}

impl std::fmt::Display for Year {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(y) => write!(f, "{}", y),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// Recorded gender
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Lenient parse; anything unrecognized is `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a parent/spouse reference.
///
/// Blank values and the literal `none` (any case) mean "no reference".
pub fn normalize_reference(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One row of the family dataset
///
/// Field order matches the interchange column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonRecord {
    /// Identity within the dataset (exact, case-sensitive)
    pub name: String,

    /// Name of one parent; `None` for a root ancestor
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub birth: Year,

    /// `Unknown` means presumed living
    #[serde(default)]
    pub death: Year,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub gender: Gender,

    /// Spouse name; does not have to be in the dataset
    #[serde(default)]
    pub spouse: Option<String>,

    #[serde(default)]
    pub occupation: String,

    /// Photo URL
    #[serde(default)]
    pub photo: Option<String>,

    /// User-supplied or computed generation depth
    #[serde(default)]
    pub generation: Option<i32>,

    #[serde(default)]
    pub highlight: bool,

    #[serde(default)]
    pub notes: String,
}

impl PersonRecord {
    /// Create a record with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            birth: Year::Unknown,
            death: Year::Unknown,
            location: String::new(),
            gender: Gender::Unknown,
            spouse: None,
            occupation: String::new(),
            photo: None,
            generation: None,
            highlight: false,
            notes: String::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl AsRef<str>) -> Self {
        self.parent = normalize_reference(parent.as_ref());
        self
    }

    pub fn with_birth(mut self, year: i32) -> Self {
        self.birth = Year::Known(year);
        self
    }

    pub fn with_death(mut self, year: i32) -> Self {
        self.death = Year::Known(year);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_spouse(mut self, spouse: impl AsRef<str>) -> Self {
        self.spouse = normalize_reference(spouse.as_ref());
        self
    }

    pub fn with_occupation(mut self, occupation: impl Into<String>) -> Self {
        self.occupation = occupation.into();
        self
    }

    pub fn with_photo(mut self, url: impl AsRef<str>) -> Self {
        let url = url.as_ref().trim();
        self.photo = (!url.is_empty()).then(|| url.to_string());
        self
    }

    pub fn with_generation(mut self, generation: i32) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }

    /// No death year recorded
    pub fn is_living(&self) -> bool {
        !self.death.is_known()
    }

    /// Years between birth and death, when both are known.
    ///
    /// Widened to `i64` so any pair of `i32` years has a difference.
    pub fn lifespan(&self) -> Option<i64> {
        Some(i64::from(self.death.known()?) - i64::from(self.birth.known()?))
    }

    /// Photo usable as a node image
    pub fn photo_url(&self) -> Option<&str> {
        self.photo.as_deref().filter(|p| p.starts_with("http"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let person = PersonRecord::new("Miriam Asher")
            .with_parent("Jacob Asher")
            .with_birth(1921)
            .with_death(1999)
            .with_gender(Gender::Female)
            .with_location("Haifa, Israel");

        assert_eq!(person.parent.as_deref(), Some("Jacob Asher"));
        assert_eq!(person.lifespan(), Some(78));
        assert!(!person.is_living());
    }

    #[test]
    fn test_blank_and_none_references() {
        assert_eq!(PersonRecord::new("A").with_parent("  ").parent, None);
        assert_eq!(PersonRecord::new("A").with_parent("None").parent, None);
        assert_eq!(PersonRecord::new("A").with_spouse(" Eli ").spouse.as_deref(), Some("Eli"));
    }

    #[test]
    fn test_year_serializes_as_number_or_null() {
        let person = PersonRecord::new("Eli").with_birth(1950);
        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["Birth"], serde_json::json!(1950));
        assert!(json["Death"].is_null());

        let back: PersonRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, person);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("male"), Gender::Male);
        assert_eq!(Gender::parse(" F "), Gender::Female);
        assert_eq!(Gender::parse("other"), Gender::Unknown);
    }

    #[test]
    fn test_photo_url() {
        let person = PersonRecord::new("Eli").with_photo("file.jpg");
        assert_eq!(person.photo_url(), None);
        let person = person.with_photo("https://example.org/eli.jpg");
        assert_eq!(person.photo_url(), Some("https://example.org/eli.jpg"));
    }
}
