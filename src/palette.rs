use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::fmt;

use crate::error::{GeneratorError, GeneratorResult};

/// Every color a level can use, in palette order.
pub const PALETTE: [&str; 20] = [
    "red",
    "blue",
    "green",
    "yellow",
    "orange",
    "purple",
    "teal",
    "pink",
    "brown",
    "cyan",
    "magenta",
    "lime",
    "indigo",
    "maroon",
    "navy",
    "peach",
    "mint",
    "lavender",
    "turquoise",
    "coral",
];

/// A liquid color, identified by its position in [`PALETTE`].
///
/// Colors are serialized by name. The compact letter form (`A` for the first palette entry,
/// `B` for the second, ...) is what [`crate::model::PuzzleState`] uses when printed. Only
/// palette positions can be constructed, so every color has exactly one name and one letter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Color(usize);

impl Color {
    /// The color at `color_id` in the palette, if there is one.
    pub const fn new(color_id: usize) -> Option<Self> {
        if color_id < PALETTE.len() {
            Some(Color(color_id))
        } else {
            None
        }
    }

    /// Every palette color, in palette order.
    pub fn all() -> impl Iterator<Item = Color> {
        (0..PALETTE.len()).map(Color)
    }

    pub fn name(&self) -> &'static str {
        PALETTE[self.0]
    }

    pub fn from_name(name: &str) -> GeneratorResult<Self> {
        PALETTE
            .iter()
            .position(|candidate| *candidate == name)
            .map(Color)
            .ok_or_else(|| GeneratorError::UnknownColor(name.to_string()))
    }

    /// Parse a letter label, `A` being the first palette color.
    pub fn from_letter(ch: char) -> Option<Self> {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        Color::new((ch.to_ascii_uppercase() as u8 - b'A') as usize)
    }

    pub fn letter(&self) -> char {
        (b'A' + self.0 as u8) as char
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Color::from_name(&name).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_fits_in_single_letters() {
        assert!(PALETTE.len() <= 26);
        for color in Color::all() {
            assert_eq!(Color::from_letter(color.letter()), Some(color));
        }
    }

    #[test]
    fn letters_past_the_palette_are_rejected() {
        let last = Color::new(PALETTE.len() - 1).unwrap();
        assert_eq!(last.letter(), 'T');
        assert_eq!(Color::from_letter('t'), Some(last));
        assert_eq!(Color::from_letter('U'), None);
        assert_eq!(Color::from_letter('Z'), None);
        assert_eq!(Color::from_letter('.'), None);
        assert_eq!(Color::new(PALETTE.len()), None);
    }

    #[test]
    fn names_and_letters_identify_one_color() {
        let names: HashSet<&str> = Color::all().map(|c| c.name()).collect();
        let letters: HashSet<char> = Color::all().map(|c| c.letter()).collect();
        assert_eq!(names.len(), PALETTE.len());
        assert_eq!(letters.len(), PALETTE.len());
    }

    #[test]
    fn names_resolve_back_to_colors() {
        let teal = Color::from_name("teal").unwrap();
        assert_eq!(teal.name(), "teal");
        assert!(matches!(
            Color::from_name("ochre"),
            Err(GeneratorError::UnknownColor(_))
        ));
    }

    #[test]
    fn serializes_as_name() {
        let blue = Color::new(1).unwrap();
        let json = serde_json::to_string(&blue).unwrap();
        assert_eq!(json, "\"blue\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, blue);
        assert!(serde_json::from_str::<Color>("\"ochre\"").is_err());
    }
}
