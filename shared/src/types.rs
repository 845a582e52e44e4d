use crate::error::PopulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two animal species living on the island.
///
/// Names are checked on the way in, so an unknown species surfaces as
/// [`PopulationError::UnknownSpecies`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Species {
    Herbivore,
    Carnivore,
}

impl Species {
    /// Fixed traversal order used wherever both species are visited.
    pub const ALL: [Species; 2] = [Species::Herbivore, Species::Carnivore];

    pub fn name(self) -> &'static str {
        match self {
            Species::Herbivore => "Herbivore",
            Species::Carnivore => "Carnivore",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = PopulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Herbivore" => Ok(Species::Herbivore),
            "Carnivore" => Ok(Species::Carnivore),
            other => Err(PopulationError::UnknownSpecies(other.to_string())),
        }
    }
}

impl TryFrom<String> for Species {
    type Error = PopulationError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Landscape type of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Terrain {
    #[serde(rename = "W")]
    Water,
    #[serde(rename = "L")]
    Lowland,
    #[serde(rename = "H")]
    Highland,
    #[serde(rename = "D")]
    Desert,
}

impl Terrain {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'W' => Some(Terrain::Water),
            'L' => Some(Terrain::Lowland),
            'H' => Some(Terrain::Highland),
            'D' => Some(Terrain::Desert),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Terrain::Water => 'W',
            Terrain::Lowland => 'L',
            Terrain::Highland => 'H',
            Terrain::Desert => 'D',
        }
    }

    /// Animals may enter and live in every terrain except water.
    pub fn is_passable(self) -> bool {
        !matches!(self, Terrain::Water)
    }

    /// Only lowland and highland grow fodder.
    pub fn regrows_fodder(self) -> bool {
        matches!(self, Terrain::Lowland | Terrain::Highland)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// 1-indexed (row, column) position on the island.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
    pub fn row(self) -> usize {
        self.0
    }

    pub fn col(self) -> usize {
        self.1
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_letters_round_trip() {
        for letter in ['W', 'L', 'H', 'D'] {
            let terrain = Terrain::from_letter(letter).unwrap();
            assert_eq!(terrain.letter(), letter);
        }
        assert_eq!(Terrain::from_letter('J'), None);
    }

    #[test]
    fn test_terrain_properties() {
        assert!(!Terrain::Water.is_passable());
        assert!(Terrain::Desert.is_passable());
        assert!(!Terrain::Desert.regrows_fodder());
        assert!(Terrain::Lowland.regrows_fodder());
        assert!(Terrain::Highland.regrows_fodder());
    }

    #[test]
    fn test_species_parsing() {
        assert_eq!("Herbivore".parse::<Species>().unwrap(), Species::Herbivore);
        assert_eq!("Carnivore".parse::<Species>().unwrap(), Species::Carnivore);
        assert!(matches!(
            "Omnivore".parse::<Species>(),
            Err(PopulationError::UnknownSpecies(name)) if name == "Omnivore"
        ));
    }

    #[test]
    fn test_species_json_names() {
        assert_eq!(
            serde_json::to_string(&Species::Carnivore).unwrap(),
            "\"Carnivore\""
        );
        assert_eq!(
            serde_json::from_str::<Species>("\"Herbivore\"").unwrap(),
            Species::Herbivore
        );
        let err = serde_json::from_str::<Species>("\"Omnivore\"").unwrap_err();
        assert!(err.to_string().contains("unknown species 'Omnivore'"), "{err}");
    }

    #[test]
    fn test_loc_serializes_as_pair() {
        let json = serde_json::to_string(&Loc(2, 3)).unwrap();
        assert_eq!(json, "[2,3]");
    }
}
