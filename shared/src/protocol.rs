use crate::error::ParameterError;
use crate::params::Parameters;
use crate::types::{Loc, Species, Terrain};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One animal in a population specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalSpec {
    pub species: Species,

    /// Defaults to 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Defaults to a sample from the species' birth weight distribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl AnimalSpec {
    pub fn new(species: Species, age: u32, weight: f64) -> Self {
        Self {
            species,
            age: Some(age),
            weight: Some(weight),
        }
    }

    pub fn newborn(species: Species) -> Self {
        Self {
            species,
            age: None,
            weight: None,
        }
    }
}

/// Animals to place in a single cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationEntry {
    pub loc: Loc,
    pub pop: Vec<AnimalSpec>,
}

impl PopulationEntry {
    pub fn new(loc: Loc, pop: Vec<AnimalSpec>) -> Self {
        Self { loc, pop }
    }
}

/// String-keyed parameter overrides, as read from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterOverrides {
    pub herbivore: BTreeMap<String, f64>,
    pub carnivore: BTreeMap<String, f64>,
    pub landscape: BTreeMap<Terrain, BTreeMap<String, f64>>,
}

impl ParameterOverrides {
    pub fn is_empty(&self) -> bool {
        self.herbivore.is_empty() && self.carnivore.is_empty() && self.landscape.is_empty()
    }

    /// Apply every override, or none of them.
    pub fn apply(&self, params: &mut Parameters) -> Result<(), ParameterError> {
        let mut updated = params.clone();
        updated.set_species_parameters(
            Species::Herbivore,
            self.herbivore.iter().map(|(k, v)| (k, *v)),
        )?;
        updated.set_species_parameters(
            Species::Carnivore,
            self.carnivore.iter().map(|(k, v)| (k, *v)),
        )?;
        for (terrain, values) in &self.landscape {
            updated.set_landscape_parameters(*terrain, values.iter().map(|(k, v)| (k, *v)))?;
        }
        *params = updated;
        Ok(())
    }
}

/// Head count per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCount {
    pub herbivores: usize,
    pub carnivores: usize,
}

impl PopulationCount {
    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
        }
    }

    pub fn total(&self) -> usize {
        self.herbivores + self.carnivores
    }
}

impl std::ops::AddAssign for PopulationCount {
    fn add_assign(&mut self, rhs: Self) {
        self.herbivores += rhs.herbivores;
        self.carnivores += rhs.carnivores;
    }
}

/// Head count of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellPopulation {
    pub loc: Loc,
    pub terrain: Terrain,
    pub herbivores: usize,
    pub carnivores: usize,
}

/// Island totals at the end of a year. Year 0 is the initial population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: u32,
    pub herbivores: usize,
    pub carnivores: usize,
}

impl YearRecord {
    pub fn new(year: u32, count: PopulationCount) -> Self {
        Self {
            year,
            herbivores: count.herbivores,
            carnivores: count.carnivores,
        }
    }
}

/// Everything needed to run one simulation from scratch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Island map, one row of terrain letters per line
    pub map: String,

    /// Initial population
    pub population: Vec<PopulationEntry>,

    pub seed: u64,

    /// How many years to simulate
    pub years: u32,

    #[serde(default)]
    pub overrides: ParameterOverrides,
}

/// Outcome of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub seed: u64,

    /// Totals per year, starting with year 0
    pub history: Vec<YearRecord>,

    /// Per-cell counts after the last year, row-major
    pub distribution: Vec<CellPopulation>,
}

impl SimulationReport {
    pub fn final_count(&self) -> Option<PopulationCount> {
        self.history.last().map(|r| PopulationCount {
            herbivores: r.herbivores,
            carnivores: r.carnivores,
        })
    }
}

/// Server -> client error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerError {
    /// Invalid map, population or parameters
    InvalidRequest(String),

    /// Internal server error
    InternalError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_entry_from_json() {
        let json = r#"[
            {"loc": [2, 2], "pop": [
                {"species": "Herbivore", "age": 5, "weight": 20.0},
                {"species": "Carnivore"}
            ]}
        ]"#;
        let entries: Vec<PopulationEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].loc, Loc(2, 2));
        assert_eq!(entries[0].pop[0], AnimalSpec::new(Species::Herbivore, 5, 20.0));
        assert_eq!(entries[0].pop[1], AnimalSpec::newborn(Species::Carnivore));
    }

    #[test]
    fn test_unknown_species_rejected_by_parser() {
        let json = r#"{"loc": [2, 2], "pop": [{"species": "Omnivore"}]}"#;
        let err = serde_json::from_str::<PopulationEntry>(json).unwrap_err();
        assert!(err.to_string().contains("unknown species"), "{err}");
    }

    #[test]
    fn test_overrides_apply_all_or_nothing() {
        let json = r#"{
            "herbivore": {"F": 15.0},
            "landscape": {"L": {"f_max": 100.0}, "H": {"f_max": -5.0}}
        }"#;
        let overrides: ParameterOverrides = serde_json::from_str(json).unwrap();
        let mut params = Parameters::default();

        assert!(overrides.apply(&mut params).is_err());
        assert_eq!(params, Parameters::default());
    }

    #[test]
    fn test_overrides_apply() {
        let json = r#"{"carnivore": {"DeltaPhiMax": 2.0}, "landscape": {"L": {"f_max": 100.0}}}"#;
        let overrides: ParameterOverrides = serde_json::from_str(json).unwrap();
        let mut params = Parameters::default();

        overrides.apply(&mut params).unwrap();
        assert_eq!(params.species(Species::Carnivore).delta_phi_max(), 2.0);
        assert_eq!(params.f_max(Terrain::Lowland), 100.0);
        assert!(ParameterOverrides::default().is_empty());
    }

    #[test]
    fn test_request_defaults_overrides() {
        let json = r#"{"map": "WWW\nWLW\nWWW", "population": [], "seed": 1, "years": 3}"#;
        let request: SimulationRequest = serde_json::from_str(json).unwrap();
        assert!(request.overrides.is_empty());
        assert_eq!(request.years, 3);
    }
}
