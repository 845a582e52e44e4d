use crate::island::Island;
use shared::{
    CellPopulation, ParameterError, PopulationCount, PopulationEntry, Result, Species, Terrain,
    YearRecord,
};

/// Drives an island through the years and keeps the yearly totals.
pub struct BioSim {
    island: Island,
    year: u32,
    history: Vec<YearRecord>,
}

impl BioSim {
    /// Build the island from `map`, place `initial_population` and record year 0.
    pub fn new(map: &str, initial_population: &[PopulationEntry], seed: u64) -> Result<Self> {
        Self::from_island(Island::new(map, seed)?, initial_population)
    }

    pub fn from_island(mut island: Island, initial_population: &[PopulationEntry]) -> Result<Self> {
        island.populate(initial_population)?;
        let history = vec![YearRecord::new(0, island.total_population())];
        Ok(Self {
            island,
            year: 0,
            history,
        })
    }

    pub fn island(&self) -> &Island {
        &self.island
    }

    pub fn set_animal_parameters<I, K>(
        &mut self,
        species: Species,
        values: I,
    ) -> std::result::Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.island.set_species_parameters(species, values)
    }

    pub fn set_landscape_parameters<I, K>(
        &mut self,
        terrain: Terrain,
        values: I,
    ) -> std::result::Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.island.set_landscape_parameters(terrain, values)
    }

    /// Run `num_years` more years.
    pub fn simulate(&mut self, num_years: u32) {
        for _ in 0..num_years {
            let count = self.island.advance_year();
            self.year += 1;
            tracing::debug!(
                "Year {}: {} herbivores, {} carnivores",
                self.year,
                count.herbivores,
                count.carnivores
            );
            self.history.push(YearRecord::new(self.year, count));
        }
    }

    /// Add animals between years
    pub fn add_population(&mut self, population: &[PopulationEntry]) -> Result<()> {
        self.island.populate(population)?;
        Ok(())
    }

    /// Last year simulated
    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn num_animals(&self) -> usize {
        self.island.total_population().total()
    }

    pub fn num_animals_per_species(&self) -> PopulationCount {
        self.island.total_population()
    }

    pub fn animal_distribution(&self) -> Vec<CellPopulation> {
        self.island.population_per_cell()
    }

    /// Totals at the end of each year, starting with the initial population
    pub fn history(&self) -> &[YearRecord] {
        &self.history
    }
}
