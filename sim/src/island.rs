use crate::animal::{sample_birth_weight, Animal};
use crate::cell::Cell;
use crate::map::IslandMap;
use crate::rng::{seeded, RngExt, SimRng};
use rand::seq::SliceRandom;
use shared::{
    CellPopulation, Loc, ParameterError, Parameters, PopulationCount, PopulationEntry,
    PopulationError, Species, Terrain,
};
use std::collections::BTreeMap;

/// The whole island: one cell per map position, the parameter store and
/// the random source that drives every stochastic rule.
pub struct Island {
    map: IslandMap,
    cells: Vec<Cell>,
    neighbours: Vec<Vec<usize>>,
    params: Parameters,
    rng: SimRng,
}

impl Island {
    /// Build an island with default parameters
    pub fn new(map: &str, seed: u64) -> shared::Result<Self> {
        Self::with_parameters(map, Parameters::default(), seed)
    }

    pub fn with_parameters(map: &str, params: Parameters, seed: u64) -> shared::Result<Self> {
        let map: IslandMap = map.parse()?;
        Ok(Self::from_map(map, params, seed)?)
    }

    /// Fails if `params` holds an out-of-range value.
    pub fn from_map(
        map: IslandMap,
        params: Parameters,
        seed: u64,
    ) -> Result<Self, ParameterError> {
        params.validate()?;
        let cells: Vec<Cell> = map.terrain().iter().map(|&t| Cell::new(t, &params)).collect();
        let neighbours = (0..map.len()).map(|i| map.passable_neighbours(i)).collect();

        tracing::info!(
            "Island {}x{} with {} habitable cells (seed {})",
            map.rows(),
            map.cols(),
            cells.iter().filter(|c| c.terrain().is_passable()).count(),
            seed
        );

        Ok(Self {
            map,
            cells,
            neighbours,
            params,
            rng: seeded(seed),
        })
    }

    pub fn rows(&self) -> usize {
        self.map.rows()
    }

    pub fn cols(&self) -> usize {
        self.map.cols()
    }

    pub fn map(&self) -> &IslandMap {
        &self.map
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn set_species_parameters<I, K>(
        &mut self,
        species: Species,
        values: I,
    ) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.params.set_species_parameters(species, values)
    }

    pub fn set_landscape_parameters<I, K>(
        &mut self,
        terrain: Terrain,
        values: I,
    ) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.params.set_landscape_parameters(terrain, values)
    }

    pub fn cell(&self, loc: Loc) -> Option<&Cell> {
        self.map.index_of(loc).map(|i| &self.cells[i])
    }

    pub fn cells(&self) -> impl Iterator<Item = (Loc, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.map.loc_of(i), cell))
    }

    /// Place animals on the island. Entries are applied in order; a bad
    /// entry is rejected whole, but earlier entries stay in place.
    pub fn populate(&mut self, entries: &[PopulationEntry]) -> Result<(), PopulationError> {
        for entry in entries {
            if let Err(err) = self.populate_entry(entry) {
                tracing::warn!("Rejected population entry at {}: {}", entry.loc, err);
                return Err(err);
            }
        }
        Ok(())
    }

    fn populate_entry(&mut self, entry: &PopulationEntry) -> Result<(), PopulationError> {
        let loc = entry.loc;
        let index = self.map.index_of(loc).ok_or(PopulationError::OutOfBounds {
            loc,
            rows: self.rows(),
            cols: self.cols(),
        })?;
        if !self.cells[index].terrain().is_passable() {
            return Err(PopulationError::WaterCell(loc));
        }

        for spec in &entry.pop {
            if let Some(weight) = spec.weight {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(PopulationError::InvalidAnimal {
                        species: spec.species,
                        loc,
                        reason: format!("weight {weight} must be a non-negative number"),
                    });
                }
            }
        }

        let animals: Vec<Animal> = entry
            .pop
            .iter()
            .map(|spec| {
                let weight = match spec.weight {
                    Some(weight) => weight,
                    None => sample_birth_weight(self.params.species(spec.species), &mut self.rng),
                };
                Animal::new(spec.species, spec.age.unwrap_or(0), weight)
            })
            .collect();

        tracing::trace!("Placing {} animals at {}", animals.len(), loc);
        let cell = &mut self.cells[index];
        for animal in animals {
            cell.insert(animal);
        }
        Ok(())
    }

    /// Run one annual cycle and return the island totals afterwards.
    ///
    /// Cells are visited in row-major order: regrow, graze, hunt and
    /// procreate; then everyone who wants to migrates at once; then every
    /// cell ages, metabolizes and culls its dead.
    pub fn advance_year(&mut self) -> PopulationCount {
        let params = &self.params;
        let rng = &mut self.rng;

        for cell in self.cells.iter_mut().filter(|c| c.terrain().is_passable()) {
            cell.regrow(params);
            cell.feed_herbivores(params.species(Species::Herbivore), rng);
            cell.feed_carnivores(params, rng);
            cell.procreate(params, rng);
        }

        self.migrate();

        let params = &self.params;
        let rng = &mut self.rng;
        for cell in self.cells.iter_mut().filter(|c| c.terrain().is_passable()) {
            cell.age_and_metabolize(params);
            cell.die(params, rng);
        }

        self.total_population()
    }

    /// Decide every move against the current state, then apply them all.
    fn migrate(&mut self) {
        let rng = &mut self.rng;
        let mut plans: Vec<(usize, Species, Vec<Option<usize>>)> = Vec::new();

        for (index, cell) in self.cells.iter().enumerate() {
            let exits = &self.neighbours[index];
            if exits.is_empty() {
                continue;
            }
            for species in Species::ALL {
                let species_params = self.params.species(species);
                let destinations: Vec<Option<usize>> = cell
                    .animals(species)
                    .iter()
                    .map(|animal| {
                        if rng.chance(animal.migration_probability(species_params)) {
                            exits.choose(rng).copied()
                        } else {
                            None
                        }
                    })
                    .collect();
                if destinations.iter().any(Option::is_some) {
                    plans.push((index, species, destinations));
                }
            }
        }

        let mut arrivals: BTreeMap<usize, Vec<Animal>> = BTreeMap::new();
        let mut moved = 0usize;
        for (index, species, destinations) in plans {
            let cell = &mut self.cells[index];
            for (animal, destination) in cell.take(species).into_iter().zip(destinations) {
                match destination {
                    Some(to) => {
                        arrivals.entry(to).or_default().push(animal);
                        moved += 1;
                    }
                    None => cell.insert(animal),
                }
            }
        }
        for (index, animals) in arrivals {
            for animal in animals {
                self.cells[index].insert(animal);
            }
        }
        tracing::trace!("{} animals migrated", moved);
    }

    pub fn total_population(&self) -> PopulationCount {
        let mut total = PopulationCount::default();
        for cell in &self.cells {
            total += cell.population();
        }
        total
    }

    /// Head counts for every cell, row-major, water included
    pub fn population_per_cell(&self) -> Vec<CellPopulation> {
        self.cells()
            .map(|(loc, cell)| CellPopulation {
                loc,
                terrain: cell.terrain(),
                herbivores: cell.count(Species::Herbivore),
                carnivores: cell.count(Species::Carnivore),
            })
            .collect()
    }
}
