use crate::animal::{kill_probability, Animal};
use crate::rng::RngExt;
use rand::seq::SliceRandom;
use rand::Rng;
use shared::{Parameters, PopulationCount, Species, SpeciesParams, Terrain};

/// One landscape cell: its terrain, fodder stock and resident animals.
///
/// The per-cell phases of the annual cycle live here. The island calls
/// them in a fixed order; migration is handled by the island because it
/// moves animals between cells.
#[derive(Debug, Clone)]
pub struct Cell {
    terrain: Terrain,
    fodder: f64,
    herbivores: Vec<Animal>,
    carnivores: Vec<Animal>,
}

impl Cell {
    pub fn new(terrain: Terrain, params: &Parameters) -> Self {
        Self {
            terrain,
            fodder: params.f_max(terrain),
            herbivores: Vec::new(),
            carnivores: Vec::new(),
        }
    }

    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn fodder(&self) -> f64 {
        self.fodder
    }

    pub fn animals(&self, species: Species) -> &[Animal] {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Carnivore => &self.carnivores,
        }
    }

    fn animals_mut(&mut self, species: Species) -> &mut Vec<Animal> {
        match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Carnivore => &mut self.carnivores,
        }
    }

    pub fn count(&self, species: Species) -> usize {
        self.animals(species).len()
    }

    pub fn population(&self) -> PopulationCount {
        PopulationCount {
            herbivores: self.herbivores.len(),
            carnivores: self.carnivores.len(),
        }
    }

    pub(crate) fn insert(&mut self, animal: Animal) {
        self.animals_mut(animal.species()).push(animal);
    }

    pub(crate) fn take(&mut self, species: Species) -> Vec<Animal> {
        std::mem::take(self.animals_mut(species))
    }

    /// Phase 1: reset fodder to the terrain's maximum.
    pub fn regrow(&mut self, params: &Parameters) {
        if self.terrain.regrows_fodder() {
            self.fodder = params.f_max(self.terrain);
        }
    }

    /// Phase 2: herbivores graze in random order until the fodder runs out.
    pub fn feed_herbivores<R: Rng + ?Sized>(&mut self, params: &SpeciesParams, rng: &mut R) {
        self.herbivores.shuffle(rng);
        for herbivore in &mut self.herbivores {
            let eaten = params.appetite.min(self.fodder);
            if eaten <= 0.0 {
                continue;
            }
            self.fodder -= eaten;
            herbivore.eat(eaten, params);
        }
    }

    /// Phase 3: carnivores hunt in random order, each trying the weakest
    /// herbivores first. Kills leave the cell at once.
    pub fn feed_carnivores<R: Rng + ?Sized>(&mut self, params: &Parameters, rng: &mut R) {
        if self.carnivores.is_empty() || self.herbivores.is_empty() {
            return;
        }
        let hunter = params.species(Species::Carnivore);
        let prey = params.species(Species::Herbivore);

        self.herbivores
            .sort_by(|a, b| a.fitness(prey).total_cmp(&b.fitness(prey)));
        self.carnivores.shuffle(rng);

        for carnivore in &mut self.carnivores {
            let mut eaten = 0.0;
            let mut i = 0;
            while i < self.herbivores.len() && eaten < hunter.appetite {
                let p = kill_probability(
                    carnivore.fitness(hunter),
                    self.herbivores[i].fitness(prey),
                    hunter.delta_phi_max(),
                );
                if rng.chance(p) {
                    let victim = self.herbivores.remove(i);
                    let meal = victim.weight().min(hunter.appetite - eaten);
                    eaten += meal;
                    carnivore.eat(meal, hunter);
                } else {
                    i += 1;
                }
            }
        }
    }

    /// Phase 4: births, judged against the head count before any newborns.
    pub fn procreate<R: Rng + ?Sized>(&mut self, params: &Parameters, rng: &mut R) {
        for species in Species::ALL {
            let species_params = params.species(species);
            let animals = self.animals_mut(species);
            let n = animals.len();
            if n < 2 {
                continue;
            }
            animals.shuffle(rng);

            let mut newborns = Vec::new();
            for mother in animals.iter_mut() {
                if rng.chance(mother.birth_probability(species_params, n)) {
                    if let Some(child) = mother.give_birth(species_params, rng) {
                        newborns.push(child);
                    }
                }
            }
            animals.extend(newborns);
        }
    }

    /// Phase 5
    pub fn age_and_metabolize(&mut self, params: &Parameters) {
        for species in Species::ALL {
            let species_params = params.species(species);
            for animal in self.animals_mut(species) {
                animal.age_and_metabolize(species_params);
            }
        }
    }

    /// Phase 6: starved animals always die, the rest with probability
    /// omega * (1 - fitness).
    pub fn die<R: Rng + ?Sized>(&mut self, params: &Parameters, rng: &mut R) {
        for species in Species::ALL {
            let species_params = params.species(species);
            self.animals_mut(species)
                .retain(|animal| !rng.chance(animal.death_probability(species_params)));
        }
    }
}
