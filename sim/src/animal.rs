use crate::rng::RngExt;
use rand::Rng;
use shared::{Species, SpeciesParams};

/// Sampled birth weights at or below zero are clamped to this floor.
pub const MIN_BIRTH_WEIGHT: f64 = 1e-3;

/// A single herbivore or carnivore.
///
/// Fitness is never stored: it is computed from age and weight whenever a
/// rule needs it, so it can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    species: Species,
    age: u32,
    weight: f64,
}

impl Animal {
    pub fn new(species: Species, age: u32, weight: f64) -> Self {
        Self {
            species,
            age,
            weight,
        }
    }

    /// Age 0, weight drawn from the species' birth weight distribution
    pub fn newborn<R: Rng + ?Sized>(species: Species, params: &SpeciesParams, rng: &mut R) -> Self {
        Self::new(species, 0, sample_birth_weight(params, rng))
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn fitness(&self, params: &SpeciesParams) -> f64 {
        fitness(self.age, self.weight, params)
    }

    /// Gain weight from `amount` of food or prey
    pub fn eat(&mut self, amount: f64, params: &SpeciesParams) {
        self.weight += params.beta * amount;
    }

    /// One year older, then metabolic weight loss
    pub fn age_and_metabolize(&mut self, params: &SpeciesParams) {
        self.age += 1;
        self.weight -= params.eta * self.weight;
    }

    /// Probability of giving birth when `n` animals of this species share the cell
    pub fn birth_probability(&self, params: &SpeciesParams, n: usize) -> f64 {
        if n < 2 || self.weight < params.birth_threshold() {
            return 0.0;
        }
        (params.gamma * self.fitness(params) * (n - 1) as f64).min(1.0)
    }

    /// Try to give birth. The newborn is only created if the mother can pay
    /// `xi` times its weight without going negative.
    pub fn give_birth<R: Rng + ?Sized>(
        &mut self,
        params: &SpeciesParams,
        rng: &mut R,
    ) -> Option<Animal> {
        let child = Animal::newborn(self.species, params, rng);
        let cost = params.xi * child.weight;
        if cost > self.weight {
            return None;
        }
        self.weight -= cost;
        Some(child)
    }

    pub fn migration_probability(&self, params: &SpeciesParams) -> f64 {
        params.mu * self.fitness(params)
    }

    pub fn death_probability(&self, params: &SpeciesParams) -> f64 {
        if self.weight <= 0.0 {
            1.0
        } else {
            params.omega * (1.0 - self.fitness(params))
        }
    }
}

/// Fitness in [0, 1]: a falling logistic in age times a rising logistic in
/// weight. Zero only for non-positive weight; very old animals bottom out at
/// the smallest positive value instead of underflowing.
pub fn fitness(age: u32, weight: f64, params: &SpeciesParams) -> f64 {
    if weight <= 0.0 {
        return 0.0;
    }
    let age_factor = 1.0 / (1.0 + (params.phi_age * (age as f64 - params.a_half)).exp());
    let weight_factor = 1.0 / (1.0 + (-params.phi_weight * (weight - params.w_half)).exp());
    (age_factor * weight_factor).clamp(f64::MIN_POSITIVE, 1.0)
}

/// Chance that a predator kills one prey attempt.
pub fn kill_probability(predator_fitness: f64, prey_fitness: f64, delta_phi_max: f64) -> f64 {
    let advantage = predator_fitness - prey_fitness;
    if advantage <= 0.0 {
        0.0
    } else if advantage >= delta_phi_max {
        1.0
    } else {
        advantage / delta_phi_max
    }
}

pub fn sample_birth_weight<R: Rng + ?Sized>(params: &SpeciesParams, rng: &mut R) -> f64 {
    rng.normal(params.w_birth, params.sigma_birth)
        .max(MIN_BIRTH_WEIGHT)
}
