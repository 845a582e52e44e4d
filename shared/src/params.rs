use crate::error::ParameterError;
use crate::types::{Species, Terrain};
use serde::{Deserialize, Serialize};

/// Biological constants for one species.
///
/// Keys used by the setters follow the field names, except the appetite
/// (`F`) and the predation saturation (`DeltaPhiMax`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Mean birth weight
    pub w_birth: f64,

    /// Standard deviation of birth weight
    pub sigma_birth: f64,

    /// Weight gained per unit of food eaten
    pub beta: f64,

    /// Fraction of weight lost to metabolism each year
    pub eta: f64,

    /// Age at which the age factor of fitness is one half
    pub a_half: f64,

    /// Steepness of the age factor
    pub phi_age: f64,

    /// Weight at which the weight factor of fitness is one half
    pub w_half: f64,

    /// Steepness of the weight factor
    pub phi_weight: f64,

    /// Migration probability scale
    pub mu: f64,

    /// Procreation probability scale
    pub gamma: f64,

    /// Weight cost factor for giving birth, also scales the birth threshold
    pub xi: f64,

    /// Death probability scale
    pub omega: f64,

    /// Appetite
    #[serde(rename = "F")]
    pub appetite: f64,

    /// Fitness difference at which a kill is certain. Carnivores only.
    #[serde(rename = "DeltaPhiMax", default, skip_serializing_if = "Option::is_none")]
    pub delta_phi_max: Option<f64>,
}

impl SpeciesParams {
    pub fn herbivore() -> Self {
        Self {
            w_birth: 8.0,
            sigma_birth: 1.5,
            beta: 0.9,
            eta: 0.05,
            a_half: 40.0,
            phi_age: 0.6,
            w_half: 10.0,
            phi_weight: 0.1,
            mu: 0.25,
            gamma: 0.2,
            xi: 1.2,
            omega: 0.4,
            appetite: 10.0,
            delta_phi_max: None,
        }
    }

    pub fn carnivore() -> Self {
        Self {
            w_birth: 6.0,
            sigma_birth: 1.0,
            beta: 0.75,
            eta: 0.125,
            a_half: 40.0,
            phi_age: 0.3,
            w_half: 4.0,
            phi_weight: 0.4,
            mu: 0.4,
            gamma: 0.8,
            xi: 1.1,
            omega: 0.8,
            appetite: 50.0,
            delta_phi_max: Some(10.0),
        }
    }

    pub fn defaults_for(species: Species) -> Self {
        match species {
            Species::Herbivore => Self::herbivore(),
            Species::Carnivore => Self::carnivore(),
        }
    }

    /// Minimum weight an animal needs before it can give birth.
    pub fn birth_threshold(&self) -> f64 {
        self.xi * (self.w_birth + self.sigma_birth)
    }

    /// Predation saturation; zero for species that do not hunt.
    pub fn delta_phi_max(&self) -> f64 {
        self.delta_phi_max.unwrap_or(0.0)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.slot(key).copied()
    }

    fn slot(&self, key: &str) -> Option<&f64> {
        let value = match key {
            "w_birth" => &self.w_birth,
            "sigma_birth" => &self.sigma_birth,
            "beta" => &self.beta,
            "eta" => &self.eta,
            "a_half" => &self.a_half,
            "phi_age" => &self.phi_age,
            "w_half" => &self.w_half,
            "phi_weight" => &self.phi_weight,
            "mu" => &self.mu,
            "gamma" => &self.gamma,
            "xi" => &self.xi,
            "omega" => &self.omega,
            "F" => &self.appetite,
            "DeltaPhiMax" => return self.delta_phi_max.as_ref(),
            _ => return None,
        };
        Some(value)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut f64> {
        let value = match key {
            "w_birth" => &mut self.w_birth,
            "sigma_birth" => &mut self.sigma_birth,
            "beta" => &mut self.beta,
            "eta" => &mut self.eta,
            "a_half" => &mut self.a_half,
            "phi_age" => &mut self.phi_age,
            "w_half" => &mut self.w_half,
            "phi_weight" => &mut self.phi_weight,
            "mu" => &mut self.mu,
            "gamma" => &mut self.gamma,
            "xi" => &mut self.xi,
            "omega" => &mut self.omega,
            "F" => &mut self.appetite,
            "DeltaPhiMax" => return self.delta_phi_max.as_mut(),
            _ => return None,
        };
        Some(value)
    }

    fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = vec![
            ("w_birth", self.w_birth),
            ("sigma_birth", self.sigma_birth),
            ("beta", self.beta),
            ("eta", self.eta),
            ("a_half", self.a_half),
            ("phi_age", self.phi_age),
            ("w_half", self.w_half),
            ("phi_weight", self.phi_weight),
            ("mu", self.mu),
            ("gamma", self.gamma),
            ("xi", self.xi),
            ("omega", self.omega),
            ("F", self.appetite),
        ];
        if let Some(delta) = self.delta_phi_max {
            entries.push(("DeltaPhiMax", delta));
        }
        entries
    }

    /// Check every value against its allowed range.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (key, value) in self.entries() {
            check_non_negative(key, value)?;
        }
        check_at_most("eta", self.eta, 1.0, "metabolic loss fraction must not exceed 1")?;
        check_at_most("mu", self.mu, 1.0, "migration scale must not exceed 1")?;
        check_at_most("omega", self.omega, 1.0, "death scale must not exceed 1")?;
        check_at_most(
            "sigma_birth",
            self.sigma_birth,
            self.w_birth,
            "birth weight deviation must not exceed the mean",
        )?;
        if let Some(delta) = self.delta_phi_max {
            if delta <= 0.0 {
                return Err(ParameterError::OutOfRange {
                    key: "DeltaPhiMax".to_string(),
                    value: delta,
                    reason: "must be strictly positive",
                });
            }
        }
        Ok(())
    }
}

/// Fodder settings for a regrowing landscape type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandscapeParams {
    pub f_max: f64,
}

/// The parameter store.
///
/// Reads hand out shared references; the only way to change a value is
/// through [`Parameters::set_species_parameters`] and
/// [`Parameters::set_landscape_parameters`], both all-or-nothing.
/// A deserialized store is validated before it is handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParametersRecord")]
pub struct Parameters {
    herbivore: SpeciesParams,
    carnivore: SpeciesParams,
    lowland: LandscapeParams,
    highland: LandscapeParams,
}

/// Unchecked wire form of [`Parameters`]
#[derive(Deserialize)]
struct ParametersRecord {
    herbivore: SpeciesParams,
    carnivore: SpeciesParams,
    lowland: LandscapeParams,
    highland: LandscapeParams,
}

impl TryFrom<ParametersRecord> for Parameters {
    type Error = ParameterError;

    fn try_from(record: ParametersRecord) -> Result<Self, Self::Error> {
        let params = Parameters {
            herbivore: record.herbivore,
            carnivore: record.carnivore,
            lowland: record.lowland,
            highland: record.highland,
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            herbivore: SpeciesParams::defaults_for(Species::Herbivore),
            carnivore: SpeciesParams::defaults_for(Species::Carnivore),
            lowland: LandscapeParams { f_max: 800.0 },
            highland: LandscapeParams { f_max: 300.0 },
        }
    }
}

impl Parameters {
    pub fn species(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Herbivore => &self.herbivore,
            Species::Carnivore => &self.carnivore,
        }
    }

    pub fn landscape(&self, terrain: Terrain) -> Option<&LandscapeParams> {
        match terrain {
            Terrain::Lowland => Some(&self.lowland),
            Terrain::Highland => Some(&self.highland),
            Terrain::Water | Terrain::Desert => None,
        }
    }

    /// Check the whole store: both species and every fodder maximum.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.herbivore.delta_phi_max.is_some() {
            return Err(ParameterError::UnknownKey {
                owner: Species::Herbivore.to_string(),
                key: "DeltaPhiMax".to_string(),
            });
        }
        if self.carnivore.delta_phi_max.is_none() {
            return Err(ParameterError::OutOfRange {
                key: "DeltaPhiMax".to_string(),
                value: 0.0,
                reason: "carnivores need a predation saturation",
            });
        }
        self.herbivore.validate()?;
        self.carnivore.validate()?;
        check_non_negative("f_max", self.lowland.f_max)?;
        check_non_negative("f_max", self.highland.f_max)
    }

    /// Fodder a cell of this terrain holds right after regrowth.
    pub fn f_max(&self, terrain: Terrain) -> f64 {
        self.landscape(terrain).map_or(0.0, |p| p.f_max)
    }

    /// Override some parameters of a species.
    ///
    /// Unknown keys or out-of-range values reject the whole update.
    pub fn set_species_parameters<I, K>(
        &mut self,
        species: Species,
        values: I,
    ) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut updated = self.species(species).clone();
        for (key, value) in values {
            let key = key.as_ref();
            let slot = updated
                .slot_mut(key)
                .ok_or_else(|| ParameterError::UnknownKey {
                    owner: species.to_string(),
                    key: key.to_string(),
                })?;
            *slot = value;
        }
        updated.validate()?;

        match species {
            Species::Herbivore => self.herbivore = updated,
            Species::Carnivore => self.carnivore = updated,
        }
        Ok(())
    }

    /// Override the fodder parameters of a regrowing landscape type.
    pub fn set_landscape_parameters<I, K>(
        &mut self,
        terrain: Terrain,
        values: I,
    ) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let stored = match terrain {
            Terrain::Lowland => &mut self.lowland,
            Terrain::Highland => &mut self.highland,
            Terrain::Water | Terrain::Desert => {
                return Err(ParameterError::NoFodderParameter(terrain))
            }
        };
        let mut updated = stored.clone();
        for (key, value) in values {
            match key.as_ref() {
                "f_max" => {
                    check_non_negative("f_max", value)?;
                    updated.f_max = value;
                }
                other => {
                    return Err(ParameterError::UnknownKey {
                        owner: format!("landscape {terrain}"),
                        key: other.to_string(),
                    })
                }
            }
        }

        *stored = updated;
        Ok(())
    }
}

fn check_non_negative(key: &str, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::OutOfRange {
            key: key.to_string(),
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(ParameterError::OutOfRange {
            key: key.to_string(),
            value,
            reason: "must be non-negative",
        });
    }
    Ok(())
}

fn check_at_most(
    key: &str,
    value: f64,
    max: f64,
    reason: &'static str,
) -> Result<(), ParameterError> {
    if value > max {
        return Err(ParameterError::OutOfRange {
            key: key.to_string(),
            value,
            reason,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = Parameters::default();
        assert!(params.species(Species::Herbivore).validate().is_ok());
        assert!(params.species(Species::Carnivore).validate().is_ok());
        assert_eq!(params.f_max(Terrain::Lowland), 800.0);
        assert_eq!(params.f_max(Terrain::Highland), 300.0);
        assert_eq!(params.f_max(Terrain::Desert), 0.0);
        assert_eq!(params.f_max(Terrain::Water), 0.0);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let mut params = Parameters::default();
        params
            .set_species_parameters(Species::Herbivore, [("F", 20.0), ("beta", 0.5)])
            .unwrap();

        let herbivore = params.species(Species::Herbivore);
        assert_eq!(herbivore.appetite, 20.0);
        assert_eq!(herbivore.beta, 0.5);
        assert_eq!(herbivore.w_birth, 8.0);
        assert_eq!(params.species(Species::Carnivore), &SpeciesParams::carnivore());
    }

    #[test]
    fn test_unknown_key_leaves_store_unchanged() {
        let mut params = Parameters::default();
        let before = params.clone();

        let err = params
            .set_species_parameters(Species::Herbivore, [("F", 20.0), ("zeta", 3.5)])
            .unwrap_err();

        assert!(matches!(err, ParameterError::UnknownKey { ref key, .. } if key == "zeta"));
        assert_eq!(params, before);
        assert_eq!(params.species(Species::Herbivore).get("F"), Some(10.0));
    }

    #[test]
    fn test_herbivore_has_no_delta_phi_max() {
        let mut params = Parameters::default();
        let err = params
            .set_species_parameters(Species::Herbivore, [("DeltaPhiMax", 5.0)])
            .unwrap_err();
        assert!(matches!(err, ParameterError::UnknownKey { .. }));

        params
            .set_species_parameters(Species::Carnivore, [("DeltaPhiMax", 5.0)])
            .unwrap();
        assert_eq!(params.species(Species::Carnivore).delta_phi_max(), 5.0);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut params = Parameters::default();
        let before = params.clone();

        for (key, value) in [
            ("beta", -0.1),
            ("eta", 1.5),
            ("w_birth", f64::NAN),
            ("mu", f64::INFINITY),
            ("mu", 1.5),
            ("omega", 2.0),
            ("sigma_birth", 9.0),
        ] {
            let err = params
                .set_species_parameters(Species::Herbivore, [(key, value)])
                .unwrap_err();
            assert!(matches!(err, ParameterError::OutOfRange { .. }), "{key}");
        }
        assert!(params
            .set_species_parameters(Species::Carnivore, [("DeltaPhiMax", 0.0)])
            .is_err());
        assert_eq!(params, before);
    }

    #[test]
    fn test_landscape_parameters() {
        let mut params = Parameters::default();
        params
            .set_landscape_parameters(Terrain::Lowland, [("f_max", 500.0)])
            .unwrap();
        assert_eq!(params.f_max(Terrain::Lowland), 500.0);

        assert_eq!(
            params.set_landscape_parameters(Terrain::Water, [("f_max", 10.0)]),
            Err(ParameterError::NoFodderParameter(Terrain::Water))
        );
        assert!(params
            .set_landscape_parameters(Terrain::Desert, [("f_max", 10.0)])
            .is_err());
        assert!(params
            .set_landscape_parameters(Terrain::Highland, [("f_max", -1.0)])
            .is_err());
        assert!(params
            .set_landscape_parameters(Terrain::Highland, [("alpha", 0.3)])
            .is_err());
        assert_eq!(params.f_max(Terrain::Highland), 300.0);
    }

    #[test]
    fn test_birth_threshold() {
        let herbivore = SpeciesParams::herbivore();
        assert!((herbivore.birth_threshold() - 1.2 * 9.5).abs() < 1e-12);
    }

    #[test]
    fn test_species_params_json_keys() {
        let json = serde_json::to_value(SpeciesParams::carnivore()).unwrap();
        assert_eq!(json["F"], 50.0);
        assert_eq!(json["DeltaPhiMax"], 10.0);

        let json = serde_json::to_value(SpeciesParams::herbivore()).unwrap();
        assert!(json.get("DeltaPhiMax").is_none());
    }

    #[test]
    fn test_store_round_trips_through_json() {
        let json = serde_json::to_string(&Parameters::default()).unwrap();
        let params: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, Parameters::default());
    }

    #[test]
    fn test_invalid_store_rejected_on_load() {
        let mut json = serde_json::to_value(Parameters::default()).unwrap();
        json["herbivore"]["eta"] = 5.0.into();
        let err = serde_json::from_value::<Parameters>(json).unwrap_err();
        assert!(err.to_string().contains("eta"), "{err}");

        let mut json = serde_json::to_value(Parameters::default()).unwrap();
        json["lowland"]["f_max"] = (-100.0).into();
        assert!(serde_json::from_value::<Parameters>(json).is_err());

        let mut json = serde_json::to_value(Parameters::default()).unwrap();
        json["herbivore"]["DeltaPhiMax"] = 3.0.into();
        assert!(serde_json::from_value::<Parameters>(json).is_err());

        let mut json = serde_json::to_value(Parameters::default()).unwrap();
        json["carnivore"]
            .as_object_mut()
            .unwrap()
            .remove("DeltaPhiMax");
        assert!(serde_json::from_value::<Parameters>(json).is_err());
    }
}
