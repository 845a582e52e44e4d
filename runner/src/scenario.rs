use anyhow::{Context, Result};
use shared::{ParameterOverrides, PopulationEntry, SimulationReport, SimulationRequest};
use std::fs;
use std::path::Path;

/// Build a simulation request from files on disk.
pub fn load_request(
    map_path: &Path,
    population_path: &Path,
    params_path: Option<&Path>,
    seed: u64,
    years: u32,
) -> Result<SimulationRequest> {
    let map = fs::read_to_string(map_path)
        .with_context(|| format!("Failed to read map {}", map_path.display()))?;
    let population_json = fs::read_to_string(population_path)
        .with_context(|| format!("Failed to read population {}", population_path.display()))?;
    let population = parse_population(&population_json)?;

    let overrides = match params_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read parameters {}", path.display()))?;
            parse_overrides(&text)?
        }
        None => ParameterOverrides::default(),
    };

    Ok(SimulationRequest {
        map,
        population,
        seed,
        years,
        overrides,
    })
}

pub fn parse_population(json: &str) -> Result<Vec<PopulationEntry>> {
    serde_json::from_str(json).context("Failed to parse population specification")
}

pub fn parse_overrides(json: &str) -> Result<ParameterOverrides> {
    serde_json::from_str(json).context("Failed to parse parameter overrides")
}

/// Plain-text table of the yearly totals
pub fn format_history(report: &SimulationReport) -> String {
    let mut out = format!("{:>6} {:>11} {:>11}\n", "year", "herbivores", "carnivores");
    for record in &report.history {
        out.push_str(&format!(
            "{:>6} {:>11} {:>11}\n",
            record.year, record.herbivores, record.carnivores
        ));
    }
    out
}

pub fn write_report(path: &Path, report: &SimulationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Loc, Species, YearRecord};

    fn report_with(history: Vec<YearRecord>) -> SimulationReport {
        SimulationReport {
            run_id: Default::default(),
            seed: 0,
            history,
            distribution: Vec::new(),
        }
    }

    #[test]
    fn test_parse_population() {
        let json = r#"[{"loc": [2, 3], "pop": [{"species": "Carnivore", "age": 2, "weight": 9.5}]}]"#;
        let entries = parse_population(json).unwrap();
        assert_eq!(entries[0].loc, Loc(2, 3));
        assert_eq!(entries[0].pop[0].species, Species::Carnivore);
        assert_eq!(entries[0].pop[0].weight, Some(9.5));
    }

    #[test]
    fn test_parse_population_rejects_unknown_species() {
        let json = r#"[{"loc": [2, 3], "pop": [{"species": "Dragon"}]}]"#;
        let err = parse_population(json).unwrap_err();
        assert!(format!("{err:#}").contains("unknown species 'Dragon'"));
    }

    #[test]
    fn test_parse_overrides() {
        let overrides = parse_overrides(r#"{"herbivore": {"F": 12.0}}"#).unwrap();
        assert_eq!(overrides.herbivore.get("F"), Some(&12.0));
        assert!(overrides.carnivore.is_empty());
    }

    #[test]
    fn test_format_history() {
        let table = format_history(&report_with(vec![
            YearRecord {
                year: 0,
                herbivores: 50,
                carnivores: 0,
            },
            YearRecord {
                year: 1,
                herbivores: 61,
                carnivores: 0,
            },
        ]));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("herbivores"));
        assert!(lines[2].trim_start().starts_with('1'));
        assert!(lines[2].contains("61"));
    }
}
