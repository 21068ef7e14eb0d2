use super::{search::SearchConfig, simulation::SimulationConfig, traits::ConfigSection};
use crate::environment::Environment;
use crate::error::EvacError;
use std::path::{Path, PathBuf};

/// Environment files are sought as `<root>/environments/base-<name>.json`
const ENVIRONMENT_PREFIX: &str = "environments/base-";
const STATS_PREFIX: &str = "ea-stats-";
const TRAINING_DATA_DIR: &str = "trainingData/separatedByRun";
const EA_DATA_DIR: &str = "eaData";
/// Prefix of environment variables overriding search settings
const ENV_OVERRIDE_PREFIX: &str = "EVACOPT";

/// Everything an experiment needs, validated.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub search: SearchConfig,
    pub environment: Environment,
    pub simulation: SimulationConfig,
    pub num_exits: usize,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), EvacError> {
        self.search.validate()?;
        self.environment.validate()?;
        self.simulation.validate()?;
        if self.num_exits == 0 {
            return Err(EvacError::Configuration(
                "Number of exits must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input and output locations of an experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentPaths {
    pub environment_file: PathBuf,
    pub training_data_file: PathBuf,
    pub ea_data_file: PathBuf,
}

impl ExperimentPaths {
    pub fn new<P: AsRef<Path>>(root: P, environment_name: &str, num_exits: usize) -> Self {
        let root = root.as_ref();
        let file_name = format!("{}.json", output_stem(environment_name, num_exits));
        Self {
            environment_file: root.join(format!("{}{}.json", ENVIRONMENT_PREFIX, environment_name)),
            training_data_file: root.join(TRAINING_DATA_DIR).join(&file_name),
            ea_data_file: root.join(EA_DATA_DIR).join(&file_name),
        }
    }
}

/// `ea-stats-<env>_1Door` for a single exit, `ea-stats-<env>_<n>Doors` otherwise.
pub fn output_stem(environment_name: &str, num_exits: usize) -> String {
    let suffix = if num_exits == 1 { "Door" } else { "Doors" };
    format!("{}{}_{}{}", STATS_PREFIX, environment_name, num_exits, suffix)
}

pub struct ConfigManager;

impl ConfigManager {
    /// Load the search configuration. The format follows the file extension
    /// (`.json` or `.toml`); `EVACOPT_<KEY>` variables override file values.
    pub fn load_search<P: AsRef<Path>>(path: P) -> Result<SearchConfig, EvacError> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix(ENV_OVERRIDE_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| {
                EvacError::Configuration(format!("Failed to read {}: {}", path.display(), e))
            })?;

        let search: SearchConfig = settings.try_deserialize().map_err(|e| {
            EvacError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        search.validate()?;
        Ok(search)
    }

    pub fn load_simulation<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, EvacError> {
        load_json_section(path)
    }

    pub fn load_environment<P: AsRef<Path>>(path: P) -> Result<Environment, EvacError> {
        load_json_section(path)
    }

    /// Resolve and load every input of an experiment from its CLI arguments.
    pub fn load_experiment(
        search_path: &Path,
        paths: &ExperimentPaths,
        num_exits: usize,
        simulation_path: &Path,
    ) -> Result<ExperimentConfig, EvacError> {
        let config = ExperimentConfig {
            search: Self::load_search(search_path)?,
            environment: Self::load_environment(&paths.environment_file)?,
            simulation: Self::load_simulation(simulation_path)?,
            num_exits,
        };
        config.validate()?;
        Ok(config)
    }
}

fn load_json_section<T: ConfigSection, P: AsRef<Path>>(path: P) -> Result<T, EvacError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        EvacError::Configuration(format!(
            "Failed to read {} config {}: {}",
            T::section_name(),
            path.display(),
            e
        ))
    })?;

    let section: T = serde_json::from_str(&contents).map_err(|e| {
        EvacError::Configuration(format!(
            "Failed to parse {} config {}: {}",
            T::section_name(),
            path.display(),
            e
        ))
    })?;

    section.validate()?;
    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_output_stem_pluralization() {
        assert_eq!(output_stem("hall", 1), "ea-stats-hall_1Door");
        assert_eq!(output_stem("hall", 3), "ea-stats-hall_3Doors");
    }

    #[test]
    fn test_paths_layout() {
        let paths = ExperimentPaths::new("/data", "hall", 2);
        assert_eq!(paths.environment_file, PathBuf::from("/data/environments/base-hall.json"));
        assert_eq!(
            paths.training_data_file,
            PathBuf::from("/data/trainingData/separatedByRun/ea-stats-hall_2Doors.json")
        );
        assert_eq!(paths.ea_data_file, PathBuf::from("/data/eaData/ea-stats-hall_2Doors.json"));
    }

    #[test]
    fn test_load_search_json_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ea.json");
        fs::write(&path, r#"{"num_runs": 3, "seed": 42, "population_size": 10}"#).unwrap();

        let search = ConfigManager::load_search(&path).unwrap();
        assert_eq!(search.num_runs, 3);
        assert_eq!(search.seed, 42);
        assert_eq!(search.population_size, 10);
        assert_eq!(search.num_generations, SearchConfig::default().num_generations);
    }

    #[test]
    fn test_load_search_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ea.toml");
        fs::write(&path, "num_runs = 2\nseed = 7\nnum_generations = 5\n").unwrap();

        let search = ConfigManager::load_search(&path).unwrap();
        assert_eq!(search.num_runs, 2);
        assert_eq!(search.num_generations, 5);
    }

    #[test]
    fn test_missing_files_are_configuration_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            ConfigManager::load_search(&missing),
            Err(EvacError::Configuration(_))
        ));
        assert!(matches!(
            ConfigManager::load_environment(&missing),
            Err(EvacError::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_simulation_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ConfigManager::load_simulation(&path),
            Err(EvacError::Configuration(_))
        ));
    }
}
