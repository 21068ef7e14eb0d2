use crate::error::{EvacError, Result};
use std::path::PathBuf;

/// Positional arguments of the experiment driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverArgs {
    pub search_config: PathBuf,
    pub environment_name: String,
    pub num_exits: usize,
    pub simulation_config: PathBuf,
}

impl DriverArgs {
    /// Parse arguments without the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        if args.len() < 4 {
            return Err(EvacError::Usage(format!(
                "expected 4 arguments, got {}",
                args.len()
            )));
        }
        let num_exits = args[2]
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                EvacError::Usage(format!("<num-exits> must be a positive integer, got '{}'", args[2]))
            })?;

        Ok(Self {
            search_config: PathBuf::from(&args[0]),
            environment_name: args[1].clone(),
            num_exits,
            simulation_config: PathBuf::from(&args[3]),
        })
    }

    pub fn usage(program: &str) -> String {
        format!(
            "Required parameters: {} <search-configuration> <environment-name> <num-exits> <simulation-configuration>\n\n\
             The environment is sought as environments/base-<environment-name>.json,\n\
             run traces are written to trainingData/separatedByRun/ea-stats-<environment-name>_<num-exits>Door(s).json\n\
             and statistics to eaData/ea-stats-<environment-name>_<num-exits>Door(s).json",
            program
        )
    }
}

/// Positional arguments of the trace-to-CSV converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterArgs {
    pub output_dir: String,
    pub input_dir: String,
    pub file_stem: String,
}

impl ConverterArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        if args.len() < 3 {
            return Err(EvacError::Usage(format!(
                "expected 3 arguments, got {}",
                args.len()
            )));
        }
        Ok(Self {
            output_dir: args[0].clone(),
            input_dir: args[1].clone(),
            file_stem: args[2].clone(),
        })
    }

    /// `<input-dir><file-stem>.json`; directories are used as plain prefixes
    pub fn input_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}.json", self.input_dir, self.file_stem))
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}.csv", self.output_dir, self.file_stem))
    }

    pub fn usage(program: &str) -> String {
        format!(
            "Required parameters: {} <path-to-save-file> <path-to-read-file> <file-name-to-convert>\n\n\
             The trace is read from <path-to-read-file><file-name-to-convert>.json\n\
             and the table is written to <path-to-save-file><file-name-to-convert>.csv",
            program
        )
    }
}
