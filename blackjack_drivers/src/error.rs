use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    #[error("unknown button {0:?}")]
    UnknownButton(String),
    #[error("invalid coordinate {0:?}, expected \"x, y\"")]
    InvalidCoordinate(String),
    #[error("command is empty")]
    EmptyCommand,
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: ExitStatus },
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("cannot find home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, Error>;
