/// Argument parsing and the solve/report pipeline.
pub mod cli;

/// `env_logger` setup.
pub mod logger;
