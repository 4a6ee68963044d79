//! Core runtime configuration.
//!
//! The server binary reads its environment exactly once, builds a
//! [`CoreConfig`], and hands it to the services it constructs. Request
//! handlers and tests therefore never touch `std::env`, so two requests (or
//! two tests running in parallel) can never observe different settings.

use std::path::{Path, PathBuf};

const PRESCRIPTIONS_DIR_NAME: &str = "prescricoes";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    reference_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `data_dir` is the root directory for durable documents; it is created
    /// on demand when the store is opened. `reference_path` points at the
    /// semicolon-delimited medication reference dataset.
    pub fn new(data_dir: PathBuf, reference_path: PathBuf) -> Self {
        Self {
            data_dir,
            reference_path,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding one JSON document per prescription.
    pub fn prescriptions_dir(&self) -> PathBuf {
        self.data_dir.join(PRESCRIPTIONS_DIR_NAME)
    }

    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }
}
