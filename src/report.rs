//! Session summary text report.
//!
//! The layout is consumed by existing tooling, so labels, their order and
//! the blank line before the alert count must not change.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::types::SessionSummary;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.metadata;
        writeln!(f, "Nombre: {}", m.name)?;
        writeln!(f, "Operación: {}", m.operation)?;
        writeln!(f, "Material: {}", m.material)?;
        writeln!(f, "Fecha: {}", m.date)?;
        writeln!(f, "Buril: {}", m.tool)?;
        writeln!(f, "Velocidad de corte: {}", m.cutting_speed)?;
        writeln!(f)?;
        write!(f, "Número de alertas: {}", self.alert_count)
    }
}

/// Writes the summary as UTF-8 text, replacing any existing file.
pub fn export_summary<P: AsRef<Path>>(summary: &SessionSummary, path: P) -> Result<PathBuf, ReportError> {
    let path = path.as_ref().to_path_buf();
    match fs::write(&path, summary.to_string()) {
        Ok(()) => {
            info!("Session summary exported to {}", path.display());
            Ok(path)
        }
        Err(source) => {
            error!("Failed to export session summary to {}: {}", path.display(), source);
            Err(ReportError::Write { path, source })
        }
    }
}
