use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::LoadError;
use crate::missions::{FleetPlan, PlanSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFileKind {
    Targets,
    Zones,
    BeamPlan(PlanSource),
    Ephemeris,
}

/// Classifies a reference file by its name.
///
/// Beam plans are routed by marker: `mute` is the spare plan, a dedicated
/// satellite id selects that satellite's plan, `B3` is the alternate-band
/// plan, and anything else is the active plan.
pub fn classify_file(file_name: &str, plan: &FleetPlan) -> Option<DataFileKind> {
    if file_name.contains("TARGETS") {
        return Some(DataFileKind::Targets);
    }
    if file_name.contains("ZONES") {
        return Some(DataFileKind::Zones);
    }
    if file_name.contains("ephemeris") {
        return Some(DataFileKind::Ephemeris);
    }
    if !file_name.contains("BEAMPLAN_LONGFORMAT") {
        return None;
    }

    let source = if file_name.contains("mute") {
        PlanSource::Spare
    } else if let Some(id) = plan.dedicated().find(|id| file_name.contains(id)) {
        PlanSource::Dedicated(id.to_string())
    } else if file_name.contains("B3") {
        PlanSource::AlternateBand
    } else {
        PlanSource::Active
    };
    Some(DataFileKind::BeamPlan(source))
}

/// Reference files found in the data directory, in name order.
#[derive(Debug, Default)]
pub struct DataFiles {
    pub targets: Vec<PathBuf>,
    pub zones: Vec<PathBuf>,
    pub ephemeris: Vec<PathBuf>,
    pub beam_plans: HashMap<PlanSource, PathBuf>,
}

pub fn discover(dir: &Path, plan: &FleetPlan) -> Result<DataFiles, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut files = DataFiles::default();
    for path in paths {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        match classify_file(&name, plan) {
            Some(DataFileKind::Targets) => files.targets.push(path),
            Some(DataFileKind::Zones) => files.zones.push(path),
            Some(DataFileKind::Ephemeris) => files.ephemeris.push(path),
            Some(DataFileKind::BeamPlan(source)) => {
                if let Some(previous) = files.beam_plans.get(&source) {
                    log::warn!(
                        "{} replaces {} as the {} beam plan",
                        path.display(),
                        previous.display(),
                        source
                    );
                }
                files.beam_plans.insert(source, path);
            }
            None => log::debug!("Ignoring {}", path.display()),
        }
    }
    Ok(files)
}
