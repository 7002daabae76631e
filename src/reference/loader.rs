use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::Serialize;

use super::beamplan::{parse_beam_plan_row, BEAM_PLAN_COLUMNS};
use super::csv_rows::{file_label, read_rows};
use super::discovery::discover;
use super::targets::{parse_target, TargetFeature, TARGET_COLUMNS};
use super::tle::parse_tle;
use super::zone_table::{parse_zone, ZONE_COLUMNS};
use super::LoadError;
use crate::fleet::{FleetContext, SatelliteStaticState};
use crate::missions::{group_missions, BeamPlanRow, FleetPlan, MissionIndex, PlanSource};
use crate::propagation::{OrbitalElements, Sgp4Propagator};
use crate::store::{self, Collection, Store};
use crate::zones::{synthesize_coverage, Zone, ZoneResolver};

/// What a reference load wrote, and everything it had to skip.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub targets: usize,
    pub zones: usize,
    pub catseyes: usize,
    pub satellites: usize,
    pub missions: usize,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub(crate) fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} targets, {} zones, {} catseyes, {} satellites, {} missions, {} warnings",
            self.targets,
            self.zones,
            self.catseyes,
            self.satellites,
            self.missions,
            self.warnings.len()
        )
    }
}

/// In-memory fleet state produced by a load, with its report.
pub struct ReferenceData {
    pub context: FleetContext,
    pub report: LoadReport,
}

/// Reads every reference file in `data_dir` into `store` and builds the
/// fleet context the scheduler runs on.
///
/// Bad rows, blocks and unreadable files are skipped and reported. The load
/// fails only when the store cannot be prepared or written, the directory is
/// missing, or no element set loads at all.
pub fn load(
    data_dir: &Path,
    plan: &FleetPlan,
    store: &dyn Store,
) -> Result<ReferenceData, LoadError> {
    store.ensure_schema()?;
    let files = discover(data_dir, plan)?;
    let mut report = LoadReport::default();

    let targets = read_targets(&files.targets, &mut report);
    report.targets = store::replace_all_json(
        store,
        Collection::Targets,
        targets.iter().map(|t| (t.properties.target_id.as_str(), t)),
    )?;
    log::info!("Targets filled: {}", report.targets);

    let zones = read_zones(&files.zones, &mut report);
    report.zones = store::replace_all_json(
        store,
        Collection::Zones,
        zones.iter().map(|(id, zone)| (id.as_str(), zone)),
    )?;
    log::info!("Zones filled: {}", report.zones);

    let mut catseyes = Vec::new();
    for zone in zones.values() {
        match synthesize_coverage(zone) {
            Ok(feature) => {
                for warning in &feature.warnings {
                    report.warn(format!("Zone {}: {}", zone.zone_id, warning));
                }
                catseyes.push(feature);
            }
            Err(e) => report.warn(format!("Skipping catseye: {}", e)),
        }
    }
    report.catseyes = store::replace_all_json(
        store,
        Collection::Catseyes,
        catseyes.iter().map(|c| (c.properties.zone_id.as_str(), c)),
    )?;
    log::info!("Catseyes filled: {}", report.catseyes);

    let satellites = read_ephemeris(&files.ephemeris, &mut report);
    if satellites.is_empty() {
        return Err(LoadError::NoEphemeris(data_dir.display().to_string()));
    }
    let plans = read_beam_plans(&files.beam_plans, &mut report);

    let mut index = MissionIndex::new();
    let mut fleet = Vec::with_capacity(satellites.len());
    for elements in satellites.into_values() {
        let id = elements.satellite_id.clone();
        let plan_source = plan.plan_source(&id);
        let missions = match &plan_source {
            None => {
                report.warn(format!(
                    "Satellite {} is not in the fleet plan, tracking it without missions",
                    id
                ));
                Vec::new()
            }
            Some(source) => match plans.get(source) {
                Some(rows) => group_missions(rows.iter().filter(|r| r.satellite_id == id).cloned()),
                None => {
                    report.warn(format!("No {} beam plan for satellite {}", source, id));
                    Vec::new()
                }
            },
        };

        index.insert(id.clone(), missions.clone());
        fleet.push(SatelliteStaticState {
            elements,
            category: plan.category(&id),
            plan_source,
            missions,
        });
    }
    report.satellites = store::replace_all_json(
        store,
        Collection::Fleet,
        fleet.iter().map(|s| (s.elements.satellite_id.as_str(), s)),
    )?;
    report.missions = index.mission_count();
    log::info!("Fleet filled: {}", report.satellites);

    let zone_ids: HashSet<&str> = zones.keys().map(String::as_str).collect();
    let unmatched: BTreeSet<&str> = index
        .unmatched_missions(&zone_ids)
        .into_iter()
        .map(|(_, mission)| mission)
        .collect();
    if !unmatched.is_empty() {
        let message = format!(
            "{} mission ids match no zone and can never be active: {}",
            unmatched.len(),
            unmatched.into_iter().collect::<Vec<_>>().join(", ")
        );
        report.warn(message);
    }

    let context = FleetContext {
        satellites: fleet.into_iter().map(|s| s.elements).collect(),
        zones: ZoneResolver::new(zones.into_values().collect()),
        missions: index,
    };
    if context.zones.is_empty() {
        report.warn("No zones loaded, no mission can become active".to_string());
    }

    log::info!("Reference data loaded: {}", report);
    Ok(ReferenceData { context, report })
}

/// Rows of one CSV file, or `None` with a warning when the file is unreadable.
fn rows_or_warn(
    path: &Path,
    min_columns: usize,
    report: &mut LoadReport,
) -> Option<Vec<(u64, StringRecord)>> {
    match read_rows(path, min_columns, report) {
        Ok(rows) => Some(rows),
        Err(e) => {
            report.warn(format!("Skipping {}: {}", file_label(path), e));
            None
        }
    }
}

fn read_targets(paths: &[PathBuf], report: &mut LoadReport) -> Vec<TargetFeature> {
    if paths.is_empty() {
        report.warn("No TARGETS file found".to_string());
    }
    let mut targets = Vec::new();
    for path in paths {
        let Some(rows) = rows_or_warn(path, TARGET_COLUMNS, report) else {
            continue;
        };
        for (line, record) in rows {
            match parse_target(&record) {
                Ok(target) => targets.push(target),
                Err(e) => report.warn(format!("{} line {}: {}", file_label(path), line, e)),
            }
        }
    }
    targets
}

fn read_zones(paths: &[PathBuf], report: &mut LoadReport) -> BTreeMap<String, Zone> {
    if paths.is_empty() {
        report.warn("No ZONES file found".to_string());
    }
    let mut zones = BTreeMap::new();
    for path in paths {
        let Some(rows) = rows_or_warn(path, ZONE_COLUMNS, report) else {
            continue;
        };
        for (line, record) in rows {
            match parse_zone(&record) {
                Ok(zone) => {
                    if zones.insert(zone.zone_id.clone(), zone).is_some() {
                        report.warn(format!(
                            "{} line {}: duplicate zone replaces an earlier row",
                            file_label(path),
                            line
                        ));
                    }
                }
                Err(e) => report.warn(format!("{} line {}: {}", file_label(path), line, e)),
            }
        }
    }
    zones
}

fn read_ephemeris(
    paths: &[PathBuf],
    report: &mut LoadReport,
) -> BTreeMap<String, OrbitalElements> {
    let mut satellites = BTreeMap::new();
    for path in paths {
        let file = file_label(path);
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                report.warn(format!("Skipping {}: {}", file, e));
                continue;
            }
        };
        // Undecodable bytes become U+FFFD and the damaged lines are skipped below.
        let content = String::from_utf8_lossy(&bytes);
        let (elements, skipped) = parse_tle(&content);

        for line in skipped {
            report.warn(format!("{}: skipping line outside a TLE block: {}", file, line));
        }
        for entry in elements {
            if let Err(e) = Sgp4Propagator::validate(&entry) {
                report.warn(format!("{}: {}", file, e));
                continue;
            }
            if let Some(previous) = satellites.insert(entry.satellite_id.clone(), entry) {
                report.warn(format!(
                    "{}: satellite {} listed again, keeping the later element set",
                    file, previous.satellite_id
                ));
            }
        }
    }
    satellites
}

fn read_beam_plans(
    paths: &HashMap<PlanSource, PathBuf>,
    report: &mut LoadReport,
) -> HashMap<PlanSource, Vec<BeamPlanRow>> {
    let mut plans = HashMap::new();
    for (source, path) in paths {
        let Some(records) = rows_or_warn(path, BEAM_PLAN_COLUMNS, report) else {
            continue;
        };
        let mut rows = Vec::new();
        for (line, record) in records {
            match parse_beam_plan_row(&record) {
                Ok(row) => rows.push(row),
                Err(e) => report.warn(format!("{} line {}: {}", file_label(path), line, e)),
            }
        }
        log::debug!("{} beam plan: {} rows from {}", source, rows.len(), path.display());
        plans.insert(source.clone(), rows);
    }
    plans
}
