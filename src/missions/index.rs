use std::collections::{HashMap, HashSet};

use super::Mission;

/// Missions assigned to each satellite.
#[derive(Debug, Clone, Default)]
pub struct MissionIndex {
    by_satellite: HashMap<String, Vec<Mission>>,
}

impl MissionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, satellite_id: impl Into<String>, missions: Vec<Mission>) {
        self.by_satellite.insert(satellite_id.into(), missions);
    }

    pub fn missions(&self, satellite_id: &str) -> &[Mission] {
        self.by_satellite
            .get(satellite_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Missions of `satellite_id` whose id equals one of the matched zone ids.
    pub fn select_active_missions(&self, satellite_id: &str, zone_ids: &[String]) -> Vec<Mission> {
        if zone_ids.is_empty() {
            return Vec::new();
        }
        self.missions(satellite_id)
            .iter()
            .filter(|mission| zone_ids.iter().any(|zone| *zone == mission.id))
            .cloned()
            .collect()
    }

    /// `(satellite, mission)` pairs whose mission id names no known zone.
    /// Such missions can never become active.
    pub fn unmatched_missions<'a>(
        &'a self,
        zone_ids: &HashSet<&str>,
    ) -> Vec<(&'a str, &'a str)> {
        let mut unmatched: Vec<_> = self
            .by_satellite
            .iter()
            .flat_map(|(sat, missions)| missions.iter().map(move |m| (sat.as_str(), m.id.as_str())))
            .filter(|(_, mission)| !zone_ids.contains(mission))
            .collect();
        unmatched.sort_unstable();
        unmatched
    }

    pub fn mission_count(&self) -> usize {
        self.by_satellite.values().map(Vec::len).sum()
    }
}
