use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::missions::{Beam, Mission, MissionIndex};
use crate::propagation::{EciState, OrbitalElements, PropagationError, Propagator};
use crate::zones::{Zone, ZoneResolver};

const RADIUS_KM: f64 = 6378.137 + 8062.0;

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    At(f64),
    Fail,
    Slow(Duration, f64),
}

/// Puts each satellite on the equator at a fixed longitude.
#[derive(Default)]
pub struct FixedPropagator {
    behaviour: HashMap<String, Behaviour>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl FixedPropagator {
    pub fn with(mut self, satellite: &str, behaviour: Behaviour) -> Self {
        self.behaviour.insert(satellite.to_string(), behaviour);
        self
    }

    fn state_at(lon_deg: f64) -> EciState {
        let lon = lon_deg.to_radians();
        EciState {
            position_km: [RADIUS_KM * lon.cos(), RADIUS_KM * lon.sin(), 0.0],
            velocity_km_s: [-5.25 * lon.sin(), 5.25 * lon.cos(), 0.0],
        }
    }
}

impl Propagator for FixedPropagator {
    fn propagate(
        &self,
        elements: &OrbitalElements,
        _at: DateTime<Utc>,
    ) -> Result<(EciState, f64), PropagationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let result = match self.behaviour.get(&elements.satellite_id) {
            Some(Behaviour::At(lon)) => Ok((Self::state_at(*lon), 0.0)),
            Some(Behaviour::Slow(delay, lon)) => {
                std::thread::sleep(*delay);
                Ok((Self::state_at(*lon), 0.0))
            }
            Some(Behaviour::Fail) | None => Err(PropagationError::Propagation {
                satellite: elements.satellite_id.clone(),
                message: "did not converge".into(),
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

pub fn elements(id: &str) -> OrbitalElements {
    OrbitalElements {
        satellite_id: id.into(),
        name: None,
        line1: format!("1 {id}"),
        line2: format!("2 {id}"),
    }
}

pub fn zone(id: &str, start: f64, center: f64, end: f64) -> Zone {
    Zone {
        subregion: "A".into(),
        zone_id: id.into(),
        start_lng: start,
        center_lng: center,
        end_lng: end,
        gateway: "GW1".into(),
    }
}

pub fn mission(id: &str) -> Mission {
    Mission {
        id: id.into(),
        config: "cfg".into(),
        gateway_target_id: "GW1".into(),
        gateway_ob_ant_id: "1".into(),
        gateway_pointing_max_time: "300".into(),
        beams: vec![Beam {
            id: format!("T-{id}"),
            ..Default::default()
        }],
    }
}

/// Zone `Z1` spans 350..30, `Z2` spans 100..140.
pub fn resolver() -> ZoneResolver {
    ZoneResolver::new(vec![zone("Z1", 350.0, 10.0, 30.0), zone("Z2", 100.0, 120.0, 140.0)])
}

pub fn index(satellites: &[&str]) -> MissionIndex {
    let mut index = MissionIndex::new();
    for sat in satellites {
        index.insert(*sat, vec![mission("Z1"), mission("Z2")]);
    }
    index
}
