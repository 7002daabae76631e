use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::{EciState, OrbitalElements, PropagationError, Propagator};

struct Prepared {
    line1: String,
    line2: String,
    elements: Elements,
    constants: Constants,
}

/// [`Propagator`] backed by the `sgp4` crate.
///
/// SGP4 constants are derived once per element set and cached by satellite id
/// until that satellite's TLE lines change.
#[derive(Default)]
pub struct Sgp4Propagator {
    cache: Mutex<HashMap<String, Arc<Prepared>>>,
}

impl Sgp4Propagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and initialises an element set without propagating it.
    pub fn validate(elements: &OrbitalElements) -> Result<(), PropagationError> {
        prepare(elements).map(|_| ())
    }

    fn prepared(&self, elements: &OrbitalElements) -> Result<Arc<Prepared>, PropagationError> {
        if let Some(entry) = self.cache.lock().unwrap().get(&elements.satellite_id) {
            if entry.line1 == elements.line1 && entry.line2 == elements.line2 {
                return Ok(Arc::clone(entry));
            }
        }

        let entry = Arc::new(prepare(elements)?);
        self.cache
            .lock()
            .unwrap()
            .insert(elements.satellite_id.clone(), Arc::clone(&entry));
        Ok(entry)
    }
}

fn prepare(elements: &OrbitalElements) -> Result<Prepared, PropagationError> {
    let invalid = |message: String| PropagationError::InvalidElements {
        satellite: elements.satellite_id.clone(),
        message,
    };

    let parsed = Elements::from_tle(
        elements.name.clone(),
        elements.line1.as_bytes(),
        elements.line2.as_bytes(),
    )
    .map_err(|e| invalid(e.to_string()))?;
    let constants = Constants::from_elements(&parsed).map_err(|e| invalid(e.to_string()))?;

    Ok(Prepared {
        line1: elements.line1.clone(),
        line2: elements.line2.clone(),
        elements: parsed,
        constants,
    })
}

impl Propagator for Sgp4Propagator {
    fn propagate(
        &self,
        elements: &OrbitalElements,
        at: DateTime<Utc>,
    ) -> Result<(EciState, f64), PropagationError> {
        let failed = |message: String| PropagationError::Propagation {
            satellite: elements.satellite_id.clone(),
            message,
        };

        let prepared = self.prepared(elements)?;
        let minutes = prepared
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| failed(e.to_string()))?;
        let prediction = prepared
            .constants
            .propagate(minutes)
            .map_err(|e| failed(e.to_string()))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()));

        let state = EciState {
            position_km: prediction.position,
            velocity_km_s: prediction.velocity,
        };
        if state
            .position_km
            .iter()
            .chain(state.velocity_km_s.iter())
            .any(|v| !v.is_finite())
        {
            return Err(PropagationError::NonFinite(elements.satellite_id.clone()));
        }

        Ok((state, sidereal))
    }
}
