use csv::StringRecord;

use super::csv_rows::cell;
use crate::missions::{Beam, BeamPlanRow, MissionHeader};

pub(crate) const BEAM_PLAN_COLUMNS: usize = 19;

/// Builds one beam-plan row from the long-format table. Column 4 is unused.
pub fn parse_beam_plan_row(record: &StringRecord) -> Result<BeamPlanRow, String> {
    let satellite_id = cell(record, 0);
    let mission_id = cell(record, 1);
    let target_id = cell(record, 8);
    if satellite_id.is_empty() || mission_id.is_empty() || target_id.is_empty() {
        return Err("satID, missionID and targetID must be set".to_string());
    }

    Ok(BeamPlanRow {
        satellite_id,
        mission_id,
        header: MissionHeader {
            config: cell(record, 2),
            gateway_target_id: cell(record, 5),
            gateway_ob_ant_id: cell(record, 6),
            gateway_pointing_max_time: cell(record, 7),
        },
        beam: Beam {
            id: target_id,
            epc_list: cell(record, 3),
            target_ob_ant_id: cell(record, 9),
            target_max_pointing_time: cell(record, 10),
            camp_id: cell(record, 11),
            camp_mode: cell(record, 12),
            camp_gain: cell(record, 13),
            ldla_id: cell(record, 14),
            ldla_mode: cell(record, 15),
            ldla_fca_gain: cell(record, 16),
            ldla_gca_gain: cell(record, 17),
            ldla_sca_gain: cell(record, 18),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_column() {
        let cells: Vec<String> = (0..BEAM_PLAN_COLUMNS).map(|i| format!("c{i}")).collect();
        let row = parse_beam_plan_row(&StringRecord::from(cells)).unwrap();

        assert_eq!(row.satellite_id, "c0");
        assert_eq!(row.mission_id, "c1");
        assert_eq!(row.header.config, "c2");
        assert_eq!(row.beam.epc_list, "c3");
        assert_eq!(row.header.gateway_target_id, "c5");
        assert_eq!(row.header.gateway_ob_ant_id, "c6");
        assert_eq!(row.header.gateway_pointing_max_time, "c7");
        assert_eq!(row.beam.id, "c8");
        assert_eq!(row.beam.target_ob_ant_id, "c9");
        assert_eq!(row.beam.target_max_pointing_time, "c10");
        assert_eq!(row.beam.camp_id, "c11");
        assert_eq!(row.beam.ldla_sca_gain, "c18");
    }

    #[test]
    fn requires_identifiers() {
        let mut cells: Vec<String> = (0..BEAM_PLAN_COLUMNS).map(|i| format!("c{i}")).collect();
        cells[8].clear();
        assert!(parse_beam_plan_row(&StringRecord::from(cells)).is_err());
    }
}
