use std::collections::BTreeMap;

use super::{Beam, Mission};

/// Mission-level fields repeated on every beam-plan row.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissionHeader {
    pub config: String,
    pub gateway_target_id: String,
    pub gateway_ob_ant_id: String,
    pub gateway_pointing_max_time: String,
}

/// One row of a long-format beam plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamPlanRow {
    pub satellite_id: String,
    pub mission_id: String,
    pub header: MissionHeader,
    pub beam: Beam,
}

/// Groups beam-plan rows into missions.
///
/// The output does not depend on row order: missions are sorted by id, beams
/// by target id, the header comes from the beam with the smallest target id,
/// and a target listed twice in one mission keeps the greater record.
pub fn group_missions(rows: impl IntoIterator<Item = BeamPlanRow>) -> Vec<Mission> {
    let mut grouped: BTreeMap<String, BTreeMap<String, (MissionHeader, Beam)>> = BTreeMap::new();

    for row in rows {
        let beams = grouped.entry(row.mission_id).or_default();
        let candidate = (row.header, row.beam);
        match beams.get_mut(&candidate.1.id) {
            Some(existing) => {
                if candidate > *existing {
                    *existing = candidate;
                }
            }
            None => {
                beams.insert(candidate.1.id.clone(), candidate);
            }
        }
    }

    grouped
        .into_iter()
        .filter_map(|(id, beams)| {
            let header = beams.values().next()?.0.clone();
            Some(Mission {
                id,
                config: header.config,
                gateway_target_id: header.gateway_target_id,
                gateway_ob_ant_id: header.gateway_ob_ant_id,
                gateway_pointing_max_time: header.gateway_pointing_max_time,
                beams: beams.into_values().map(|(_, beam)| beam).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(mission: &str, target: &str, config: &str, gain: &str) -> BeamPlanRow {
        BeamPlanRow {
            satellite_id: "M001".into(),
            mission_id: mission.into(),
            header: MissionHeader {
                config: config.into(),
                gateway_target_id: format!("GW-{mission}"),
                ..Default::default()
            },
            beam: Beam {
                id: target.into(),
                camp_gain: gain.into(),
                ..Default::default()
            },
        }
    }

    fn rows() -> Vec<BeamPlanRow> {
        vec![
            row("Z2", "T9", "cfg-b", "1"),
            row("Z1", "T3", "cfg-a", "2"),
            row("Z2", "T1", "cfg-c", "3"),
            row("Z1", "T2", "cfg-a", "4"),
            row("Z1", "T3", "cfg-a", "5"),
            row("Z3", "T7", "cfg-d", "6"),
        ]
    }

    /// Every permutation of `items` via Heap's algorithm.
    fn permutations(items: &mut Vec<BeamPlanRow>, k: usize, out: &mut Vec<Vec<BeamPlanRow>>) {
        if k == 1 {
            out.push(items.clone());
            return;
        }
        permutations(items, k - 1, out);
        for i in 0..k - 1 {
            let j = if k % 2 == 0 { i } else { 0 };
            items.swap(j, k - 1);
            permutations(items, k - 1, out);
        }
    }

    #[test]
    fn beams_merge_into_one_mission() {
        let missions = group_missions(rows());
        let ids: Vec<_> = missions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["Z1", "Z2", "Z3"]);

        let z1 = &missions[0];
        let beams: Vec<_> = z1.beams.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(beams, ["T2", "T3"]);
        assert_eq!(z1.gateway_target_id, "GW-Z1");
    }

    #[test]
    fn header_comes_from_smallest_target() {
        let missions = group_missions(rows());
        assert_eq!(missions[1].config, "cfg-c");
    }

    #[test]
    fn duplicate_target_keeps_greater_record() {
        let missions = group_missions(rows());
        let t3 = missions[0].beams.iter().find(|b| b.id == "T3").unwrap();
        assert_eq!(t3.camp_gain, "5");
    }

    #[test]
    fn grouping_ignores_row_order() {
        let expected = group_missions(rows());
        let mut items = rows();
        let n = items.len();
        let mut all = Vec::new();
        permutations(&mut items, n, &mut all);
        assert_eq!(all.len(), 720);
        let distinct: std::collections::HashSet<Vec<String>> = all
            .iter()
            .map(|p| {
                p.iter()
                    .map(|r| format!("{}/{}/{}", r.mission_id, r.beam.id, r.beam.camp_gain))
                    .collect()
            })
            .collect();
        assert_eq!(distinct.len(), 720);
        for permutation in all {
            assert_eq!(group_missions(permutation), expected);
        }
    }

    #[test]
    fn no_rows_no_missions() {
        assert!(group_missions(Vec::new()).is_empty());
    }
}
