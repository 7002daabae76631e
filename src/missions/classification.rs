use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Spare,
    Active,
    AlternateBand,
}

/// Which beam-plan file a satellite's missions are read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    Spare,
    Active,
    AlternateBand,
    Dedicated(String),
}

impl PlanSource {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Spare => PlanSource::Spare,
            Category::Active => PlanSource::Active,
            Category::AlternateBand => PlanSource::AlternateBand,
        }
    }
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSource::Spare => f.write_str("spare"),
            PlanSource::Active => f.write_str("active"),
            PlanSource::AlternateBand => f.write_str("alternate_band"),
            PlanSource::Dedicated(id) => write!(f, "dedicated:{}", id),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ClassificationError {
    #[error("satellite {satellite} is listed as both {first} and {second}")]
    Overlap {
        satellite: String,
        first: Category,
        second: Category,
    },
    #[error("satellite {0} has a dedicated plan but is not in an active category")]
    DedicatedNotActive(String),
}

/// Category membership as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetPlanConfig {
    pub spare: Vec<String>,
    pub active: Vec<String>,
    pub alternate_band: Vec<String>,
    pub dedicated: Vec<String>,
}

impl Default for FleetPlanConfig {
    fn default() -> Self {
        let ids = |range: std::ops::RangeInclusive<u32>| {
            range.map(|n| format!("M{:03}", n)).collect::<Vec<_>>()
        };
        let mut active = vec!["M001".to_string(), "M003".to_string()];
        active.extend(ids(6..=12));

        Self {
            spare: vec!["M002".into(), "M004".into(), "M005".into()],
            active,
            alternate_band: ids(13..=16),
            dedicated: vec!["M001".into(), "M013".into()],
        }
    }
}

/// Lookup table from satellite id to category and beam-plan source.
#[derive(Debug, Clone)]
pub struct FleetPlan {
    categories: HashMap<String, Category>,
    dedicated: HashSet<String>,
}

impl FleetPlan {
    pub fn from_config(config: &FleetPlanConfig) -> Result<Self, ClassificationError> {
        let mut categories = HashMap::new();
        let members = [
            (Category::Spare, &config.spare),
            (Category::Active, &config.active),
            (Category::AlternateBand, &config.alternate_band),
        ];

        for (category, ids) in members {
            for id in ids {
                if let Some(first) = categories.insert(id.clone(), category) {
                    if first != category {
                        return Err(ClassificationError::Overlap {
                            satellite: id.clone(),
                            first,
                            second: category,
                        });
                    }
                }
            }
        }

        for id in &config.dedicated {
            match categories.get(id) {
                Some(Category::Active | Category::AlternateBand) => {}
                _ => return Err(ClassificationError::DedicatedNotActive(id.clone())),
            }
        }

        Ok(Self {
            categories,
            dedicated: config.dedicated.iter().cloned().collect(),
        })
    }

    pub fn category(&self, satellite_id: &str) -> Option<Category> {
        self.categories.get(satellite_id).copied()
    }

    /// The category's plan, unless the satellite has a dedicated one.
    pub fn plan_source(&self, satellite_id: &str) -> Option<PlanSource> {
        let category = self.category(satellite_id)?;
        if self.dedicated.contains(satellite_id) {
            Some(PlanSource::Dedicated(satellite_id.to_string()))
        } else {
            Some(PlanSource::for_category(category))
        }
    }

    pub fn dedicated(&self) -> impl Iterator<Item = &str> {
        self.dedicated.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("M002", Category::Spare, PlanSource::Spare)]
    #[case("M005", Category::Spare, PlanSource::Spare)]
    #[case("M001", Category::Active, PlanSource::Dedicated("M001".into()))]
    #[case("M003", Category::Active, PlanSource::Active)]
    #[case("M012", Category::Active, PlanSource::Active)]
    #[case("M013", Category::AlternateBand, PlanSource::Dedicated("M013".into()))]
    #[case("M016", Category::AlternateBand, PlanSource::AlternateBand)]
    fn default_table(#[case] id: &str, #[case] category: Category, #[case] source: PlanSource) {
        let plan = FleetPlan::from_config(&FleetPlanConfig::default()).unwrap();
        assert_eq!(plan.category(id), Some(category));
        assert_eq!(plan.plan_source(id), Some(source));
    }

    #[test]
    fn unknown_satellite_has_no_plan() {
        let plan = FleetPlan::from_config(&FleetPlanConfig::default()).unwrap();
        assert_eq!(plan.category("M099"), None);
        assert_eq!(plan.plan_source("M099"), None);
    }

    #[test]
    fn overlapping_categories_are_rejected() {
        let mut config = FleetPlanConfig::default();
        config.spare.push("M003".into());
        let err = FleetPlan::from_config(&config).unwrap_err();
        assert!(matches!(err, ClassificationError::Overlap { .. }));
    }

    #[test]
    fn dedicated_spare_is_rejected() {
        let mut config = FleetPlanConfig::default();
        config.dedicated.push("M002".into());
        assert_eq!(
            FleetPlan::from_config(&config).unwrap_err(),
            ClassificationError::DedicatedNotActive("M002".into())
        );
    }

    #[test]
    fn plan_source_display() {
        assert_eq!(PlanSource::AlternateBand.to_string(), "alternate_band");
        assert_eq!(PlanSource::Dedicated("M001".into()).to_string(), "dedicated:M001");
        assert_eq!(Category::AlternateBand.to_string(), "alternate_band");
    }
}
