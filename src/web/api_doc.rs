use utoipa::OpenApi;

use super::api::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::fleet::list_satellites,
        super::api::fleet::get_satellite,
        super::api::fleet::get_fleet_member,
        super::api::fleet::scheduler_status,
        super::api::reference::list_zones,
        super::api::reference::list_catseyes,
        super::api::reference::get_catseye,
        super::api::reference::list_targets,
    ),
    components(
        schemas(
            ErrorResponse,
            crate::fleet::LiveSatelliteFeature,
            crate::fleet::SatelliteStaticState,
            crate::fleet::SchedulerStatus,
            crate::fleet::PassReport,
            crate::zones::Zone,
            crate::zones::CatseyeFeature,
            crate::reference::TargetFeature,
            crate::missions::Mission,
            crate::missions::Beam,
        )
    ),
    info(
        title = "Fleetmap API",
        description = "Read-only view of the fleet's live positions, missions and zones",
        version = "0.1.0"
    ),
    tags(
        (name = "fleet", description = "Satellite positions and scheduler state"),
        (name = "reference", description = "Zones, coverage polygons and targets")
    )
)]
pub struct ApiDoc;
