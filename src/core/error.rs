/// Input the engine refuses to compute anything for.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidArgument {
    #[error("{field} must be {requirement}, got {value}")]
    Scenario { field: &'static str, requirement: &'static str, value: f64 },

    #[error("station `{name}`: {field} must be {requirement}, got {value}")]
    Station { name: String, field: &'static str, requirement: &'static str, value: f64 },

    #[error("authority: {field} must be {requirement}, got {value}")]
    Authority { field: &'static str, requirement: &'static str, value: f64 },

    #[error("the station list is empty")]
    NoStations,
}
