// src/models/route.rs

//! Raw route shapes as returned by the transit API.
//!
//! Nothing here is guaranteed well-formed: every section is optional and a
//! missing one is a validation failure handled downstream, never a
//! deserialization panic.

use serde::{Deserialize, Serialize};

/// Travel direction of a route (`trayecto`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outbound
    Ida,
    /// Return
    Regreso,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ida => "ida",
            Direction::Regreso => "regreso",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operating time window for a direction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScheduleEntry {
    /// Day type (e.g. "Laboral", "Sábado")
    #[serde(rename = "tipoDia", default)]
    pub tipo_dia: Option<String>,

    /// Window start time
    #[serde(default)]
    pub inicio: Option<String>,

    /// Window end time
    #[serde(default)]
    pub fin: Option<String>,
}

/// One stop on a direction's path.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StopEntry {
    /// Stop display name
    #[serde(default)]
    pub name: Option<String>,

    /// District (`comuna`) the stop belongs to
    #[serde(default)]
    pub comuna: Option<String>,

    /// Position as `[latitud, longitud]`; not every stop carries one
    #[serde(default)]
    pub pos: Option<[f64; 2]>,
}

/// One direction of a route: its schedule windows and its stop list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DirectionSection {
    #[serde(default)]
    pub horarios: Option<Vec<ScheduleEntry>>,

    #[serde(default)]
    pub paraderos: Option<Vec<StopEntry>>,
}

/// Raw payload for one route, both directions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutePayload {
    #[serde(default)]
    pub ida: Option<DirectionSection>,

    #[serde(default)]
    pub regreso: Option<DirectionSection>,
}

impl RoutePayload {
    /// The section for a direction, if the payload carries it.
    pub fn section(&self, direction: Direction) -> Option<&DirectionSection> {
        match direction {
            Direction::Ida => self.ida.as_ref(),
            Direction::Regreso => self.regreso.as_ref(),
        }
    }
}

/// The detail endpoint answers with either one route object or a list of
/// them, depending on the service queried.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RouteResponse {
    Many(Vec<RoutePayload>),
    Single(RoutePayload),
}

impl RouteResponse {
    /// Flatten to a uniform sequence of payloads.
    pub fn into_payloads(self) -> Vec<RoutePayload> {
        match self {
            RouteResponse::Many(payloads) => payloads,
            RouteResponse::Single(payload) => vec![payload],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Ida).unwrap(),
            "\"ida\""
        );
        assert_eq!(Direction::Regreso.as_str(), "regreso");
    }

    #[test]
    fn single_object_response() {
        let json = r#"{"ida": {"horarios": [], "paraderos": []}}"#;
        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_payloads().len(), 1);
    }

    #[test]
    fn list_response() {
        let json = r#"[{"ida": {}}, {"regreso": {}}]"#;
        let response: RouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_payloads().len(), 2);
    }

    #[test]
    fn missing_sections_deserialize_as_none() {
        let payload: RoutePayload = serde_json::from_str(r#"{"ida": {}}"#).unwrap();
        assert!(payload.ida.is_some());
        assert!(payload.regreso.is_none());
        let ida = payload.section(Direction::Ida).unwrap();
        assert!(ida.horarios.is_none());
        assert!(ida.paraderos.is_none());
    }

    #[test]
    fn stop_entry_without_pos() {
        let stop: StopEntry =
            serde_json::from_str(r#"{"name": "PA1", "comuna": "Santiago"}"#).unwrap();
        assert!(stop.pos.is_none());
        let stop: StopEntry =
            serde_json::from_str(r#"{"name": "PA2", "pos": [-33.45, -70.66]}"#).unwrap();
        assert_eq!(stop.pos, Some([-33.45, -70.66]));
    }
}
