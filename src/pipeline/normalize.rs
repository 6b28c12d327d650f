// src/pipeline/normalize.rs

//! Route validation and normalization.
//!
//! Turns one raw [`RoutePayload`] into flat stop and schedule rows, or a
//! single [`RouteError`] describing why the route is unusable. A route
//! either contributes all of its rows or none of them.

use thiserror::Error;

use crate::models::{
    Direction, DirectionSection, RoutePayload, ScheduleEntry, ScheduleRow, StopEntry, StopRow,
};

/// Why one route produced no rows.
///
/// These are data, not control flow: the batch accumulator converts each
/// one into a record of the errors dataset and moves on to the next route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Non-success HTTP status or transport error from the detail endpoint
    #[error("fetch failed")]
    Fetch,

    /// `ida.horarios` absent
    #[error("missing ida schedule")]
    MissingIdaSchedule,

    /// `ida.paraderos` absent
    #[error("missing ida stops")]
    MissingIdaStops,

    /// `regreso.horarios` absent
    #[error("missing regreso schedule")]
    MissingRegresoSchedule,

    /// `regreso.paraderos` absent
    #[error("missing regreso stops")]
    MissingRegresoStops,

    /// A direction's stop list carries no position at all
    #[error("no stop position found for {0}")]
    NoPositionFound(Direction),

    /// Payload is neither a route object nor a list of route objects
    #[error("unexpected payload shape")]
    UnexpectedShape,
}

/// Validate one route payload and flatten it into rows.
///
/// Validation order is fixed and the first failure wins: ida schedule, ida
/// stops, regreso schedule, regreso stops. A payload missing a whole
/// direction fails at the first check that needs it, so a payload without a
/// `regreso` key reports [`RouteError::MissingRegresoSchedule`].
pub fn normalize(
    payload: &RoutePayload,
    route: &str,
) -> Result<(Vec<StopRow>, Vec<ScheduleRow>), RouteError> {
    let ida_schedule = section_schedule(payload, Direction::Ida)
        .ok_or(RouteError::MissingIdaSchedule)?;
    let ida_stops = section_stops(payload, Direction::Ida).ok_or(RouteError::MissingIdaStops)?;
    let regreso_schedule = section_schedule(payload, Direction::Regreso)
        .ok_or(RouteError::MissingRegresoSchedule)?;
    let regreso_stops =
        section_stops(payload, Direction::Regreso).ok_or(RouteError::MissingRegresoStops)?;

    let mut stops = stop_rows(ida_stops, route, Direction::Ida)?;
    stops.extend(stop_rows(regreso_stops, route, Direction::Regreso)?);

    let mut schedules = schedule_rows(ida_schedule, route, Direction::Ida);
    schedules.extend(schedule_rows(regreso_schedule, route, Direction::Regreso));

    Ok((stops, schedules))
}

fn section_schedule(payload: &RoutePayload, direction: Direction) -> Option<&[ScheduleEntry]> {
    payload
        .section(direction)
        .and_then(|s: &DirectionSection| s.horarios.as_deref())
}

fn section_stops(payload: &RoutePayload, direction: Direction) -> Option<&[StopEntry]> {
    payload
        .section(direction)
        .and_then(|s: &DirectionSection| s.paraderos.as_deref())
}

/// Flatten one direction's stop list.
///
/// Coordinates come from the last position-bearing stop of the list and are
/// broadcast to every row of the direction. That is the upstream producer's
/// established output and consumers depend on it; do not switch to per-stop
/// coordinates without coordinating downstream.
fn stop_rows(
    entries: &[StopEntry],
    route: &str,
    direction: Direction,
) -> Result<Vec<StopRow>, RouteError> {
    let [latitud, longitud] = entries
        .iter()
        .rev()
        .find_map(|stop| stop.pos)
        .ok_or(RouteError::NoPositionFound(direction))?;

    Ok(entries
        .iter()
        .map(|stop| StopRow {
            recorrido: route.to_string(),
            trayecto: direction,
            name: stop.name.clone().unwrap_or_default(),
            comuna: stop.comuna.clone().unwrap_or_default(),
            latitud,
            longitud,
        })
        .collect())
}

fn schedule_rows(entries: &[ScheduleEntry], route: &str, direction: Direction) -> Vec<ScheduleRow> {
    entries
        .iter()
        .map(|entry| ScheduleRow {
            recorrido: route.to_string(),
            trayecto: direction,
            tipo_dia: entry.tipo_dia.clone().unwrap_or_default(),
            inicio: entry.inicio.clone().unwrap_or_default(),
            fin: entry.fin.clone().unwrap_or_default(),
        })
        .collect()
}
