//! Incident aggregator: merges explicit incidents, live-provider
//! incidents, and a reason-derived synthetic incident into the single
//! most-severe incident the reoptimize path will cost against.

use crate::domain::types::{Incident, IncidentKind};

/// `explicit` incidents are indexed relative to the remaining-stops list
/// (before the driver position is prepended); they are shifted by +1 to
/// land in the reoptimize route's frame, where index 0 is the driver.
/// `live` incidents are assumed already in that frame.
pub fn aggregate(
    explicit: &[Incident],
    live: &[Incident],
    reason: &str,
    reason_severity: Option<f64>,
) -> Option<Incident> {
    let shifted_explicit = explicit.iter().map(|incident| Incident {
        index: incident.index + 1,
        ..*incident
    });

    let mut all: Vec<Incident> = shifted_explicit.chain(live.iter().copied()).collect();

    if all.is_empty() {
        if let Some(kind) = IncidentKind::parse(reason) {
            all.push(Incident {
                index: 1,
                kind,
                severity: reason_severity.unwrap_or(1.0),
            });
        }
    }

    all.into_iter()
        .max_by(|a, b| a.severity.total_cmp(&b.severity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(index: usize, kind: IncidentKind, severity: f64) -> Incident {
        Incident { index, kind, severity }
    }

    #[test]
    fn shifts_explicit_indices_by_one() {
        let explicit = vec![incident(0, IncidentKind::TrafficJam, 0.5)];
        let picked = aggregate(&explicit, &[], "none", None).unwrap();
        assert_eq!(picked.index, 1);
    }

    #[test]
    fn picks_max_severity_across_sources() {
        let explicit = vec![incident(0, IncidentKind::TrafficJam, 0.4)];
        let live = vec![incident(2, IncidentKind::Accident, 0.9)];
        let picked = aggregate(&explicit, &live, "none", None).unwrap();
        assert_eq!(picked.kind, IncidentKind::Accident);
        assert!((picked.severity - 0.9).abs() < 1e-9);
    }

    #[test]
    fn synthesizes_from_reason_when_nothing_found() {
        let picked = aggregate(&[], &[], "road_closed", None).unwrap();
        assert_eq!(picked.index, 1);
        assert_eq!(picked.kind, IncidentKind::RoadClosed);
        assert!((picked.severity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn synthesizes_with_given_reason_severity() {
        let picked = aggregate(&[], &[], "accident", Some(0.6)).unwrap();
        assert!((picked.severity - 0.6).abs() < 1e-9);
    }

    #[test]
    fn returns_none_for_unrecognized_reason_and_no_incidents() {
        assert!(aggregate(&[], &[], "driver_break", None).is_none());
    }
}
