use crate::models::{RawRecommendations, Report, SpecialistPriority, Urgency};

use super::types::{ReportError, Specialist, TriageDecision};

/// Validate and rank an externally supplied recommendation payload.
///
/// Urgency is never inferred from the results: it is parsed from the hint and
/// rejected if unknown. Wire values are lowercase (`routine`, `urgent`,
/// `emergency`); `Emergency` is rejected. Priorities are capitalized (`High`,
/// `Medium`, `Low`). Without a hint the decision is routine with no
/// specialists.
pub fn triage(
    report: &Report,
    hint: Option<&RawRecommendations>,
) -> Result<TriageDecision, ReportError> {
    let Some(hint) = hint else {
        tracing::debug!(tests = report.len(), "No recommendation payload, routine follow-up");
        return Ok(TriageDecision {
            urgency: Urgency::Routine,
            reasons: Vec::new(),
            specialists: Vec::new(),
            next_steps: Urgency::Routine.default_next_steps(),
        });
    };

    let urgency: Urgency = hint
        .urgency
        .parse()
        .map_err(|_| ReportError::InvalidUrgency(hint.urgency.clone()))?;

    let mut specialists = hint
        .specialists
        .iter()
        .map(|s| -> Result<Specialist, ReportError> {
            let priority: SpecialistPriority =
                s.priority.parse().map_err(|_| ReportError::InvalidPriority {
                    specialist: s.name.clone(),
                    value: s.priority.clone(),
                })?;
            Ok(Specialist {
                name: s.name.clone(),
                priority,
                reason_count: s.reason_count,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by_key is stable: supplied order survives within a priority band
    specialists.sort_by_key(|s| s.priority.rank());

    let next_steps = if hint.next_steps.is_empty() {
        urgency.default_next_steps()
    } else {
        hint.next_steps.clone()
    };

    let abnormal = report.iter().filter(|r| r.status.is_abnormal()).count();
    tracing::debug!(
        urgency = %urgency,
        abnormal,
        specialists = specialists.len(),
        "Triage resolved"
    );

    Ok(TriageDecision {
        urgency,
        reasons: hint.reasons.clone(),
        specialists,
        next_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::validation::validate;
    use crate::models::{RawSpecialist, RawTestResult};

    fn report() -> Report {
        validate(&[RawTestResult {
            test: "LDL".into(),
            value: 200.0,
            min: 0.0,
            max: 130.0,
            unit: "mg/dL".into(),
            status: "High".into(),
        }])
        .unwrap()
    }

    fn specialist(name: &str, priority: &str, reason_count: u32) -> RawSpecialist {
        RawSpecialist {
            name: name.into(),
            priority: priority.into(),
            reason_count,
        }
    }

    fn hint(urgency: &str, specialists: Vec<RawSpecialist>) -> RawRecommendations {
        RawRecommendations {
            urgency: urgency.into(),
            reasons: vec!["High cardiovascular risk factors".into()],
            specialists,
            next_steps: vec![],
        }
    }

    #[test]
    fn specialists_sorted_high_first_and_stable() {
        let payload = hint(
            "routine",
            vec![
                specialist("Nephrologist", "Low", 1),
                specialist("Cardiologist", "High", 3),
                specialist("Urologist", "Low", 1),
                specialist("Endocrinologist", "Medium", 2),
                specialist("Oncologist", "High", 4),
            ],
        );
        let decision = triage(&report(), Some(&payload)).unwrap();
        let names: Vec<&str> = decision.specialists.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Cardiologist",
                "Oncologist",
                "Endocrinologist",
                "Nephrologist",
                "Urologist"
            ]
        );
    }

    #[test]
    fn unknown_urgency_rejected() {
        let err = triage(&report(), Some(&hint("asap", vec![]))).unwrap_err();
        assert_eq!(err, ReportError::InvalidUrgency("asap".into()));
    }

    #[test]
    fn urgency_wire_values_are_lowercase() {
        let err = triage(&report(), Some(&hint("Emergency", vec![]))).unwrap_err();
        assert_eq!(err, ReportError::InvalidUrgency("Emergency".into()));
        let decision = triage(&report(), Some(&hint("emergency", vec![]))).unwrap();
        assert_eq!(decision.urgency, Urgency::Emergency);
    }

    #[test]
    fn unknown_priority_rejected() {
        let payload = hint("urgent", vec![specialist("Cardiologist", "Critical", 1)]);
        let err = triage(&report(), Some(&payload)).unwrap_err();
        assert!(matches!(err, ReportError::InvalidPriority { ref specialist, .. } if specialist == "Cardiologist"));
    }

    #[test]
    fn urgency_maps_to_guidance() {
        for (raw, guidance) in [
            ("emergency", "seek immediate care"),
            ("urgent", "schedule within 24–48 hours"),
            ("routine", "schedule within 1–2 weeks"),
        ] {
            let decision = triage(&report(), Some(&hint(raw, vec![]))).unwrap();
            assert_eq!(decision.guidance(), guidance);
        }
    }

    #[test]
    fn reasons_kept_in_order() {
        let mut payload = hint("urgent", vec![]);
        payload.reasons = vec!["B".into(), "A".into(), "C".into()];
        let decision = triage(&report(), Some(&payload)).unwrap();
        assert_eq!(decision.reasons, vec!["B", "A", "C"]);
    }

    #[test]
    fn supplied_next_steps_win_over_defaults() {
        let mut payload = hint("urgent", vec![]);
        payload.next_steps = vec!["Call Dr. Lee".into()];
        let decision = triage(&report(), Some(&payload)).unwrap();
        assert_eq!(decision.next_steps, vec!["Call Dr. Lee"]);

        let decision = triage(&report(), Some(&hint("urgent", vec![]))).unwrap();
        assert_eq!(decision.next_steps, Urgency::Urgent.default_next_steps());
    }

    #[test]
    fn missing_hint_is_routine() {
        let decision = triage(&report(), None).unwrap();
        assert_eq!(decision.urgency, Urgency::Routine);
        assert!(decision.reasons.is_empty());
        assert!(decision.specialists.is_empty());
    }
}
