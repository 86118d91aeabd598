use router_protocol::{Domain, RiskLevel, RouterResponse};

pub(crate) const CRISIS_RESOURCES: &str = "Crisis Support (U.S.): Call 911 for emergencies | \
     Call or text 988 (Suicide and Crisis Lifeline) | Text HOME to 741741 (Crisis Text Line)";
pub(crate) const HIGH_RISK_NOTICE: &str =
    "High-risk query detected. Contact emergency services if needed.";

/// Whether crisis resources accompany the displayed result.
pub(crate) fn needs_crisis_alert(result: Option<&RouterResponse>) -> bool {
    result
        .map(|result| result.safety_flags.high_risk || result.safety_flags.self_harm)
        .unwrap_or(false)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tone {
    Neutral,
    Warning,
    Danger,
    Success,
}

pub(crate) fn domain_tone(domain: Domain) -> Tone {
    match domain {
        Domain::Medical | Domain::Legal => Tone::Warning,
        Domain::General => Tone::Success,
        Domain::Unknown => Tone::Neutral,
    }
}

pub(crate) fn risk_tone(risk: RiskLevel) -> Tone {
    match risk {
        RiskLevel::High => Tone::Danger,
        RiskLevel::Medium => Tone::Warning,
        RiskLevel::Low => Tone::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_support::sample_response;
    use router_protocol::SafetyFlags;

    #[test]
    fn no_result_means_no_alert() {
        assert!(!needs_crisis_alert(None));
    }

    #[test]
    fn alert_follows_self_harm_or_high_risk_only() {
        for bits in 0..8u8 {
            let flags = SafetyFlags {
                self_harm: bits & 1 != 0,
                illegal_request: bits & 2 != 0,
                high_risk: bits & 4 != 0,
            };
            let mut response = sample_response("req");
            response.safety_flags = flags;
            assert_eq!(
                needs_crisis_alert(Some(&response)),
                flags.self_harm || flags.high_risk,
                "flags {flags:?}"
            );
        }
    }

    #[test]
    fn illegal_request_alone_does_not_alert() {
        let mut response = sample_response("req");
        response.safety_flags.illegal_request = true;
        assert!(!needs_crisis_alert(Some(&response)));
    }

    #[test]
    fn tone_table() {
        assert_eq!(domain_tone(Domain::Medical), Tone::Warning);
        assert_eq!(domain_tone(Domain::Legal), Tone::Warning);
        assert_eq!(domain_tone(Domain::General), Tone::Success);
        assert_eq!(domain_tone(Domain::Unknown), Tone::Neutral);
        assert_eq!(risk_tone(RiskLevel::High), Tone::Danger);
        assert_eq!(risk_tone(RiskLevel::Medium), Tone::Warning);
        assert_eq!(risk_tone(RiskLevel::Low), Tone::Success);
    }
}
