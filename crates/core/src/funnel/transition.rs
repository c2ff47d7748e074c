use tracing::debug;

use crate::config::RoutingConfig;
use crate::domain::lead::{EmployeeBand, LeadProfile, LeadUpdate};
use crate::funnel::scoring;
use crate::funnel::steps::FunnelStep;

/// Result of one state-machine step: where the lead goes next and, when the
/// destination is the waitlist, which field deferred them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next_step: FunnelStep,
    pub waitlist_reason: Option<FunnelStep>,
}

impl Transition {
    fn to(next_step: FunnelStep) -> Self {
        Self { next_step, waitlist_reason: None }
    }

    fn waitlisted(reason: FunnelStep) -> Self {
        Self { next_step: FunnelStep::Waitlist, waitlist_reason: Some(reason) }
    }
}

/// The funnel state machine. Total over every step: question steps follow
/// their single outgoing rule, everything else (outcomes and the legacy
/// question steps with no edge) is absorbing, which keeps duplicate
/// submissions from drifting state.
pub fn transition(
    current: FunnelStep,
    answer: &LeadUpdate,
    merged: &LeadProfile,
    config: &RoutingConfig,
) -> Transition {
    match current {
        FunnelStep::Email => Transition::to(FunnelStep::NumberOfEmployees),

        FunnelStep::NumberOfEmployees => {
            // Sole traders skip the rest of the questionnaire entirely.
            if answer.number_of_employees == Some(EmployeeBand::SoleTrader) {
                Transition::to(FunnelStep::SelfSignup)
            } else {
                Transition::to(FunnelStep::RegistrationCountry)
            }
        }

        FunnelStep::RegistrationCountry => match answer.registration_country.as_deref() {
            Some(code) if !config.is_supported_country(code) => {
                Transition::waitlisted(FunnelStep::RegistrationCountry)
            }
            _ => Transition::to(FunnelStep::LegalForm),
        },

        FunnelStep::LegalForm => Transition::to(FunnelStep::ProductInterests),

        FunnelStep::ProductInterests => {
            // The two smallest bands get the small-spender variant of the
            // spend question. An unset band means the larger-company branch.
            match merged.number_of_employees {
                Some(EmployeeBand::OneToTen) | Some(EmployeeBand::ElevenToTwentyFive) => {
                    Transition::to(FunnelStep::CardSpendSmallSpender)
                }
                _ => Transition::to(FunnelStep::CardSpend),
            }
        }

        FunnelStep::CardSpend | FunnelStep::CardSpendSmallSpender => {
            Transition::to(FunnelStep::IsCreditRequired)
        }

        FunnelStep::IsCreditRequired => Transition::to(FunnelStep::NumberOfInvoices),

        FunnelStep::NumberOfInvoices => Transition::to(FunnelStep::ErpSystem),

        FunnelStep::ErpSystem => {
            let score = scoring::score(merged, &config.scoring);
            debug!(event_name = "funnel.lead_scored", score, "terminal routing score computed");

            let thresholds = config.thresholds;
            if score >= thresholds.demo_p0 {
                Transition::to(FunnelStep::DemoBookingP0)
            } else if score >= thresholds.demo_p1 {
                Transition::to(FunnelStep::DemoBookingP1)
            } else if score >= thresholds.demo_p2 {
                Transition::to(FunnelStep::DemoBookingP2)
            } else {
                Transition::to(FunnelStep::SelfSignup)
            }
        }

        other => Transition::to(other),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RoutingConfig;
    use crate::domain::lead::{
        CardSpendBand, CreditRequired, EmployeeBand, InvoiceVolumeBand, LeadProfile, LeadUpdate,
    };
    use crate::domain::product::ProductInterest;
    use crate::funnel::steps::FunnelStep;

    use super::{transition, Transition};

    fn config() -> RoutingConfig {
        RoutingConfig::default()
    }

    fn answer_with_country(code: &str) -> LeadUpdate {
        LeadUpdate { registration_country: Some(code.to_string()), ..LeadUpdate::default() }
    }

    #[test]
    fn email_always_advances_to_employees() {
        let result = transition(
            FunnelStep::Email,
            &LeadUpdate::default(),
            &LeadProfile::default(),
            &config(),
        );
        assert_eq!(result, Transition::to(FunnelStep::NumberOfEmployees));
    }

    #[test]
    fn sole_traders_shortcut_to_self_signup() {
        let answer = LeadUpdate {
            number_of_employees: Some(EmployeeBand::SoleTrader),
            ..LeadUpdate::default()
        };
        let result =
            transition(FunnelStep::NumberOfEmployees, &answer, &LeadProfile::default(), &config());
        assert_eq!(result.next_step, FunnelStep::SelfSignup);
        assert_eq!(result.waitlist_reason, None);
    }

    #[test]
    fn non_sole_traders_continue_to_the_country_question() {
        let answer = LeadUpdate {
            number_of_employees: Some(EmployeeBand::FiftyOneToOneFifty),
            ..LeadUpdate::default()
        };
        let result =
            transition(FunnelStep::NumberOfEmployees, &answer, &LeadProfile::default(), &config());
        assert_eq!(result.next_step, FunnelStep::RegistrationCountry);
    }

    #[test]
    fn unsupported_country_waitlists_with_a_reason() {
        for code in ["US", "us", "xx"] {
            let result = transition(
                FunnelStep::RegistrationCountry,
                &answer_with_country(code),
                &LeadProfile::default(),
                &config(),
            );
            assert_eq!(result.next_step, FunnelStep::Waitlist, "code {code}");
            assert_eq!(result.waitlist_reason, Some(FunnelStep::RegistrationCountry));
        }
    }

    #[test]
    fn supported_country_passes_the_gate_in_any_letter_case() {
        for code in ["DE", "de", "Nl", "gB"] {
            let result = transition(
                FunnelStep::RegistrationCountry,
                &answer_with_country(code),
                &LeadProfile::default(),
                &config(),
            );
            assert_eq!(result, Transition::to(FunnelStep::LegalForm), "code {code}");
        }
    }

    #[test]
    fn small_companies_branch_to_the_small_spender_question() {
        for band in [EmployeeBand::OneToTen, EmployeeBand::ElevenToTwentyFive] {
            let merged =
                LeadProfile { number_of_employees: Some(band), ..LeadProfile::default() };
            let result = transition(
                FunnelStep::ProductInterests,
                &LeadUpdate::default(),
                &merged,
                &config(),
            );
            assert_eq!(result.next_step, FunnelStep::CardSpendSmallSpender);
        }
    }

    #[test]
    fn unset_employee_band_takes_the_larger_company_branch() {
        let result = transition(
            FunnelStep::ProductInterests,
            &LeadUpdate::default(),
            &LeadProfile::default(),
            &config(),
        );
        assert_eq!(result.next_step, FunnelStep::CardSpend);
    }

    #[test]
    fn both_spend_variants_share_the_credit_edge() {
        for step in [FunnelStep::CardSpend, FunnelStep::CardSpendSmallSpender] {
            let result =
                transition(step, &LeadUpdate::default(), &LeadProfile::default(), &config());
            assert_eq!(result.next_step, FunnelStep::IsCreditRequired);
        }
    }

    #[test]
    fn top_scoring_lead_routes_to_demo_p0() {
        let merged = LeadProfile {
            number_of_employees: Some(EmployeeBand::OverThreeHundred),
            card_spend: Some(CardSpendBand::OverTwoHundredK),
            is_credit_required: Some(CreditRequired::Yes),
            number_of_invoices: Some(InvoiceVolumeBand::OverFiveHundred),
            product_interests: vec![
                ProductInterest::AccountsPayable,
                ProductInterest::CorporateCards,
            ],
            ..LeadProfile::default()
        };

        let result = transition(FunnelStep::ErpSystem, &LeadUpdate::default(), &merged, &config());
        assert_eq!(result.next_step, FunnelStep::DemoBookingP0);
    }

    #[test]
    fn empty_profile_routes_to_self_signup() {
        let result = transition(
            FunnelStep::ErpSystem,
            &LeadUpdate::default(),
            &LeadProfile::default(),
            &config(),
        );
        assert_eq!(result.next_step, FunnelStep::SelfSignup);
    }

    #[test]
    fn threshold_boundaries_are_inclusive_on_the_lower_bound() {
        // 25 (employees 151-300) + 20 (spend 30k-50k) + 20 (credit) +
        // 0 (invoices unset) + 5 (single interest) = 70, exactly the P0 bound.
        let exactly_p0 = LeadProfile {
            number_of_employees: Some(EmployeeBand::OneFiftyOneToThreeHundred),
            card_spend: Some(CardSpendBand::ThirtyToFiftyK),
            is_credit_required: Some(CreditRequired::Yes),
            product_interests: vec![ProductInterest::CorporateCards],
            ..LeadProfile::default()
        };
        let result =
            transition(FunnelStep::ErpSystem, &LeadUpdate::default(), &exactly_p0, &config());
        assert_eq!(result.next_step, FunnelStep::DemoBookingP0);

        // 25 + 15 + 5 + 0 + 5 = 50, exactly the P1 bound.
        let exactly_p1 = LeadProfile {
            number_of_employees: Some(EmployeeBand::OneFiftyOneToThreeHundred),
            card_spend: Some(CardSpendBand::FifteenToThirtyK),
            is_credit_required: Some(CreditRequired::No),
            product_interests: vec![ProductInterest::CorporateCards],
            ..LeadProfile::default()
        };
        let result =
            transition(FunnelStep::ErpSystem, &LeadUpdate::default(), &exactly_p1, &config());
        assert_eq!(result.next_step, FunnelStep::DemoBookingP1);

        // 10 + 2 + 5 + 2 + 10 = 29, one point short of the P2 bound.
        let just_below_p2 = LeadProfile {
            number_of_employees: Some(EmployeeBand::ElevenToTwentyFive),
            card_spend: Some(CardSpendBand::UnderOneK),
            is_credit_required: Some(CreditRequired::No),
            number_of_invoices: Some(InvoiceVolumeBand::UnderTwenty),
            product_interests: vec![
                ProductInterest::CorporateCards,
                ProductInterest::AccountsPayable,
            ],
            ..LeadProfile::default()
        };
        let result =
            transition(FunnelStep::ErpSystem, &LeadUpdate::default(), &just_below_p2, &config());
        assert_eq!(result.next_step, FunnelStep::SelfSignup);
    }

    #[test]
    fn outcome_steps_are_absorbing() {
        let strong_answer = LeadUpdate {
            number_of_employees: Some(EmployeeBand::OverThreeHundred),
            registration_country: Some("US".to_string()),
            ..LeadUpdate::default()
        };

        for step in FunnelStep::ALL.into_iter().filter(|step| step.is_outcome()) {
            let result = transition(step, &strong_answer, &LeadProfile::default(), &config());
            assert_eq!(result, Transition::to(step));
        }
    }

    #[test]
    fn legacy_question_steps_without_edges_are_absorbing() {
        for step in [
            FunnelStep::IsMicroEntityTurnoverExceeded,
            FunnelStep::FunnelIntent,
            FunnelStep::EngagementStage,
        ] {
            let result =
                transition(step, &LeadUpdate::default(), &LeadProfile::default(), &config());
            assert_eq!(result, Transition::to(step));
        }
    }
}
