use crate::config::ScoringConfig;
use crate::domain::lead::{CreditRequired, LeadProfile};
use crate::domain::product::ProductInterest;

/// Lead-quality score: five independent additive sub-scores, one per profile
/// field, summed. No cross-field interaction and no rounding beyond integer
/// arithmetic.
pub fn score(profile: &LeadProfile, config: &ScoringConfig) -> u32 {
    employee_points(profile, config)
        + spend_points(profile, config)
        + credit_points(profile, config)
        + invoice_points(profile, config)
        + interest_points(profile, config)
}

fn employee_points(profile: &LeadProfile, config: &ScoringConfig) -> u32 {
    profile
        .number_of_employees
        .and_then(|band| config.employee_band_points.get(band.rank()).copied())
        .unwrap_or(0)
}

fn spend_points(profile: &LeadProfile, config: &ScoringConfig) -> u32 {
    profile
        .card_spend
        .and_then(|band| config.spend_level_points.get(band.rank()).copied())
        .unwrap_or(config.fallback_spend_points)
}

fn credit_points(profile: &LeadProfile, config: &ScoringConfig) -> u32 {
    match profile.is_credit_required {
        Some(CreditRequired::Yes) => config.credit_required_points,
        _ => config.credit_optional_points,
    }
}

fn invoice_points(profile: &LeadProfile, config: &ScoringConfig) -> u32 {
    profile
        .number_of_invoices
        .and_then(|band| config.invoice_band_points.get(band.rank()).copied())
        .unwrap_or(0)
}

fn interest_points(profile: &LeadProfile, config: &ScoringConfig) -> u32 {
    match profile.product_interests.as_slice() {
        [] | [ProductInterest::DontKnow] => 0,
        [_single] => config.single_interest_points,
        _ => config.multi_interest_points,
    }
}
