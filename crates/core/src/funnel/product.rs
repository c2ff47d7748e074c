use crate::domain::lead::{InvoiceVolumeBand, LeadProfile};
use crate::domain::product::{ProductInterest, SelfSignupProduct};

/// Recommend a self-service product for a lead routed to self-signup.
/// First match wins: high invoice volume paired with an accounts-payable
/// interest, then a single unambiguous interest, then the default.
pub fn select_self_signup_product(profile: &LeadProfile) -> SelfSignupProduct {
    let interests = &profile.product_interests;

    let high_invoice_volume = matches!(
        profile.number_of_invoices,
        Some(InvoiceVolumeBand::OverFiveHundred)
            | Some(InvoiceVolumeBand::TwoHundredOneToFiveHundred)
    );
    if high_invoice_volume && interests.contains(&ProductInterest::AccountsPayable) {
        return SelfSignupProduct::AccountsPayable;
    }

    if let [single] = interests.as_slice() {
        match single {
            ProductInterest::AccountsPayable => return SelfSignupProduct::AccountsPayable,
            ProductInterest::EmployeeReimbursement => {
                return SelfSignupProduct::EmployeeReimbursements
            }
            ProductInterest::CorporateCards => return SelfSignupProduct::CorporateCards,
            ProductInterest::DontKnow => {}
        }
    }

    SelfSignupProduct::CorporateCards
}

#[cfg(test)]
mod tests {
    use crate::domain::lead::{InvoiceVolumeBand, LeadProfile};
    use crate::domain::product::{ProductInterest, SelfSignupProduct};

    use super::select_self_signup_product;

    #[test]
    fn high_invoice_volume_with_ap_interest_wins_over_other_interests() {
        let profile = LeadProfile {
            number_of_invoices: Some(InvoiceVolumeBand::OverFiveHundred),
            product_interests: vec![
                ProductInterest::CorporateCards,
                ProductInterest::AccountsPayable,
            ],
            ..LeadProfile::default()
        };

        assert_eq!(select_self_signup_product(&profile), SelfSignupProduct::AccountsPayable);
    }

    #[test]
    fn high_invoice_volume_without_ap_interest_falls_through() {
        let profile = LeadProfile {
            number_of_invoices: Some(InvoiceVolumeBand::TwoHundredOneToFiveHundred),
            product_interests: vec![ProductInterest::EmployeeReimbursement],
            ..LeadProfile::default()
        };

        assert_eq!(
            select_self_signup_product(&profile),
            SelfSignupProduct::EmployeeReimbursements
        );
    }

    #[test]
    fn single_interest_maps_directly_to_its_product() {
        let cases = [
            (ProductInterest::AccountsPayable, SelfSignupProduct::AccountsPayable),
            (ProductInterest::EmployeeReimbursement, SelfSignupProduct::EmployeeReimbursements),
            (ProductInterest::CorporateCards, SelfSignupProduct::CorporateCards),
        ];

        for (interest, expected) in cases {
            let profile =
                LeadProfile { product_interests: vec![interest], ..LeadProfile::default() };
            assert_eq!(select_self_signup_product(&profile), expected);
        }
    }

    #[test]
    fn zero_multiple_or_dont_know_interests_default_to_corporate_cards() {
        let none = LeadProfile::default();
        let dont_know = LeadProfile {
            product_interests: vec![ProductInterest::DontKnow],
            ..LeadProfile::default()
        };
        let multiple = LeadProfile {
            product_interests: vec![
                ProductInterest::AccountsPayable,
                ProductInterest::EmployeeReimbursement,
            ],
            ..LeadProfile::default()
        };

        for profile in [none, dont_know, multiple] {
            assert_eq!(select_self_signup_product(&profile), SelfSignupProduct::CorporateCards);
        }
    }
}
