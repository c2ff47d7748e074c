use serde::{Deserialize, Serialize};

/// Product interest tags a lead can pick during qualification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductInterest {
    #[serde(rename = "corporate-cards")]
    CorporateCards,
    #[serde(rename = "accounts-payable")]
    AccountsPayable,
    #[serde(rename = "employee-reimbursement")]
    EmployeeReimbursement,
    /// Sentinel answer; carries no scoring or selection signal.
    #[serde(rename = "I don't know")]
    DontKnow,
}

/// Product recommended when a lead is routed to self-signup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelfSignupProduct {
    AccountsPayable,
    CorporateCards,
    EmployeeReimbursements,
}
