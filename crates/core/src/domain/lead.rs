use serde::{Deserialize, Serialize};

use crate::domain::product::ProductInterest;

/// Opaque lead identifier, used for URL addressing and log correlation only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl LeadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Company size band, ordered smallest to largest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeBand {
    #[serde(rename = "1")]
    SoleTrader,
    #[serde(rename = "1 - 10")]
    OneToTen,
    #[serde(rename = "11 - 25")]
    ElevenToTwentyFive,
    #[serde(rename = "26 - 50")]
    TwentySixToFifty,
    #[serde(rename = "51 - 150")]
    FiftyOneToOneFifty,
    #[serde(rename = "151 - 300")]
    OneFiftyOneToThreeHundred,
    #[serde(rename = ">300")]
    OverThreeHundred,
}

impl EmployeeBand {
    pub const ALL: [EmployeeBand; 7] = [
        EmployeeBand::SoleTrader,
        EmployeeBand::OneToTen,
        EmployeeBand::ElevenToTwentyFive,
        EmployeeBand::TwentySixToFifty,
        EmployeeBand::FiftyOneToOneFifty,
        EmployeeBand::OneFiftyOneToThreeHundred,
        EmployeeBand::OverThreeHundred,
    ];

    /// Ordinal position in the band order, used to index scoring tables.
    pub fn rank(self) -> usize {
        Self::ALL.iter().position(|band| *band == self).unwrap_or(0)
    }
}

/// Monthly card spend band. The legacy `<10k` and `10k<` values overlap the
/// finer-grained bands and share their rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardSpendBand {
    #[serde(rename = "<1k")]
    UnderOneK,
    #[serde(rename = "1k - 5k")]
    OneToFiveK,
    #[serde(rename = "5k - 10k")]
    FiveToTenK,
    #[serde(rename = "<10k")]
    UnderTenK,
    #[serde(rename = "10k<")]
    OverTenK,
    #[serde(rename = "10k - 15k")]
    TenToFifteenK,
    #[serde(rename = "15k - 30k")]
    FifteenToThirtyK,
    #[serde(rename = "30k - 50k")]
    ThirtyToFiftyK,
    #[serde(rename = "50k - 200k")]
    FiftyToTwoHundredK,
    #[serde(rename = ">200k")]
    OverTwoHundredK,
}

impl CardSpendBand {
    /// Number of distinct spend levels after folding the legacy aliases.
    pub const LEVELS: usize = 8;

    pub fn rank(self) -> usize {
        match self {
            CardSpendBand::UnderOneK => 0,
            CardSpendBand::OneToFiveK => 1,
            CardSpendBand::FiveToTenK | CardSpendBand::UnderTenK => 2,
            CardSpendBand::OverTenK | CardSpendBand::TenToFifteenK => 3,
            CardSpendBand::FifteenToThirtyK => 4,
            CardSpendBand::ThirtyToFiftyK => 5,
            CardSpendBand::FiftyToTwoHundredK => 6,
            CardSpendBand::OverTwoHundredK => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditRequired {
    Yes,
    No,
}

/// Monthly invoice volume band, ordered smallest to largest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceVolumeBand {
    #[serde(rename = "<20")]
    UnderTwenty,
    #[serde(rename = "20 - 100")]
    TwentyToHundred,
    #[serde(rename = "101 - 200")]
    HundredOneToTwoHundred,
    #[serde(rename = "201 - 500")]
    TwoHundredOneToFiveHundred,
    #[serde(rename = ">500")]
    OverFiveHundred,
}

impl InvoiceVolumeBand {
    pub const ALL: [InvoiceVolumeBand; 5] = [
        InvoiceVolumeBand::UnderTwenty,
        InvoiceVolumeBand::TwentyToHundred,
        InvoiceVolumeBand::HundredOneToTwoHundred,
        InvoiceVolumeBand::TwoHundredOneToFiveHundred,
        InvoiceVolumeBand::OverFiveHundred,
    ];

    pub fn rank(self) -> usize {
        Self::ALL.iter().position(|band| *band == self).unwrap_or(0)
    }
}

/// Sales-readiness classification attached to every routing result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    SelfServe,
    Intro,
    Pricing,
    Unknown,
    Neutral,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementStage {
    HighIntent,
    ConsiderationStage,
    LowIntentTester,
}

/// Accumulated answers for one lead across the funnel. Caller-owned: the
/// full known profile is passed by value on every routing call, merged, and
/// returned alongside the result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadProfile {
    pub email: Option<String>,
    pub number_of_employees: Option<EmployeeBand>,
    /// ISO-3166-1 alpha-2 code; validated against the supported-country set
    /// at the country gate, not at ingestion.
    pub registration_country: Option<String>,
    pub legal_form: Option<String>,
    #[serde(rename = "productInterest")]
    pub product_interests: Vec<ProductInterest>,
    pub card_spend: Option<CardSpendBand>,
    pub is_credit_required: Option<CreditRequired>,
    pub number_of_invoices: Option<InvoiceVolumeBand>,
    pub erp_system: Option<String>,
    pub funnel_intent: Option<Intent>,
    pub engagement_stage: Option<EngagementStage>,
}

/// Sparse answer payload submitted at one step. Same shape as the profile;
/// the wire contract mirrors `LeadProfile` with every field optional.
pub type LeadUpdate = LeadProfile;

impl LeadProfile {
    /// Field-wise union: an update value replaces, an absent update field
    /// never clears. Profile accumulation stays monotonic across the funnel.
    pub fn merge(mut self, update: LeadUpdate) -> LeadProfile {
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.number_of_employees.is_some() {
            self.number_of_employees = update.number_of_employees;
        }
        if update.registration_country.is_some() {
            self.registration_country = update.registration_country;
        }
        if update.legal_form.is_some() {
            self.legal_form = update.legal_form;
        }
        if !update.product_interests.is_empty() {
            self.product_interests = update.product_interests;
        }
        if update.card_spend.is_some() {
            self.card_spend = update.card_spend;
        }
        if update.is_credit_required.is_some() {
            self.is_credit_required = update.is_credit_required;
        }
        if update.number_of_invoices.is_some() {
            self.number_of_invoices = update.number_of_invoices;
        }
        if update.erp_system.is_some() {
            self.erp_system = update.erp_system;
        }
        if update.funnel_intent.is_some() {
            self.funnel_intent = update.funnel_intent;
        }
        if update.engagement_stage.is_some() {
            self.engagement_stage = update.engagement_stage;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &LeadProfile::default()
    }
}
