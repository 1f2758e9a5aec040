//! Fixed charge catalog officers pick from on the intake form.

use serde::Deserialize;

/// Every charge label, in the order the picker lists them.
pub const CHARGES: [&str; 15] = [
    "Murder - 1.2-01 [CLASS 2 FELONY]",
    "Involuntary Manslaughter - 1.2-02 [CLASS 5 FELONY]",
    "Assault - 1.3-01 [CLASS 3 MISDEMEANOR]",
    "Battery - 1.3-02 [CLASS 2 MISDEMEANOR]",
    "Theft - 2.1-01 [CLASS 4 FELONY]",
    "Burglary - 2.2-01 [CLASS 3 FELONY]",
    "Drug Possession - 3.1-01 [CLASS 1 MISDEMEANOR]",
    "Drug Distribution - 3.1-02 [CLASS 2 FELONY]",
    "DUI - 4.1-01 [CLASS 1 MISDEMEANOR]",
    "Reckless Driving - 4.2-01 [CLASS 2 MISDEMEANOR]",
    "Fraud - 5.1-01 [CLASS 4 FELONY]",
    "Identity Theft - 5.2-01 [CLASS 3 FELONY]",
    "Domestic Violence - 6.1-01 [CLASS 2 MISDEMEANOR]",
    "Harassment - 6.2-01 [CLASS 3 MISDEMEANOR]",
    "Vandalism - 7.1-01 [CLASS 1 MISDEMEANOR]",
];

/// Labels containing `term` (case-insensitive), minus those already picked.
pub fn search_charges(term: &str, selected: &[String]) -> Vec<&'static str> {
    let term = term.trim().to_lowercase();
    CHARGES
        .iter()
        .copied()
        .filter(|c| c.to_lowercase().contains(&term))
        .filter(|c| !selected.iter().any(|s| s == c))
        .collect()
}

/// Query parameters for charge search.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct ChargeSearchParams {
    /// Case-insensitive substring of the charge label.
    pub q: Option<String>,
}
