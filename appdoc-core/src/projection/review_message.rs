use crate::models::ReviewReason;

pub const IN_REVIEW_PREFIX: &str = "Your application has been placed in review";

const ADDRESS_SUFFIX: &str = " pending outstanding address verification for FICA purposes.";
const BANK_SUFFIX: &str = " pending outstanding bank account verification.";
const FALLBACK_SUFFIX: &str =
    " because of suspicious account behaviour. Please contact support ASAP.";

/// Sentence shown to the applicant while their application is in review.
///
/// Unrecognised reasons get the generic "contact support" wording rather
/// than an error.
pub fn in_review_message(reason: &ReviewReason) -> String {
    let suffix = match reason {
        ReviewReason::Address => ADDRESS_SUFFIX,
        ReviewReason::Bank => BANK_SUFFIX,
        ReviewReason::Other(_) => FALLBACK_SUFFIX,
    };
    format!("{IN_REVIEW_PREFIX}{suffix}")
}
