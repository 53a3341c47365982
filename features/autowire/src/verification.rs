use std::collections::BTreeMap;

use crate::{
    errors::{VerificationError, VerificationErrors},
    plan::ResolutionPlan,
    planner::Planner,
    specification::Specification,
    types::TypeInfo,
};

pub type VerifiedSpecification = BTreeMap<TypeInfo, ResolutionPlan>;

/// Plans every type of the specification
///
/// Returns the plans, or every type that can't be planned.
pub fn verify(spec: &Specification) -> Result<VerifiedSpecification, VerificationErrors> {
    let planner = Planner::new(spec);
    let mut verified = BTreeMap::new();
    let mut errors = Vec::new();

    for subject in spec.types() {
        match planner.plan(&subject) {
            Ok(plan) => {
                verified.insert(subject.info, plan);
            }
            Err(cause) => {
                tracing::debug!("{} failed verification: {}", subject, cause);
                errors.push(VerificationError {
                    subject: subject.info,
                    cause,
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(VerificationErrors { errors });
    }

    Ok(verified)
}
