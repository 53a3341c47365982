use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    container::Container,
    errors::{ContainerError, VerificationErrors},
    function::Function,
    inspect::TypeDescriptor,
    plan::ResolutionPlan,
    planner::Planner,
    specification::Specification,
    types::{Instance, TypeInfo},
    verification::verify,
};

/// A container that verifies the whole specification when it is created
///
/// Every type known to the specification is planned up front and the plans
/// are kept. A misconfigured type fails construction, even if it would never
/// be requested. Types outside the specification are planned on first use
/// and cached as well.
pub struct VerifyingContainer {
    spec: Specification,
    plans: RwLock<HashMap<TypeInfo, Arc<ResolutionPlan>>>,
}
impl Debug for VerifyingContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plans = self.plans.read().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_struct("VerifyingContainer");
        for (info, plan) in plans.iter() {
            map.field(info.type_name, &plan.kind());
        }
        map.finish()
    }
}

impl VerifyingContainer {
    pub fn new(spec: Specification) -> Result<Self, VerificationErrors> {
        let verified = verify(&spec)?;
        tracing::debug!("Verified {} types", verified.len());

        let plans = verified
            .into_iter()
            .map(|(info, plan)| (info, Arc::new(plan)))
            .collect();

        Ok(VerifyingContainer {
            spec,
            plans: RwLock::new(plans),
        })
    }

    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    /// The cached plan for a type, if it was verified or requested before
    pub fn plan_for(&self, info: &TypeInfo) -> Option<Arc<ResolutionPlan>> {
        self.plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(info)
            .cloned()
    }

    fn plan(&self, subject: &TypeDescriptor) -> Result<Arc<ResolutionPlan>, ContainerError> {
        if let Some(plan) = self.plan_for(&subject.info) {
            return Ok(plan);
        }

        tracing::debug!("{} was not verified, planning it on first use", subject);
        let plan = Arc::new(Planner::new(&self.spec).plan(subject)?);

        // Plans are deterministic, whoever writes last wins
        self.plans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(subject.info, plan.clone());

        Ok(plan)
    }
}

impl Container for VerifyingContainer {
    fn resolve_type(&self, subject: &TypeDescriptor) -> Result<Instance, ContainerError> {
        Ok(self.plan(subject)?.execute()?)
    }

    fn call_function(&self, function: &Function) -> Result<Instance, ContainerError> {
        let plan = Planner::new(&self.spec).plan_call(function)?;
        Ok(plan.execute()?)
    }
}
