use crate::{
    container::Container,
    errors::ContainerError,
    function::Function,
    inspect::TypeDescriptor,
    planner::Planner,
    specification::Specification,
    types::Instance,
};

/// A container planning every request from scratch
///
/// Accepts any specification, even one with circular or missing
/// dependencies. Those only surface once an affected type is requested,
/// see [crate::VerifyingContainer] to find them up front.
#[derive(Debug, Default, Clone)]
pub struct RuntimeContainer {
    spec: Specification,
}

impl RuntimeContainer {
    pub fn new(spec: Specification) -> Self {
        RuntimeContainer { spec }
    }

    pub fn specification(&self) -> &Specification {
        &self.spec
    }
}

impl Container for RuntimeContainer {
    fn resolve_type(&self, subject: &TypeDescriptor) -> Result<Instance, ContainerError> {
        let plan = Planner::new(&self.spec).plan(subject)?;
        Ok(plan.execute()?)
    }

    fn call_function(&self, function: &Function) -> Result<Instance, ContainerError> {
        let plan = Planner::new(&self.spec).plan_call(function)?;
        Ok(plan.execute()?)
    }
}
