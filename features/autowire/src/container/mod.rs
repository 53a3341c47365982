//! Containers resolve types and call functions against a [crate::Specification]
//!
//! * [DefaultContainer] accepts registrations and plans on every request.
//! * [RuntimeContainer] plans on every request.
//! * [VerifyingContainer] plans everything the specification knows up front
//!   and refuses to be constructed from a broken specification.

use std::any::type_name;

use crate::{
    errors::ContainerError,
    function::Function,
    inspect::{Inspect, TypeDescriptor},
    types::{Injectable, Instance},
};

pub mod default;
pub mod runtime;
pub mod verifying;

pub use default::DefaultContainer;
pub use runtime::RuntimeContainer;
pub use verifying::VerifyingContainer;

/// Implemented by all containers of this crate
///
/// Prefer it for parameters, since callers rarely care how a container plans.
pub trait Container {
    /// Produces a fresh instance of the described type
    fn resolve_type(&self, subject: &TypeDescriptor) -> Result<Instance, ContainerError>;

    /// Invokes the function after resolving all of its parameters
    fn call_function(&self, function: &Function) -> Result<Instance, ContainerError>;

    fn resolve<T: Inspect>(&self) -> Result<T, ContainerError>
    where
        Self: Sized,
    {
        downcast(self.resolve_type(&TypeDescriptor::of::<T>())?)
    }

    fn call<R: Injectable>(&self, function: &Function) -> Result<R, ContainerError>
    where
        Self: Sized,
    {
        downcast(self.call_function(function)?)
    }
}

fn downcast<T: Injectable>(instance: Instance) -> Result<T, ContainerError> {
    instance
        .downcast()
        .map_err(|instance| ContainerError::DowncastFailed {
            required_type: type_name::<T>(),
            actual_type: instance.info.type_name,
        })
}
