use std::{collections::HashMap, fmt::Debug, sync::Arc};

use crate::{
    errors::{ArgumentError, ExecuteError},
    inspect::{Inspect, Parameter, TypeDescriptor},
    types::{DynError, Injectable, Instance},
};

type Body = Arc<dyn Fn(&mut Arguments) -> Result<Instance, DynError> + Send + Sync>;

/// A type erased callable with a declared signature
///
/// Used for builders, partials, initializers and plain call targets alike.
/// Two functions are equal when they share a name and signature.
#[derive(Clone)]
pub struct Function {
    name: &'static str,
    parameters: Vec<Parameter>,
    returns: Option<TypeDescriptor>,
    body: Body,
}

impl Function {
    /// Wraps a closure and annotates its return type from the closure's output
    pub fn new<R, F>(name: &'static str, body: F) -> Self
    where
        R: Inspect,
        F: Fn(&mut Arguments) -> Result<R, DynError> + Send + Sync + 'static,
    {
        Function {
            name,
            parameters: Vec::new(),
            returns: Some(TypeDescriptor::of::<R>()),
            body: Arc::new(move |args| body(args).map(Instance::new)),
        }
    }

    /// Wraps a closure producing an already erased value
    ///
    /// The return type stays unannotated until [Function::returns] is called,
    /// such functions can't be registered as builders.
    pub fn untyped<F>(name: &'static str, body: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<Instance, DynError> + Send + Sync + 'static,
    {
        Function {
            name,
            parameters: Vec::new(),
            returns: None,
            body: Arc::new(body),
        }
    }

    /// A zero parameter initializer backed by [Default]
    pub fn from_default<T: Inspect + Default>() -> Self {
        Function::new(std::any::type_name::<T>(), |_| Ok(T::default()))
    }

    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns<R: Inspect>(mut self) -> Self {
        self.returns = Some(TypeDescriptor::of::<R>());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn return_type(&self) -> Option<TypeDescriptor> {
        self.returns
    }

    /// Runs the body and checks the produced value against the declared return type
    pub fn invoke(&self, mut arguments: Arguments) -> Result<Instance, ExecuteError> {
        let instance = (self.body)(&mut arguments).map_err(|error| ExecuteError::Failed {
            subject: self.name,
            error: Arc::new(error),
        })?;

        match self.returns {
            Some(declared) if declared.info != instance.info => {
                Err(ExecuteError::ReturnTypeMismatch {
                    function: self.name,
                    declared: declared.info,
                    actual: instance.info,
                })
            }
            _ => Ok(instance),
        }
    }
}
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.returns == other.returns
            && self.parameters == other.parameters
    }
}
impl Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("returns", &self.returns)
            .finish()
    }
}

/// Keyword arguments passed to a [Function] body
///
/// Parameters the planner resolved by default are absent, the body decides
/// which value to fall back to.
#[derive(Default, Debug)]
pub struct Arguments {
    values: HashMap<&'static str, Instance>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, instance: Instance) {
        self.values.insert(name, instance);
    }

    pub fn with<T: Injectable>(mut self, name: &'static str, value: T) -> Self {
        self.insert(name, Instance::new(value));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes the erased argument, e.g. to try several types of a union
    pub fn take_instance(&mut self, name: &str) -> Option<Instance> {
        self.values.remove(name)
    }

    /// Removes a required argument
    pub fn take<T: Injectable>(&mut self, name: &str) -> Result<T, ArgumentError> {
        match self.take_optional(name)? {
            Some(value) => Ok(value),
            None => Err(ArgumentError::Missing {
                parameter: name.to_string(),
            }),
        }
    }

    /// Removes an argument, using `default` if the planner left it unset
    pub fn take_or<T: Injectable>(&mut self, name: &str, default: T) -> Result<T, ArgumentError> {
        Ok(self.take_optional(name)?.unwrap_or(default))
    }

    pub fn take_or_else<T: Injectable>(
        &mut self,
        name: &str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ArgumentError> {
        Ok(self.take_optional(name)?.unwrap_or_else(default))
    }

    fn take_optional<T: Injectable>(&mut self, name: &str) -> Result<Option<T>, ArgumentError> {
        let Some(instance) = self.values.remove(name) else {
            return Ok(None);
        };

        instance
            .downcast::<T>()
            .map(Some)
            .map_err(|instance| ArgumentError::DowncastFailed {
                parameter: name.to_string(),
                required_type: std::any::type_name::<T>(),
                actual_type: instance.info.type_name,
            })
    }
}
