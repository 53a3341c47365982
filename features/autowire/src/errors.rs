use std::sync::Arc;

use thiserror::Error;

use crate::{
    inspect::{Annotation, ParameterKind},
    plan::ParameterResolutionPlan,
    types::{DynError, Subject, TypeInfo},
};

/// Errors while registering builders on a [crate::Specification]
#[derive(Error, Debug, Clone)]
pub enum SpecificationError {
    /// Without a return type there is no way to tell what a builder builds
    #[error("Builder '{builder}' does not declare a return type, annotate it with `Function::returns`")]
    MissingReturnAnnotation { builder: &'static str },

    #[error("'{owner}' has no constructor parameter named '{parameter}'")]
    MissingConstructorParameter {
        owner: TypeInfo,
        parameter: &'static str,
    },

    #[error("Partial '{builder}' returns '{returns}', but parameter '{parameter}' of '{owner}' accepts '{accepts}'")]
    IncompatiblePartialType {
        owner: TypeInfo,
        parameter: &'static str,
        builder: &'static str,
        returns: TypeInfo,
        accepts: Annotation,
    },
}

/// Errors while planning the resolution of a type or function
#[derive(Error, Debug, Clone)]
pub enum PlanError {
    #[error("Can't instantiate '{0}', it does not expose an initializer")]
    UninstantiableType(TypeInfo),

    #[error("Parameter '{parameter}' of '{owner}' has no type annotation, no default and no partial builder")]
    MissingParameterAnnotation {
        owner: Subject,
        parameter: &'static str,
    },

    #[error("Parameter '{parameter}' of '{owner}' is {kind}, which is not supported")]
    UnsupportedParameterKind {
        owner: Subject,
        parameter: &'static str,
        kind: ParameterKind,
    },

    /// Unions are only ever satisfied by a builder for one of their members
    #[error("Parameter '{parameter}' of '{owner}' accepts '{annotation}', but none of these types has a builder")]
    UnresolvableUnion {
        owner: Subject,
        parameter: &'static str,
        annotation: Annotation,
    },

    #[error(transparent)]
    FailedToInferDependency(Box<InferenceFailure>),

    #[error("A Circular Dependency exists through {}", display_cycle(.chain))]
    CyclicDependency { chain: Vec<TypeInfo> },
}

impl PlanError {
    /// The error that started it all, looking through inference failures
    pub fn root_cause(&self) -> &PlanError {
        match self {
            PlanError::FailedToInferDependency(failure) => failure.cause.root_cause(),
            other => other,
        }
    }
}

fn display_cycle(chain: &[TypeInfo]) -> String {
    let names: Vec<&str> = chain.iter().map(|info| info.type_name).collect();
    names.join(" -> ")
}

/// A nested dependency could not be planned
///
/// Carries the path from the planned root down to the parameter that broke,
/// along with the sibling parameters that were already planned.
#[derive(Error, Debug, Clone)]
#[error("Failed to infer parameter '{parameter}' of '{subject}' (required through {}): {cause}", display_chain(.chain))]
pub struct InferenceFailure {
    /// Owner of the parameter that could not be resolved
    pub subject: Subject,
    pub parameter: &'static str,
    pub chain: Vec<ChainLink>,
    pub planned: Vec<ParameterResolutionPlan>,
    pub cause: PlanError,
}

/// One step from the planned root towards a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    /// None for the root
    pub parameter: Option<&'static str>,
    pub subject: Subject,
}
impl std::fmt::Display for ChainLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.parameter {
            Some(parameter) => write!(f, "{parameter}: {}", self.subject),
            None => self.subject.fmt(f),
        }
    }
}

fn display_chain(chain: &[ChainLink]) -> String {
    let links: Vec<String> = chain.iter().map(ToString::to_string).collect();
    links.join(" -> ")
}

/// Errors raised inside a function body, e.g. while reading [crate::Arguments]
#[derive(Error, Debug, Clone)]
pub enum ArgumentError {
    #[error("Argument '{parameter}' was not supplied")]
    Missing { parameter: String },

    #[error("Failed to downcast argument '{parameter}', required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        parameter: String,
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// Errors while executing a plan
#[derive(Error, Debug, Clone)]
pub enum ExecuteError {
    #[error("'{subject}' failed - error: {error}")]
    Failed {
        subject: &'static str,
        error: Arc<DynError>,
    },

    #[error("'{function}' declares it returns '{declared}' but produced '{actual}'")]
    ReturnTypeMismatch {
        function: &'static str,
        declared: TypeInfo,
        actual: TypeInfo,
    },
}

/// Errors when resolving from a container
#[derive(Error, Debug, Clone)]
pub enum ContainerError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
}

/// A registered type which can not be planned
#[derive(Error, Debug, Clone)]
#[error("'{subject}' can't be resolved: {cause}")]
pub struct VerificationError {
    pub subject: TypeInfo,
    pub cause: PlanError,
}

#[derive(Error, Debug, Clone)]
pub struct VerificationErrors {
    pub errors: Vec<VerificationError>,
}
impl std::fmt::Display for VerificationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("The specification had one or more errors:".to_string());
        for error in &self.errors {
            display.push(format!("- {}", error));
        }
        f.write_str(&display.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn inference_failures_print_their_cause_once() {
        let cause = PlanError::UninstantiableType(TypeInfo::of::<String>());
        let error = PlanError::FailedToInferDependency(Box::new(InferenceFailure {
            subject: Subject::Function("connect"),
            parameter: "url",
            chain: vec![ChainLink {
                parameter: Some("url"),
                subject: Subject::Type(TypeInfo::of::<String>()),
            }],
            planned: vec![],
            cause,
        }));

        let message = error.to_string();
        assert_eq!(message.matches("Can't instantiate").count(), 1);
        assert!(message.contains("'url' of 'connect()'"));
        assert!(error.source().is_none());
    }
}
