//! Resolution plans
//!
//! A plan is a tree describing how a subject will be produced. Building it
//! never runs user code. [ResolutionPlan::execute] walks the tree post-order,
//! invoking builders and initializers, and may be called any number of times.
//!
//! ```text
//! UserService
//! ├─ api: ApiClient
//! │  └─ http: HttpClient <- build_http_client
//! ├─ mailer: Mailer
//! │  └─ transport: Transport <- SmtpTransport()
//! └─ retries: u8 (default)
//! ```

use crate::{
    errors::ExecuteError,
    function::{Arguments, Function},
    inspect::{Annotation, TypeDescriptor},
    types::{Instance, Subject},
};

/// Which strategy produced a plan node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    BuilderBased,
    InferenceBased,
    Callable,
    BuilderParameter,
    InferenceParameter,
    DefaultParameter,
    NoArgsConstructorParameter,
}

/// Root of a plan tree
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionPlan {
    BuilderBased(BuilderBasedResolutionPlan),
    InferenceBased(InferenceBasedResolutionPlan),
    Callable(CallableResolutionPlan),
}

/// The subject has a registered builder, its own initializer is never looked at
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderBasedResolutionPlan {
    pub subject: TypeDescriptor,
    pub builder: Function,
    pub arguments: CallableResolutionPlan,
}

/// The subject is built by its initializer, every parameter planned on its own
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceBasedResolutionPlan {
    pub subject: TypeDescriptor,
    pub initializer: Function,
    pub parameters: Vec<ParameterResolutionPlan>,
}

/// A function invoked with resolved arguments
#[derive(Debug, Clone, PartialEq)]
pub struct CallableResolutionPlan {
    pub subject: Function,
    pub parameters: Vec<ParameterResolutionPlan>,
}

impl ResolutionPlan {
    pub fn kind(&self) -> PlanKind {
        match self {
            ResolutionPlan::BuilderBased(_) => PlanKind::BuilderBased,
            ResolutionPlan::InferenceBased(_) => PlanKind::InferenceBased,
            ResolutionPlan::Callable(_) => PlanKind::Callable,
        }
    }

    pub fn subject(&self) -> Subject {
        match self {
            ResolutionPlan::BuilderBased(plan) => Subject::Type(plan.subject.info),
            ResolutionPlan::InferenceBased(plan) => Subject::Type(plan.subject.info),
            ResolutionPlan::Callable(plan) => Subject::Function(plan.subject.name()),
        }
    }

    /// Roots sit one level above their first parameters
    pub fn depth(&self) -> i32 {
        -1
    }

    /// The builder that short circuits the subject, if any
    pub fn builder(&self) -> Option<&Function> {
        match self {
            ResolutionPlan::BuilderBased(plan) => Some(&plan.builder),
            _ => None,
        }
    }

    /// Parameter plans below the root, for a builder these are its arguments
    pub fn children(&self) -> &[ParameterResolutionPlan] {
        match self {
            ResolutionPlan::BuilderBased(plan) => &plan.arguments.parameters,
            ResolutionPlan::InferenceBased(plan) => &plan.parameters,
            ResolutionPlan::Callable(plan) => &plan.parameters,
        }
    }

    pub fn execute(&self) -> Result<Instance, ExecuteError> {
        match self {
            ResolutionPlan::BuilderBased(plan) => plan.arguments.execute(),
            ResolutionPlan::InferenceBased(plan) => plan
                .initializer
                .invoke(execute_parameters(&plan.parameters)?),
            ResolutionPlan::Callable(plan) => plan.execute(),
        }
    }
}

impl CallableResolutionPlan {
    pub fn execute(&self) -> Result<Instance, ExecuteError> {
        self.subject.invoke(execute_parameters(&self.parameters)?)
    }
}

/// Collects keyword arguments from all parameters not left to their default
fn execute_parameters(parameters: &[ParameterResolutionPlan]) -> Result<Arguments, ExecuteError> {
    let mut arguments = Arguments::new();
    for parameter in parameters {
        if let Some(instance) = parameter.execute()? {
            arguments.insert(parameter.name(), instance);
        }
    }
    Ok(arguments)
}

/// Name, depth and declared type shared by every parameter plan
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub name: &'static str,
    pub depth: i32,
    pub annotation: Option<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterResolutionPlan {
    Builder(BuilderParameterResolutionPlan),
    Inference(InferenceParameterResolutionPlan),
    Default(DefaultParameterResolutionPlan),
    NoArgsConstructor(NoArgsConstructorParameterResolutionPlan),
}

/// Supplied by a partial, or by a builder registered for the annotated type
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderParameterResolutionPlan {
    pub node: ParameterNode,
    pub builder: Function,
    pub arguments: CallableResolutionPlan,
}

/// Built by recursively planning the initializer of the annotated type
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceParameterResolutionPlan {
    pub node: ParameterNode,
    pub subject: TypeDescriptor,
    pub initializer: Function,
    pub parameters: Vec<ParameterResolutionPlan>,
}

/// Left unset so the owner's own default applies
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultParameterResolutionPlan {
    pub node: ParameterNode,
}

/// Every parameter of the annotated type's initializer has a default
#[derive(Debug, Clone, PartialEq)]
pub struct NoArgsConstructorParameterResolutionPlan {
    pub node: ParameterNode,
    pub subject: TypeDescriptor,
    pub initializer: Function,
}

impl ParameterResolutionPlan {
    pub fn node(&self) -> &ParameterNode {
        match self {
            ParameterResolutionPlan::Builder(plan) => &plan.node,
            ParameterResolutionPlan::Inference(plan) => &plan.node,
            ParameterResolutionPlan::Default(plan) => &plan.node,
            ParameterResolutionPlan::NoArgsConstructor(plan) => &plan.node,
        }
    }

    pub fn kind(&self) -> PlanKind {
        match self {
            ParameterResolutionPlan::Builder(_) => PlanKind::BuilderParameter,
            ParameterResolutionPlan::Inference(_) => PlanKind::InferenceParameter,
            ParameterResolutionPlan::Default(_) => PlanKind::DefaultParameter,
            ParameterResolutionPlan::NoArgsConstructor(_) => PlanKind::NoArgsConstructorParameter,
        }
    }

    pub fn name(&self) -> &'static str {
        self.node().name
    }

    pub fn depth(&self) -> i32 {
        self.node().depth
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.node().annotation.as_ref()
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ParameterResolutionPlan::Default(_))
    }

    pub fn builder(&self) -> Option<&Function> {
        match self {
            ParameterResolutionPlan::Builder(plan) => Some(&plan.builder),
            _ => None,
        }
    }

    pub fn children(&self) -> &[ParameterResolutionPlan] {
        match self {
            ParameterResolutionPlan::Builder(plan) => &plan.arguments.parameters,
            ParameterResolutionPlan::Inference(plan) => &plan.parameters,
            ParameterResolutionPlan::Default(_) | ParameterResolutionPlan::NoArgsConstructor(_) => {
                &[]
            }
        }
    }

    /// Produces the argument for this parameter, None when left to the default
    pub fn execute(&self) -> Result<Option<Instance>, ExecuteError> {
        let instance = match self {
            ParameterResolutionPlan::Default(_) => return Ok(None),
            ParameterResolutionPlan::Builder(plan) => plan.arguments.execute()?,
            ParameterResolutionPlan::Inference(plan) => plan
                .initializer
                .invoke(execute_parameters(&plan.parameters)?)?,
            ParameterResolutionPlan::NoArgsConstructor(plan) => {
                plan.initializer.invoke(Arguments::new())?
            }
        };
        Ok(Some(instance))
    }
}
