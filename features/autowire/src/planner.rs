//! The resolution algorithm
//!
//! For every parameter of an initializer or function the planner picks the
//! first matching strategy:
//!
//! 1. a partial registered for the owner type and parameter name
//! 2. the parameter's own default
//! 3. a builder registered for the annotated type
//! 4. recursive inference over the annotated type's initializer
//!
//! Parameters without partial, default or annotation can't be planned.
//! A type with a registered builder is never inferred.

use crate::{
    errors::{ChainLink, InferenceFailure, PlanError},
    function::Function,
    inspect::{Annotation, Parameter, ParameterKind, TypeDescriptor},
    plan::{
        BuilderBasedResolutionPlan, BuilderParameterResolutionPlan, CallableResolutionPlan,
        DefaultParameterResolutionPlan, InferenceBasedResolutionPlan,
        InferenceParameterResolutionPlan, NoArgsConstructorParameterResolutionPlan, ParameterNode,
        ParameterResolutionPlan, ResolutionPlan,
    },
    specification::Specification,
    types::Subject,
};

/// Looks at a type or function and plans how to build or call it,
/// based on the [Specification] it is bound to.
pub struct Planner<'spec> {
    spec: &'spec Specification,
}

impl<'spec> Planner<'spec> {
    pub fn new(spec: &'spec Specification) -> Self {
        Planner { spec }
    }

    /// Plans the construction of an instance of `subject`
    pub fn plan(&self, subject: &TypeDescriptor) -> Result<ResolutionPlan, PlanError> {
        tracing::debug!("Planning {}", subject);
        let mut trail = Trail::default();

        // Maybe we already know how to build this
        if let Some(builder) = self.spec.get_builder(&subject.info) {
            tracing::debug!("{} is built by '{}'", subject, builder.name());
            let arguments = trail.descend(type_link(None, subject), |trail| {
                self.plan_arguments(builder, -1, trail)
            })?;

            return Ok(ResolutionPlan::BuilderBased(BuilderBasedResolutionPlan {
                subject: *subject,
                builder: builder.clone(),
                arguments,
            }));
        }

        let initializer = subject
            .initializer()
            .ok_or(PlanError::UninstantiableType(subject.info))?;

        let parameters = trail.descend(type_link(None, subject), |trail| {
            self.plan_parameters(Some(subject), &initializer, -1, trail)
        })?;

        Ok(ResolutionPlan::InferenceBased(InferenceBasedResolutionPlan {
            subject: *subject,
            initializer,
            parameters,
        }))
    }

    /// Plans invoking `subject` with resolved arguments
    pub fn plan_call(&self, subject: &Function) -> Result<ResolutionPlan, PlanError> {
        tracing::debug!("Planning call of '{}'", subject.name());
        let mut trail = Trail::default();
        let link = ChainLink {
            parameter: None,
            subject: Subject::Function(subject.name()),
        };

        trail
            .descend(link, |trail| self.plan_arguments(subject, -1, trail))
            .map(ResolutionPlan::Callable)
    }

    /// Plans the arguments of a builder or call target, partials never apply here
    fn plan_arguments(
        &self,
        function: &Function,
        depth: i32,
        trail: &mut Trail,
    ) -> Result<CallableResolutionPlan, PlanError> {
        let parameters = self.plan_parameters(None, function, depth, trail)?;
        Ok(CallableResolutionPlan {
            subject: function.clone(),
            parameters,
        })
    }

    /// Plans each parameter of `function` in declaration order
    ///
    /// `owner` is the type `function` initializes, `depth` the depth of the
    /// node owning the parameters.
    fn plan_parameters(
        &self,
        owner: Option<&TypeDescriptor>,
        function: &Function,
        depth: i32,
        trail: &mut Trail,
    ) -> Result<Vec<ParameterResolutionPlan>, PlanError> {
        let owner_subject = match owner {
            Some(owner) => Subject::Type(owner.info),
            None => Subject::Function(function.name()),
        };

        let mut planned = Vec::with_capacity(function.parameters().len());
        for (position, parameter) in function.parameters().iter().enumerate() {
            match parameter.kind {
                ParameterKind::Named => {}
                ParameterKind::Receiver if position == 0 => continue,
                ParameterKind::Variadic => {
                    tracing::trace!(
                        "Skipping variadic parameter '{}' of {}",
                        parameter.name,
                        owner_subject
                    );
                    continue;
                }
                ParameterKind::Receiver | ParameterKind::PositionalOnly => {
                    return Err(PlanError::UnsupportedParameterKind {
                        owner: owner_subject,
                        parameter: parameter.name,
                        kind: parameter.kind,
                    });
                }
            }

            let context = Context {
                owner,
                owner_subject,
                parameter,
                depth: depth + 1,
                planned: &planned,
            };
            let plan = self.plan_parameter(&context, trail)?;
            planned.push(plan);
        }

        Ok(planned)
    }

    fn plan_parameter(
        &self,
        context: &Context<'_>,
        trail: &mut Trail,
    ) -> Result<ParameterResolutionPlan, PlanError> {
        let parameter = context.parameter;

        // A partial is the most specific instruction there is
        if let Some(owner) = context.owner {
            if let Some(partial) = self.spec.get_partial(&owner.info, parameter.name) {
                tracing::trace!(
                    "'{}' of {} is built by partial '{}'",
                    parameter.name,
                    owner,
                    partial.name()
                );
                let arguments = self
                    .plan_arguments(partial, context.depth, trail)
                    .map_err(|cause| {
                        context.failure(trail, Subject::Function(partial.name()), cause)
                    })?;

                return Ok(ParameterResolutionPlan::Builder(BuilderParameterResolutionPlan {
                    node: context.node(partial.return_type().map(Annotation::Type)),
                    builder: partial.clone(),
                    arguments,
                }));
            }
        }

        if parameter.has_default {
            tracing::trace!(
                "'{}' of {} uses its default",
                parameter.name,
                context.owner_subject
            );
            return Ok(ParameterResolutionPlan::Default(DefaultParameterResolutionPlan {
                node: context.node(parameter.annotation.clone()),
            }));
        }

        let Some(annotation) = &parameter.annotation else {
            return Err(PlanError::MissingParameterAnnotation {
                owner: context.owner_subject,
                parameter: parameter.name,
            });
        };

        // The user told us how to build the annotated type
        for member in annotation.members() {
            if let Some(builder) = self.spec.get_builder(&member.info) {
                tracing::trace!(
                    "'{}' of {} is built by '{}'",
                    parameter.name,
                    context.owner_subject,
                    builder.name()
                );
                let arguments = trail
                    .descend(type_link(Some(parameter.name), member), |trail| {
                        self.plan_arguments(builder, context.depth, trail)
                    })
                    .map_err(|cause| context.failure(trail, Subject::Type(member.info), cause))?;

                return Ok(ParameterResolutionPlan::Builder(BuilderParameterResolutionPlan {
                    node: context.node(Some(annotation.clone())),
                    builder: builder.clone(),
                    arguments,
                }));
            }
        }

        let subject = match annotation {
            Annotation::Type(subject) => subject,
            Annotation::Union(_) => {
                return Err(PlanError::UnresolvableUnion {
                    owner: context.owner_subject,
                    parameter: parameter.name,
                    annotation: annotation.clone(),
                })
            }
        };

        // As a last resort, look at the initializer of the type and try to
        // build all of its parameters
        self.infer(context, subject, trail)
            .map_err(|cause| context.failure(trail, Subject::Type(subject.info), cause))
    }

    fn infer(
        &self,
        context: &Context<'_>,
        subject: &TypeDescriptor,
        trail: &mut Trail,
    ) -> Result<ParameterResolutionPlan, PlanError> {
        let node = context.node(Some(Annotation::Type(*subject)));

        trail.descend(type_link(Some(context.parameter.name), subject), |trail| {
            let initializer = subject
                .initializer()
                .ok_or(PlanError::UninstantiableType(subject.info))?;

            tracing::trace!("Inferring '{}' of {} from its initializer", node.name, subject);
            let parameters = self.plan_parameters(Some(subject), &initializer, node.depth, trail)?;

            // Nothing but defaults, the plain constructor does the same
            if parameters.iter().all(ParameterResolutionPlan::is_default) {
                return Ok(ParameterResolutionPlan::NoArgsConstructor(
                    NoArgsConstructorParameterResolutionPlan {
                        node,
                        subject: *subject,
                        initializer,
                    },
                ));
            }

            Ok(ParameterResolutionPlan::Inference(InferenceParameterResolutionPlan {
                node,
                subject: *subject,
                initializer,
                parameters,
            }))
        })
    }
}

/// The parameter currently being planned
struct Context<'a> {
    owner: Option<&'a TypeDescriptor>,
    owner_subject: Subject,
    parameter: &'a Parameter,
    depth: i32,
    /// Siblings planned before this parameter
    planned: &'a [ParameterResolutionPlan],
}

impl Context<'_> {
    fn node(&self, annotation: Option<Annotation>) -> ParameterNode {
        ParameterNode {
            name: self.parameter.name,
            depth: self.depth,
            annotation,
        }
    }

    /// Wraps a failure from below this parameter, keeping the innermost one
    ///
    /// `requires` is what the parameter was being resolved through.
    fn failure(&self, trail: &Trail, requires: Subject, cause: PlanError) -> PlanError {
        if let PlanError::FailedToInferDependency(_) = cause {
            return cause;
        }

        let mut chain = trail.links.clone();
        chain.push(ChainLink {
            parameter: Some(self.parameter.name),
            subject: requires,
        });

        PlanError::FailedToInferDependency(Box::new(InferenceFailure {
            subject: self.owner_subject,
            parameter: self.parameter.name,
            chain,
            planned: self.planned.to_vec(),
            cause,
        }))
    }
}

fn type_link(parameter: Option<&'static str>, descriptor: &TypeDescriptor) -> ChainLink {
    ChainLink {
        parameter,
        subject: Subject::Type(descriptor.info),
    }
}

/// Subjects currently being planned, from the root down
#[derive(Default)]
struct Trail {
    links: Vec<ChainLink>,
}

impl Trail {
    /// Plans below `link`, failing if its type is already being planned
    fn descend<R>(
        &mut self,
        link: ChainLink,
        plan: impl FnOnce(&mut Trail) -> Result<R, PlanError>,
    ) -> Result<R, PlanError> {
        if let Subject::Type(info) = link.subject {
            if self.links.iter().any(|entered| entered.subject == link.subject) {
                let mut chain: Vec<_> = self
                    .links
                    .iter()
                    .filter_map(|entered| match entered.subject {
                        Subject::Type(info) => Some(info),
                        Subject::Function(_) => None,
                    })
                    .collect();
                chain.push(info);

                return Err(PlanError::CyclicDependency { chain });
            }
        }

        self.links.push(link);
        let result = plan(self);
        self.links.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{inspect::Inspect, plan::PlanKind, types::TypeInfo};

    struct Leaf;
    impl Inspect for Leaf {
        fn initializer() -> Option<Function> {
            Some(Function::new("Leaf::new", |_| Ok(Leaf)))
        }
    }

    struct Branch;
    impl Inspect for Branch {
        fn initializer() -> Option<Function> {
            let init = Function::new("Branch::new", |args| {
                args.take::<Leaf>("leaf")?;
                Ok(Branch)
            })
            .param(Parameter::receiver())
            .param(Parameter::of::<Leaf>("leaf"))
            .param(Parameter::variadic("rest"));
            Some(init)
        }
    }

    struct Chicken;
    impl Inspect for Chicken {
        fn initializer() -> Option<Function> {
            let init = Function::new("Chicken::new", |args| {
                args.take::<Egg>("egg")?;
                Ok(Chicken)
            })
            .param(Parameter::of::<Egg>("egg"));
            Some(init)
        }
    }

    struct Egg;
    impl Inspect for Egg {
        fn initializer() -> Option<Function> {
            let init = Function::new("Egg::new", |args| {
                args.take::<Chicken>("chicken")?;
                Ok(Egg)
            })
            .param(Parameter::of::<Chicken>("chicken"));
            Some(init)
        }
    }

    #[test]
    fn leading_receivers_and_variadics_are_skipped() {
        let spec = Specification::new();
        let plan = Planner::new(&spec).plan(&TypeDescriptor::of::<Branch>()).unwrap();

        assert_eq!(plan.kind(), PlanKind::InferenceBased);
        assert_eq!(plan.children().len(), 1);
        assert_eq!(plan.children()[0].name(), "leaf");
        assert_eq!(plan.children()[0].depth(), 0);
        assert_eq!(plan.children()[0].kind(), PlanKind::NoArgsConstructorParameter);
    }

    #[test]
    fn cycles_report_the_whole_chain() {
        let spec = Specification::new();
        let error = Planner::new(&spec)
            .plan(&TypeDescriptor::of::<Chicken>())
            .unwrap_err();

        match error.root_cause() {
            PlanError::CyclicDependency { chain } => assert_eq!(
                chain,
                &vec![
                    TypeInfo::of::<Chicken>(),
                    TypeInfo::of::<Egg>(),
                    TypeInfo::of::<Chicken>()
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn a_builder_depending_on_its_own_type_is_a_cycle() {
        let mut spec = Specification::new();
        spec.add_builder(
            Function::new("wrap_leaf", |args| {
                args.take::<Leaf>("inner")?;
                Ok(Leaf)
            })
            .param(Parameter::of::<Leaf>("inner")),
        )
        .unwrap();

        let error = Planner::new(&spec)
            .plan(&TypeDescriptor::of::<Leaf>())
            .unwrap_err();
        assert!(matches!(error.root_cause(), PlanError::CyclicDependency { .. }));
    }

    #[test]
    fn positional_only_parameters_are_rejected() {
        let spec = Specification::new();
        let function = Function::new("sum", |args| Ok(args.take::<u8>("a")?))
            .param(Parameter::of::<u8>("a").positional_only());

        let error = Planner::new(&spec).plan_call(&function).unwrap_err();
        assert!(matches!(
            error,
            PlanError::UnsupportedParameterKind {
                owner: Subject::Function("sum"),
                parameter: "a",
                kind: ParameterKind::PositionalOnly,
            }
        ));
    }

    #[test]
    fn receivers_after_the_first_position_are_rejected() {
        let spec = Specification::new();
        let function = Function::new("odd", |_| Ok(1_u8))
            .param(Parameter::of::<u8>("a").with_default())
            .param(Parameter::receiver());

        let error = Planner::new(&spec).plan_call(&function).unwrap_err();
        assert!(matches!(
            error,
            PlanError::UnsupportedParameterKind { kind: ParameterKind::Receiver, .. }
        ));
    }
}
