//! Guards run while a [crate::Specification] is populated

use crate::{
    errors::SpecificationError,
    function::Function,
    inspect::{Parameter, ParameterKind, TypeDescriptor},
};

/// Returns the type a builder produces
pub fn assert_annotates_return_type(
    builder: &Function,
) -> Result<TypeDescriptor, SpecificationError> {
    builder
        .return_type()
        .ok_or(SpecificationError::MissingReturnAnnotation {
            builder: builder.name(),
        })
}

/// Looks up a parameter of the owner's initializer by name
///
/// Only named parameters can be supplied by a partial. Receivers and
/// variadics are skipped by the planner, positional-only ones are rejected.
pub fn assert_constructor_has_parameter(
    owner: &TypeDescriptor,
    name: &'static str,
) -> Result<Parameter, SpecificationError> {
    owner
        .initializer()
        .and_then(|initializer| {
            initializer
                .parameters()
                .iter()
                .find(|p| p.name == name && p.kind == ParameterKind::Named)
                .cloned()
        })
        .ok_or(SpecificationError::MissingConstructorParameter {
            owner: owner.info,
            parameter: name,
        })
}

/// Checks a partial's return type against the parameter it supplies
///
/// Unannotated parameters accept anything. For unions the builder's type
/// must be one of the members.
pub fn assert_parameter_accepts(
    owner: &TypeDescriptor,
    parameter: &Parameter,
    builder: &Function,
    returns: &TypeDescriptor,
) -> Result<(), SpecificationError> {
    let Some(accepts) = &parameter.annotation else {
        return Ok(());
    };

    if accepts.accepts(&returns.info) {
        return Ok(());
    }

    Err(SpecificationError::IncompatiblePartialType {
        owner: owner.info,
        parameter: parameter.name,
        builder: builder.name(),
        returns: returns.info,
        accepts: accepts.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{Annotation, Inspect};

    struct Greeter;
    impl Inspect for Greeter {
        fn initializer() -> Option<Function> {
            let init = Function::new("Greeter::new", |_| Ok(Greeter))
                .param(Parameter::receiver())
                .param(Parameter::of::<String>("name"))
                .param(Parameter::untyped("anything"))
                .param(Parameter::variadic("rest"))
                .param(Parameter::of::<u8>("index").positional_only());
            Some(init)
        }
    }

    #[test]
    fn receivers_can_not_be_targeted() {
        let greeter = TypeDescriptor::of::<Greeter>();
        assert!(assert_constructor_has_parameter(&greeter, "name").is_ok());
        assert!(matches!(
            assert_constructor_has_parameter(&greeter, "self"),
            Err(SpecificationError::MissingConstructorParameter { parameter: "self", .. })
        ));
    }

    #[test]
    fn variadics_can_not_be_targeted() {
        let greeter = TypeDescriptor::of::<Greeter>();
        assert!(matches!(
            assert_constructor_has_parameter(&greeter, "rest"),
            Err(SpecificationError::MissingConstructorParameter { parameter: "rest", .. })
        ));
    }

    #[test]
    fn positional_only_parameters_can_not_be_targeted() {
        let greeter = TypeDescriptor::of::<Greeter>();
        assert!(matches!(
            assert_constructor_has_parameter(&greeter, "index"),
            Err(SpecificationError::MissingConstructorParameter { parameter: "index", .. })
        ));
    }

    #[test]
    fn unannotated_parameters_accept_any_partial() {
        let greeter = TypeDescriptor::of::<Greeter>();
        let parameter = assert_constructor_has_parameter(&greeter, "anything").unwrap();
        let builder = Function::new("number", |_| Ok(3_u8));

        let returns = assert_annotates_return_type(&builder).unwrap();
        assert!(assert_parameter_accepts(&greeter, &parameter, &builder, &returns).is_ok());
    }

    #[test]
    fn unions_reject_types_outside_the_union() {
        let greeter = TypeDescriptor::of::<Greeter>();
        let parameter = Parameter::annotated(
            "id",
            Annotation::union([TypeDescriptor::of::<u32>(), TypeDescriptor::of::<String>()]),
        );
        let builder = Function::new("id", |_| Ok(7_u64));
        let returns = TypeDescriptor::of::<u64>();

        assert!(matches!(
            assert_parameter_accepts(&greeter, &parameter, &builder, &returns),
            Err(SpecificationError::IncompatiblePartialType { parameter: "id", .. })
        ));
    }
}
