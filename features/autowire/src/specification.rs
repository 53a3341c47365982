use std::collections::{BTreeMap, HashMap};

use crate::{
    errors::SpecificationError,
    function::Function,
    inspect::{Inspect, TypeDescriptor},
    types::TypeInfo,
    validation::{
        assert_annotates_return_type, assert_constructor_has_parameter, assert_parameter_accepts,
    },
};

//////////////////////////////////////////////////////////////////////
///
/// A Specification records what the application knows how to build.
/// 1. Builders produce a whole type
/// 2. Partials produce a single named constructor parameter of a type
/// 3. Markers declare a type exists, so it gets verified
///
/// Specifications are populated once during setup and only read afterwards.
#[derive(Default, Clone, Debug)]
pub struct Specification {
    /// Builder functions by the type they return
    builders: HashMap<TypeInfo, Function>,
    /// Partial builders by owner and parameter name
    partials: HashMap<TypeInfo, Partials>,
    /// Types known to exist without instructions how to build them
    markers: HashMap<TypeInfo, TypeDescriptor>,
}

#[derive(Clone, Debug)]
struct Partials {
    owner: TypeDescriptor,
    by_parameter: HashMap<&'static str, Function>,
}

impl Specification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a builder for the type it returns, replacing any earlier one
    pub fn add_builder(&mut self, builder: Function) -> Result<&mut Self, SpecificationError> {
        let returns = assert_annotates_return_type(&builder)?;

        tracing::debug!("Registering builder '{}' for {}", builder.name(), returns);
        if let Some(replaced) = self.builders.insert(returns.info, builder) {
            tracing::warn!("Replaced builder '{}' for {}", replaced.name(), returns);
        }

        Ok(self)
    }

    /// Registers a builder for a single constructor parameter of `Owner`
    pub fn add_partial<Owner: Inspect>(
        &mut self,
        parameter: &'static str,
        builder: Function,
    ) -> Result<&mut Self, SpecificationError> {
        self.add_partial_for(TypeDescriptor::of::<Owner>(), parameter, builder)
    }

    pub fn add_partial_for(
        &mut self,
        owner: TypeDescriptor,
        parameter: &'static str,
        builder: Function,
    ) -> Result<&mut Self, SpecificationError> {
        let returns = assert_annotates_return_type(&builder)?;
        let declared = assert_constructor_has_parameter(&owner, parameter)?;
        assert_parameter_accepts(&owner, &declared, &builder, &returns)?;

        tracing::debug!(
            "Registering partial '{}' for parameter '{}' of {}",
            builder.name(),
            parameter,
            owner
        );
        self.partials
            .entry(owner.info)
            .or_insert_with(|| Partials {
                owner,
                by_parameter: HashMap::new(),
            })
            .by_parameter
            .insert(parameter, builder);

        Ok(self)
    }

    /// Declares that `T` is part of the application
    pub fn add_marker<T: Inspect>(&mut self) -> &mut Self {
        self.add_marker_for(TypeDescriptor::of::<T>())
    }

    pub fn add_marker_for(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        tracing::debug!("Registering marker for {}", descriptor);
        self.markers.insert(descriptor.info, descriptor);
        self
    }

    /// Registers an existing value, every resolution receives a clone of it
    pub fn add_instance<T: Inspect + Clone>(&mut self, instance: T) -> &mut Self {
        let builder = Function::new(std::any::type_name::<T>(), move |_| Ok(instance.clone()));
        let descriptor = TypeDescriptor::of::<T>();

        tracing::debug!("Registering instance of {}", descriptor);
        if self.builders.insert(descriptor.info, builder).is_some() {
            tracing::warn!("Replaced builder for {} with an instance", descriptor);
        }
        self
    }

    pub fn get_builder(&self, abstract_type: &TypeInfo) -> Option<&Function> {
        self.builders.get(abstract_type)
    }

    pub fn get_partial(&self, owner: &TypeInfo, parameter: &str) -> Option<&Function> {
        self.partials
            .get(owner)
            .and_then(|partials| partials.by_parameter.get(parameter))
    }

    /// All types with a builder, partials or a marker, ordered by name
    pub fn types(&self) -> Vec<TypeDescriptor> {
        let mut types = BTreeMap::new();

        for builder in self.builders.values() {
            if let Some(returns) = builder.return_type() {
                types.insert(returns.info, returns);
            }
        }
        for partials in self.partials.values() {
            types.insert(partials.owner.info, partials.owner);
        }
        for marker in self.markers.values() {
            types.insert(marker.info, *marker);
        }

        types.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::inspect::Parameter;

    #[derive(Clone)]
    struct Greeter {
        name: String,
    }
    impl Inspect for Greeter {
        fn initializer() -> Option<Function> {
            let init = Function::new("Greeter::new", |args| {
                Ok(Greeter {
                    name: args.take("name")?,
                })
            })
            .param(Parameter::of::<String>("name"));
            Some(init)
        }
    }

    struct Simple;
    impl Inspect for Simple {}

    struct Logger;
    impl Inspect for Logger {
        fn initializer() -> Option<Function> {
            let init = Function::new("Logger::new", |_| Ok(Logger))
                .param(Parameter::of::<String>("prefix").positional_only())
                .param(Parameter::variadic("sinks"));
            Some(init)
        }
    }

    #[test]
    fn builders_require_a_return_type() {
        let mut spec = Specification::new();
        let untyped = Function::untyped("greeter", |_| {
            Ok(crate::types::Instance::new(Greeter {
                name: "Example".to_string(),
            }))
        });

        assert!(matches!(
            spec.add_builder(untyped),
            Err(SpecificationError::MissingReturnAnnotation { builder: "greeter" })
        ));
        assert!(spec.types().is_empty());
    }

    #[test]
    fn partials_must_target_an_existing_parameter() {
        let mut spec = Specification::new();
        let builder = Function::new("build_name", |_| Ok(String::new()));

        let error = spec
            .add_partial::<Greeter>("none_existent", builder.clone())
            .unwrap_err();
        assert!(matches!(
            error,
            SpecificationError::MissingConstructorParameter { parameter: "none_existent", .. }
        ));

        // Opaque types have no parameters at all
        assert!(spec.add_partial::<Simple>("name", builder).is_err());
        assert!(spec.get_partial(&TypeInfo::of::<Greeter>(), "none_existent").is_none());
    }

    #[test]
    fn partials_can_only_target_named_parameters() {
        let mut spec = Specification::new();
        for parameter in ["prefix", "sinks"] {
            let builder = Function::new("build", |_| Ok(String::new()));
            assert!(matches!(
                spec.add_partial::<Logger>(parameter, builder),
                Err(SpecificationError::MissingConstructorParameter { .. })
            ));
        }
        assert!(spec.types().is_empty());
    }

    #[test]
    fn partials_must_return_the_parameter_type() {
        let mut spec = Specification::new();
        let error = spec
            .add_partial::<Greeter>("name", Function::new("build_name", |_| Ok(42_u32)))
            .unwrap_err();

        match error {
            SpecificationError::IncompatiblePartialType { returns, accepts, .. } => {
                assert_eq!(returns, TypeInfo::of::<u32>());
                assert_eq!(accepts, crate::inspect::Annotation::of::<String>());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    #[traced_test]
    fn the_last_builder_wins() {
        let mut spec = Specification::new();
        spec.add_builder(Function::new("first", |_| Ok(Simple)))
            .unwrap()
            .add_builder(Function::new("second", |_| Ok(Simple)))
            .unwrap();

        let builder = spec.get_builder(&TypeInfo::of::<Simple>()).unwrap();
        assert_eq!(builder.name(), "second");
        assert!(logs_contain("Replaced builder 'first'"));
    }

    #[test]
    fn types_unions_builders_partials_and_markers() {
        let mut spec = Specification::new();
        spec.add_builder(Function::new("simple", |_| Ok(Simple)))
            .unwrap()
            .add_partial::<Greeter>("name", Function::new("name", |_| Ok("Ella".to_string())))
            .unwrap()
            .add_marker::<u8>()
            .add_instance(3_u16);

        let types: Vec<TypeInfo> = spec.types().iter().map(|d| d.info).collect();
        assert_eq!(types.len(), 4);
        assert!(types.contains(&TypeInfo::of::<Simple>()));
        assert!(types.contains(&TypeInfo::of::<Greeter>()));
        assert!(types.contains(&TypeInfo::of::<u8>()));
        assert!(types.contains(&TypeInfo::of::<u16>()));

        let mut sorted = types.clone();
        sorted.sort();
        assert_eq!(types, sorted);
    }
}
