use crate::{
    container::Container,
    errors::{ContainerError, SpecificationError},
    function::Function,
    inspect::{Inspect, TypeDescriptor},
    planner::Planner,
    specification::Specification,
    types::{Instance, TypeInfo},
};

/// A specification and a container at the same time
///
/// Builders, partials and markers may be added at any point, every request is
/// planned against what is registered right then. Convenient for small
/// applications and tests, but nothing stops a registration from changing
/// how a type is built later on. Prefer [crate::VerifyingContainer] once the
/// wiring is settled.
///
/// # Example
/// ```rust
/// use autowire::{Container, DefaultContainer, Function};
///
/// let mut container = DefaultContainer::new();
/// container
///     .add_builder(Function::new("port", |_| Ok(8080_u16)))
///     .unwrap();
///
/// assert_eq!(container.resolve::<u16>().unwrap(), 8080);
/// ```
#[derive(Debug, Default, Clone)]
pub struct DefaultContainer {
    spec: Specification,
}

impl From<Specification> for DefaultContainer {
    fn from(spec: Specification) -> Self {
        DefaultContainer { spec }
    }
}

impl DefaultContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    pub fn into_specification(self) -> Specification {
        self.spec
    }

    pub fn add_builder(&mut self, builder: Function) -> Result<&mut Self, SpecificationError> {
        self.spec.add_builder(builder)?;
        Ok(self)
    }

    pub fn add_partial<Owner: Inspect>(
        &mut self,
        parameter: &'static str,
        builder: Function,
    ) -> Result<&mut Self, SpecificationError> {
        self.spec.add_partial::<Owner>(parameter, builder)?;
        Ok(self)
    }

    pub fn add_partial_for(
        &mut self,
        owner: TypeDescriptor,
        parameter: &'static str,
        builder: Function,
    ) -> Result<&mut Self, SpecificationError> {
        self.spec.add_partial_for(owner, parameter, builder)?;
        Ok(self)
    }

    pub fn add_marker<T: Inspect>(&mut self) -> &mut Self {
        self.spec.add_marker::<T>();
        self
    }

    pub fn add_marker_for(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.spec.add_marker_for(descriptor);
        self
    }

    pub fn add_instance<T: Inspect + Clone>(&mut self, instance: T) -> &mut Self {
        self.spec.add_instance(instance);
        self
    }

    pub fn get_builder(&self, abstract_type: &TypeInfo) -> Option<&Function> {
        self.spec.get_builder(abstract_type)
    }

    pub fn get_partial(&self, owner: &TypeInfo, parameter: &str) -> Option<&Function> {
        self.spec.get_partial(owner, parameter)
    }

    pub fn types(&self) -> Vec<TypeDescriptor> {
        self.spec.types()
    }
}

impl Container for DefaultContainer {
    fn resolve_type(&self, subject: &TypeDescriptor) -> Result<Instance, ContainerError> {
        let plan = Planner::new(&self.spec).plan(subject)?;
        Ok(plan.execute()?)
    }

    fn call_function(&self, function: &Function) -> Result<Instance, ContainerError> {
        let plan = Planner::new(&self.spec).plan_call(function)?;
        Ok(plan.execute()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::Parameter;

    #[derive(Debug, PartialEq)]
    struct Endpoint {
        host: String,
        port: u16,
    }
    impl Inspect for Endpoint {
        fn initializer() -> Option<Function> {
            let init = Function::new("Endpoint::new", |args| {
                Ok(Endpoint {
                    host: args.take("host")?,
                    port: args.take_or("port", 80)?,
                })
            })
            .param(Parameter::of::<String>("host"))
            .param(Parameter::of::<u16>("port").with_default());
            Some(init)
        }
    }

    #[test]
    fn registrations_apply_to_later_resolutions() {
        let mut container = DefaultContainer::new();
        assert!(container.resolve::<Endpoint>().is_err());

        container
            .add_partial::<Endpoint>("host", Function::new("host", |_| Ok("localhost".to_string())))
            .unwrap();
        assert_eq!(
            container.resolve::<Endpoint>().unwrap(),
            Endpoint {
                host: "localhost".to_string(),
                port: 80
            }
        );

        container
            .add_partial::<Endpoint>("port", Function::new("port", |_| Ok(8080_u16)))
            .unwrap();
        assert_eq!(container.resolve::<Endpoint>().unwrap().port, 8080);
    }

    #[test]
    fn registrations_are_forwarded_to_the_specification() {
        let mut container = DefaultContainer::new();
        container
            .add_builder(Function::new("endpoint", |_| {
                Ok(Endpoint {
                    host: "example.com".to_string(),
                    port: 443,
                })
            }))
            .unwrap()
            .add_marker::<u8>()
            .add_instance(7_u32);

        let endpoint = TypeInfo::of::<Endpoint>();
        assert_eq!(container.get_builder(&endpoint).map(Function::name), Some("endpoint"));
        assert!(container.get_partial(&endpoint, "host").is_none());
        assert_eq!(container.types().len(), 3);
        assert_eq!(container.resolve::<u32>().unwrap(), 7);

        let spec = container.into_specification();
        assert!(spec.get_builder(&endpoint).is_some());
    }

    #[test]
    fn invalid_registrations_are_rejected() {
        let mut container = DefaultContainer::from(Specification::new());
        let error = container
            .add_partial::<Endpoint>("missing", Function::new("missing", |_| Ok(1_u8)))
            .unwrap_err();

        assert!(matches!(
            error,
            SpecificationError::MissingConstructorParameter { parameter: "missing", .. }
        ));
    }

    #[test]
    fn functions_are_called_with_resolved_arguments() {
        let mut container = DefaultContainer::new();
        container.add_instance("api.example.com".to_string());

        let url = Function::new("url", |args| {
            let host: String = args.take("host")?;
            Ok(format!("https://{host}"))
        })
        .param(Parameter::of::<String>("host"));

        assert_eq!(container.call::<String>(&url).unwrap(), "https://api.example.com");
    }
}
