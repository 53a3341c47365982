use std::{
    any::{Any, TypeId},
    fmt::Debug,
};

/// Errors produced by user supplied builders and initializers
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Plans may be shared between threads once built,
/// so anything the engine constructs needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// An owned, type erased value produced by executing a plan
pub struct Instance {
    pub info: TypeInfo,
    value: Box<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub fn new<T: Injectable>(value: T) -> Self {
        Instance {
            info: TypeInfo::of::<T>(),
            value: Box::new(value),
        }
    }

    /// Returns true if the instance holds a `T`
    pub fn is<T: Injectable>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Takes the value out of the instance
    ///
    /// Gives the instance back untouched if it does not hold a `T`
    pub fn downcast<T: Injectable>(self) -> Result<T, Instance> {
        let info = self.info;
        match self.value.downcast::<T>() {
            Ok(downcasted) => Ok(*downcasted),
            Err(value) => Err(Instance { info, value }),
        }
    }
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// Whatever owns a parameter list: a type's initializer or a bare function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Type(TypeInfo),
    Function(&'static str),
}
impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Type(info) => f.write_str(info.type_name),
            Subject::Function(name) => write!(f, "{name}()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_returns_the_instance_on_mismatch() {
        let instance = Instance::new(42_u32);
        assert!(instance.is::<u32>());

        let instance = instance.downcast::<String>().unwrap_err();
        assert_eq!(instance.info, TypeInfo::of::<u32>());
        assert_eq!(instance.downcast::<u32>().unwrap(), 42);
    }

    #[test]
    fn subjects_display_functions_with_parentheses() {
        assert_eq!(Subject::Function("build_client").to_string(), "build_client()");
        assert_eq!(Subject::Type(TypeInfo::of::<u8>()).to_string(), "u8");
    }
}
