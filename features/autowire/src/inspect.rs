//! Declared signature metadata
//!
//! The planner never looks at Rust types directly. Every type it may construct
//! implements [Inspect], describing its initializer as a [Function] whose
//! [Parameter]s name, annotate and flag defaults for each argument.

use std::{
    collections::HashMap,
    hash::Hash,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use crate::{
    function::Function,
    types::{Injectable, TypeInfo},
};

/// Describes how a type is constructed
///
/// Types without an initializer are opaque: they can only be supplied by a
/// builder, a partial, or a parameter default.
///
/// # Example
/// ```rust
/// use autowire::{Function, Inspect, Parameter};
///
/// struct Mailer;
/// impl Inspect for Mailer {}
///
/// struct Newsletter {
///     mailer: Mailer,
///     retries: u8,
/// }
/// impl Inspect for Newsletter {
///     fn initializer() -> Option<Function> {
///         let init = Function::new("Newsletter::new", |args| {
///             Ok(Newsletter {
///                 mailer: args.take("mailer")?,
///                 retries: args.take_or("retries", 3)?,
///             })
///         })
///         .param(Parameter::of::<Mailer>("mailer"))
///         .param(Parameter::of::<u8>("retries").with_default());
///         Some(init)
///     }
/// }
/// ```
pub trait Inspect: Injectable + Sized {
    fn initializer() -> Option<Function> {
        None
    }
}

/// Handle to a type and its initializer
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    pub info: TypeInfo,
    initializer: fn() -> Option<Function>,
}
impl TypeDescriptor {
    pub fn of<T: Inspect>() -> Self {
        TypeDescriptor {
            info: TypeInfo::of::<T>(),
            initializer: T::initializer,
        }
    }

    pub fn initializer(&self) -> Option<Function> {
        (self.initializer)()
    }
}
impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}
impl Eq for TypeDescriptor {}
impl Hash for TypeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.info.hash(state);
    }
}
impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TypeDescriptor")
            .field(&self.info.type_name)
            .finish()
    }
}
impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.info.fmt(f)
    }
}

/// The declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Type(TypeDescriptor),
    /// Accepts a value of any of the member types
    Union(Vec<TypeDescriptor>),
}
impl Annotation {
    pub fn of<T: Inspect>() -> Self {
        Annotation::Type(TypeDescriptor::of::<T>())
    }

    /// Builds a union annotation, a single member collapses to a plain type
    pub fn union(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let mut unique: Vec<TypeDescriptor> = Vec::new();
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        match unique.len() {
            1 => Annotation::Type(unique[0]),
            _ => Annotation::Union(unique),
        }
    }

    pub fn members(&self) -> &[TypeDescriptor] {
        match self {
            Annotation::Type(descriptor) => std::slice::from_ref(descriptor),
            Annotation::Union(members) => members,
        }
    }

    /// A union accepts every one of its members, a plain type only itself
    pub fn accepts(&self, returns: &TypeInfo) -> bool {
        self.members().iter().any(|member| member.info == *returns)
    }
}
impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.members().iter().map(|m| m.info.type_name).collect();
        f.write_str(&names.join(" | "))
    }
}

/// How an argument is bound to a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// The `self` of a method. Skipped when it comes first.
    Receiver,
    /// Bound by name
    Named,
    /// Bound by position only, which the planner can not do
    PositionalOnly,
    /// Collects any number of extra arguments. Always skipped.
    Variadic,
}
impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ParameterKind::Receiver => "a receiver",
            ParameterKind::Named => "named",
            ParameterKind::PositionalOnly => "positional-only",
            ParameterKind::Variadic => "variadic",
        })
    }
}

/// A single formal parameter of a [Function]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub annotation: Option<Annotation>,
    /// The function falls back to its own default when the argument is unset
    pub has_default: bool,
}
impl Parameter {
    /// A required, named parameter of type `T`
    pub fn of<T: Inspect>(name: &'static str) -> Self {
        Self::annotated(name, Annotation::of::<T>())
    }

    pub fn annotated(name: &'static str, annotation: Annotation) -> Self {
        Parameter {
            name,
            kind: ParameterKind::Named,
            annotation: Some(annotation),
            has_default: false,
        }
    }

    pub fn untyped(name: &'static str) -> Self {
        Parameter {
            name,
            kind: ParameterKind::Named,
            annotation: None,
            has_default: false,
        }
    }

    pub fn receiver() -> Self {
        Parameter {
            kind: ParameterKind::Receiver,
            ..Self::untyped("self")
        }
    }

    pub fn variadic(name: &'static str) -> Self {
        Parameter {
            kind: ParameterKind::Variadic,
            ..Self::untyped(name)
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn positional_only(mut self) -> Self {
        self.kind = ParameterKind::PositionalOnly;
        self
    }
}

// Values the engine can be handed but never builds on its own
macro_rules! opaque {
    ($($ty:ty),* $(,)?) => {
        $(impl Inspect for $ty {})*
    };
}

opaque! {
    (), String, &'static str, bool, char,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
    PathBuf, Duration,
}

impl<T: Injectable> Inspect for Vec<T> {}
impl<T: Injectable> Inspect for Option<T> {}
impl<T: ?Sized + Send + Sync + 'static> Inspect for Arc<T> {}
impl<T: ?Sized + Send + Sync + 'static> Inspect for Box<T> {}
impl<K: Injectable, V: Injectable, S: Injectable> Inspect for HashMap<K, V, S> {}
