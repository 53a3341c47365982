//! Autowire plans how to construct values from what their initializers declare.
//!
//! Types describe their initializer through [Inspect]. A [Specification]
//! records builders for whole types and partials for single parameters.
//! The [Planner] walks the parameter lists and produces a [ResolutionPlan],
//! which a [Container] executes.
//!
//! # Example
//!
//! ```rust
//! use autowire::{Container, Function, Inspect, Parameter, RuntimeContainer, Specification};
//!
//! struct Database {
//!     url: String,
//! }
//! impl Inspect for Database {
//!     fn initializer() -> Option<Function> {
//!         let init = Function::new("Database::new", |args| {
//!             Ok(Database {
//!                 url: args.take("url")?,
//!             })
//!         })
//!         .param(Parameter::of::<String>("url"));
//!         Some(init)
//!     }
//! }
//!
//! struct Repository {
//!     database: Database,
//! }
//! impl Inspect for Repository {
//!     fn initializer() -> Option<Function> {
//!         let init = Function::new("Repository::new", |args| {
//!             Ok(Repository {
//!                 database: args.take("database")?,
//!             })
//!         })
//!         .param(Parameter::of::<Database>("database"));
//!         Some(init)
//!     }
//! }
//!
//! let mut spec = Specification::new();
//! spec.add_partial::<Database>(
//!     "url",
//!     Function::new("database_url", |_| Ok("postgres://localhost".to_string())),
//! )
//! .unwrap();
//!
//! let container = RuntimeContainer::new(spec);
//! let repository = container.resolve::<Repository>().unwrap();
//! assert_eq!(repository.database.url, "postgres://localhost");
//! ```
//!
//! Autowire consists of the following components:
//!
//! 1. Inspect - for describing initializers and parameters
//! 2. Specification - for registering builders, partials and markers
//! 3. Planner - for turning a type or function into a plan
//! 4. Plan - for inspecting and executing plans
//! 5. Container - for resolving types and calling functions

pub mod container;
pub mod errors;
pub mod function;
pub mod inspect;
pub mod plan;
pub mod planner;
pub mod specification;
pub mod types;
pub mod validation;
pub mod verification;

pub use container::{Container, DefaultContainer, RuntimeContainer, VerifyingContainer};
pub use function::{Arguments, Function};
pub use inspect::{Annotation, Inspect, Parameter, ParameterKind, TypeDescriptor};
pub use plan::{ParameterResolutionPlan, PlanKind, ResolutionPlan};
pub use planner::Planner;
pub use specification::Specification;
pub use types::{DynError, Injectable, Instance, Subject, TypeInfo};
pub use verification::{verify, VerifiedSpecification};
