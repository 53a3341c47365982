use std::{fmt::Debug, ops::Deref, sync::Arc};

use autowire::{Injectable, Inspect};

/// A wrapper type to allow for config injections
///
/// Once a [crate::provider::ConfigProvider] is installed into a
/// [autowire::Specification], every initializer can declare a `Config<T>`
/// parameter and receives the registered config.
///
/// # Example
/// ```rust
/// use autowire::{Container, Function, Inspect, Parameter, RuntimeContainer, Specification};
/// use autowire_config::{config::Config, provider::ConfigProvider};
///
/// pub struct MailerConfig {
///     host: String,
/// }
///
/// pub struct Mailer {
///     host: String,
/// }
/// impl Inspect for Mailer {
///     fn initializer() -> Option<Function> {
///         let init = Function::new("Mailer::new", |args| {
///             let config: Config<MailerConfig> = args.take("config")?;
///             Ok(Mailer {
///                 host: config.host.clone(),
///             })
///         })
///         .param(Parameter::of::<Config<MailerConfig>>("config"));
///         Some(init)
///     }
/// }
///
/// let mut provider = ConfigProvider::new();
/// provider
///     .add_config(MailerConfig {
///         host: "smtp.example.com".to_string(),
///     })
///     .unwrap();
///
/// let mut spec = Specification::new();
/// provider.install(&mut spec);
///
/// let mailer = RuntimeContainer::new(spec).resolve::<Mailer>().unwrap();
/// assert_eq!(mailer.host, "smtp.example.com");
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            inner: self.inner.clone(),
        }
    }
}
impl<T: Debug> Debug for Config<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Config").field(&self.inner).finish()
    }
}
impl<T> Config<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Config { inner }
    }

    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

// Configs are always supplied by the provider, never inferred
impl<T: Injectable> Inspect for Config<T> {}
