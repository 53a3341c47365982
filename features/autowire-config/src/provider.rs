use std::{any::Any, collections::HashMap, fmt::Debug, sync::Arc};

use autowire::{Injectable, Specification, TypeInfo};

use crate::{config::Config, errors::ConfigError};

type Install = Box<dyn Fn(&mut Specification) + Send + Sync>;

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    install: Install,
}

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type.
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeInfo, Entry>,
}
impl Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.configs.keys().map(|info| info.type_name).collect();
        names.sort();
        f.debug_struct("ConfigProvider")
            .field("configs", &names)
            .finish()
    }
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a config with specified type.
    ///
    /// Returns `Ok(None)` if no config of this type was registered
    pub fn get_config<T: Injectable>(&self) -> Result<Option<Arc<T>>, ConfigError> {
        let info = TypeInfo::of::<T>();

        self.configs
            .get(&info)
            .map(|entry| entry.value.clone().downcast())
            .transpose()
            .map_err(|_| ConfigError::ConfigMissing(info))
    }

    /// Retrieve a config that has to exist
    pub fn require_config<T: Injectable>(&self) -> Result<Config<T>, ConfigError> {
        self.get_config()?
            .map(Config::new)
            .ok_or(ConfigError::ConfigMissing(TypeInfo::of::<T>()))
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a
    /// [`ConfigError`] runtime error
    pub fn add_config<T: Injectable>(&mut self, config: T) -> Result<&mut Self, ConfigError> {
        let info = TypeInfo::of::<T>();

        if self.configs.contains_key(&info) {
            return Err(ConfigError::ConfigAlreadyRegistered(info));
        }

        tracing::debug!("Adding config {}", info);
        let value = Arc::new(config);
        let shared = value.clone();
        let install: Install = Box::new(move |spec| {
            spec.add_instance(Config::new(shared.clone()));
        });

        self.configs.insert(info, Entry { value, install });
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Injectable>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    /// Registers a builder for `Config<T>` of every config on the specification
    pub fn install(&self, spec: &mut Specification) {
        tracing::debug!("Installing {} configs", self.configs.len());
        for entry in self.configs.values() {
            (entry.install)(spec);
        }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
