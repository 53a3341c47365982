use autowire::TypeInfo;

/// Errors when registering or acquiring a config
#[derive(thiserror::Error, Debug, Clone)]
pub enum ConfigError {
    /// The required Config is not known
    #[error("The config type '{0}' is not known")]
    ConfigMissing(TypeInfo),

    /// A config of this type was registered before
    #[error("The config type '{0}' is already registered")]
    ConfigAlreadyRegistered(TypeInfo),
}
