use autowire::{
    errors::{ContainerError, PlanError},
    Container, Function, Inspect, Parameter, RuntimeContainer, Specification, VerifyingContainer,
};
use autowire_config::{config::Config, provider::ConfigProvider};

struct DatabaseConfig {
    url: String,
    pool_size: u8,
}

#[derive(Debug)]
struct Pool {
    url: String,
    size: u8,
}
impl Inspect for Pool {
    fn initializer() -> Option<Function> {
        let init = Function::new("Pool::connect", |args| {
            let config: Config<DatabaseConfig> = args.take("config")?;
            Ok(Pool {
                url: config.url.clone(),
                size: config.pool_size,
            })
        })
        .param(Parameter::of::<Config<DatabaseConfig>>("config"));
        Some(init)
    }
}

fn provider() -> ConfigProvider {
    let mut provider = ConfigProvider::new();
    provider
        .add_config(DatabaseConfig {
            url: "postgres://localhost/app".to_string(),
            pool_size: 4,
        })
        .unwrap();
    provider
}

#[test]
fn installed_configs_are_injected() {
    let mut spec = Specification::new();
    provider().install(&mut spec);

    let pool = RuntimeContainer::new(spec).resolve::<Pool>().unwrap();
    assert_eq!(pool.url, "postgres://localhost/app");
    assert_eq!(pool.size, 4);
}

#[test]
fn every_resolution_shares_the_same_config() {
    let mut spec = Specification::new();
    provider().install(&mut spec);
    let container = VerifyingContainer::new(spec).unwrap();

    let first = container.resolve::<Config<DatabaseConfig>>().unwrap();
    let second = container.resolve::<Config<DatabaseConfig>>().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first.inner(), &second.inner()));
}

#[test]
fn missing_configs_fail_planning() {
    let spec = Specification::new();
    let error = RuntimeContainer::new(spec).resolve::<Pool>().unwrap_err();

    match error {
        ContainerError::Plan(error) => {
            assert!(matches!(error.root_cause(), PlanError::UninstantiableType(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
}
