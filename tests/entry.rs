use corestrap::config::{ConfigStore, INITIALIZE_ON_AWAKE_ENV};
use corestrap::entry;
use corestrap::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Describe)]
#[service(priority = 0)]
struct Clock;

#[async_trait]
impl CoreService for Clock {
    async fn initialize(&self, _services: &ServiceSet) -> anyhow::Result<()> {
        Ok(())
    }
}

fn counting_registry(built: &Arc<AtomicUsize>) -> ServiceRegistry {
    let built = Arc::clone(built);
    let mut catalog = ServiceCatalog::new();
    catalog.register_with::<Clock, _>(move || {
        built.fetch_add(1, Ordering::SeqCst);
        Ok(Clock)
    });
    ServiceRegistry::new(catalog)
}

#[tokio::test]
async fn test_persisted_flag_gates_the_next_start() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // Overrides would mask the file under test
    if std::env::var_os(INITIALIZE_ON_AWAKE_ENV).is_some() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corestrap").join("core_config.json");

    let mut store = ConfigStore::load(&path).unwrap();
    store.set_initialize_on_awake(false);
    assert!(store.save().unwrap());

    let built = Arc::new(AtomicUsize::new(0));
    let registry = counting_registry(&built);
    let outcome = entry::auto_initialize_from(&registry, &path).await.unwrap();
    assert!(outcome.is_none());
    assert_eq!(built.load(Ordering::SeqCst), 0);
    assert!(registry.get::<Clock>().is_none());

    let mut store = ConfigStore::load(&path).unwrap();
    assert!(store.toggle());
    assert!(store.save().unwrap());

    let registry = counting_registry(&built);
    let report = entry::auto_initialize_from(&registry, &path)
        .await
        .unwrap()
        .expect("bootstrap enabled");
    assert_eq!(report.services.len(), 1);
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(registry.get::<Clock>().is_some());
}

#[tokio::test]
async fn test_missing_asset_runs_by_default() {
    if std::env::var_os(INITIALIZE_ON_AWAKE_ENV).is_some() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let built = Arc::new(AtomicUsize::new(0));
    let registry = counting_registry(&built);

    let outcome = entry::auto_initialize_from(&registry, dir.path().join("absent.json"))
        .await
        .unwrap();
    assert!(outcome.is_some());
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_asset_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("core_config.json");
    std::fs::write(&path, "[]").unwrap();

    let built = Arc::new(AtomicUsize::new(0));
    let registry = counting_registry(&built);
    let err = entry::auto_initialize_from(&registry, &path).await.unwrap_err();

    assert!(matches!(err, BootstrapError::Config(_)));
    assert_eq!(built.load(Ordering::SeqCst), 0);
}
