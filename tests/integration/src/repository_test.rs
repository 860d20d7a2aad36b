//! End-to-end repository wiring: configuration, transformers,
//! allocation, and the session registry working together.

use assert_fs::prelude::*;
use pixrepo_fs::{Repository, RepositoryConfig};
use pixrepo_path::RepoPath;
use pixrepo_session::ServantRegistry;
use predicates::prelude::*;
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn open_repository(temp: &assert_fs::TempDir) -> Repository {
    let base = temp.child("managed");
    base.create_dir_all().unwrap();
    let config_file = temp.child("repository.toml");
    config_file
        .write_str(&format!(
            r#"
base_dir = "{}"
rules = ["windows-required", "unix-required", "unix-optional"]
client_path_depth = 2
servant_ceiling = 2
tile_width = 16
tile_height = 16
"#,
            base.path().display()
        ))
        .unwrap();
    Repository::open(RepositoryConfig::load(config_file.path()).unwrap()).unwrap()
}

#[test]
fn test_client_submission_is_validated_and_placed() {
    init_tracing();
    let temp = assert_fs::TempDir::new().unwrap();
    let repository = open_repository(&temp);

    // a client-side file with an unsafe parent directory name
    let incoming = temp.child("staging").child("AUX").child("scan:1.tif");
    incoming.touch().unwrap();

    let repo_path = repository
        .client_transformer()
        .repo_path(incoming.path(), repository.config().client_path_depth)
        .unwrap();
    assert_eq!(repo_path.to_string(), "AUX_/scan_1.tif");

    // the sanitized name passes validation, the raw one does not
    assert!(repository.validator().validate(&repo_path).is_ok());
    assert!(repository
        .validator()
        .validate(&RepoPath::from_string("AUX/scan:1.tif"))
        .is_err());
    assert!(repository.server_transformer().is_legal(&repo_path));

    // claim an import directory and place the file under it
    let slots = repository.dir_slots("Upload_").unwrap();
    let (index, dir) = repository.allocator().use_first_acceptable(&slots).unwrap();
    assert_eq!(index, 0);

    let target = dir.concat(&repo_path);
    let host = repository.server_transformer().to_host_path(&target);
    std::fs::create_dir_all(host.parent().unwrap()).unwrap();
    std::fs::write(&host, b"pixels").unwrap();

    temp.child("managed")
        .child("Upload_000")
        .child("AUX_")
        .child("scan_1.tif")
        .assert(predicate::path::is_file());

    // and the server maps the host location back to the same value
    let round_trip = repository.server_transformer().from_host_path(&host).unwrap();
    assert_eq!(round_trip, target);
}

#[test]
fn test_allocation_skips_existing_upload_dirs() {
    init_tracing();
    let temp = assert_fs::TempDir::new().unwrap();
    let repository = open_repository(&temp);
    let slots = repository.dir_slots("Upload_").unwrap();

    let allocator = repository.allocator();
    let (first, _) = allocator.use_first_acceptable(&slots).unwrap();
    let (second, _) = allocator.use_first_acceptable(&slots).unwrap();
    let (third, _) = allocator.use_first_acceptable(&slots).unwrap();
    assert_eq!((first, second, third), (0, 1, 2));
}

#[test]
fn test_session_registry_honors_configured_ceiling() {
    init_tracing();
    let temp = assert_fs::TempDir::new().unwrap();
    let repository = open_repository(&temp);

    let registry: ServantRegistry<String> =
        ServantRegistry::new(repository.config().servant_ceiling);
    registry.put("pixels-1", "reader".to_string()).unwrap();
    registry.put("pixels-2", "writer".to_string()).unwrap();
    assert!(registry.put("pixels-3", "reader".to_string()).is_err());

    registry.remove("pixels-1");
    registry.put("pixels-3", "reader".to_string()).unwrap();
    assert_eq!(registry.len(), 2);
}
