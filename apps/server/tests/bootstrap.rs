use dynast::kernel::nodes::{ModuleProvider, NodeDescriptor, Resolution};
use dynast::kernel::server::AppAssembly;
use dynast_server::Server;
use std::fs;
use std::path::Path;

fn write_layout(root: &Path, config: &str) {
    fs::write(root.join("app_config.yml"), config).expect("write config");
    fs::create_dir_all(root.join("services/billing")).expect("layout");
    fs::create_dir_all(root.join("services/reports")).expect("layout");
    fs::create_dir_all(root.join("main/src")).expect("layout");
}

fn billing_module() -> ModuleProvider {
    ModuleProvider::new("services.billing.controllers", |binder| {
        let node = NodeDescriptor::dynast("billing")
            .description("billing controllers")
            .handler_fn(|assembly| {
                assembly.route("/billing", axum::routing::get(|| async { "billing up" }));
                Ok(())
            })
            .build()?;
        binder.bind(node)?;
        Ok(())
    })
}

#[test]
fn dynast_nodes_resolve_from_configured_scan_paths() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_layout(
        tmp.path(),
        "application:\n  manage_resources: false\n  compile_files: true\ndynastnodes:\n  billing:\n    - services.billing\n",
    );

    let server = Server::builder()
        .name("bootstrap-test")
        .root(tmp.path())
        .module(billing_module())
        .build()
        .expect("server builds");

    assert_eq!(server.resolution(), Resolution::Dynasts(1));

    let modules = server.context().modules().expect("module map reconstructed");
    assert!(!modules.is_empty());
    let mapped: Vec<&str> = modules.entries().map(|(_, path)| path).collect();
    assert!(mapped.contains(&"services/billing"));
    assert!(mapped.contains(&"main"));
}

#[test]
fn entry_node_outranks_configured_dynasts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_layout(
        tmp.path(),
        "application: {}\ndynastnodes:\n  app:\n    - services.billing\n    - main.controllers\n",
    );

    let entry_module = ModuleProvider::new("main.controllers", |binder| {
        let node = NodeDescriptor::entry("main")
            .handler_fn(|assembly| {
                assembly.route("/", axum::routing::get(|| async { "entry" }));
                Ok(())
            })
            .build()?;
        binder.bind(node)?;
        Ok(())
    });

    let server = Server::builder()
        .name("bootstrap-test")
        .root(tmp.path())
        .module(billing_module())
        .module(entry_module)
        .build()
        .expect("server builds");

    assert_eq!(server.resolution(), Resolution::Entry);
}

#[test]
fn declared_resources_load_during_bootstrap() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_layout(
        tmp.path(),
        "application:\n  manage_resources: true\nresources:\n  billing:\n    name: services.billing\n    format: yaml\n    path: v2\n",
    );
    let resource_dir = tmp.path().join("services/billing/v2");
    fs::create_dir_all(&resource_dir).expect("resource dir");
    fs::write(resource_dir.join("resources.yaml"), "limit: 5\n").expect("resource file");

    let server =
        Server::builder().name("bootstrap-test").root(tmp.path()).build().expect("server builds");

    assert_eq!(server.resolution(), Resolution::None);
    let resources = server.context().resources().expect("resources published");
    assert_eq!(resources.data["services.billing"]["limit"], 5);
}

#[test]
fn missing_config_file_aborts_the_build() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let error = Server::builder().name("bootstrap-test").root(tmp.path()).build();
    assert!(error.is_err(), "a missing config file must abort startup");
}
