//! Snapshot tests
//!
//! Compiles each *.yml file in /tests/ individually and compares the
//! emitted shell functions.

#[test]
fn snapshots() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("UNITSH_LOG"))
        .with_writer(std::io::stderr)
        .init();

    insta::glob!("*.yml", |path| {
        let mut document =
            unitsh::document::Document::load_file(path).expect("must be a valid document");
        let functions = unitsh::compile(&mut document).expect("must compile");

        let mut rendered = vec![];
        unitsh::emit::write_functions(&mut rendered, functions).expect("write to buffer");
        let rendered = String::from_utf8(rendered).expect("valid utf-8");

        insta::assert_snapshot!(rendered);
    });
}
