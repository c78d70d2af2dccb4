//! Renders the schema modules under `schema/` into `$OUT_DIR`, one file per module.
use sszgen::{render_to_file, Config, SourceIndex, TypeCache};
use std::env;
use std::fs;
use std::path::Path;

const SCHEMA_MODULES: &[&str] = &["phase0"];

fn main() {
    let log = logging::build_terminal_logger("warn").expect("building logger failed");
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set");

    let mut index = SourceIndex::new();
    for module in SCHEMA_MODULES {
        let path = format!("schema/{}.rs", module);
        println!("cargo:rerun-if-changed={}", path);

        let source = fs::read_to_string(&path).expect("reading schema failed");
        index
            .add_module(*module, &source)
            .unwrap_or_else(|e| panic!("parsing {} failed: {}", path, e));
    }

    let cache = TypeCache::new();
    let config = Config::default();

    for module in SCHEMA_MODULES {
        let out = Path::new(&out_dir).join(format!("{}.rs", module));
        render_to_file(&index, &cache, &config, module, &out, &log)
            .unwrap_or_else(|e| panic!("rendering {} failed: {}", module, e));
    }
}
