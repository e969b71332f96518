// build.rs

use glob::glob;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A matrix fixture together with its reference spectrum.
#[derive(Debug)]
struct Fixture {
    pub name: String,
    pub mtx_path: PathBuf,
    pub eig_path: PathBuf,
}

/// Discovers every `data/matrices/*.mtx` file that has a matching `.eig` file.
fn get_all_fixtures(manifest_dir: &Path) -> Vec<Fixture> {
    let pattern = manifest_dir.join("data/matrices/*.mtx");
    glob(&pattern.to_string_lossy())
        .expect("Failed to read glob pattern")
        .filter_map(|entry| {
            let mtx_path = entry.ok()?;
            let eig_path = mtx_path.with_extension("eig");
            if !eig_path.exists() {
                return None;
            }
            let name = mtx_path
                .file_stem()?
                .to_string_lossy()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect();
            Some(Fixture {
                name,
                mtx_path,
                eig_path,
            })
        })
        .collect()
}

fn main() {
    println!("cargo:rerun-if-changed=data/matrices");
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("fixture_tests.rs");
    let mut file = BufWriter::new(File::create(&dest_path).unwrap());

    // One `#[test]` function per fixture.
    for fixture in get_all_fixtures(&manifest_dir) {
        let mtx_path_str = fixture.mtx_path.to_str().unwrap();
        let eig_path_str = fixture.eig_path.to_str().unwrap();

        writeln!(
            file,
            r#"
#[test]
fn fixture_spectrum_{fn_name}() -> anyhow::Result<()> {{
    let fixture = Fixture {{
        name: "{name}".to_string(),
        mtx_path: "{mtx_path}".into(),
        eig_path: "{eig_path}".into(),
    }};
    run_fixture_test(&fixture)
}}
"#,
            fn_name = fixture.name,
            name = fixture.name,
            mtx_path = mtx_path_str.escape_default(),
            eig_path = eig_path_str.escape_default()
        )
        .unwrap();
    }
}
