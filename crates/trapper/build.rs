// Build provenance reported by `trapper version --extended`.
const PROVENANCE: [(&str, &str); 2] = [
    ("TARGET", "TRAPPER_BUILD_TARGET"),
    ("PROFILE", "TRAPPER_BUILD_PROFILE"),
];

fn main() {
    for (cargo_var, exported) in PROVENANCE {
        println!("cargo:rerun-if-env-changed={cargo_var}");
        if let Ok(value) = std::env::var(cargo_var) {
            println!("cargo:rustc-env={exported}={value}");
        }
    }
}
