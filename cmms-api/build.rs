fn main() {
    println!("cargo:rerun-if-changed=migrations");
    println!("cargo:rerun-if-changed=templates");

    built::write_built_file().expect("Failed to acquire build-time information");
}
