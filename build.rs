use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let n = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    println!("cargo:rustc-env=YEASTEDIT_BUILD_N={n}");
    println!("cargo:rerun-if-changed=assets/codon_table.csv");
}
