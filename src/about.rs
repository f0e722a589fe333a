pub const YEASTEDIT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const YEASTEDIT_BUILD_N: &str = env!("YEASTEDIT_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "yeastedit {}\nBuild {}\nCRISPR-Cas9 point-mutation designer",
        YEASTEDIT_VERSION, YEASTEDIT_BUILD_N
    )
}
