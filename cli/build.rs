use std::{error::Error, process::Command};

struct Meta;
impl Meta {
    fn version() {
        let describe = Command::new("git")
            .arg("describe")
            .arg("--always")
            .arg("--dirty")
            .output()
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| String::from_utf8(out.stdout).ok())
            .map(|out| out.trim().to_owned())
            .unwrap_or_else(|| "unknown".to_owned());
        println!("cargo:rustc-env=GIT_DESCRIBE={}", describe);
    }

    fn timestamp() {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    Meta::version();
    Meta::timestamp();

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
