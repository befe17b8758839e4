pub mod check;
pub mod health;
pub mod session_end;
pub mod shell_batch;
pub mod status;
pub mod version;
pub mod watch;

use daimon_core::Config;
use daimon_telemetry::Paths;
use std::io::Read;

/// `daimon.json` with environment overrides applied
fn load_config(paths: &Paths) -> Config {
    let mut config = Config::load(&paths.config_file());
    config.apply_env();
    config
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_overrides_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_home_claude(temp.path());
        std::fs::write(
            paths.config_file(),
            r#"{"noesis_url": "http://from-file:8001", "reflector_url": "http://reflector:8002"}"#,
        )
        .unwrap();

        std::env::set_var("NOESIS_URL", "http://from-env:8001");
        let config = load_config(&paths);
        std::env::remove_var("NOESIS_URL");

        assert_eq!(config.noesis_url, "http://from-env:8001");
        assert_eq!(config.reflector_url, "http://reflector:8002");
    }
}
