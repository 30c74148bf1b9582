//! Common test utilities and helpers


pub use fake_api::FakeApi;

/// Test data utilities
pub mod fixtures {
    use serde_json::{json, Value};
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use uni_social::models::Config;
    use uni_social::reports::ReportRow;

    /// Rows straight from a JSON array literal
    pub fn rows(value: Value) -> Vec<ReportRow> {
        serde_json::from_value(value).expect("fixture rows must be a JSON array of objects")
    }

    /// The mixed string/number authority sample
    pub fn authority_rows() -> Vec<ReportRow> {
        rows(json!([
            { "referente": "Ana", "correo": "a@x.edu", "score_autoridad": "50" },
            { "referente": "Bo", "correo": "b@x.edu", "score_autoridad": 80 }
        ]))
    }

    pub fn area_rows() -> Vec<ReportRow> {
        rows(json!([
            { "area_conocimiento": "Matemáticas", "total_solicitudes_area": 12, "total_tutores_disponibles": 3 },
            { "area_conocimiento": "Física", "total_solicitudes_area": "7", "total_tutores_disponibles": 2 },
            { "area_conocimiento": "Química", "total_solicitudes_area": null, "total_tutores_disponibles": "x" }
        ]))
    }

    pub fn test_config(base_url: &str, dir: &Path) -> Config {
        Config {
            api_base_url: Config::parse_base_url(base_url).expect("valid test URL"),
            session_path: dir.join("session.json"),
            download_dir: dir.join("downloads"),
            log_file: dir.join("test.log"),
            request_timeout_secs: 5,
        }
    }

    /// Write a tiny PNG-looking file and return its path
    pub fn png_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("create image fixture");
        file.write_all(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a])
            .expect("write image fixture");
        path
    }
}

/// Logging utilities for tests
pub mod logging {
    use std::sync::Once;
    use tracing::{debug, info};

    static INIT: Once = Once::new();

    /// Initialize test logging
    pub fn init_test_logging() {
        INIT.call_once(|| {
            // test_log may already have installed a subscriber
            let _ = tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .with_env_filter("uni_social=debug,test=debug")
                    .with_test_writer()
                    .finish(),
            );
        });
    }

    /// Log test step
    pub fn log_test_step(step: &str) {
        info!("🧪 Test Step: {}", step);
    }

    /// Log test data
    pub fn log_test_data<T: std::fmt::Debug>(label: &str, data: &T) {
        debug!("📊 {}: {:?}", label, data);
    }
}
