//! Prometheus textfile export
//!
//! A spray run is a batch job, so there is no scrape endpoint. When
//! `[metrics] textfile` is configured the recorder is installed up front and
//! its rendering is written once, after the run, for a textfile collector:
//!
//! - `spray_attempts_total` (counter)
//! - `spray_outcomes_total` (counter): labels `result`, `code`
//! - `spray_skipped_total` (counter): label `reason`
//! - `spray_lockouts_total` (counter)

use std::path::Path;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Write the current rendering to `path`, replacing it atomically.
pub fn write_textfile(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, handle.render())?;
    std::fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusRecorder;

    /// Create an isolated recorder/handle pair for unit tests.
    /// Uses build_recorder() instead of install_recorder() since only one
    /// global recorder can exist per process.
    fn isolated_recorder() -> (PrometheusRecorder, PrometheusHandle) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        (recorder, handle)
    }

    #[test]
    fn textfile_contains_recorded_counters() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        metrics::counter!("spray_attempts_total").increment(3);
        metrics::counter!("spray_outcomes_total", "result" => "failure", "code" => "AADSTS50126")
            .increment(2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msolspray.prom");
        write_textfile(&handle, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("spray_attempts_total 3"), "got: {written}");
        assert!(written.contains("code=\"AADSTS50126\""));
        assert!(
            !dir.path().join("msolspray.prom.tmp").exists(),
            "temporary file must be renamed away"
        );
    }

    #[test]
    fn textfile_replaces_previous_contents() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);
        metrics::counter!("spray_lockouts_total").increment(1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msolspray.prom");
        std::fs::write(&path, "stale_metric 42\n").unwrap();
        write_textfile(&handle, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale_metric"));
        assert!(written.contains("spray_lockouts_total 1"));
    }

    #[test]
    fn unwritable_directory_is_an_error() {
        let (_recorder, handle) = isolated_recorder();
        let result = write_textfile(&handle, Path::new("/nonexistent/dir/msolspray.prom"));
        assert!(result.is_err());
    }
}
