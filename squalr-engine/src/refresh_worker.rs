use squalr_engine_api::structures::candidate::Candidate;
use squalr_engine_memory::memory_io::LinuxMemoryReader;
use squalr_engine_scanning::ScanSettingsConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Rereads current values for every visible candidate so the front-end can
/// render fresh numbers without issuing its own reads. Blocks on the same
/// mutex `begin_store_edit`/scan publication use, so an in-progress edit or
/// scan is never torn by a concurrent refresh.
pub struct RefreshWorker {
    running: Arc<AtomicBool>,
}

impl RefreshWorker {
    pub fn start(
        pid: Arc<Mutex<Option<i32>>>,
        scan_results: Arc<Mutex<Vec<Candidate>>>,
        store: Arc<Mutex<Vec<Candidate>>>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        std::thread::spawn(move || Self::run(pid, scan_results, store, running_clone));

        Self { running }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn run(
        pid: Arc<Mutex<Option<i32>>>,
        scan_results: Arc<Mutex<Vec<Candidate>>>,
        store: Arc<Mutex<Vec<Candidate>>>,
        running: Arc<AtomicBool>,
    ) {
        while running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(ScanSettingsConfig::get_refresh_interval_ms()));

            let Some(current_pid) = *pid.lock().expect("pid mutex poisoned") else {
                continue;
            };

            let reader = match LinuxMemoryReader::open(current_pid) {
                Ok(reader) => reader,
                Err(error) => {
                    log::warn!("Refresh loop could not open process {}: {}", current_pid, error);
                    continue;
                }
            };

            Self::refresh_list(&reader, &scan_results);
            Self::refresh_list(&reader, &store);
        }
    }

    fn refresh_list(
        reader: &LinuxMemoryReader,
        list: &Arc<Mutex<Vec<Candidate>>>,
    ) {
        let mut guard = list.lock().expect("candidate list mutex poisoned");
        for candidate in guard.iter_mut() {
            let width = candidate.scan_type.width().unwrap_or(candidate.last_value.len());
            if let Ok(bytes) = reader.read(candidate.address, width) {
                candidate.last_value = bytes;
            }
        }
    }
}
