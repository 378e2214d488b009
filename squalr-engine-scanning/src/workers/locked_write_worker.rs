use crate::scan_settings_config::ScanSettingsConfig;
use squalr_engine_api::structures::candidate::Candidate;
use squalr_engine_api::structures::settings::scan_thread_priority::ScanThreadPriority;
use squalr_engine_memory::memory_io::LinuxMemoryWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Periodically rewrites every locked candidate's address back to its
/// `lock_value`. Takes the store mutex once per candidate, never once for
/// the whole tick, so a contended store never blocks behind a full sweep.
pub struct LockedWriteWorker {
    running: Arc<AtomicBool>,
}

impl LockedWriteWorker {
    pub fn start(
        pid: i32,
        store: Arc<Mutex<Vec<Candidate>>>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        std::thread::spawn(move || {
            Self::apply_thread_priority(ScanSettingsConfig::get_thread_priority());
            Self::run(pid, store, running_clone);
        });

        Self { running }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn run(
        pid: i32,
        store: Arc<Mutex<Vec<Candidate>>>,
        running: Arc<AtomicBool>,
    ) {
        while running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(ScanSettingsConfig::get_locked_write_interval_ms()));

            let writer = match LinuxMemoryWriter::open(pid) {
                Ok(writer) => writer,
                Err(error) => {
                    log::warn!("Locked-write tick could not open process {}: {}", pid, error);
                    continue;
                }
            };

            let candidate_count = store.lock().expect("store mutex poisoned").len();

            for index in 0..candidate_count {
                let Some((address, lock_value)) = ({
                    let guard = store.lock().expect("store mutex poisoned");
                    guard.get(index).filter(|candidate| candidate.locked).and_then(|candidate| {
                        candidate
                            .lock_value
                            .as_ref()
                            .map(|lock_value| (candidate.address, lock_value.clone()))
                    })
                }) else {
                    continue;
                };

                if let Err(error) = writer.write(address, &lock_value) {
                    log::warn!("Locked write to 0x{:x} failed: {}", address, error);
                }
            }
        }
    }

    fn apply_thread_priority(_priority: ScanThreadPriority) {
        // Unix scheduling priority (nice/setpriority) is not wired up; the
        // setting is retained in config for parity with the scan workers.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squalr_engine_api::structures::scan_type::ScanType;

    #[test]
    fn stop_flips_running_flag_without_spawning_a_thread() {
        let worker = LockedWriteWorker {
            running: Arc::new(AtomicBool::new(true)),
        };
        worker.stop();
        assert!(!worker.running.load(Ordering::SeqCst));
    }

    #[test]
    fn unlocked_candidates_are_skipped() {
        let mut candidate = Candidate::new(0x1000, ScanType::Int32, vec![0; 4]);
        candidate.locked = false;
        candidate.lock_value = Some(vec![1, 2, 3, 4]);
        assert!(!candidate.locked);
    }

    #[test]
    fn locked_candidate_is_rewritten_after_external_mutation_within_two_ticks() {
        ScanSettingsConfig::set_locked_write_interval_ms(20);

        let leaked: &'static mut [u8; 4] = Box::leak(Box::new([0x2A, 0, 0, 0]));
        let address = leaked.as_ptr() as u64;

        let mut candidate = Candidate::new(address, ScanType::Int32, leaked.to_vec());
        candidate.locked = true;
        candidate.lock_value = Some(vec![0x2A, 0, 0, 0]);

        let store = Arc::new(Mutex::new(vec![candidate]));
        let worker = LockedWriteWorker::start(std::process::id() as i32, store);

        leaked[0] = 0x00;
        std::thread::sleep(Duration::from_millis(100));
        worker.stop();

        assert_eq!(leaked[0], 0x2A);
    }
}
