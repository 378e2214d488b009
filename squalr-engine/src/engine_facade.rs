use crate::persisted_session::PersistedSession;
use crate::refresh_worker::RefreshWorker;
use crate::store_edit_guard::StoreEditGuard;
use serde::{Deserialize, Serialize};
use squalr_engine_api::conversions::Conversions;
use squalr_engine_api::errors::EngineError;
use squalr_engine_api::structures::candidate::Candidate;
use squalr_engine_api::structures::encoding_mode::EncodingMode;
use squalr_engine_api::structures::scan_type::ScanType;
use squalr_engine_api::structures::scanning::op_type::OpType;
use squalr_engine_api::structures::snapshot_scan::SnapshotScan;
use squalr_engine_memory::memory_io::LinuxMemoryWriter;
use squalr_engine_processes::ProcessEnumerator;
use squalr_engine_scanning::{AddressScanner, BytePattern, LockedWriteWorker, ScanExpressionParser, ScanSettingsConfig, SnapshotEngine, ValueCodec};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// The count/truncation summary a scan or filter reports back to the
/// front-end. The internal candidate list is always complete; truncation
/// only affects what is surfaced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanResultsSummary {
    pub count: usize,
    pub truncated: bool,
}

/// Thin orchestrator exposing scan/filter/store/save operations to a
/// front-end. Owns the store list, the active scan/snapshot state, and the
/// two background workers (refresh loop, locked-write worker).
pub struct EngineFacade {
    pid: Arc<Mutex<Option<i32>>>,
    scan_results: Arc<Mutex<Vec<Candidate>>>,
    store: Arc<Mutex<Vec<Candidate>>>,
    notes: Mutex<String>,
    encoding: Mutex<EncodingMode>,
    snapshot_engine: SnapshotEngine,
    refresh_worker: Mutex<Option<RefreshWorker>>,
    locked_write_worker: Mutex<Option<LockedWriteWorker>>,
}

impl Default for EngineFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineFacade {
    pub fn new() -> Self {
        Self {
            pid: Arc::new(Mutex::new(None)),
            scan_results: Arc::new(Mutex::new(Vec::new())),
            store: Arc::new(Mutex::new(Vec::new())),
            notes: Mutex::new(String::new()),
            encoding: Mutex::new(EncodingMode::default()),
            snapshot_engine: SnapshotEngine::default(),
            refresh_worker: Mutex::new(None),
            locked_write_worker: Mutex::new(None),
        }
    }

    pub fn encoding_mode(&self) -> EncodingMode {
        *self.encoding.lock().expect("encoding mutex poisoned")
    }

    pub fn set_encoding_mode(
        &self,
        mode: EncodingMode,
    ) {
        *self.encoding.lock().expect("encoding mutex poisoned") = mode;
    }

    pub fn select_process(
        &self,
        pid: i32,
    ) -> Result<(), EngineError> {
        ProcessEnumerator::select_process(pid)?;
        log::info!("Selected process {}", pid);

        *self.pid.lock().expect("pid mutex poisoned") = Some(pid);

        if let Some(worker) = self.refresh_worker.lock().expect("refresh worker mutex poisoned").take() {
            worker.stop();
        }
        if let Some(worker) = self.locked_write_worker.lock().expect("locked write worker mutex poisoned").take() {
            worker.stop();
        }

        *self.refresh_worker.lock().expect("refresh worker mutex poisoned") =
            Some(RefreshWorker::start(self.pid.clone(), self.scan_results.clone(), self.store.clone()));
        *self.locked_write_worker.lock().expect("locked write worker mutex poisoned") = Some(LockedWriteWorker::start(pid, self.store.clone()));

        Ok(())
    }

    pub fn list_processes() -> Vec<(i32, String)> {
        ProcessEnumerator::list_processes()
            .into_iter()
            .map(|process| (process.pid, process.cmdline))
            .collect()
    }

    pub fn scan(
        &self,
        value_string: &str,
        scan_type: ScanType,
    ) -> Result<ScanResultsSummary, EngineError> {
        let pid = self.require_pid()?;

        let results = if let Some(pattern) = Self::composite_pattern(value_string, scan_type)? {
            AddressScanner::scan_pattern(pid, &pattern)?
        } else {
            let (op, reference) = ScanExpressionParser::parse(value_string, scan_type, self.encoding_mode())?;
            AddressScanner::scan(pid, scan_type, &op, &reference)?
        };
        *self.scan_results.lock().expect("scan mutex poisoned") = results;

        Ok(self.scan_results_summary())
    }

    pub fn filter(
        &self,
        value_string: &str,
        scan_type: ScanType,
    ) -> Result<ScanResultsSummary, EngineError> {
        let pid = self.require_pid()?;

        let mut guard = self.scan_results.lock().expect("scan mutex poisoned");
        let candidates = std::mem::take(&mut *guard);
        drop(guard);

        let filtered = if let Some(pattern) = Self::composite_pattern(value_string, scan_type)? {
            AddressScanner::filter_pattern(pid, candidates, &pattern)?
        } else {
            let (op, reference) = ScanExpressionParser::parse(value_string, scan_type, self.encoding_mode())?;
            AddressScanner::filter(pid, candidates, &op, &reference)?
        };
        *self.scan_results.lock().expect("scan mutex poisoned") = filtered;

        Ok(self.scan_results_summary())
    }

    /// Recognizes the composite wildcard form of a `ByteArray` query (§4.4):
    /// more than one whitespace-separated token where at least one token is
    /// a wildcard (`?`, `??`, `*`). A single `*` alone is left to the
    /// `OpType::Any` keyword instead.
    fn composite_pattern(
        value_string: &str,
        scan_type: ScanType,
    ) -> Result<Option<BytePattern>, EngineError> {
        if scan_type != ScanType::ByteArray {
            return Ok(None);
        }

        let tokens: Vec<&str> = value_string.split_whitespace().collect();
        let has_wildcard = tokens.iter().any(|token| matches!(*token, "?" | "??" | "*"));

        if tokens.len() > 1 && has_wildcard {
            Ok(Some(ScanExpressionParser::parse_pattern(value_string)?))
        } else {
            Ok(None)
        }
    }

    pub fn clear_scan(&self) {
        self.scan_results.lock().expect("scan mutex poisoned").clear();
    }

    fn scan_results_summary(&self) -> ScanResultsSummary {
        let count = self.scan_results.lock().expect("scan mutex poisoned").len();
        let cap = ScanSettingsConfig::get_results_visibility_cap();
        ScanResultsSummary { count, truncated: count > cap }
    }

    pub fn add_to_store(
        &self,
        scan_row_index: usize,
    ) -> Result<(), EngineError> {
        let candidate = self
            .scan_results
            .lock()
            .expect("scan mutex poisoned")
            .get(scan_row_index)
            .cloned()
            .ok_or(EngineError::EmptySelection)?;

        self.store.lock().expect("store mutex poisoned").push(candidate);
        Ok(())
    }

    pub fn new_store_entry(&self) -> usize {
        let mut guard = self.store.lock().expect("store mutex poisoned");
        guard.push(Candidate::new(0, ScanType::Int32, vec![0; 4]));
        guard.len() - 1
    }

    pub fn delete_store_entry(
        &self,
        store_row_index: usize,
    ) -> Result<(), EngineError> {
        let mut guard = self.store.lock().expect("store mutex poisoned");
        if store_row_index >= guard.len() {
            return Err(EngineError::EmptySelection);
        }

        guard.remove(store_row_index);
        Ok(())
    }

    /// Adjusts the candidate's address by a signed byte offset parsed from
    /// `delta_string`. A malformed offset is rejected with `ParseError` and
    /// leaves the address untouched — the original tool silently swallowed
    /// this parse error and fell through with an uninitialized offset.
    pub fn shift_store_entry(
        &self,
        store_row_index: usize,
        delta_string: &str,
    ) -> Result<(), EngineError> {
        let delta = Conversions::parse_signed_delta(delta_string).map_err(EngineError::ParseError)?;

        let mut guard = self.store.lock().expect("store mutex poisoned");
        let candidate = guard.get_mut(store_row_index).ok_or(EngineError::EmptySelection)?;
        candidate.address = candidate.address.wrapping_add_signed(delta);
        Ok(())
    }

    pub fn set_store_value(
        &self,
        index: usize,
        new_value_string: &str,
    ) -> Result<(), EngineError> {
        let pid = self.require_pid()?;

        let (address, scan_type) = {
            let guard = self.store.lock().expect("store mutex poisoned");
            let candidate = guard.get(index).ok_or(EngineError::EmptySelection)?;
            (candidate.address, candidate.scan_type)
        };

        let encoded = ValueCodec::encode(scan_type, new_value_string, self.encoding_mode())?;
        let writer = LinuxMemoryWriter::open(pid)?;
        writer.write(address, &encoded)?;

        let mut guard = self.store.lock().expect("store mutex poisoned");
        if let Some(candidate) = guard.get_mut(index) {
            candidate.last_value = encoded;
        }
        Ok(())
    }

    pub fn set_store_type(
        &self,
        index: usize,
        new_type: ScanType,
    ) -> Result<(), EngineError> {
        let mut guard = self.store.lock().expect("store mutex poisoned");
        let candidate = guard.get_mut(index).ok_or(EngineError::EmptySelection)?;
        candidate.scan_type = new_type;
        Ok(())
    }

    pub fn set_lock(
        &self,
        index: usize,
        locked: bool,
    ) -> Result<(), EngineError> {
        let mut guard = self.store.lock().expect("store mutex poisoned");
        let candidate = guard.get_mut(index).ok_or(EngineError::EmptySelection)?;

        candidate.locked = locked;
        candidate.lock_value = if locked { Some(candidate.last_value.clone()) } else { None };
        Ok(())
    }

    pub fn begin_store_edit(
        &self,
        index: usize,
    ) -> Result<StoreEditGuard<'_>, EngineError> {
        let guard = self.store.lock().expect("store mutex poisoned");
        if index >= guard.len() {
            return Err(EngineError::EmptySelection);
        }

        Ok(StoreEditGuard::new(guard, index))
    }

    pub fn save_session(
        &self,
        path: &Path,
    ) -> Result<(), EngineError> {
        let session = PersistedSession::new(
            self.store.lock().expect("store mutex poisoned").clone(),
            self.notes.lock().expect("notes mutex poisoned").clone(),
        );

        let json = serde_json::to_string_pretty(&session).map_err(|error| EngineError::ParseError(error.to_string()))?;
        fs::write(path, json).map_err(|error| EngineError::ParseError(error.to_string()))
    }

    pub fn open_session(
        &self,
        path: &Path,
    ) -> Result<(), EngineError> {
        let json = fs::read_to_string(path).map_err(|error| EngineError::ParseError(error.to_string()))?;
        let session: PersistedSession = serde_json::from_str(&json).map_err(|error| EngineError::ParseError(error.to_string()))?;

        *self.store.lock().expect("store mutex poisoned") = session.store;
        *self.notes.lock().expect("notes mutex poisoned") = session.notes;
        Ok(())
    }

    pub fn notes_get(&self) -> String {
        self.notes.lock().expect("notes mutex poisoned").clone()
    }

    pub fn notes_set(
        &self,
        text: &str,
    ) {
        *self.notes.lock().expect("notes mutex poisoned") = text.to_string();
    }

    pub fn snapshot_take(&self) -> Result<(), EngineError> {
        let pid = self.require_pid()?;
        self.snapshot_engine.take_snapshot(pid)
    }

    pub fn snapshot_compare(
        &self,
        op: &OpType,
        scan_type: ScanType,
    ) -> Result<Vec<SnapshotScan>, EngineError> {
        let pid = self.require_pid()?;
        self.snapshot_engine.compare(pid, op, scan_type)
    }

    pub fn snapshot_filter(
        &self,
        op: &OpType,
        scan_type: ScanType,
    ) -> Result<Vec<SnapshotScan>, EngineError> {
        let pid = self.require_pid()?;
        self.snapshot_engine.filter(pid, op, scan_type)
    }

    fn require_pid(&self) -> Result<i32, EngineError> {
        self.pid.lock().expect("pid mutex poisoned").ok_or(EngineError::ProcessNotSelected)
    }
}

impl Drop for EngineFacade {
    fn drop(&mut self) {
        if let Some(worker) = self.refresh_worker.lock().expect("refresh worker mutex poisoned").take() {
            worker.stop();
        }
        if let Some(worker) = self.locked_write_worker.lock().expect("locked write worker mutex poisoned").take() {
            worker.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn store_lifecycle_add_shift_lock_delete() {
        let facade = EngineFacade::new();
        let index = facade.new_store_entry();
        assert_eq!(index, 0);

        facade.set_store_type(index, ScanType::Int32).unwrap();
        facade.shift_store_entry(index, "0x10").unwrap();
        assert_eq!(facade.store.lock().unwrap()[index].address, 0x10);

        facade.set_lock(index, true).unwrap();
        assert!(facade.store.lock().unwrap()[index].locked);
        assert!(facade.store.lock().unwrap()[index].lock_value.is_some());

        facade.set_lock(index, false).unwrap();
        assert!(facade.store.lock().unwrap()[index].lock_value.is_none());

        facade.delete_store_entry(index).unwrap();
        assert!(facade.store.lock().unwrap().is_empty());
    }

    #[test]
    fn shift_store_entry_rejects_malformed_delta_and_leaves_address_unchanged() {
        let facade = EngineFacade::new();
        let index = facade.new_store_entry();
        facade.store.lock().unwrap()[index].address = 0x2000;

        let result = facade.shift_store_entry(index, "not-a-number");
        assert!(matches!(result, Err(EngineError::ParseError(_))));
        assert_eq!(facade.store.lock().unwrap()[index].address, 0x2000);
    }

    #[test]
    fn operations_without_a_selected_process_are_rejected() {
        let facade = EngineFacade::new();
        let result = facade.scan("100", ScanType::Int32);
        assert!(matches!(result, Err(EngineError::ProcessNotSelected)));
    }

    #[test]
    fn notes_round_trip() {
        let facade = EngineFacade::new();
        facade.notes_set("scratch notes");
        assert_eq!(facade.notes_get(), "scratch notes");
    }

    #[test]
    fn select_process_accepts_the_current_process() {
        let facade = EngineFacade::new();
        let pid = std::process::id() as i32;
        facade.select_process(pid).expect("selecting own pid should succeed");
        facade.clear_scan();
    }

    #[test]
    fn scan_results_summary_reports_truncation_past_the_visibility_cap() {
        let facade = EngineFacade::new();
        let cap = ScanSettingsConfig::get_results_visibility_cap();

        *facade.scan_results.lock().unwrap() = (0..cap as u64 + 1)
            .map(|address| Candidate::new(address, ScanType::Int32, vec![0; 4]))
            .collect();

        let summary = facade.scan_results_summary();
        assert_eq!(summary.count, cap + 1);
        assert!(summary.truncated);
    }

    #[test]
    fn scan_results_summary_is_not_truncated_at_or_below_the_cap() {
        let facade = EngineFacade::new();
        let cap = ScanSettingsConfig::get_results_visibility_cap();

        *facade.scan_results.lock().unwrap() = (0..cap as u64).map(|address| Candidate::new(address, ScanType::Int32, vec![0; 4])).collect();

        let summary = facade.scan_results_summary();
        assert!(!summary.truncated);
    }

    #[test]
    fn composite_pattern_is_recognized_only_for_multi_token_wildcard_queries() {
        assert!(EngineFacade::composite_pattern("DE ? BE EF", ScanType::ByteArray).unwrap().is_some());
        assert!(EngineFacade::composite_pattern("DE AD BE EF", ScanType::ByteArray).unwrap().is_none());
        assert!(EngineFacade::composite_pattern("*", ScanType::ByteArray).unwrap().is_none());
        assert!(EngineFacade::composite_pattern("DE ? BE EF", ScanType::Int32).unwrap().is_none());
    }

    #[test]
    fn scan_with_composite_wildcard_pattern_finds_self_process_match() {
        let leaked: &'static mut [u8; 4] = Box::leak(Box::new([0xDE, 0x99, 0xBE, 0xEF]));
        let address = leaked.as_ptr() as u64;

        let facade = EngineFacade::new();
        facade.select_process(std::process::id() as i32).unwrap();

        let summary = facade.scan("DE ? BE EF", ScanType::ByteArray).unwrap();
        assert!(summary.count >= 1);

        let found = facade.scan_results.lock().unwrap().iter().any(|candidate| candidate.address == address);
        assert!(found);
    }

    #[test]
    fn refresh_loop_does_not_overwrite_a_row_under_edit_and_resumes_after() {
        ScanSettingsConfig::set_refresh_interval_ms(20);

        let leaked: &'static mut [u8; 4] = Box::leak(Box::new([9, 9, 9, 9]));
        let address = leaked.as_ptr() as u64;

        let facade = EngineFacade::new();
        facade.select_process(std::process::id() as i32).unwrap();

        let index = facade.new_store_entry();
        {
            let mut guard = facade.store.lock().unwrap();
            guard[index].address = address;
            guard[index].last_value = vec![9, 9, 9, 9];
        }

        let edit = facade.begin_store_edit(index).unwrap();
        leaked[0] = 99;
        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(edit.candidate().unwrap().last_value[0], 9);
        drop(edit);

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(facade.store.lock().unwrap()[index].last_value[0], 99);
    }
}
