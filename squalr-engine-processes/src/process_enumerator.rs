use crate::process_info::ProcessInfo;
use squalr_engine_api::errors::EngineError;
use sysinfo::{Pid, System};

/// Lists candidate target processes and validates a pid the user selected.
pub struct ProcessEnumerator;

impl ProcessEnumerator {
    pub fn list_processes() -> Vec<ProcessInfo> {
        let mut system = System::new_all();
        system.refresh_all();

        let mut processes: Vec<ProcessInfo> = system
            .processes()
            .values()
            .map(|process| {
                ProcessInfo::new(
                    process.pid().as_u32() as i32,
                    process.name().to_string_lossy().to_string(),
                    process
                        .cmd()
                        .iter()
                        .map(|arg| arg.to_string_lossy().to_string())
                        .collect::<Vec<_>>()
                        .join(" "),
                )
            })
            .collect();

        processes.sort_by_key(|process| process.pid);
        processes
    }

    /// Confirms `pid` names a process that currently exists.
    pub fn select_process(pid: i32) -> Result<ProcessInfo, EngineError> {
        let mut system = System::new_all();
        system.refresh_all();

        let sys_pid = Pid::from_u32(pid as u32);
        let process = system.process(sys_pid).ok_or(EngineError::NoSuchProcess)?;

        Ok(ProcessInfo::new(
            pid,
            process.name().to_string_lossy().to_string(),
            process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(" "),
        ))
    }
}
