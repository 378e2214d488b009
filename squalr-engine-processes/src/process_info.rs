use serde::{Deserialize, Serialize};

/// A process the user could select as a scan target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: i32,
    pub name: String,
    pub cmdline: String,
}

impl ProcessInfo {
    pub fn new(
        pid: i32,
        name: String,
        cmdline: String,
    ) -> Self {
        Self { pid, name, cmdline }
    }
}
