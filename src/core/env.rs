//! Host environment detection, logged once per run for report context.

/// Environment information attached to run logs. Never part of the CSV
/// schema, which is fixed.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentInfo {
    pub cpu_model: Option<String>,
    pub cpu_cores_logical: Option<usize>,
    pub cpu_cores_physical: Option<usize>,
    pub total_ram_bytes: Option<u64>,
    pub os: Option<String>,
}

impl EnvironmentInfo {
    /// Detect environment information from the current system.
    pub fn detect() -> Self {
        use sysinfo::System;
        let mut sys = System::new_all();
        sys.refresh_all();
        EnvironmentInfo {
            cpu_model: sys.cpus().first().map(|c| c.brand().to_string()),
            cpu_cores_logical: Some(sys.cpus().len()),
            cpu_cores_physical: sys.physical_core_count(),
            total_ram_bytes: Some(sys.total_memory()),
            os: System::name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_reports_at_least_one_core() {
        let env = EnvironmentInfo::detect();
        assert!(env.cpu_cores_logical.unwrap_or(0) >= 1);
    }
}
