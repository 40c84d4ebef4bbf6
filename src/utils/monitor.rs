//! Optional per-phase resource logging (`--monitor`).

#[cfg(feature = "cli")]
mod imp {
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use sysinfo::{Pid, System};

    #[derive(Debug, Clone)]
    pub struct PhaseStats {
        pub cpu_usage: f32,
        pub memory_mb: u64,
        pub peak_memory_mb: u64,
        pub elapsed: Duration,
    }

    struct Probe {
        system: System,
        pid: Pid,
        peak_memory_mb: u64,
    }

    pub struct PhaseMonitor {
        probe: Option<Mutex<Probe>>,
        started: Instant,
    }

    impl PhaseMonitor {
        pub fn new(enabled: bool) -> Self {
            let probe = if enabled {
                match sysinfo::get_current_pid() {
                    Ok(pid) => {
                        let mut system = System::new();
                        system.refresh_all();
                        Some(Mutex::new(Probe {
                            system,
                            pid,
                            peak_memory_mb: 0,
                        }))
                    }
                    Err(e) => {
                        tracing::warn!("Resource monitoring unavailable: {}", e);
                        None
                    }
                }
            } else {
                None
            };

            Self {
                probe,
                started: Instant::now(),
            }
        }

        pub fn is_enabled(&self) -> bool {
            self.probe.is_some()
        }

        pub fn sample(&self) -> Option<PhaseStats> {
            let mut probe = self.probe.as_ref()?.lock().ok()?;
            probe.system.refresh_all();
            let (cpu_usage, memory_mb) = {
                let process = probe.system.process(probe.pid)?;
                (process.cpu_usage(), process.memory() / 1024 / 1024)
            };
            probe.peak_memory_mb = probe.peak_memory_mb.max(memory_mb);

            Some(PhaseStats {
                cpu_usage,
                memory_mb,
                peak_memory_mb: probe.peak_memory_mb,
                elapsed: self.started.elapsed(),
            })
        }

        pub fn log_phase(&self, phase: &str) {
            if let Some(stats) = self.sample() {
                tracing::info!(
                    "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                    phase,
                    stats.cpu_usage,
                    stats.memory_mb,
                    stats.peak_memory_mb,
                    stats.elapsed
                );
            }
        }
    }
}

#[cfg(not(feature = "cli"))]
mod imp {
    pub struct PhaseMonitor;

    impl PhaseMonitor {
        pub fn new(_enabled: bool) -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn log_phase(&self, _phase: &str) {}
    }
}

pub use imp::*;
