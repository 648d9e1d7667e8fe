//! Clock and diagnostic settings.

/// Processor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuConfig {
    /// Clock frequency in Hz.
    pub clock_hz: u32,
    /// Emit a `log::trace!` line for every executed instruction.
    pub trace_instructions: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            clock_hz: 3_580_000,
            trace_instructions: false,
        }
    }
}

/// Whole-machine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub cpu: CpuConfig,
    /// Display refresh rate the pacing driver targets.
    pub frames_per_second: u32,
}

impl MachineConfig {
    /// Cycle budget for one display frame.
    pub fn cycles_per_frame(&self) -> u64 {
        (self.cpu.clock_hz / self.frames_per_second.max(1)) as u64
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            cpu: CpuConfig::default(),
            frames_per_second: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MachineConfig::default();
        assert_eq!(config.cpu.clock_hz, 3_580_000);
        assert_eq!(config.frames_per_second, 50);
        assert_eq!(config.cycles_per_frame(), 71_600);
        assert!(!config.cpu.trace_instructions);
    }
}
