use serde::{Deserialize, Serialize};
use std::fmt;

/// Expansion bus interface of a processor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PcieLink {
    pub generation: f32,
    pub lanes: u32,
}

impl fmt::Display for PcieLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PCIe {:.1} x{}", self.generation, self.lanes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySupport {
    pub ddr_generation: u8,
    pub speed_mts: u32,
}

impl fmt::Display for MemorySupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DDR{}-{}", self.ddr_generation, self.speed_mts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpuDetail {
    pub pcie: PcieLink,
    pub memory: MemorySupport,
}
