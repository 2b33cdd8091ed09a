// src/types.rs
use serde::{Deserialize, Serialize};
use crate::drivers::Measurements;

// 时基倍率：基准采样率乘以该倍数
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub enum Timebase {
    #[default]
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "2x")]
    X2,
    #[serde(rename = "5x")]
    X5,
    #[serde(rename = "10x")]
    X10,
}

impl Timebase {
    pub const ALL: [Timebase; 4] = [Timebase::X1, Timebase::X2, Timebase::X5, Timebase::X10];

    pub fn multiplier(self) -> u32 {
        match self {
            Timebase::X1 => 1,
            Timebase::X2 => 2,
            Timebase::X5 => 5,
            Timebase::X10 => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timebase::X1 => "1x",
            Timebase::X2 => "2x",
            Timebase::X5 => "5x",
            Timebase::X10 => "10x",
        }
    }
}

// 采集状态：暂停与停止是两个独立的开关
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct AcquisitionState {
    pub paused: bool,
    pub stopped: bool,
}

impl AcquisitionState {
    /// Samples are ingested only when neither toggle is set.
    pub fn is_running(&self) -> bool {
        !self.paused && !self.stopped
    }

    pub fn label(&self) -> &'static str {
        if self.stopped {
            "STOPPED"
        } else if self.paused {
            "PAUSED"
        } else {
            "RUNNING"
        }
    }
}

// 界面反馈给采集核心的用户操作
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UserAction {
    SelectTimebase(Timebase),
    TogglePause,
    ToggleStop,
    ResizePlot(usize),
}

// 每帧交给界面的快照
#[derive(Clone, Debug)]
pub struct ScopeFrame {
    pub samples: Vec<u8>,
    pub current: u8,
    pub timebase: Timebase,
    pub state: AcquisitionState,
    pub sample_rate_hz: f64,
    pub vref: f64,
    pub source: String,
    pub measurements: Measurements,
}
