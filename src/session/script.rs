//! Fixed boot script: progress steps, narrative message sets and delays.

use std::time::Duration;

use crate::player::{Message, MessageQueue};

/// Status shown while waiting for the first key press.
pub const AWAITING_PROMPT: &str = "Press any key to start system boot...";

/// One step of the boot progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootStep {
    /// Percent, 0..=100
    pub progress: u16,
    pub status: &'static str,
    /// Wait after showing this step
    pub delay: Duration,
}

const fn step(progress: u16, status: &'static str, delay_ms: u64) -> BootStep {
    BootStep {
        progress,
        status,
        delay: Duration::from_millis(delay_ms),
    }
}

pub const BOOT_STEPS: [BootStep; 8] = [
    step(10, "Initializing BIOS...", 500),
    step(25, "Loading kernel modules...", 800),
    step(40, "Mounting filesystems...", 600),
    step(55, "Starting network services...", 700),
    step(70, "Loading security protocols...", 900),
    step(85, "Establishing secure connection...", 800),
    step(95, "Finalizing system startup...", 600),
    step(100, "System ready!", 1000),
];

/// Delays between boot stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootTimings {
    /// After the last progress step
    pub settle: Duration,
    /// Boot panel fade-out
    pub fade: Duration,
    /// Between the confirm sound and the visual reset
    pub effects_delay: Duration,
    /// Before the first narrative message
    pub initial_delay: Duration,
    /// Between the two narrative sets
    pub stage_delay: Duration,
    /// Before the input line appears
    pub interactive_delay: Duration,
    /// When the fallback path takes over
    pub fallback_timeout: Duration,
}

impl Default for BootTimings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1000),
            fade: Duration::from_millis(1000),
            effects_delay: Duration::from_millis(500),
            initial_delay: Duration::from_millis(200),
            stage_delay: Duration::from_millis(500),
            interactive_delay: Duration::from_millis(200),
            fallback_timeout: Duration::from_millis(10_000),
        }
    }
}

/// The intrusion narrative played right after boot.
pub fn initial_messages() -> MessageQueue {
    [
        Message::success("[*] System initialized successfully..."),
        Message::info("[*] Loading security protocols..."),
        Message::success("[*] Access granted to mainframe"),
        Message::warning("[!] Warning: Unauthorized access detected"),
        Message::error("[ERROR] Firewall bypass required"),
        Message::success("[*] Firewall bypassed successfully"),
        Message::info("[*] Connected to target system"),
        Message::success("[*] Ready for commands"),
    ]
    .into_iter()
    .map(Message::with_sound)
    .collect()
}

/// Background activity played after the initial set.
pub fn system_messages() -> MessageQueue {
    [
        "[*] Monitoring network traffic...",
        "[*] Updating security protocols...",
        "[*] Scanning for vulnerabilities...",
        "[*] Encrypting data transmission...",
        "[*] Bypassing firewall...",
        "[*] Accessing secure database...",
    ]
    .into_iter()
    .map(|text| Message::info(text).with_sound())
    .collect()
}

/// Short set played when the boot never got going.
pub fn fallback_messages() -> MessageQueue {
    [
        "[*] System initialized successfully...",
        "[*] Loading security protocols...",
        "[*] Access granted to mainframe",
        "[*] Ready for commands",
    ]
    .into_iter()
    .map(|text| Message::info(text).with_sound())
    .collect()
}
