//! Commands used when no command document could be loaded.

use super::{BuiltinAction, Command, CommandKind, CommandTable};

const HELP: &str = "Available commands: help, clear, status, scan, hack, exit";

const STATUS: &str = "System Status: ONLINE\n\
Firewall: BYPASSED\n\
Target: CONNECTED\n\
Security Level: MAXIMUM";

const SCAN: &str = "Scanning target system...\n\
[*] Port 22: OPEN (SSH)\n\
[*] Port 80: OPEN (HTTP)\n\
[*] Port 443: OPEN (HTTPS)\n\
[*] Vulnerabilities found: 3";

const HACK: &str = "Initiating hack sequence...\n\
[*] Bypassing security...\n\
[*] Extracting data...\n\
[*] Hack completed successfully!";

/// The small built-in command set.
pub fn fallback_table() -> CommandTable {
    vec![
        Command::new("help", "Show available commands", CommandKind::Static(HELP.into())),
        Command::new(
            "clear",
            "Clear the terminal",
            CommandKind::Builtin(BuiltinAction::Clear),
        ),
        Command::new("status", "Show system status", CommandKind::Static(STATUS.into())),
        Command::new("scan", "Scan the target system", CommandKind::Static(SCAN.into())),
        Command::new("hack", "Run the hack sequence", CommandKind::Static(HACK.into())),
        Command::new("exit", "Log out", CommandKind::Builtin(BuiltinAction::Exit)),
    ]
    .into_iter()
    .collect()
}
