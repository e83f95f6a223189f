use std::{env, path::Path, process::Stdio};

use anyhow::Result;
use sysinfo::{get_current_pid, Signal, System};

/// Terminates every other running didit daemon. Two daemons would send every
/// late reminder twice, so `daemon --background` clears out its predecessors
/// before spawning a new one.
pub fn kill_previous_daemons(name: &Path) {
    let system = System::new_all();
    let current_id = get_current_pid().unwrap();
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
            && process.cmd().iter().any(|arg| arg == "daemon")
        {
            // This will forcefully terminate the process on Windows. Anything better will require a
            // lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
        }
    }
}

/// Replaces any running daemon with a fresh detached one. A detached process
/// survives the terminal closing, which is as much daemonization as the
/// reminder loop needs.
pub fn respawn_background_daemon() -> Result<()> {
    // The spawned daemon is this same executable. Not perfect if the binary
    // moves afterwards, but it will do the job in most cases.
    let process_name = env::current_exe().expect("Can't operate without an executable");
    kill_previous_daemons(&process_name);
    let mut command = std::process::Command::new(process_name);
    command.args(["daemon"]);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const DETACHED_PROCESS: u32 = 0x00000008;
        command.creation_flags(DETACHED_PROCESS);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
    }

    println!("🔄 Starting Didit daemon...");
    println!("📅 Will check for late reminders after 8 PM");
    println!("⏰ Checking every hour for pending goals");
    #[allow(clippy::zombie_processes)]
    let _ = command.spawn()?;
    println!("✅ Daemon started in the background");
    Ok(())
}
