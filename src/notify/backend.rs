use std::process::Command;

use anyhow::{Context, Result, ensure};
use cfg_if::cfg_if;

/// Delivery mechanism for desktop popups, picked once at startup. The
/// stdout fallback keeps reminders visible on systems without any
/// notification tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    NotifySend,
    Zenity,
    Kdialog,
    Osascript,
    Powershell,
    Stdout,
}

impl Backend {
    pub fn detect() -> Self {
        cfg_if! {
            if #[cfg(target_os = "macos")] {
                Backend::Osascript
            } else if #[cfg(target_os = "windows")] {
                Backend::Powershell
            } else if #[cfg(target_os = "linux")] {
                if command_exists("notify-send") {
                    Backend::NotifySend
                } else if command_exists("zenity") {
                    Backend::Zenity
                } else if command_exists("kdialog") {
                    Backend::Kdialog
                } else {
                    Backend::Stdout
                }
            } else {
                Backend::Stdout
            }
        }
    }

    pub fn deliver(&self, title: &str, message: &str) -> Result<()> {
        match self {
            Backend::NotifySend => run(Command::new("notify-send").arg(title).arg(message)),
            Backend::Zenity => run(Command::new("zenity")
                .arg("--info")
                .arg("--title")
                .arg(title)
                .arg("--text")
                .arg(message)),
            Backend::Kdialog => run(Command::new("kdialog")
                .arg("--title")
                .arg(title)
                .arg("--msgbox")
                .arg(message)),
            Backend::Osascript => run(Command::new("osascript").arg("-e").arg(format!(
                "display notification \"{}\" with title \"{}\"",
                applescript_escape(message),
                applescript_escape(title),
            ))),
            Backend::Powershell => run(Command::new("powershell")
                .arg("-NoProfile")
                .arg("-Command")
                .arg(balloon_script(title, message))),
            Backend::Stdout => {
                println!("📢 {title}: {message}");
                Ok(())
            }
        }
    }
}

fn run(command: &mut Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().to_string();
    let status = command
        .status()
        .with_context(|| format!("couldn't run {program}"))?;
    ensure!(status.success(), "{program} exited with {status}");
    Ok(())
}

#[cfg(target_os = "linux")]
fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn balloon_script(title: &str, message: &str) -> String {
    format!(
        "[System.Reflection.Assembly]::LoadWithPartialName('System.Windows.Forms') | Out-Null; \
         $n = New-Object System.Windows.Forms.NotifyIcon; \
         $n.Icon = [System.Drawing.SystemIcons]::Information; \
         $n.BalloonTipTitle = '{}'; \
         $n.BalloonTipText = '{}'; \
         $n.Visible = $true; \
         $n.ShowBalloonTip(5000)",
        powershell_escape(title),
        powershell_escape(message),
    )
}

fn powershell_escape(text: &str) -> String {
    text.replace('\'', "''")
}
