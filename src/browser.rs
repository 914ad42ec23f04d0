use anyhow::{Context, Result};
use std::process::Command;

use crate::config::Config;

pub trait Launcher {
    fn open(&self, url: &str) -> Result<()>;
}

/// A configured browser command, e.g. `firefox -P main`; the URL goes last.
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn command(&self, url: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(url);
        cmd
    }
}

impl Launcher for CommandLauncher {
    fn open(&self, url: &str) -> Result<()> {
        self.command(url)
            .spawn()
            .with_context(|| format!("failed to start {}", self.program))?;
        Ok(())
    }
}

/// Whatever the desktop considers the default browser.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, url: &str) -> Result<()> {
        opener::open(url).context("failed to open default browser")
    }
}

pub fn from_config(cfg: &Config) -> Box<dyn Launcher> {
    match cfg.browser.as_deref().and_then(CommandLauncher::new) {
        Some(launcher) => Box::new(launcher),
        None => Box::new(SystemLauncher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_appended_after_configured_args() {
        let launcher = CommandLauncher::new(&["firefox".into(), "-P".into(), "main".into()]).unwrap();
        let cmd = launcher.command("https://example.com/?q=a");
        assert_eq!(cmd.get_program(), "firefox");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["-P", "main", "https://example.com/?q=a"]);
    }

    #[test]
    fn empty_command_is_not_a_launcher() {
        assert!(CommandLauncher::new(&[]).is_none());
    }

    #[test]
    fn missing_program_fails_to_launch() {
        let launcher = CommandLauncher::new(&["hazmel-no-such-browser-binary".into()]).unwrap();
        let err = launcher.open("https://example.com").unwrap_err();
        assert!(err.to_string().contains("hazmel-no-such-browser-binary"));
    }
}
