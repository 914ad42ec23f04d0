use anyhow::Result;

/// Source of the text the user currently has selected.
pub trait SelectionSource {
    fn read(&self) -> Result<String>;
}

/// Primary selection on X11, clipboard elsewhere.
pub struct SystemSelection;

impl SelectionSource for SystemSelection {
    fn read(&self) -> Result<String> {
        Ok(read_selection_string()?.trim().to_string())
    }
}

/// Text passed on the command line instead of read from the desktop.
pub struct GivenText(pub String);

impl SelectionSource for GivenText {
    fn read(&self) -> Result<String> {
        Ok(self.0.trim().to_string())
    }
}

#[cfg(windows)]
fn read_selection_string() -> Result<String> {
    clipboard_win::get_clipboard_string().map_err(|e| anyhow::anyhow!("clipboard: {}", e))
}

#[cfg(target_os = "macos")]
fn read_selection_string() -> Result<String> {
    run_capture("pbpaste", &[])
}

#[cfg(all(not(windows), not(target_os = "macos")))]
fn read_selection_string() -> Result<String> {
    run_capture("xclip", &["-o", "-selection", "primary"])
}

#[cfg(not(windows))]
fn run_capture(program: &str, args: &[&str]) -> Result<String> {
    let output = std::process::Command::new(program).args(args).output()?;
    if !output.status.success() && output.stdout.is_empty() {
        anyhow::bail!("{} exited with {}", program, output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_text_is_trimmed() {
        assert_eq!(GivenText("  hello \n".into()).read().unwrap(), "hello");
    }
}
