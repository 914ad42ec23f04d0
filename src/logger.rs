use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Append-only diagnostic trail shared by the service and the controller.
pub trait LogSink: Send + Sync {
    fn write(&self, level: &str, msg: &str);

    fn info(&self, msg: &str) {
        self.write("INFO", msg);
    }

    fn warn(&self, msg: &str) {
        self.write("WARNING", msg);
    }

    fn error(&self, msg: &str) {
        self.write("ERROR", msg);
    }
}

pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn ts() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}

fn line(level: &str, msg: &str) -> String {
    format!("[{}] {} {}", ts(), level, msg)
}

pub struct FileLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileLog {
    pub fn open(path: impl AsRef<Path>, banner: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path).ok().map(|mut f| {
            let _ = writeln!(f, "===== {} start =====", banner);
            f
        });
        Self {
            path,
            file: Mutex::new(file),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileLog {
    fn write(&self, level: &str, msg: &str) {
        let record = line(level, msg);
        if let Ok(mut guard) = self.file.lock() {
            if let Some(f) = guard.as_mut() {
                let _ = writeln!(f, "{}", record);
                let _ = f.flush();
                return;
            }
            // Reopen lazily if the file could not be created at startup
            if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
                let _ = writeln!(f, "{}", record);
                let _ = f.flush();
                *guard = Some(f);
            }
        }
    }
}

/// Keeps records in memory; used where a file trail is unwanted.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl LogSink for MemoryLog {
    fn write(&self, level: &str, msg: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{} {}", level, msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_log_appends_timestamped_records() {
        let path = std::env::temp_dir().join(format!("hazmel-log-test-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let log = FileLog::open(&path, "test");
        log.info("first");
        log.error("second");
        let text = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "===== test start =====");
        assert!(lines[1].starts_with('[') && lines[1].ends_with("] INFO first"));
        assert!(lines[2].ends_with("] ERROR second"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryLog::default();
        log.info("a");
        log.warn("b");
        assert_eq!(log.lines(), vec!["INFO a", "WARNING b"]);
    }
}
