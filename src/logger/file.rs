/// Daily log file persistence
///
/// Lines are appended to `<logs>/tokenwatch_<YYYY-MM-DD>.log`. Until
/// [`init_file_logging`] runs, writes are dropped.
use chrono::Local;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

struct FileSink {
    dir: PathBuf,
    date: String,
    writer: BufWriter<File>,
}

static FILE_SINK: Lazy<Mutex<Option<FileSink>>> = Lazy::new(|| Mutex::new(None));

fn open_for_date(dir: &Path, date: &str) -> std::io::Result<BufWriter<File>> {
    std::fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("tokenwatch_{}.log", date)))?;
    Ok(BufWriter::new(file))
}

pub fn init_file_logging(dir: &Path) {
    let date = Local::now().format("%Y-%m-%d").to_string();
    match open_for_date(dir, &date) {
        Ok(writer) => {
            *FILE_SINK.lock() = Some(FileSink {
                dir: dir.to_path_buf(),
                date,
                writer,
            });
        }
        Err(e) => eprintln!("Failed to open log file in {}: {}", dir.display(), e),
    }
}

pub fn write_to_file(line: &str) {
    let mut guard = FILE_SINK.lock();
    let Some(sink) = guard.as_mut() else {
        return;
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    if today != sink.date {
        let _ = sink.writer.flush();
        match open_for_date(&sink.dir, &today) {
            Ok(writer) => {
                sink.writer = writer;
                sink.date = today;
            }
            Err(e) => {
                eprintln!("Failed to rotate log file: {}", e);
                return;
            }
        }
    }

    let _ = writeln!(sink.writer, "{}", line);
}

pub fn flush_file_logging() {
    if let Some(sink) = FILE_SINK.lock().as_mut() {
        let _ = sink.writer.flush();
    }
}
