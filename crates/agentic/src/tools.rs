//! The local tools exposed to the model.
//!
//! Every tool reports failure as data: the returned string either carries the
//! result or starts with an `Error ...:` marker that the model can read and
//! react to. Nothing here returns `Err` or panics on I/O problems.
use std::fs;
use std::path::Path;

use sysinfo::System;

/// Read and return the contents of a local UTF-8 text file.
pub fn read_file<P: AsRef<Path>>(path: P) -> String {
    match fs::read_to_string(path.as_ref()) {
        Ok(content) => content,
        Err(e) => format!("Error reading file: {}", e),
    }
}

/// List the files and directories in `folder_path`, in the order the
/// filesystem yields them.
pub fn list_files<P: AsRef<Path>>(folder_path: P) -> String {
    let entries = match fs::read_dir(folder_path.as_ref()) {
        Ok(entries) => entries,
        Err(e) => return format!("Error listing files: {}", e),
    };

    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => names.push(entry.file_name().to_string_lossy().into_owned()),
            Err(e) => return format!("Error listing files: {}", e),
        }
    }

    format_entries(&names)
}

/// Create `path` with `content`, replacing whatever was there before.
pub fn create_file<P: AsRef<Path>>(path: P, content: &str) -> String {
    let path = path.as_ref();
    match fs::write(path, content) {
        Ok(()) => format!("Successfully created file {}", path.display()),
        Err(e) => format!("Error creating file: {}", e),
    }
}

/// Report the OS name, release and machine architecture, one per line.
pub fn get_system_info() -> String {
    let Some(release) = System::kernel_version().filter(|r| !r.is_empty()) else {
        return "Error getting system info: could not determine the OS release".to_string();
    };

    format!(
        "System: {}\nRelease: {}\nMachine: {}",
        os_name(),
        release,
        machine_name()
    )
}

// uname-style machine name (`arm64` on macOS), falling back to the compile target
fn machine_name() -> String {
    System::cpu_arch()
        .filter(|arch| !arch.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}

fn os_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        other => other,
    }
}

/// Render names as a bracketed list of quoted strings, e.g. `['a.txt', 'b']`.
fn format_entries(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| quote(name)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Quote a name the way a Python list repr does: single quotes unless the name
/// contains one and no double quote, with backslashes and control characters escaped.
fn quote(name: &str) -> String {
    let delimiter = if name.contains('\'') && !name.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push(delimiter);
    for c in name.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => quoted.push_str(&format!("\\x{:02x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}
