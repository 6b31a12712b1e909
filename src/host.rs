use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::Command;

const MIB: u64 = 1024 * 1024;

/// Create `name` inside `root` with a length of `size_mb` MiB (sparse where the
/// filesystem allows it). Used to exercise the watcher end to end.
pub fn create_synthetic_file(root: &Path, name: &str, size_mb: u64) -> io::Result<PathBuf> {
    let mut components = Path::new(name).components();
    let valid = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !valid {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name:?} is not a plain file name"),
        ));
    }

    let path = root.join(name);
    let file = std::fs::File::create(&path)?;
    file.set_len(size_mb.saturating_mul(MIB))?;
    Ok(path)
}

/// Launch the platform file browser on `dir` without waiting for it.
pub fn open_folder(dir: &Path) -> io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        Command::new("explorer")
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    command.arg(dir).spawn().map(|_| ())
}
