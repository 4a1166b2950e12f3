use std::{
    ffi::OsStr,
    os::unix::{ffi::OsStrExt, fs::PermissionsExt},
    path::{Path, PathBuf},
};

/// Look up `cmd` in the search list the way a shell would.
///
/// A command containing a `/` is returned as given, so is one that no
/// entry of `search` provides.
pub fn resolve(cmd: &OsStr, search: Option<&OsStr>) -> PathBuf {
    let path = Path::new(cmd);
    if cmd.is_empty() || cmd.as_bytes().contains(&b'/') {
        return path.to_path_buf();
    }
    search
        .into_iter()
        .flat_map(std::env::split_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
        .unwrap_or_else(|| path.to_path_buf())
}

fn is_executable(path: &Path) -> bool {
    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod test {
    use std::{ffi::OsString, fs};

    use super::*;

    #[test]
    fn explicit_path_is_kept() {
        assert_eq!(
            resolve(OsStr::new("./run.sh"), Some(OsStr::new("/bin"))),
            PathBuf::from("./run.sh")
        );
        assert_eq!(
            resolve(OsStr::new("/bin/sh"), None),
            PathBuf::from("/bin/sh")
        );
    }
    #[test]
    fn first_executable_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        // not executable, skipped
        fs::write(first.path().join("tool"), b"").unwrap();
        let tool = second.path().join("tool");
        fs::write(&tool, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let search = std::env::join_paths([first.path(), second.path()]).unwrap();
        assert_eq!(resolve(OsStr::new("tool"), Some(&search)), tool);
    }
    #[test]
    fn unknown_command_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let search = OsString::from(dir.path());
        assert_eq!(
            resolve(OsStr::new("no-such-tool"), Some(&search)),
            PathBuf::from("no-such-tool")
        );
        assert_eq!(
            resolve(OsStr::new("no-such-tool"), None),
            PathBuf::from("no-such-tool")
        );
    }
}
