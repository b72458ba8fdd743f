//! Default game directory resolution.
//!
//! Ambient process state is read once by [`HostOs::current`] and
//! [`HostEnv::from_process`]; the resolution itself is a pure function of
//! those values.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Map an identifier as reported by `std::env::consts::OS`.
    pub fn from_identifier(os: &str) -> Self {
        match os.to_lowercase().as_str() {
            "windows" => HostOs::Windows,
            "macos" | "darwin" => HostOs::MacOs,
            _ => HostOs::Other,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    pub home: Option<PathBuf>,
    pub appdata: Option<PathBuf>,
}

impl HostEnv {
    pub fn from_process() -> Self {
        let var = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        Self {
            home: var("HOME").or_else(|| var("USERPROFILE")),
            appdata: var("APPDATA"),
        }
    }
}

pub fn default_game_dir(os: HostOs, env: &HostEnv) -> Option<PathBuf> {
    match os {
        HostOs::Windows => env.appdata.as_ref().map(|appdata| appdata.join(".minecraft")),
        HostOs::MacOs => env.home.as_ref().map(|home| {
            home.join("Library")
                .join("Application Support")
                .join("minecraft")
        }),
        HostOs::Other => env.home.as_ref().map(|home| home.join(".minecraft")),
    }
}

/// Expand a leading `~` to the home directory. Other paths pass through.
pub fn expand_home(path: &Path, env: &HostEnv) -> PathBuf {
    let Some(home) = env.home.as_ref() else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> HostEnv {
        HostEnv {
            home: Some(PathBuf::from("/home/steve")),
            appdata: Some(PathBuf::from("C:/Users/steve/AppData/Roaming")),
        }
    }

    #[test]
    fn test_os_identifiers() {
        assert_eq!(HostOs::from_identifier("windows"), HostOs::Windows);
        assert_eq!(HostOs::from_identifier("macos"), HostOs::MacOs);
        assert_eq!(HostOs::from_identifier("Darwin"), HostOs::MacOs);
        assert_eq!(HostOs::from_identifier("linux"), HostOs::Other);
        assert_eq!(HostOs::from_identifier("freebsd"), HostOs::Other);
    }

    #[test]
    fn test_default_game_dirs() {
        assert_eq!(
            default_game_dir(HostOs::Windows, &env()),
            Some(PathBuf::from("C:/Users/steve/AppData/Roaming").join(".minecraft"))
        );
        assert_eq!(
            default_game_dir(HostOs::MacOs, &env()),
            Some(PathBuf::from("/home/steve/Library/Application Support/minecraft"))
        );
        assert_eq!(
            default_game_dir(HostOs::Other, &env()),
            Some(PathBuf::from("/home/steve/.minecraft"))
        );
    }

    #[test]
    fn test_default_game_dir_without_env() {
        let empty = HostEnv::default();
        assert_eq!(default_game_dir(HostOs::Windows, &empty), None);
        assert_eq!(default_game_dir(HostOs::Other, &empty), None);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home(Path::new("~/games/mc"), &env()),
            PathBuf::from("/home/steve/games/mc")
        );
        assert_eq!(expand_home(Path::new("~"), &env()), PathBuf::from("/home/steve"));
        assert_eq!(expand_home(Path::new("/srv/mc"), &env()), PathBuf::from("/srv/mc"));
        assert_eq!(expand_home(Path::new("~bob/x"), &env()), PathBuf::from("~bob/x"));
        assert_eq!(
            expand_home(Path::new("~/x"), &HostEnv::default()),
            PathBuf::from("~/x")
        );
    }
}
