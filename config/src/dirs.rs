use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

/// The two roots every settings path hangs off: the writable user directory
/// and the read-only `Sys` directory holding shipped defaults.
///
/// A `Dirs` is created once at startup and passed by reference to everything
/// that touches the filesystem; no settings I/O is reachable before one
/// exists.
#[derive(Clone, Debug)]
pub struct Dirs {
    user: PathBuf,
    sys: PathBuf,
}

#[derive(Debug)]
pub enum DirsError {
    NoBaseDirs,
    Io(io::Error),
}

impl fmt::Display for DirsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirsError::NoBaseDirs => {
                f.write_str("couldn't determine the platform's base directories")
            }
            DirsError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl From<io::Error> for DirsError {
    fn from(err: io::Error) -> Self {
        DirsError::Io(err)
    }
}

impl Dirs {
    pub fn new(user: impl Into<PathBuf>, sys: impl Into<PathBuf>) -> Self {
        Dirs {
            user: user.into(),
            sys: sys.into(),
        }
    }

    /// Resolves the default directory layout from the platform base dirs and
    /// creates the user-side subtree (`Config`, `GameSettings`, Wii Remote
    /// profiles). The `Sys` tree is only resolved, not created; shipping it
    /// is the application's job.
    pub fn bootstrap() -> Result<Self, DirsError> {
        let base_dirs = directories::BaseDirs::new().ok_or(DirsError::NoBaseDirs)?;
        let user = base_dirs.data_local_dir().join("flipper");
        let sys = user.join("Sys");
        let dirs = Dirs::new(user, sys);
        dirs.create_user_tree()?;
        Ok(dirs)
    }

    pub fn create_user_tree(&self) -> Result<(), DirsError> {
        fs::create_dir_all(self.config_dir())?;
        fs::create_dir_all(self.game_settings_dir())?;
        fs::create_dir_all(self.wiimote_profiles_dir())?;
        Ok(())
    }

    pub fn user(&self) -> &Path {
        &self.user
    }

    pub fn sys(&self) -> &Path {
        &self.sys
    }

    /// `<user>/Config`, where the global `.ini` files live.
    pub fn config_dir(&self) -> PathBuf {
        self.user.join("Config")
    }

    /// `<user>/GameSettings`, the writable per-game override documents.
    pub fn game_settings_dir(&self) -> PathBuf {
        self.user.join("GameSettings")
    }

    /// `<sys>/GameSettings`, the shipped read-only per-game defaults.
    pub fn sys_game_settings_dir(&self) -> PathBuf {
        self.sys.join("GameSettings")
    }

    /// `<user>/Config/Profiles/Wiimote`, the per-controller profile files.
    pub fn wiimote_profiles_dir(&self) -> PathBuf {
        self.config_dir().join("Profiles").join("Wiimote")
    }
}
