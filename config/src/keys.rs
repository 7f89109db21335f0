//! Key names used in the on-disk configuration files. Only the keys this
//! crate routes specially plus the ones callers commonly read are listed;
//! the format itself accepts arbitrary keys.

// [Core]
pub const CPU_CORE: &str = "CPUCore";
pub const DUAL_CORE: &str = "CPUThread";
pub const OVERCLOCK_ENABLE: &str = "OverclockEnable";
pub const OVERCLOCK_PERCENT: &str = "Overclock";
pub const SPEED_LIMIT: &str = "EmulationSpeed";
pub const MMU: &str = "MMU";
pub const FAST_DISC_SPEED: &str = "FastDiscSpeed";
pub const VIDEO_BACKEND: &str = "GFXBackend";
pub const AUDIO_STRETCH: &str = "AudioStretch";
pub const ENABLE_CHEATS: &str = "EnableCheats";
pub const GC_PAD_TYPE: &str = "SIDevice";
pub const WIIMOTE_SCAN: &str = "WiimoteContinuousScanning";
pub const WII_SD_CARD: &str = "WiiSDCard";

// [Interface]
pub const ISO_PATHS: &str = "ISOPaths";
pub const ISO_PATH_BASE: &str = "ISOPath";
pub const UPDATER_CHECK_AT_STARTUP: &str = "UpdaterCheckAtStartup";
pub const UPDATER_PERMISSION_ASKED: &str = "UpdaterPermissionAsked";
pub const UPDATER_SKIP_VERSION: &str = "UpdaterSkipVersion";

// [Settings] / [Enhancements] / [Hacks]
pub const SHOW_FPS: &str = "ShowFPS";
pub const INTERNAL_RES: &str = "InternalResolution";
pub const MSAA: &str = "MSAA";
pub const MAX_ANISOTROPY: &str = "MaxAnisotropy";
pub const POST_SHADER: &str = "PostProcessingShader";
pub const EFB_ACCESS_ENABLE: &str = "EFBAccessEnable";
pub const EFB_TO_TEXTURE: &str = "EFBToTextureEnable";
pub const IMMEDIATE_XFB: &str = "ImmediateXFBEnable";
pub const ASPECT_RATIO: &str = "AspectRatio";

// Wii Remote configuration. `Extension`/`WiimoteProfile` carry a 1-based pad
// number suffix in per-game documents ("Extension1", "WiimoteProfile1", ...).
pub const WIIMOTE_SOURCE: &str = "Source";
pub const WIIMOTE_EXTENSION: &str = "Extension";
pub const WIIMOTE_PROFILE: &str = "WiimoteProfile";
pub const WIIMOTE_DEVICE: &str = "Device";
