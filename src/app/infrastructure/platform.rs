/// Ask the desktop environment whether it prefers a dark appearance.
///
/// Used when `theme_mode` is `SystemDefault`. Falls back to light when the
/// platform gives no answer.
pub fn detect_system_dark_mode() -> bool {
    let detected = query_platform();
    log::debug!("system dark mode preference: {:?}", detected);
    detected.unwrap_or(false)
}

#[cfg(target_os = "windows")]
fn query_platform() -> Option<bool> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let personalize = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .ok()?;
    // AppsUseLightTheme: 0 = dark mode, 1 = light mode
    let value = personalize.get_value::<u32, _>("AppsUseLightTheme").ok()?;
    Some(value == 0)
}

#[cfg(target_os = "linux")]
fn query_platform() -> Option<bool> {
    let theme = gsettings("gtk-theme");
    if let Some(ref name) = theme
        && name.to_lowercase().contains("dark")
    {
        return Some(true);
    }

    // Newer GNOME keeps the preference in color-scheme instead of the theme name
    let scheme = gsettings("color-scheme");
    if let Some(ref value) = scheme
        && value.contains("prefer-dark")
    {
        return Some(true);
    }

    if theme.is_some() || scheme.is_some() {
        Some(false)
    } else {
        None
    }
}

#[cfg(target_os = "linux")]
fn gsettings(key: &str) -> Option<String> {
    let output = std::process::Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", key])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(target_os = "macos")]
fn query_platform() -> Option<bool> {
    let output = std::process::Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    // The key is absent (non-zero exit) in light mode
    if !output.status.success() {
        return Some(false);
    }
    let style = String::from_utf8_lossy(&output.stdout).to_lowercase();
    Some(style.contains("dark"))
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
fn query_platform() -> Option<bool> {
    None
}
