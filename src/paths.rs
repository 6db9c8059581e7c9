use std::path::Path;

/// Replaces a leading home directory in `path` with `~` for display
#[must_use]
pub fn shorten_home(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => shorten_with(path, &home),
        None => path.display().to_string(),
    }
}

fn shorten_with(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~{}{}", std::path::MAIN_SEPARATOR, rest.display()),
        Err(_) => path.display().to_string(),
    }
}
