use std::path::Path;

use tracing::debug;

use super::Toolbox;
use crate::error::{GwtError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JetBrainsIde {
    WebStorm,
    Idea,
    PyCharm,
    CLion,
    Rider,
    GoLand,
    DataGrip,
}

impl JetBrainsIde {
    /// Command-line launcher installed by JetBrains Toolbox
    #[must_use]
    pub fn binary(self) -> &'static str {
        match self {
            Self::WebStorm => "webstorm",
            Self::Idea => "idea",
            Self::PyCharm => "pycharm",
            Self::CLion => "clion",
            Self::Rider => "rider",
            Self::GoLand => "goland",
            Self::DataGrip => "datagrip",
        }
    }

    /// macOS application name, as accepted by `open -a`
    #[must_use]
    pub fn app_name(self) -> &'static str {
        match self {
            Self::WebStorm => "WebStorm",
            Self::Idea => "IntelliJ IDEA",
            Self::PyCharm => "PyCharm",
            Self::CLion => "CLion",
            Self::Rider => "Rider",
            Self::GoLand => "GoLand",
            Self::DataGrip => "DataGrip",
        }
    }
}

/// Ways of starting an IDE detached from this process, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launcher {
    Setsid,
    Nohup,
    Open,
    SystemdRun,
    Direct,
}

impl Launcher {
    pub const ORDER: [Self; 5] = [
        Self::Setsid,
        Self::Nohup,
        Self::Open,
        Self::SystemdRun,
        Self::Direct,
    ];

    /// Program that must be on `PATH` for this launcher; `None` if always usable
    #[must_use]
    pub fn requires(self) -> Option<&'static str> {
        match self {
            Self::Setsid => Some("setsid"),
            Self::Nohup => Some("nohup"),
            Self::Open => Some("open"),
            Self::SystemdRun => Some("systemd-run"),
            Self::Direct => None,
        }
    }

    /// Program and arguments that start `ide` on `dir`
    #[must_use]
    pub fn invocation(self, ide: JetBrainsIde, dir: &Path) -> (&'static str, Vec<String>) {
        let background = format!(
            "{} {} >/dev/null 2>&1 &",
            ide.binary(),
            shell_quote(&dir.to_string_lossy())
        );
        let sh = |prefix: &[&str]| {
            let mut args: Vec<String> = prefix.iter().map(|a| (*a).to_string()).collect();
            args.extend(["sh".to_string(), "-c".to_string(), background.clone()]);
            args
        };

        match self {
            Self::Setsid => ("setsid", sh(&[])),
            Self::Nohup => ("nohup", sh(&[])),
            Self::Open => (
                "open",
                vec![
                    "-a".to_string(),
                    ide.app_name().to_string(),
                    dir.to_string_lossy().into_owned(),
                ],
            ),
            Self::SystemdRun => ("systemd-run", sh(&["--user", "--scope"])),
            Self::Direct => ("sh", vec!["-c".to_string(), background.clone()]),
        }
    }
}

/// First launcher whose requirement `available` accepts
pub fn pick_launcher(available: impl Fn(&str) -> bool) -> Launcher {
    Launcher::ORDER
        .into_iter()
        .find(|launcher| launcher.requires().is_none_or(&available))
        .unwrap_or(Launcher::Direct)
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl Toolbox {
    /// Opens `dir` in `ide` without waiting for it, returning the launcher used
    ///
    /// # Errors
    /// Returns an error if the IDE's command-line launcher is not on `PATH` or
    /// the chosen launcher fails
    pub fn launch_ide(&self, ide: JetBrainsIde, dir: &Path) -> Result<Launcher> {
        if !self.available(ide.binary()) {
            return Err(GwtError::ToolMissing(ide.binary().to_string()));
        }

        let launcher = pick_launcher(|program| self.available(program));
        let (program, args) = launcher.invocation(ide, dir);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_checked(program, &args)?;

        debug!(ide = ide.binary(), ?launcher, "launched IDE");
        Ok(launcher)
    }
}
