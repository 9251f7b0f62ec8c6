//! Debian package lists and package-manager invocations.

use crate::exec::{CommandRunner, CommandSpec};

/// Imaging libraries, build toolchain, database client libraries and the broker.
pub const DEPENDENCIES: &[&str] = &[
    "redis",
    "build-essential",
    "imagemagick",
    "fonts-liberation",
    "optipng",
    "gnupg",
    "libpq-dev",
    "libmagic-dev",
    "mime-support",
    "libzbar0",
    "poppler-utils",
    "default-libmysqlclient-dev",
    "automake",
    "libtool",
    "pkg-config",
    "git",
    "curl",
    "libtiff-dev",
    "libpng-dev",
    "libleptonica-dev",
    "sudo",
];

pub const DATABASE: &[&str] = &["postgresql"];

pub const PYTHON: &[&str] = &[
    "python3",
    "python3-pip",
    "python3-dev",
    "python3-setuptools",
    "python3-wheel",
];

/// OCR engine with English data and PDF post-processing tools.
pub const OCR: &[&str] = &[
    "unpaper",
    "ghostscript",
    "icc-profiles-free",
    "qpdf",
    "liblept5",
    "libxml2",
    "pngquant",
    "zlib1g",
    "tesseract-ocr",
    "tesseract-ocr-eng",
];

pub const ADMINER: &[&str] = &["adminer"];

pub fn install_command<S: AsRef<str>>(packages: &[S]) -> CommandSpec {
    CommandSpec::new("apt-get")
        .args(["install", "-y", "--no-install-recommends"])
        .args(packages.iter().map(|p| p.as_ref().to_string()))
        .env("DEBIAN_FRONTEND", "noninteractive")
}

pub fn install<S: AsRef<str>>(runner: &dyn CommandRunner, packages: &[S]) -> anyhow::Result<()> {
    if packages.is_empty() {
        return Ok(());
    }
    runner.run(&install_command(packages))
}

/// Package-manager garbage collection run at the end of an install.
pub fn cleanup_commands() -> Vec<CommandSpec> {
    ["autoremove", "autoclean"]
        .into_iter()
        .map(|action| {
            CommandSpec::new("apt-get")
                .args(["-y", action])
                .env("DEBIAN_FRONTEND", "noninteractive")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::RecordingRunner;

    #[test]
    fn install_command_is_noninteractive() {
        let spec = install_command(&["redis", "git"]);
        assert_eq!(
            spec.command_line(),
            "apt-get install -y --no-install-recommends redis git"
        );
        assert!(
            spec.env
                .contains(&("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string()))
        );
    }

    #[test]
    fn empty_list_runs_nothing() {
        let runner = RecordingRunner::new();
        install::<&str>(&runner, &[]).unwrap();
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn cleanup_is_autoremove_then_autoclean() {
        let lines: Vec<_> = cleanup_commands()
            .iter()
            .map(CommandSpec::command_line)
            .collect();
        assert_eq!(lines, vec!["apt-get -y autoremove", "apt-get -y autoclean"]);
    }
}
