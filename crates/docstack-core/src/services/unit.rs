//! systemd unit model and rendering.

use std::path::{Path, PathBuf};

/// One `[Section]` of a unit file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl UnitSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUnit {
    /// Unit name without the `.service` suffix
    pub name: String,
    pub sections: Vec<UnitSection>,
    /// Target paths that must exist before the unit can start
    pub required_paths: Vec<PathBuf>,
}

impl ServiceUnit {
    pub fn file_name(&self) -> String {
        format!("{}.service", self.name)
    }

    /// Render as unit file text. Identical units render byte-identically.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", section.name));
            for (key, value) in &section.entries {
                out.push_str(&format!("{key}={value}\n"));
            }
        }
        out
    }
}

/// Parse unit file text into sections.
///
/// Blank lines and `#`/`;` comments are skipped. Entries before the first
/// section header, and lines that are neither headers nor `key=value`, are
/// errors.
pub fn parse_unit(content: &str) -> anyhow::Result<Vec<UnitSection>> {
    let mut sections: Vec<UnitSection> = Vec::new();

    for (number, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push(UnitSection::new(name));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            anyhow::bail!("line {}: expected key=value, got '{}'", number + 1, line);
        };
        let Some(section) = sections.last_mut() else {
            anyhow::bail!("line {}: entry outside of any section", number + 1);
        };
        section
            .entries
            .push((key.trim().to_string(), value.trim().to_string()));
    }

    Ok(sections)
}

fn service_unit(
    name: &str,
    description: &str,
    network: bool,
    service: UnitSection,
    required_paths: Vec<PathBuf>,
) -> ServiceUnit {
    let mut unit = UnitSection::new("Unit")
        .entry("Description", description)
        .entry("Requires", "redis.service");
    if network {
        unit = unit
            .entry("After", "network.target")
            .entry("Wants", "network.target");
    }

    ServiceUnit {
        name: name.to_string(),
        sections: vec![
            unit,
            service,
            UnitSection::new("Install").entry("WantedBy", "multi-user.target"),
        ],
        required_paths,
    }
}

/// The four application units for an install at `install_dir`.
pub fn paperless_units(install_dir: &Path) -> Vec<ServiceUnit> {
    let src = install_dir.join("src");
    let workdir = src.display().to_string();
    let gunicorn_conf = install_dir.join("gunicorn.conf.py");

    let scheduler = service_unit(
        "paperless-scheduler",
        "Paperless Celery beat",
        false,
        UnitSection::new("Service")
            .entry("User", "root")
            .entry("WorkingDirectory", &workdir)
            .entry("ExecStart", "celery --app paperless beat --loglevel INFO"),
        vec![src.clone()],
    );

    let task_queue = service_unit(
        "paperless-task-queue",
        "Paperless Celery Workers",
        false,
        UnitSection::new("Service")
            .entry("User", "root")
            .entry("WorkingDirectory", &workdir)
            .entry("ExecStart", "celery --app paperless worker --loglevel INFO"),
        vec![src.clone()],
    );

    let consumer = service_unit(
        "paperless-consumer",
        "Paperless consumer",
        false,
        UnitSection::new("Service")
            .entry("User", "root")
            .entry("WorkingDirectory", &workdir)
            .entry("ExecStartPre", "/bin/sleep 2")
            .entry("ExecStart", "python3 manage.py document_consumer"),
        vec![src.clone()],
    );

    let webserver = service_unit(
        "paperless-webserver",
        "Paperless webserver",
        true,
        UnitSection::new("Service")
            .entry("Type", "simple")
            .entry("User", "root")
            .entry("WorkingDirectory", &workdir)
            .entry(
                "ExecStart",
                format!(
                    "/usr/local/bin/gunicorn -c {} paperless.asgi:application",
                    gunicorn_conf.display()
                ),
            ),
        vec![src, gunicorn_conf],
    );

    vec![scheduler, task_queue, consumer, webserver]
}
