#![allow(dead_code)]

use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use docstack_core::conf::ConfKey;
use docstack_core::prelude::*;
use tempfile::TempDir;
use url::Url;

pub const TAG: &str = "v2.11.6";
pub const HOME: &str = "/home/operator";

/// Config template carrying every recognized sentinel.
pub fn config_template() -> String {
    let mut out = String::from("# Paperless-ngx configuration\n\n");
    for key in ConfKey::ALL {
        out.push_str(&key.sentinel_line());
        out.push('\n');
    }
    out.push_str("\n#PAPERLESS_EMAIL_HOST=\n");
    out
}

/// Write a `.tar.xz` release archive laid out like an upstream release.
pub fn write_release_archive(dest: &Path) {
    let file = File::create(dest).unwrap();
    let encoder = xz2::write::XzEncoder::new(file, 6);
    let mut builder = tar::Builder::new(encoder);

    let template = config_template();
    let files: [(&str, &str); 4] = [
        ("paperless-ngx/requirements.txt", "django\ncelery\n"),
        ("paperless-ngx/gunicorn.conf.py", "workers = 2\n"),
        ("paperless-ngx/src/manage.py", "#!/usr/bin/env python3\n"),
        ("paperless-ngx/paperless.conf", &template),
    ];
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .unwrap();
    }

    let mut encoder = builder.into_inner().unwrap();
    encoder.flush().unwrap();
    encoder.finish().unwrap();
}

/// Release source serving a fixed tag and a locally built archive.
pub struct StaticReleases {
    tag: String,
    template: Option<String>,
    downloads: RefCell<Vec<Url>>,
}

impl StaticReleases {
    pub fn new() -> Self {
        Self {
            tag: TAG.to_string(),
            template: Some(config_template()),
            downloads: RefCell::new(Vec::new()),
        }
    }

    /// Make template fetches fail.
    pub fn without_template(mut self) -> Self {
        self.template = None;
        self
    }

    pub fn downloads(&self) -> Vec<Url> {
        self.downloads.borrow().clone()
    }
}

impl ReleaseSource for StaticReleases {
    fn repository(&self) -> &str {
        "paperless-ngx/paperless-ngx"
    }

    fn latest_release(&self) -> anyhow::Result<Release> {
        Release::from_tag(&self.tag)
    }

    fn download(&self, url: &Url, dest: &Path) -> anyhow::Result<()> {
        self.downloads.borrow_mut().push(url.clone());
        write_release_archive(dest);
        Ok(())
    }

    fn fetch_text(&self, url: &Url) -> anyhow::Result<String> {
        self.template
            .clone()
            .ok_or_else(|| anyhow::anyhow!("HTTP 503 from {}", url))
    }
}

/// A staged host root inside a temp directory.
pub struct Host {
    pub temp: TempDir,
    pub settings: Settings,
    pub layout: Layout,
}

impl Host {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let temp = TempDir::new().unwrap();
        let layout = Layout::with_home(temp.path().join("root"), Path::new(HOME), &settings);

        let policy = layout.imagemagick_policy();
        std::fs::create_dir_all(policy.parent().unwrap()).unwrap();
        std::fs::write(
            &policy,
            "<policymap>\n  <policy domain=\"coder\" rights=\"none\" pattern=\"PDF\" />\n</policymap>\n",
        )
        .unwrap();

        Self {
            temp,
            settings,
            layout,
        }
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(path.as_ref()).unwrap()
    }

    pub fn config(&self) -> String {
        self.read(self.layout.config_file())
    }

    pub fn credentials(&self) -> String {
        self.read(self.layout.credentials_file())
    }

    pub fn unit_path(&self, name: &str) -> PathBuf {
        self.layout.unit_dir().join(format!("{name}.service"))
    }
}

pub fn local_answers() -> AnswerPrompter {
    AnswerPrompter::new(Default::default())
        .with_answer("database.install_local", "y")
        .with_answer("ocr.add_languages", "Y")
        .with_answer("ocr.languages", "deu,fra")
        .with_answer("config.time_zone", "Europe/Berlin")
        .with_answer("config.url", "https://docs.example.com/")
        .with_answer("features.barcodes", "yes")
        .with_answer("admin.password", "hunter22")
}

pub fn remote_answers() -> AnswerPrompter {
    AnswerPrompter::new(Default::default())
        .with_answer("database.install_local", "n")
        .with_answer("database.host", "db.internal")
        .with_answer("database.port", "6543")
        .with_answer("database.password", "remote-pw")
        .with_answer("database.remote_ready", "yes")
}

/// Command runner used by pipeline tests.
pub fn runner() -> RecordingRunner {
    RecordingRunner::new().with_output("hostname", "10.0.0.5 fe80::1")
}

pub fn run_pipeline(
    host: &Host,
    runner: &RecordingRunner,
    releases: &StaticReleases,
    prompter: &mut AnswerPrompter,
    skip: &[StepId],
) -> anyhow::Result<InstallReport> {
    let backends = Backends {
        runner,
        releases,
        checkout: &NoopCheckout,
    };
    Pipeline::new(&host.layout, &host.settings, backends)
        .skip(skip)
        .run(prompter, &mut NoopObserver)
}
