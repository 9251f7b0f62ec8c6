mod support;

use docstack_core::database::DatabaseMode;
use docstack_core::prelude::*;
use support::{Host, StaticReleases, TAG, local_answers, remote_answers, run_pipeline, runner};

fn lines_starting(lines: &[String], prefix: &str) -> Vec<String> {
    lines
        .iter()
        .filter(|l| l.starts_with(prefix))
        .cloned()
        .collect()
}

#[test]
fn local_install_runs_every_step() {
    let host = Host::new();
    let runner = runner();
    let releases = StaticReleases::new();
    let mut prompter = local_answers();

    let report = run_pipeline(&host, &runner, &releases, &mut prompter, &[]).unwrap();

    assert_eq!(report.version.as_deref(), Some(TAG));
    assert_eq!(report.database_mode, Some(DatabaseMode::Local));
    assert_eq!(report.steps.len(), StepId::ALL.len());
    for record in &report.steps {
        let expected = if record.step == StepId::Adminer {
            StepOutcome::Skipped
        } else {
            StepOutcome::Completed
        };
        assert_eq!(record.outcome, expected, "step {}", record.step);
    }
    assert_eq!(report.units.len(), 4);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    assert_eq!(
        releases.downloads()[0].as_str(),
        "https://github.com/paperless-ngx/paperless-ngx/releases/download/v2.11.6/paperless-ngx-v2.11.6.tar.xz"
    );
}

#[test]
fn local_install_issues_commands_in_order() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();
    let lines = runner.command_lines();

    let installs = lines_starting(&lines, "apt-get install");
    assert_eq!(installs.len(), 4);
    assert!(installs[0].ends_with(" sudo"));
    assert!(installs[1].ends_with(" postgresql"));
    assert!(installs[2].contains(" python3-wheel"));
    assert!(installs[3].ends_with("tesseract-ocr-eng tesseract-ocr-deu tesseract-ocr-fra"));

    let psql = lines_starting(&lines, "sudo -u postgres psql -c");
    assert_eq!(psql.len(), 5);
    assert!(psql[0].contains("CREATE ROLE paperless WITH LOGIN PASSWORD"));
    assert!(psql[1].contains("CREATE DATABASE paperlessdb WITH OWNER paperless"));

    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l.starts_with(needle))
            .unwrap_or_else(|| panic!("missing command {needle}"))
    };
    assert!(position("make install") < position("python3 -m pip install"));
    assert!(position("python3 -m nltk.downloader") < position("sudo -u postgres"));
    assert!(position("sudo -u postgres") < position("python3 manage.py migrate"));
    assert!(position("python3 manage.py migrate") < position("python3 manage.py shell"));
    assert!(position("systemctl daemon-reload") < position("systemctl enable"));

    assert_eq!(
        lines.iter().rev().take(2).rev().cloned().collect::<Vec<_>>(),
        vec!["apt-get -y autoremove", "apt-get -y autoclean"]
    );
}

#[test]
fn local_install_never_asks_for_remote_confirmation() {
    let host = Host::new();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap();

    assert!(
        !prompter
            .asked()
            .iter()
            .any(|k| k == "database.remote_ready" || k == "database.host")
    );
}

#[test]
fn configuration_is_written_from_answers() {
    let host = Host::new();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap();
    let conf = host.config();

    assert!(conf.contains("\nPAPERLESS_OCR_LANGUAGE=eng+deu+fra\n"));
    assert!(conf.contains("\nPAPERLESS_REDIS=redis://localhost:6379\n"));
    assert!(conf.contains("\nPAPERLESS_DBHOST=localhost\n"));
    assert!(conf.contains("\nPAPERLESS_DBNAME=paperlessdb\n"));
    assert!(conf.contains("\nPAPERLESS_CONSUMPTION_DIR=/opt/paperless/consume\n"));
    assert!(conf.contains("\nPAPERLESS_TIME_ZONE=Europe/Berlin\n"));
    assert!(conf.contains("\nPAPERLESS_URL=https://docs.example.com\n"));
    assert!(conf.contains("\nPAPERLESS_CONSUMER_ENABLE_BARCODES=true\n"));
    assert!(conf.contains("\n#PAPERLESS_CONSUMER_RECURSIVE=false\n"));
    assert!(conf.contains("\n#PAPERLESS_EMAIL_HOST=\n"));
    assert!(!conf.contains("change-me"));

    let secret = conf
        .lines()
        .find_map(|l| l.strip_prefix("PAPERLESS_SECRET_KEY="))
        .unwrap();
    assert_eq!(secret.len(), 32);
}

#[test]
fn application_tree_is_seeded() {
    let host = Host::new();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap();

    let install = host.layout.install_dir();
    for dir in ["consume", "data", "media", "static", "src"] {
        assert!(install.join(dir).is_dir(), "{dir}");
    }
    assert_eq!(host.read(host.layout.version_file()), format!("{TAG}\n"));

    let parent = host.layout.install_parent();
    let leftovers: Vec<_> = std::fs::read_dir(&parent)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tar.xz") || name.contains("unpack"))
        .collect();
    assert!(leftovers.is_empty(), "{leftovers:?}");
    assert!(!host.layout.encoder_build_dir().exists());
}

#[test]
fn credentials_log_has_one_database_block_then_one_web_ui_block() {
    let host = Host::new();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap();
    let creds = host.credentials();

    assert_eq!(creds.matches("Paperless-ngx Database User: ").count(), 1);
    assert_eq!(creds.matches("Paperless-ngx WebUI User: ").count(), 1);
    let db = creds.find("Paperless-ngx Database User: paperless").unwrap();
    let web = creds.find("Paperless-ngx WebUI User: admin").unwrap();
    assert!(db < web);
    assert!(creds.contains("Paperless-ngx WebUI Password: hunter22\n"));
    assert!(!creds.contains("Adminer"));
}

#[test]
fn admin_credentials_stay_off_the_command_line() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();

    let shell = runner
        .commands()
        .into_iter()
        .find(|c| c.args == ["manage.py", "shell"])
        .unwrap();
    assert!(shell.stdin.as_deref().unwrap().contains("create_superuser"));
    assert!(
        shell
            .env
            .contains(&("DOCSTACK_ADMIN_PASSWORD".to_string(), "hunter22".to_string()))
    );
    assert!(shell.env.iter().any(|(k, _)| k == "PAPERLESS_DBHOST"));
    assert!(!shell.command_line().contains("hunter22"));
    assert_eq!(shell.cwd.as_deref(), Some(host.layout.src_dir().as_path()));
}

#[test]
fn remote_install_never_creates_a_role() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = remote_answers();

    let report = run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();

    assert_eq!(report.database_mode, Some(DatabaseMode::Remote));
    assert_eq!(report.outcome(StepId::Database), Some(StepOutcome::Skipped));
    assert!(runner.commands().iter().all(|c| c.program != "sudo"));
    assert!(
        !runner
            .command_lines()
            .iter()
            .any(|l| l.ends_with(" postgresql"))
    );
    assert!(prompter.asked().iter().any(|k| k == "database.remote_ready"));

    let conf = host.config();
    assert!(conf.contains("\nPAPERLESS_DBHOST=db.internal\n"));
    assert!(conf.contains("\nPAPERLESS_DBPORT=6543\n"));
    assert!(conf.contains("\nPAPERLESS_DBPASS=remote-pw\n"));
    assert!(conf.contains("\n#PAPERLESS_OCR_LANGUAGE=eng\n"));

    let creds = host.credentials();
    assert!(creds.contains("Paperless-ngx Database Host: db.internal:6543\n"));
    assert_eq!(creds.matches("Paperless-ngx Database User: ").count(), 1);
}

#[test]
fn remote_password_is_quoted_in_config_and_masked_in_log() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = remote_answers().with_answer("database.password", "pa ss#x");

    run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();

    assert!(host.config().contains("\nPAPERLESS_DBPASS='pa ss#x'\n"));

    let sql = prompter
        .logged()
        .iter()
        .find(|m| m.contains("CREATE ROLE"))
        .expect("role statements are logged");
    assert!(sql.contains("PASSWORD '********'"));
    assert!(prompter.logged().iter().all(|m| !m.contains("pa ss#x")));
}

#[test]
fn unconfirmed_remote_database_aborts() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = remote_answers().with_answer("database.remote_ready", "later");

    let err = run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap_err();

    assert!(err.to_string().contains("provision-db"));
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::RemoteDatabaseNotConfirmed { .. })
    ));
    assert!(
        !runner
            .command_lines()
            .iter()
            .any(|l| l.contains("manage.py"))
    );
    assert!(!host.layout.credentials_file().exists());
}

#[test]
fn remote_host_is_required() {
    let host = Host::new();
    let mut prompter =
        AnswerPrompter::new(Default::default()).with_answer("database.install_local", "no");

    let err = run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::MissingAnswer { key }) if key == "database.host"
    ));
}

#[test]
fn declining_service_start_enables_only() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = local_answers().with_answer("services.start", "nope");

    run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();

    let enable = lines_starting(&runner.command_lines(), "systemctl enable");
    assert_eq!(
        enable,
        vec![
            "systemctl enable paperless-scheduler paperless-task-queue paperless-consumer paperless-webserver"
        ]
    );
}

#[test]
fn service_start_defaults_to_yes() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();

    let enable = lines_starting(&runner.command_lines(), "systemctl enable");
    assert!(enable[0].starts_with("systemctl enable --now "));
}

#[test]
fn units_and_policy_are_installed() {
    let host = Host::new();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap();

    let webserver = host.read(host.unit_path("paperless-webserver"));
    assert!(webserver.contains(
        "ExecStart=/usr/local/bin/gunicorn -c /opt/paperless/gunicorn.conf.py paperless.asgi:application\n"
    ));
    assert!(webserver.contains("WorkingDirectory=/opt/paperless/src\n"));

    let policy = host.read(host.layout.imagemagick_policy());
    assert!(policy.contains(r#"rights="read|write" pattern="PDF""#));
}

#[test]
fn adminer_appends_its_block() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = local_answers().with_answer("adminer.install", "y");

    let report = run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();

    assert_eq!(report.outcome(StepId::Adminer), Some(StepOutcome::Completed));
    let lines = runner.command_lines();
    assert!(lines.iter().any(|l| l == "a2enconf adminer"));
    assert!(lines.iter().any(|l| l == "systemctl reload apache2"));

    let creds = host.credentials();
    assert!(creds.contains("Adminer Interface: http://10.0.0.5/adminer/\n"));
    assert!(creds.find("WebUI User").unwrap() < creds.find("Adminer Interface").unwrap());
}

#[test]
fn banner_names_version_and_address() {
    let host = Host::new();
    let mut prompter = local_answers().with_answer("config.url", "");

    run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap();

    assert_eq!(
        host.read(host.layout.motd_file()),
        format!("Paperless-ngx {TAG}\nWeb interface: http://10.0.0.5:8000\n")
    );
    assert!(!host.config().contains("\nPAPERLESS_URL="));
}

#[test]
fn hooks_run_after_the_banner() {
    let mut settings = Settings::default();
    settings.hooks.post_install = vec![vec!["sh".into(), "-c".into(), "echo done".into()]];
    let host = Host::with_settings(settings);
    let runner = runner();
    let mut prompter = local_answers();

    run_pipeline(&host, &runner, &StaticReleases::new(), &mut prompter, &[]).unwrap();

    let lines = runner.command_lines();
    let hook = lines.iter().position(|l| l == "sh -c echo done").unwrap();
    let cleanup = lines.iter().position(|l| l == "apt-get -y autoremove").unwrap();
    assert!(hook < cleanup);
}

#[test]
fn skipped_steps_are_reported_and_not_run() {
    let host = Host::new();
    let runner = runner();
    let mut prompter = local_answers();

    let report = run_pipeline(
        &host,
        &runner,
        &StaticReleases::new(),
        &mut prompter,
        &[StepId::Jbig2, StepId::Nltk],
    )
    .unwrap();

    assert_eq!(report.outcome(StepId::Jbig2), Some(StepOutcome::Skipped));
    assert_eq!(report.outcome(StepId::Nltk), Some(StepOutcome::Skipped));
    let lines = runner.command_lines();
    assert!(!lines.iter().any(|l| l.starts_with("make")));
    assert!(!lines.iter().any(|l| l.contains("nltk")));
}

#[test]
fn unreachable_template_falls_back_to_shipped_config() {
    let host = Host::new();
    let mut prompter = local_answers();
    let releases = StaticReleases::new().without_template();

    let report = run_pipeline(&host, &runner(), &releases, &mut prompter, &[]).unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("config template"));
    assert!(host.config().contains("\nPAPERLESS_DBHOST=localhost\n"));
}

#[test]
fn existing_install_directory_aborts() {
    let host = Host::new();
    std::fs::create_dir_all(host.layout.install_dir()).unwrap();
    let mut prompter = local_answers();

    let err = run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap_err();

    assert!(err.to_string().contains("application"));
    assert!(format!("{err:#}").contains("already exists"));
}

#[test]
fn report_serializes_to_json() {
    let host = Host::new();
    let mut prompter = local_answers();

    let report = run_pipeline(&host, &runner(), &StaticReleases::new(), &mut prompter, &[]).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["version"], TAG);
    assert_eq!(json["database_mode"], "local");
    assert_eq!(json["steps"][8]["step"], "provision-db");
    assert_eq!(json["steps"][11]["outcome"], "skipped");
}
