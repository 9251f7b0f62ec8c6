use docstack_core::pipeline::StepId;
use docstack_core::settings::Settings;

#[test]
fn pipeline_runs_fifteen_steps_from_dependencies_to_cleanup() {
    assert_eq!(StepId::ALL.len(), 15);
    assert_eq!(StepId::ALL[0], StepId::Dependencies);
    assert_eq!(StepId::ALL[14], StepId::Cleanup);
}

#[test]
fn step_ids_parse_back_from_their_names() {
    for step in StepId::ALL {
        assert_eq!(step.as_str().parse::<StepId>().unwrap(), step);
    }
}

#[test]
fn default_settings_validate() {
    Settings::default().validate().unwrap();
}
