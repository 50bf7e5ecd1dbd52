//! Table inspection commands: classify, activity, phase, misc.

use crate::classify::is_client_project;
use crate::config::Config;
use crate::error::Result;
use crate::mapping::{activity_for, improve_misc_tracking, phase_for};
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct Classification {
    name: String,
    is_client: bool,
}

pub fn run_classify(names: &[String], config: &Config, options: OutputOptions) -> Result<()> {
    let results: Vec<Classification> = names
        .iter()
        .map(|name| Classification {
            name: name.clone(),
            is_client: is_client_project(name, &config.users.valid),
        })
        .collect();

    let mut human = HumanOutput::new("pm-migrate classify");
    for result in &results {
        let kind = if result.is_client { "client" } else { "team member" };
        human.push_summary(result.name.clone(), kind);
    }

    emit_success(options, "classify", &results, Some(&human))
}

#[derive(serde::Serialize)]
struct Mapped<'a> {
    input: &'a str,
    result: &'a str,
}

pub fn run_activity(category: Option<&str>, options: OutputOptions) -> Result<()> {
    let input = category.unwrap_or("");
    let result = activity_for(category);
    emit_mapped("activity", input, result, options)
}

pub fn run_phase(
    title: &str,
    activity: Option<&str>,
    section: Option<&str>,
    options: OutputOptions,
) -> Result<()> {
    let result = phase_for(title, activity, section);
    emit_mapped("phase", title, &result, options)
}

pub fn run_misc(title: &str, options: OutputOptions) -> Result<()> {
    emit_mapped("misc", title, improve_misc_tracking(title), options)
}

fn emit_mapped(command: &str, input: &str, result: &str, options: OutputOptions) -> Result<()> {
    let mut human = HumanOutput::new(format!("pm-migrate {command}"));
    human.push_summary(format!("'{input}'"), result);
    emit_success(options, command, &Mapped { input, result }, Some(&human))
}
