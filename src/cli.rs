use clap::{crate_version, App, AppSettings, Arg};

pub mod arg {
    pub static PROJECT_DIR: &str = "project_dir";
    pub static FILE: &str = "file";
    pub static VERBOSITY: &str = "verbosity";
    pub static TARGETS: &str = "targets";
}

pub fn get_app() -> App<'static, 'static> {
    App::new("cape")
        .version(crate_version!())
        .about("Build declared targets whose outputs are out of date")
        .arg(
            Arg::with_name(arg::PROJECT_DIR)
                .short("p")
                .long("project")
                .takes_value(true)
                .value_name("PROJECT_DIR")
                .default_value(".")
                .hide_default_value(true)
                .help("Directory of the project to build (in which the build file is located)"),
        )
        .arg(
            Arg::with_name(arg::FILE)
                .short("f")
                .long("file")
                .takes_value(true)
                .value_name("FILE")
                .default_value("cape.yml")
                .help("Name of the build file, relative to the project directory"),
        )
        .arg(
            Arg::with_name(arg::VERBOSITY)
                .short("v")
                .multiple(true)
                .takes_value(false)
                .help("Increases message verbosity"),
        )
        .arg(
            Arg::with_name(arg::TARGETS)
                .value_name("TARGETS")
                .multiple(true)
                .help("Targets to build (all targets, in declaration order, when omitted)"),
        )
        .setting(AppSettings::ColoredHelp)
}
