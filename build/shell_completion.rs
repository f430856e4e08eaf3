include!("../src/cli.rs");

use std::ffi::OsString;

use clap::Shell;

pub fn generate_shell_completion_scripts(outdir: &OsString) {
    let mut app = get_app();
    for shell in &[Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        app.gen_completions("cape", *shell, outdir);
    }
}
